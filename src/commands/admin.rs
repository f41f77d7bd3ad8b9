//! `admin` subcommands: sessions, tokens, users and update checks

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use tracing::info;

use super::confirm;
use crate::cli::AdminCommand;
use crate::client::TechnitiumClient;
use crate::format::outln;
use crate::models::{CreatedToken, Session, SessionList, UpdateInfo, User, UserList};

pub async fn run(client: &TechnitiumClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::ListSessions => {
            let list: SessionList = client.list_sessions().await?.response_as()?;
            print!("{}", render_sessions(&list.sessions));
        }
        AdminCommand::DeleteSession { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this session?")? {
                println!("❌ Aborted.");
                return Ok(());
            }
            client
                .delete_session(&id)
                .await
                .with_context(|| format!("Failed to delete session '{}'", id))?;
            info!(partial_token = %id, "Session deleted");
            println!("✅ Session '{}' deleted successfully.", id);
        }
        AdminCommand::CreateToken { user, token_name } => {
            let created: CreatedToken = client
                .create_token(&user, &token_name)
                .await
                .with_context(|| format!("Failed to create token for {}", user))?
                .response_as()?;
            print!("{}", render_created_token(&created));
        }
        AdminCommand::ListUsers => {
            let list: UserList = client.list_users().await?.response_as()?;
            print!("{}", render_users(&list.users));
        }
        AdminCommand::GetUser { user } => {
            let user: User = client.user(&user).await?.response_as()?;
            print!("{}", render_user(&user));
        }
        AdminCommand::CheckUpdate => {
            let update: UpdateInfo = client.check_for_update().await?.response_as()?;
            print!("{}", render_update(&update));
        }
    }
    Ok(())
}

/// RFC 3339 timestamp in local time, or the raw text when it does not parse
pub fn local_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn status_word(disabled: bool) -> ColoredString {
    if disabled {
        "Disabled".red()
    } else {
        "Enabled".green()
    }
}

pub fn render_sessions(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "No active sessions found.\n".to_string();
    }

    let mut out = String::new();
    outln!(out, "{}", "Active Sessions:".bold());
    for session in sessions {
        let token = if session.is_current_session {
            session.partial_token.green()
        } else {
            session.partial_token.yellow()
        };
        outln!(out, "- {} ({})", token, session.session_type);
        outln!(out, "  User: {}", session.username.cyan());
        outln!(
            out,
            "  Name: {}",
            session.token_name.as_deref().unwrap_or("None")
        );
        outln!(
            out,
            "  Seen: {} from {}",
            local_time(&session.last_seen),
            session.last_seen_remote_address
        );
        outln!(out, "  Agent: {}", session.last_seen_user_agent);
    }
    out
}

pub fn render_created_token(created: &CreatedToken) -> String {
    format!(
        "✅ Token created successfully:\n  Username: {}\n  Token Name: {}\n  Token: {}\n",
        created.username, created.token_name, created.token
    )
}

pub fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }

    let mut out = String::new();
    outln!(out, "{}", "User List:".bold());
    for user in users {
        outln!(out, "- {} ({})", user.display_name.bold(), user.username.blue());
        outln!(out, "  Status: {}", status_word(user.disabled));
        outln!(
            out,
            "  Previous Session: {} from {}",
            user.previous_session_logged_on, user.previous_session_remote_address
        );
        outln!(
            out,
            "  Recent Session: {} from {}",
            user.recent_session_logged_on, user.recent_session_remote_address
        );
        outln!(out);
    }
    out
}

pub fn render_user(user: &User) -> String {
    let mut out = String::new();
    outln!(out, "{} ({})", user.display_name.bold(), user.username.blue());
    outln!(out, "  Status: {}", status_word(user.disabled));
    outln!(out, "  Groups: [{}]", user.groups.join(", "));
    match user.session_timeout_seconds {
        Some(seconds) => {
            outln!(out, "  Session Timeout: {} seconds", seconds);
        }
        None => {
            outln!(out, "  Session Timeout: None");
        }
    }
    outln!(
        out,
        "  Previous Login: {} from {}",
        user.previous_session_logged_on, user.previous_session_remote_address
    );
    outln!(
        out,
        "  Recent Login: {} from {}",
        user.recent_session_logged_on, user.recent_session_remote_address
    );
    outln!(out);

    if !user.sessions.is_empty() {
        outln!(out, "{}", "Sessions:".bold());
        for session in &user.sessions {
            outln!(
                out,
                "- Token: {} ({})",
                session.partial_token.blue(),
                session.session_type
            );
            outln!(
                out,
                "  Seen: {} from {}",
                session.last_seen, session.last_seen_remote_address
            );
            outln!(out, "  Agent: {}", session.last_seen_user_agent);
        }
    }
    out
}

pub fn render_update(update: &UpdateInfo) -> String {
    let mut out = String::new();
    outln!(
        out,
        "{}: {} -> {}",
        "Version".bold(),
        update.current_version.cyan(),
        update.update_version.as_deref().unwrap_or("None").green()
    );

    if update.update_available {
        outln!(out, "⚠️  {}", update.update_title.red().bold());
        outln!(out, "{}\n", update.update_message);
        outln!(out, "Download: {}", update.download_link.cyan());
        outln!(out, "Instructions: {}", update.instructions_link.cyan());
        outln!(out, "Changelog: {}", update.change_log_link.cyan());
    } else {
        outln!(out, "{}", "✅ You are using the latest version.".green());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::no_color;
    use crate::testing::serve;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn session(current: bool, last_seen: &str) -> Session {
        Session {
            username: "admin".to_string(),
            is_current_session: current,
            partial_token: "272f4890427b9ab5".to_string(),
            session_type: "Standard".to_string(),
            token_name: None,
            last_seen: last_seen.to_string(),
            last_seen_remote_address: "192.0.2.50".to_string(),
            last_seen_user_agent: "curl/8.0".to_string(),
        }
    }

    #[test]
    fn test_local_time() {
        let raw = "2024-05-01T08:00:00Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(local_time(raw), expected);
        assert_eq!(local_time("yesterday"), "yesterday");
    }

    #[test]
    fn test_render_sessions() {
        no_color();
        let out = render_sessions(&[session(true, "not a timestamp")]);
        assert_eq!(
            out,
            "Active Sessions:\n\
             - 272f4890427b9ab5 (Standard)\n  \
             User: admin\n  \
             Name: None\n  \
             Seen: not a timestamp from 192.0.2.50\n  \
             Agent: curl/8.0\n"
        );
        assert_eq!(render_sessions(&[]), "No active sessions found.\n");
    }

    #[test]
    fn test_render_user() {
        no_color();
        let user = User {
            username: "ops".to_string(),
            display_name: "Operations".to_string(),
            disabled: true,
            session_timeout_seconds: Some(1800),
            groups: vec!["DNS Administrators".to_string(), "Everyone".to_string()],
            sessions: vec![session(false, "2024-05-01T08:00:00Z")],
            ..Default::default()
        };
        let out = render_user(&user);
        assert!(out.starts_with("Operations (ops)\n  Status: Disabled\n"));
        assert!(out.contains("  Groups: [DNS Administrators, Everyone]\n"));
        assert!(out.contains("  Session Timeout: 1800 seconds\n"));
        assert!(out.contains("Sessions:\n- Token: 272f4890427b9ab5 (Standard)\n"));
    }

    #[test]
    fn test_render_users() {
        no_color();
        let out = render_users(&[User {
            username: "admin".to_string(),
            display_name: "Administrator".to_string(),
            ..Default::default()
        }]);
        assert!(out.starts_with("User List:\n- Administrator (admin)\n  Status: Enabled\n"));
        assert_eq!(render_users(&[]), "No users found.\n");
    }

    #[test]
    fn test_render_update() {
        no_color();
        let latest = UpdateInfo {
            current_version: "13.2".to_string(),
            ..Default::default()
        };
        assert_eq!(
            render_update(&latest),
            "Version: 13.2 -> None\n✅ You are using the latest version.\n"
        );

        let available = UpdateInfo {
            update_available: true,
            current_version: "13.2".to_string(),
            update_version: Some("13.3".to_string()),
            update_title: "New Update Available!".to_string(),
            download_link: "https://download.example/13.3.zip".to_string(),
            ..Default::default()
        };
        let out = render_update(&available);
        assert!(out.starts_with("Version: 13.2 -> 13.3\n⚠️  New Update Available!\n"));
        assert!(out.contains("Download: https://download.example/13.3.zip\n"));
    }

    #[tokio::test]
    async fn test_list_sessions_tolerates_null_fields() {
        let router = Router::new().route(
            "/api/admin/sessions/list",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "response": {"sessions": [{
                        "username": "admin",
                        "isCurrentSession": true,
                        "partialToken": "272f4890427b9ab5",
                        "type": "Standard",
                        "lastSeen": "2024-05-01T08:00:00Z",
                        "lastSeenRemoteAddress": "192.0.2.50",
                        "lastSeenUserAgent": null
                    }]}
                }))
            }),
        );
        let base = serve(router).await;
        let client = TechnitiumClient::new(base, "t").unwrap();

        let list: SessionList = client.list_sessions().await.unwrap().response_as().unwrap();
        assert_eq!(list.sessions.len(), 1);

        no_color();
        assert!(render_sessions(&list.sessions).contains("  Agent: \n"));
        run(&client, AdminCommand::ListSessions).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_session_with_yes() {
        let router = Router::new().route(
            "/api/admin/sessions/delete",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("partialToken").map(String::as_str) == Some("272f4890427b9ab5") {
                    Json(json!({"status": "ok"}))
                } else {
                    Json(json!({"status": "error", "errorMessage": "No such session exists."}))
                }
            }),
        );
        let base = serve(router).await;
        let client = TechnitiumClient::new(base, "t").unwrap();

        let ok = AdminCommand::DeleteSession {
            id: "272f4890427b9ab5".to_string(),
            yes: true,
        };
        run(&client, ok).await.unwrap();

        let missing = AdminCommand::DeleteSession {
            id: "ffff".to_string(),
            yes: true,
        };
        let err = run(&client, missing).await.unwrap_err();
        assert!(format!("{:#}", err).ends_with("No such session exists."));
    }
}
