//! In-process mock server for exercising the client against canned replies

use axum::Router;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });

    format!("http://{}", addr)
}
