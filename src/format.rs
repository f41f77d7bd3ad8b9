//! Terminal rendering helpers
//!
//! Responses are loosely typed JSON; these helpers turn arbitrary values into
//! colored (or plain) text. Callers build whole reports as `String`s so the
//! layout can be checked in tests with color switched off.

use colored::{Color, Colorize};
use serde_json::{Number, Value};

/// Append one line to a `String` report
macro_rules! outln {
    ($out:expr) => {
        $out.push('\n')
    };
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}
pub(crate) use outln;

/// Render any JSON value with colors.
///
/// Objects print as `[key:value, ...]` with keys sorted and greyed, strings
/// green, numbers blue (floats rounded to whole numbers), booleans yellow.
/// Arrays recurse into their elements and `null` prints as `None`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}:{}", key.bright_black(), format_value(&map[key])))
                .collect();
            format!("[{}]", fields.join(", "))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::String(s) => s.bright_green().to_string(),
        Value::Number(n) => number_text(n).bright_blue().to_string(),
        Value::Bool(b) => b.to_string().bright_yellow().to_string(),
        Value::Null => "None".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format!("{:.0}", n.as_f64().unwrap_or_default())
    }
}

/// Uncolored text for a value; `null` prints as `None`
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(plain).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

/// Like [`plain`] but `null` (or a missing field) is empty
pub fn str_or_empty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => plain(v),
    }
}

/// Lenient truthiness: booleans, or `true`/`1`/`yes` in any case
pub fn to_bool(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(v) => matches!(plain(v).to_lowercase().as_str(), "true" | "1" | "yes"),
    }
}

/// `true`/`false` in the matching color
pub fn bool_color(b: bool, yes: Color, no: Color) -> String {
    if b {
        "true".color(yes).to_string()
    } else {
        "false".color(no).to_string()
    }
}

/// One of two words depending on the truthiness of `value`
pub fn bool_word(value: Option<&Value>, yes: Color, no: Color, y_word: &str, n_word: &str) -> String {
    if to_bool(value) {
        y_word.color(yes).to_string()
    } else {
        n_word.color(no).to_string()
    }
}

/// `Enabled` or `Disabled`
pub fn on_off(enabled: bool, yes: Color, no: Color) -> String {
    if enabled {
        "Enabled".color(yes).to_string()
    } else {
        "Disabled".color(no).to_string()
    }
}

/// Sorted, bracketed list for arrays; other values print as-is
pub fn slice_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "[]".to_string(),
        Some(Value::Array(items)) => {
            let mut items: Vec<String> = items.iter().map(plain).collect();
            items.sort();
            format!("[{}]", items.join(", "))
        }
        Some(v) => plain(v),
    }
}

/// A bold title followed by one sorted `• item` line per element.
///
/// Returns `None` when the value is missing or not an array, so absent
/// sections are skipped entirely. Empty arrays render as `(none)`.
pub fn string_slice_block(title: &str, value: Option<&Value>, tint: Color, indent: usize) -> Option<String> {
    let items = value?.as_array()?;
    let prefix = " ".repeat(indent);

    let mut out = String::new();
    outln!(out, "{}", format!("{}:", title).bold());

    if items.is_empty() {
        outln!(out, "{}(none)", prefix);
        return Some(out);
    }

    let mut items: Vec<String> = items.iter().map(plain).collect();
    items.sort();
    for item in items {
        outln!(out, "{}• {}", prefix, item.color(tint));
    }

    Some(out)
}

/// A bold title followed by a colored `true`/`false`
pub fn bool_line(title: &str, value: Option<&Value>, yes: Color, no: Color) -> String {
    format!(
        "{} {}",
        format!("{}:", title).bold(),
        bool_color(to_bool(value), yes, no)
    )
}

#[cfg(test)]
pub(crate) fn no_color() {
    colored::control::set_override(false);
}
