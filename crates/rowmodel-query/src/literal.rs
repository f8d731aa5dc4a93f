//! Literal SQL rendering of values and identifiers.
//!
//! Values are embedded directly into statement text rather than bound as
//! parameters. Text is the only kind that needs escaping: embedded single
//! quotes are doubled. No other escaping is performed.

use rowmodel_core::Value;

/// Format a value as a SQL literal.
///
/// | value      | literal                         |
/// |------------|---------------------------------|
/// | NULL       | `null`                          |
/// | text       | `N'...'`, quotes doubled        |
/// | date/time  | `'yyyy-MM-dd HH:mm:ss'`         |
/// | boolean    | `1` / `0`                       |
/// | enum       | its ordinal                     |
/// | bytes      | `0x` + lowercase hex            |
/// | other      | default textual rendering       |
///
/// ```
/// use rowmodel_core::Value;
/// use rowmodel_query::format_literal;
///
/// assert_eq!(format_literal(&Value::from("O'Brien")), "N'O''Brien'");
/// assert_eq!(format_literal(&Value::Bytes(vec![0x0a, 0xff])), "0x0aff");
/// ```
pub fn format_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::TinyInt(i) => i.to_string(),
        Value::SmallInt(i) => i.to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(i) | Value::Enum(i) => i.to_string(),
        Value::Float(f) => format_float(f64::from(*f), f.to_string()),
        Value::Double(f) => format_float(*f, f.to_string()),
        Value::Decimal(s) => s.clone(),
        Value::Text(s) => escape_text(s),
        Value::Bytes(b) => hex_bytes(b),
        Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
    }
}

/// Non-finite floats have no SQL literal; they are written as `null`.
fn format_float(value: f64, rendered: String) -> String {
    if value.is_finite() {
        rendered
    } else {
        tracing::warn!(value = %rendered, "Non-finite float has no SQL literal; writing null");
        "null".to_string()
    }
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 3);
    result.push_str("N'");
    for ch in s.chars() {
        if ch == '\'' {
            result.push('\'');
        }
        result.push(ch);
    }
    result.push('\'');
    result
}

fn hex_bytes(data: &[u8]) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(data.len() * 2 + 2);
    result.push_str("0x");
    for byte in data {
        let _ = write!(result, "{byte:02x}");
    }
    result
}

/// Quote an identifier with square brackets.
///
/// Embedded closing brackets are doubled (`]` → `]]`).
///
/// ```
/// use rowmodel_query::quote_ident;
///
/// assert_eq!(quote_ident("User"), "[User]");
/// assert_eq!(quote_ident("odd]name"), "[odd]]name]");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}
