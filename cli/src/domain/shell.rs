//! POSIX shell quoting for paths embedded in remote commands.

/// Wrap `value` in single quotes, escaping embedded quotes as `'\''`.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
