//! Uniqueness tokens embedded in generated file names.

/// Encode bytes as lowercase hex.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}

/// Format 16 random bytes in the familiar `8-4-4-4-12` grouping.
#[must_use]
pub fn format_token(bytes: [u8; 16]) -> String {
    let hex = hex_encode(&bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Remote file name `<dir>/<app>-<part>[-<token>]<ext>`.
#[must_use]
pub fn artifact_file_name(
    dir: &str,
    app: &str,
    part: &str,
    token: Option<&str>,
    extension: &str,
) -> String {
    match token {
        Some(token) => format!("{dir}/{app}-{part}-{token}{extension}"),
        None => format!("{dir}/{app}-{part}{extension}"),
    }
}
