//! Reusable field filters
//!
//! These filters normalize request values before validation

/// Filter: trim whitespace, turning blank strings into `None`
pub fn trim(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Filter: strip an optional `Bearer ` scheme from an authorization value
///
/// The scheme match is case-insensitive. Blank results become `None`.
pub fn bearer_token(header: Option<&str>) -> Option<String> {
    let value = header?.trim_start();
    let token = match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => &value[7..],
        _ => value,
    };
    trim(Some(token.to_string()))
}
