//! Input sanitization and validation
//!
//! Pure functions over untrusted strings and coordinates; no state, no I/O.
//! Every free-text input crossing the HTTP boundary is sanitized here before
//! it reaches the persistence layer.

/// Sanitize a string: strip NUL bytes, HTML-escape, trim surrounding whitespace
pub fn sanitize_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\0' => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Username: 3-50 characters, ASCII alphanumeric and underscores only
pub fn is_valid_username(username: &str) -> bool {
    (3..=50).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Password: at least 6 characters with at least one letter and one digit
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 6
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Album title: 1-200 characters after trimming
pub fn is_valid_title(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= 200
}

/// Album description: at most 2000 characters
pub fn is_valid_description(description: &str) -> bool {
    description.chars().count() <= 2000
}

/// Latitude within [-90, 90] and longitude within [-180, 180]
pub fn is_valid_coordinates(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// SQL fragments that have no business appearing in album titles or usernames.
/// Deliberately specific to keep false positives low.
const SQL_PATTERNS: &[&str] = &[
    "' or ",
    "' and ",
    "' union ",
    "' select ",
    "' insert ",
    "' update ",
    "' delete ",
    "' drop ",
    "; select ",
    "; insert ",
    "; update ",
    "; delete ",
    "; drop ",
    "--",
    "/*",
    "*/",
    "xp_cmdshell",
    "sp_executesql",
];

const XSS_PATTERNS: &[&str] = &[
    "<script",
    "</script>",
    "javascript:",
    "vbscript:",
    "onload=",
    "onerror=",
    "onclick=",
    "onmouseover=",
    "onfocus=",
    "onblur=",
];

/// Screen free-text input for SQL-injection and XSS fragments
pub fn contains_suspicious_patterns(input: &str) -> bool {
    let lower = input.to_lowercase();
    SQL_PATTERNS.iter().chain(XSS_PATTERNS).any(|p| lower.contains(p))
}
