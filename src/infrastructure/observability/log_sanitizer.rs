const MAX_VISIBLE_LENGTH: usize = 100;

/// Sanitizes model reply or prompt text for safe logging: truncated to a
/// short prefix and scrubbed of credential-looking patterns. Raw backend
/// payloads never reach user-facing output; this guards the logs too.
pub fn sanitize_log_text(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    // Truncate on a char boundary; replies are routinely Cyrillic.
    let sanitized = match trimmed
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= MAX_VISIBLE_LENGTH)
        .last()
    {
        Some(end) if trimmed.len() > MAX_VISIBLE_LENGTH => {
            format!("{}... ({} chars total)", &trimmed[..end], trimmed.len())
        }
        _ => trimmed.to_string(),
    };

    redact_sensitive_patterns(&sanitized)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("key=", "key=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        if let Some(idx) = result.find(pattern) {
            let end = result[idx + pattern.len()..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| idx + pattern.len() + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..idx], replacement, &result[end..]);
        }
    }

    result
}
