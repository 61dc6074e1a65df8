use serde::Serialize;

/// Run `log_action` with `value` rendered as pretty JSON, only when DEBUG is enabled.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(pretty_json.as_str());
}

/// Truncate `raw` to at most `max_chars` characters for log lines and error messages.
pub(crate) fn preview(raw: &str, max_chars: usize) -> String {
    format!("{raw:.max_chars$}")
}
