/// Two-decimal value, `-` for an absent entry
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

/// Right-pad to `width` display columns
pub fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
