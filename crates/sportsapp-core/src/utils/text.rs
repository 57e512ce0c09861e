use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Truncate to `max_width` display columns, ending with "..." when cut
///
/// # Examples
/// ```
/// use sportsapp_core::utils::text::truncate_text;
/// assert_eq!(truncate_text("Manchester United", 10), "Manches...");
/// assert_eq!(truncate_text("Arsenal", 10), "Arsenal");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width <= ELLIPSIS.width() {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ELLIPSIS.width();
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// First line of a long description, flattened for a table cell
pub fn summary_line(text: &str, max_width: usize) -> String {
    let first = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    truncate_text(first, max_width)
}

/// Optional field as display text, "-" when missing or blank
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Arsenal", 7), "Arsenal");
        assert_eq!(truncate_text("Tottenham Hotspur", 12), "Tottenham...");
        assert_eq!(truncate_text("Arsenal", 2), "..");
    }

    #[test]
    fn test_truncate_text_wide_chars() {
        // Each CJK character takes two columns
        assert_eq!(truncate_text("浦和レッズ", 7), "浦和...");
    }

    #[test]
    fn test_summary_line() {
        let description = "\n  Arsenal Football Club is a professional club.\nFounded in 1886.";
        assert_eq!(
            summary_line(description, 20),
            "Arsenal Football ..."
        );
        assert_eq!(summary_line("", 20), "");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("England")), "England");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(None), "-");
    }
}
