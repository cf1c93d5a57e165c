// src/core/sanitize.rs
use once_cell::sync::Lazy;
use regex::Regex;

static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*?\)").expect("regex"));
static LVL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+Lvl\s*\d+").expect("regex"));
static LVL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Lvl\s*").expect("regex"));
static STAT_LABELS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Avg Elixir|Average Elixir|4-Card Cycle|4 Card Cycle|Elixir Leaked)\b[:\s-]*")
        .expect("regex")
});
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("regex"));
static SIGNED_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]?\d+").expect("regex"));

/// Collapse whitespace runs (nbsp included) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// `"Knight (11)"`, `"Knight Lvl 11"` → `"Knight"`.
pub fn strip_card_name(raw: &str) -> String {
    let no_paren = PAREN_GROUP.replace_all(raw, "");
    LVL_SUFFIX.replace(&no_paren, "").trim().to_string()
}

/// `"Lvl 14"` → `"14"`.
pub fn strip_level_prefix(raw: &str) -> String {
    LVL_PREFIX.replace(raw.trim(), "").trim().to_string()
}

/// Pull the first number out of a stat label; integers stay integers,
/// fractions round to two places. Falls back to the label-free text.
pub fn clean_stat_raw(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return s!();
    }
    let t = STAT_LABELS.replace_all(t, "");
    let t = t.trim();
    if let Some(m) = NUMBER.find(t) {
        if let Ok(num) = m.as_str().parse::<f64>() {
            return format_number(num);
        }
    }
    normalize_ws(t)
}

fn format_number(num: f64) -> String {
    if num.fract() == 0.0 {
        return format!("{}", num as i64);
    }
    let fixed = format!("{:.2}", num);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// First signed integer in the text (`"+31"`, `"-29 trophies"`), as written.
pub fn signed_int_token(raw: &str) -> Option<String> {
    SIGNED_INT.find(raw).map(|m| s!(m.as_str()))
}

/// Parse a trophy delta, ignoring everything but digits and signs.
pub fn parse_delta(raw: &str) -> Option<i64> {
    let kept: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-').collect();
    signed_int_token(&kept)?.parse().ok()
}

/// Digits of the first number in `s`, if any.
pub fn first_digits(s: &str) -> Option<String> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_names_lose_decorations() {
        assert_eq!(strip_card_name("Knight (Lvl 11)"), "Knight");
        assert_eq!(strip_card_name("Hog Rider (14)"), "Hog Rider");
        assert_eq!(strip_card_name("Mega Knight Lvl 13"), "Mega Knight");
        assert_eq!(strip_card_name("  The Log "), "The Log");
    }

    #[test]
    fn stat_values_are_cleaned() {
        assert_eq!(clean_stat_raw("Avg Elixir: 3.6"), "3.6");
        assert_eq!(clean_stat_raw("4-Card Cycle 11"), "11");
        assert_eq!(clean_stat_raw("3.456"), "3.46");
        assert_eq!(clean_stat_raw("Elixir Leaked - 2.50"), "2.5");
        assert_eq!(clean_stat_raw("n/a  here"), "n/a here");
        assert_eq!(clean_stat_raw(""), "");
    }

    #[test]
    fn deltas_parse_with_signs() {
        assert_eq!(parse_delta("+31"), Some(31));
        assert_eq!(parse_delta("-29"), Some(-29));
        assert_eq!(parse_delta("Trophies: 0"), Some(0));
        assert_eq!(parse_delta("draw"), None);
        assert_eq!(signed_int_token(" +12 "), Some(s!("+12")));
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize_ws(" a \u{00A0}\n b "), "a b");
        assert_eq!(first_digits("Lvl 14 tower"), Some(s!("14")));
        assert_eq!(strip_level_prefix("Lvl 9"), "9");
    }
}
