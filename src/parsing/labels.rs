use std::sync::LazyLock;

use regex::Regex;

static PARTNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Partner:\s*([^\n]+)").expect("partner pattern is valid"));

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Location:\s*([^\n]+)").expect("location pattern is valid"));

// Label through end of line, including the newline when there is one
static LABEL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Partner|Location|Exit):[^\n]*(?:\n|$)").expect("label pattern is valid")
});

static FOUNDERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Founders?\s*\n\s*\n\s*([A-Z][^\n]+)").expect("founders pattern is valid")
});

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Value of the first `Partner: ...` line
pub fn extract_partner(about: &str) -> Option<String> {
    first_capture(&PARTNER_RE, about)
}

/// Value of the first `Location: ...` line
pub fn extract_location(about: &str) -> Option<String> {
    first_capture(&LOCATION_RE, about)
}

/// Drop every `Partner:`, `Location:` and `Exit:` segment, leaving the description
pub fn clean_about(about: &str) -> String {
    LABEL_LINE_RE.replace_all(about, "").trim().to_string()
}

/// Founder names listed under a `Founders` heading in the page text
pub fn extract_founders(details: &str) -> Option<String> {
    first_capture(&FOUNDERS_RE, details)
}
