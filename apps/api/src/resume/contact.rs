use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::ContactInfo;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)linkedin\.com/(?:in|pub)/([A-Za-z0-9_-]+)").unwrap()
});

static GITHUB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)github\.com/([A-Za-z0-9_-]+)").unwrap());

static WEBSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?((?:[a-z0-9-]+\.)+(?:com|io|dev|net|org|me|ai|co|app|tech))\b")
        .unwrap()
});

const HEADER_LINES: usize = 8;

/// Pulls contact details out of the resume text. Missing fields stay `None`.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    let email = EMAIL.find(text).map(|m| m.as_str().to_string());

    let linkedin = LINKEDIN
        .captures(text)
        .map(|c| format!("linkedin.com/in/{}", &c[1]));
    let github = GITHUB.captures(text).map(|c| format!("github.com/{}", &c[1]));

    let scrubbed = GITHUB
        .replace_all(
            &LINKEDIN.replace_all(&EMAIL.replace_all(text, " "), " "),
            " ",
        )
        .into_owned();

    // Only the header is searched for a website; skill lists mention "ASP.NET" and friends.
    let header = scrubbed
        .lines()
        .take(HEADER_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    let website = WEBSITE.captures(&header).map(|c| c[1].to_lowercase());

    let phone = PHONE
        .find(&scrubbed)
        .map(|m| m.as_str().trim().to_string());

    ContactInfo {
        email,
        phone,
        linkedin,
        github,
        website,
    }
}
