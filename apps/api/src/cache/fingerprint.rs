use sha2::{Digest, Sha256};

/// `title|company|description`, each lowercased with whitespace runs collapsed.
/// Stored next to the fingerprint so a hash collision can be detected.
pub fn normalize_key(job_title: &str, company: &str, description: &str) -> String {
    [job_title, company, description]
        .iter()
        .map(|field| {
            field
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Hex SHA-256 of the normalized key (64 chars).
pub fn fingerprint(normalized_key: &str) -> String {
    hex::encode(Sha256::digest(normalized_key.as_bytes()))
}
