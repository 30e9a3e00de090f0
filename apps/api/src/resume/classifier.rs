//! Section classification — pluggable, trait-based heading matcher.
//!
//! Default: `SynonymClassifier` (case-insensitive synonym table, deterministic).
//! Unrecognized headings fall back to `SectionKind::Other`.

use crate::models::resume::SectionKind;

/// Maps a heading line to a section kind. Implement this to swap the
/// heuristics without touching the parser or the pipeline.
pub trait SectionClassifier: Send + Sync {
    fn classify(&self, heading: &str) -> SectionKind;

    /// Whether `line` opens a new section at all.
    fn is_heading(&self, line: &str) -> bool {
        self.classify(line) != SectionKind::Other
    }
}

/// Longest line (in words) still considered a heading.
const MAX_HEADING_WORDS: usize = 5;

pub struct SynonymClassifier {
    synonyms: Vec<(SectionKind, Vec<String>)>,
}

impl Default for SynonymClassifier {
    fn default() -> Self {
        Self::with_synonyms(vec![
            (
                SectionKind::Summary,
                vec![
                    "summary",
                    "professional summary",
                    "career summary",
                    "objective",
                    "career objective",
                    "profile",
                    "professional profile",
                    "about",
                    "about me",
                ],
            ),
            (
                SectionKind::Experience,
                vec![
                    "experience",
                    "work experience",
                    "professional experience",
                    "relevant experience",
                    "employment",
                    "employment history",
                    "work history",
                    "career history",
                ],
            ),
            (
                SectionKind::Education,
                vec![
                    "education",
                    "academic background",
                    "academics",
                    "qualifications",
                    "education and training",
                ],
            ),
            (
                SectionKind::Skills,
                vec![
                    "skills",
                    "technical skills",
                    "core skills",
                    "key skills",
                    "competencies",
                    "core competencies",
                    "technologies",
                    "tech stack",
                ],
            ),
            (
                SectionKind::Other,
                vec![
                    "contact",
                    "contact information",
                    "personal details",
                    "projects",
                    "personal projects",
                    "portfolio",
                    "certifications",
                    "certificates",
                    "credentials",
                    "achievements",
                    "awards",
                    "honors",
                    "publications",
                    "research",
                    "volunteer",
                    "volunteering",
                    "community service",
                    "languages",
                    "interests",
                    "references",
                ],
            ),
        ])
    }
}

impl SynonymClassifier {
    pub fn with_synonyms(table: Vec<(SectionKind, Vec<&str>)>) -> Self {
        Self {
            synonyms: table
                .into_iter()
                .map(|(kind, words)| (kind, words.into_iter().map(normalize_heading).collect()))
                .collect(),
        }
    }

    /// Exact synonym match first. A synonym phrase inside a longer heading
    /// ("PROFESSIONAL EXPERIENCE & LEADERSHIP") only counts when the line is
    /// visibly decorated as a heading, so job titles like "Research Engineer"
    /// stay where they are.
    fn lookup(&self, heading: &str) -> Option<SectionKind> {
        let normalized = normalize_heading(heading);
        if normalized.is_empty() || normalized.split(' ').count() > MAX_HEADING_WORDS {
            return None;
        }

        for (kind, words) in &self.synonyms {
            if words.iter().any(|w| *w == normalized) {
                return Some(*kind);
            }
        }

        if !looks_decorated(heading) {
            return None;
        }

        let padded = format!(" {normalized} ");
        for (kind, words) in &self.synonyms {
            if words.iter().any(|w| padded.contains(&format!(" {w} "))) {
                return Some(*kind);
            }
        }
        None
    }
}

impl SectionClassifier for SynonymClassifier {
    fn classify(&self, heading: &str) -> SectionKind {
        self.lookup(heading).unwrap_or(SectionKind::Other)
    }

    fn is_heading(&self, line: &str) -> bool {
        let trimmed = line.trim();
        // sentences and bullet lines never open a section
        if trimmed.ends_with('.') || trimmed.starts_with(['-', '*', '•', '▪', '◦', '●', '–']) {
            return false;
        }
        self.lookup(trimmed).is_some()
    }
}

/// Trailing colon, markdown hashes, or ALL CAPS.
fn looks_decorated(line: &str) -> bool {
    let trimmed = line.trim();
    let has_letters = trimmed.chars().any(|c| c.is_alphabetic());
    trimmed.ends_with(':')
        || trimmed.starts_with('#')
        || (has_letters && !trimmed.chars().any(|c| c.is_lowercase()))
}

/// Lowercases, drops decoration (`#`, `:`, `—`, `&`…) and collapses whitespace.
fn normalize_heading(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
