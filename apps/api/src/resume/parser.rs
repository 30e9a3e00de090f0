//! Resume Parser — segments extracted text into typed sections.
//!
//! Flow: validate size/format → extract text → split on headings →
//!       build structured entries per section kind → contact info.
//!
//! Every non-blank source line ends up in exactly one section's `raw_text`.
//! Text before the first heading, and sections whose heading maps to nothing
//! known, are kept under `SectionKind::Other`.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument, Section, SectionKind,
    StructuredEntry,
};
use crate::resume::classifier::{SectionClassifier, SynonymClassifier};
use crate::resume::contact::extract_contact_info;
use crate::resume::extract::{extract_text, DocumentFormat, MAX_DOCUMENT_BYTES};
use crate::tailoring::keywords::extract_keywords;

const BULLET_GLYPHS: [char; 8] = ['•', '▪', '◦', '●', '‣', '-', '*', '–'];

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let date = format!(r"(?:{MONTH}\s+)?(?:\d{{1,2}}/)?(?:19|20)\d{{2}}");
    Regex::new(&format!(
        r"(?i)\b({date})\s*(?:-|–|—|to)\s*({date}|present|current|now)\b"
    ))
    .unwrap()
});

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static DEGREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bachelor|master|doctor|ph\.?d|mba|b\.?sc?|m\.?sc?|b\.?a|m\.?a|b\.?eng|m\.?eng|associate|diploma|degree)\b")
        .unwrap()
});

static INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy|polytechnic)\b").unwrap()
});

/// Parses resume documents. Holds the section classifier so callers can swap
/// heading heuristics without touching anything else.
#[derive(Clone)]
pub struct ResumeParser {
    classifier: Arc<dyn SectionClassifier>,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(Arc::new(SynonymClassifier::default()))
    }
}

impl ResumeParser {
    pub fn new(classifier: Arc<dyn SectionClassifier>) -> Self {
        Self { classifier }
    }

    /// Parses raw document bytes. Oversized input is rejected as
    /// `UnsupportedFormat` before any extraction work happens.
    pub fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<ResumeDocument, AppError> {
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(AppError::UnsupportedFormat(format!(
                "Document is {} bytes; the limit is {} bytes",
                bytes.len(),
                MAX_DOCUMENT_BYTES
            )));
        }
        let text = extract_text(bytes, format)?;
        self.parse_text(&text)
    }

    /// Segments already-extracted text.
    pub fn parse_text(&self, text: &str) -> Result<ResumeDocument, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::ExtractionFailure(
                "Document contains no readable text".to_string(),
            ));
        }

        let sections: Vec<Section> = self
            .segment(text)
            .into_iter()
            .filter_map(SectionDraft::finish)
            .collect();

        debug!(
            "Parsed resume into {} sections: {:?}",
            sections.len(),
            sections.iter().map(|s| s.kind).collect::<Vec<_>>()
        );

        Ok(ResumeDocument {
            contact: extract_contact_info(text),
            sections,
        })
    }

    fn segment<'a>(&self, text: &'a str) -> Vec<SectionDraft<'a>> {
        let mut drafts: Vec<SectionDraft<'a>> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if !trimmed.is_empty() && self.classifier.is_heading(trimmed) {
                drafts.push(SectionDraft {
                    kind: self.classifier.classify(trimmed),
                    heading: Some(trimmed),
                    lines: vec![line],
                });
                continue;
            }

            match drafts.last_mut() {
                Some(draft) => draft.lines.push(line),
                None => drafts.push(SectionDraft {
                    kind: SectionKind::Other,
                    heading: None,
                    lines: vec![line],
                }),
            }
        }

        drafts
    }
}

/// Builds a section of a known kind from lines segmented elsewhere (the model
/// fallback). A leading copy of the heading inside `lines` is dropped.
pub fn assemble_section(kind: SectionKind, heading: Option<&str>, lines: &[&str]) -> Option<Section> {
    let heading = heading.map(str::trim).filter(|h| !h.is_empty());
    let body = match (heading, lines.first()) {
        (Some(h), Some(first)) if first.trim() == h => &lines[1..],
        _ => lines,
    };
    let mut all = Vec::with_capacity(body.len() + 1);
    all.extend(heading);
    all.extend_from_slice(body);

    SectionDraft {
        kind,
        heading,
        lines: all,
    }
    .finish()
}

struct SectionDraft<'a> {
    kind: SectionKind,
    heading: Option<&'a str>,
    /// Source lines, heading first when there is one.
    lines: Vec<&'a str>,
}

impl<'a> SectionDraft<'a> {
    fn finish(self) -> Option<Section> {
        if self.lines.iter().all(|l| l.trim().is_empty()) {
            return None;
        }

        let body: &[&str] = if self.heading.is_some() {
            &self.lines[1..]
        } else {
            &self.lines
        };

        let structured_entries = match self.kind {
            SectionKind::Experience => parse_experience(body)
                .into_iter()
                .map(StructuredEntry::Experience)
                .collect(),
            SectionKind::Education => parse_education(body)
                .into_iter()
                .map(StructuredEntry::Education)
                .collect(),
            SectionKind::Skills => parse_skills(body)
                .into_iter()
                .map(|name| StructuredEntry::Skill { name })
                .collect(),
            SectionKind::Other if self.heading.is_some_and(is_projects_heading) => {
                parse_projects(body)
                    .into_iter()
                    .map(StructuredEntry::Project)
                    .collect()
            }
            SectionKind::Summary | SectionKind::Other => body
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(|l| StructuredEntry::Line {
                    text: strip_bullet(l).unwrap_or(l).to_string(),
                })
                .collect(),
        };

        Some(Section {
            kind: self.kind,
            heading: self.heading.map(str::to_string),
            raw_text: trim_blank_edges(&self.lines).join("\n"),
            structured_entries,
        })
    }
}

fn trim_blank_edges<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    &lines[start..end]
}

/// Returns the bullet text when `line` starts with a bullet glyph or dash.
fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix(&BULLET_GLYPHS[..])?;
    // "-2019" or "--" are not bullets
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Groups lines into entries. A blank line closes an entry; a header line
/// following bullets, or a second date range, opens a new one.
fn parse_experience(lines: &[&str]) -> Vec<ExperienceEntry> {
    let mut groups: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            continue;
        }

        let is_bullet = strip_bullet(trimmed).is_some();
        if !is_bullet && !current.is_empty() {
            let current_has_bullets = current.iter().any(|l| strip_bullet(l).is_some());
            let starts_entry = if DATE_RANGE.is_match(trimmed) {
                current_has_bullets || current.iter().any(|l| DATE_RANGE.is_match(l))
            } else {
                // header line after bullets; lowercase lines are wrapped bullets
                current_has_bullets && !trimmed.starts_with(char::is_lowercase)
            };
            if starts_entry {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(trimmed);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups.iter().map(|g| build_experience(g)).collect()
}

fn build_experience(lines: &[&str]) -> ExperienceEntry {
    let mut header: Vec<String> = Vec::new();
    let mut bullets: Vec<String> = Vec::new();
    let mut start_date = None;
    let mut end_date = None;

    for line in lines {
        if let Some(text) = strip_bullet(line) {
            bullets.push(text.to_string());
            continue;
        }

        // wrapped continuation of the previous bullet
        if !bullets.is_empty() && line.starts_with(char::is_lowercase) {
            if let Some(last) = bullets.last_mut() {
                last.push(' ');
                last.push_str(line);
            }
            continue;
        }

        let mut text = line.to_string();
        if start_date.is_none() {
            if let Some(caps) = DATE_RANGE.captures(line) {
                start_date = Some(caps[1].trim().to_string());
                let end = caps[2].trim();
                end_date = match end.to_ascii_lowercase().as_str() {
                    "present" | "current" | "now" => None,
                    _ => Some(end.to_string()),
                };
                text = DATE_RANGE.replace(line, "").to_string();
            }
        }
        let text = clean_separators(&text);
        if !text.is_empty() {
            header.push(text);
        }
    }

    let (title, organization) = split_title_org(&header);

    ExperienceEntry {
        title,
        organization,
        start_date,
        end_date,
        bullet_points: bullets,
    }
}

/// "Backend Engineer at Acme", "Backend Engineer | Acme", "Backend Engineer, Acme",
/// or title and organization on consecutive lines.
fn split_title_org(header: &[String]) -> (String, String) {
    let Some(first) = header.first() else {
        return (String::new(), String::new());
    };

    for separator in [" at ", " @ ", " | ", " — ", " – ", " - ", ", "] {
        if let Some((title, org)) = first.split_once(separator) {
            return (title.trim().to_string(), clean_separators(org));
        }
    }

    let organization = header.get(1).cloned().unwrap_or_default();
    (first.clone(), organization)
}

fn clean_separators(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, '|' | ',' | '-' | '–' | '—' | '(' | ')' | '·'))
        .trim()
        .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

fn parse_education(lines: &[&str]) -> Vec<EducationEntry> {
    lines
        .split(|l| l.trim().is_empty())
        .filter(|group| !group.is_empty())
        .map(|group| {
            let group: Vec<&str> = group
                .iter()
                .map(|l| strip_bullet(l).unwrap_or(l.trim()))
                .collect();

            let degree_idx = group.iter().position(|l| DEGREE.is_match(l)).unwrap_or(0);
            let institution_idx = group
                .iter()
                .position(|l| INSTITUTION.is_match(l))
                .filter(|i| *i != degree_idx)
                .or_else(|| (degree_idx + 1 < group.len()).then_some(degree_idx + 1));

            let year = group
                .iter()
                .flat_map(|l| YEAR.find_iter(l))
                .last()
                .map(|m| m.as_str().to_string());

            let details = group
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != degree_idx && Some(*i) != institution_idx)
                .map(|(_, l)| l.to_string())
                .collect();

            EducationEntry {
                degree: group[degree_idx].to_string(),
                institution: institution_idx
                    .map(|i| group[i].to_string())
                    .unwrap_or_default(),
                year,
                details,
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Splits on commas, semicolons, pipes and bullets. A short "Category:" prefix is dropped.
fn parse_skills(lines: &[&str]) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut text = strip_bullet(trimmed).unwrap_or(trimmed);
        if let Some((prefix, rest)) = text.split_once(':') {
            if prefix.split_whitespace().count() <= 3 && !rest.trim().is_empty() {
                text = rest;
            }
        }

        for item in text.split([',', ';', '|', '•', '·']) {
            let item = item.trim();
            if item.is_empty() || item.len() > 50 {
                continue;
            }
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(item)) {
                skills.push(item.to_string());
            }
        }
    }

    skills
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

fn is_projects_heading(heading: &str) -> bool {
    let lowered = heading.to_lowercase();
    lowered.contains("project") || lowered.contains("portfolio")
}

/// One entry per blank-line group, or per non-bullet line once the current
/// entry has a description. "Name: description" and "Name - description"
/// split on the first line.
fn parse_projects(lines: &[&str]) -> Vec<ProjectEntry> {
    let mut groups: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            continue;
        }
        let is_bullet = strip_bullet(trimmed).is_some();
        if !is_bullet && !current.is_empty() && !trimmed.starts_with(char::is_lowercase) {
            let has_body = current.len() > 1 || split_project_name(current[0]).1.is_some();
            if has_body {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(trimmed);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups.iter().map(|g| build_project(g)).collect()
}

fn split_project_name(line: &str) -> (&str, Option<&str>) {
    let line = strip_bullet(line).unwrap_or(line);
    for separator in [": ", " — ", " – ", " - ", " | "] {
        if let Some((name, rest)) = line.split_once(separator) {
            if !rest.trim().is_empty() {
                return (name.trim(), Some(rest.trim()));
            }
        }
    }
    (line.trim().trim_end_matches(':'), None)
}

fn build_project(lines: &[&str]) -> ProjectEntry {
    let (name, first_rest) = split_project_name(lines[0]);
    let description = first_rest
        .into_iter()
        .chain(lines[1..].iter().map(|l| strip_bullet(l).unwrap_or(*l)))
        .collect::<Vec<_>>()
        .join(" ");
    let technologies = extract_keywords(&lines.join("\n"));

    ProjectEntry {
        name: name.to_string(),
        description,
        technologies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::extract::tests::{docx_fixture, docx_from_body};

    const SAMPLE: &str = "\
Jane Doe
jane@example.com | (555) 123-4567

Summary
Backend engineer focused on reliable services.

Experience
Senior Software Engineer at Acme Corp
Jan 2020 - Present
• Built payment APIs in Go serving 2M requests/day
• Led migration to Kubernetes
Software Engineer | Initech
2017 - 2019
- Maintained billing system

Education
B.Sc. Computer Science
State University, 2016

Skills
Languages: Go, Rust, Python
PostgreSQL; Redis | Docker

Projects
Open-source rate limiter
";

    fn parse(text: &str) -> ResumeDocument {
        ResumeParser::default().parse_text(text).unwrap()
    }

    #[test]
    fn test_section_order_is_preserved() {
        let doc = parse(SAMPLE);
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Other,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Other,
            ]
        );
        assert_eq!(doc.sections[0].heading, None);
        assert_eq!(doc.sections[5].heading.as_deref(), Some("Projects"));
    }

    #[test]
    fn test_every_non_blank_line_is_covered() {
        let doc = parse(SAMPLE);
        let covered: Vec<&str> = doc
            .sections
            .iter()
            .flat_map(|s| s.raw_text.lines())
            .map(str::trim)
            .collect();
        for line in SAMPLE.lines().map(str::trim).filter(|l| !l.is_empty()) {
            assert!(covered.contains(&line), "line lost: {line}");
        }
    }

    #[test]
    fn test_experience_entries_split_on_date_headers() {
        let doc = parse(SAMPLE);
        let experience = doc.sections_of(SectionKind::Experience).next().unwrap();
        let entries: Vec<&ExperienceEntry> = experience.experience_entries().collect();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "Senior Software Engineer");
        assert_eq!(entries[0].organization, "Acme Corp");
        assert_eq!(entries[0].start_date.as_deref(), Some("Jan 2020"));
        assert_eq!(entries[0].end_date, None);
        assert_eq!(
            entries[0].bullet_points,
            vec![
                "Built payment APIs in Go serving 2M requests/day",
                "Led migration to Kubernetes",
            ]
        );

        assert_eq!(entries[1].title, "Software Engineer");
        assert_eq!(entries[1].organization, "Initech");
        assert_eq!(entries[1].start_date.as_deref(), Some("2017"));
        assert_eq!(entries[1].end_date.as_deref(), Some("2019"));
        assert_eq!(entries[1].bullet_points, vec!["Maintained billing system"]);
    }

    #[test]
    fn test_experience_entries_split_on_blank_lines() {
        let text = "Experience\nEngineer, Globex\n- Shipped things\n\nIntern, Hooli\n- Fixed bugs\n- Wrote tests";
        let doc = parse(text);
        let entries: Vec<&ExperienceEntry> = doc.sections[0].experience_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].organization, "Hooli");
        assert_eq!(entries[1].bullet_points, vec!["Fixed bugs", "Wrote tests"]);
    }

    #[test]
    fn test_wrapped_bullet_lines_are_joined() {
        let text = "Experience\nEngineer at Globex\n• Reduced latency across\nthe checkout flow by 40%";
        let doc = parse(text);
        let entry = doc.sections[0].experience_entries().next().unwrap();
        assert_eq!(
            entry.bullet_points,
            vec!["Reduced latency across the checkout flow by 40%"]
        );
    }

    #[test]
    fn test_education_entry() {
        let doc = parse(SAMPLE);
        let education = doc.sections_of(SectionKind::Education).next().unwrap();
        match &education.structured_entries[0] {
            StructuredEntry::Education(entry) => {
                assert_eq!(entry.degree, "B.Sc. Computer Science");
                assert_eq!(entry.institution, "State University, 2016");
                assert_eq!(entry.year.as_deref(), Some("2016"));
            }
            other => panic!("expected education entry, got {other:?}"),
        }
    }

    #[test]
    fn test_skills_are_split_and_deduplicated() {
        let doc = parse("Skills\nLanguages: Go, Rust, go\nPostgreSQL; Redis | Docker\n- Kubernetes");
        let skills: Vec<&str> = doc.sections[0].skills().collect();
        assert_eq!(
            skills,
            vec!["Go", "Rust", "PostgreSQL", "Redis", "Docker", "Kubernetes"]
        );
    }

    #[test]
    fn test_projects_become_entries_with_technologies() {
        let text = "Projects\nRate Limiter: token bucket service in Rust backed by Redis\nPortfolio Site\n- Static site built with React and deployed on AWS\n\nCLI Toolkit - golang utilities";
        let doc = parse(text);
        assert_eq!(doc.sections[0].kind, SectionKind::Other);
        let projects: Vec<&ProjectEntry> = doc.sections[0]
            .structured_entries
            .iter()
            .filter_map(|e| match e {
                StructuredEntry::Project(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(projects.len(), 3);

        assert_eq!(projects[0].name, "Rate Limiter");
        assert_eq!(projects[0].description, "token bucket service in Rust backed by Redis");
        assert_eq!(projects[0].technologies, vec!["Rust", "Redis"]);

        assert_eq!(projects[1].name, "Portfolio Site");
        assert_eq!(projects[1].technologies, vec!["React", "AWS"]);

        assert_eq!(projects[2].name, "CLI Toolkit");
        assert_eq!(projects[2].technologies, vec!["Go"]);
    }

    #[test]
    fn test_headingless_text_is_other() {
        let doc = parse("Just a paragraph about me\nand another line");
        assert!(doc.is_unstructured());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].structured_entries.len(), 2);
    }

    #[test]
    fn test_blank_text_is_extraction_failure() {
        assert!(matches!(
            ResumeParser::default().parse_text("  \n\n "),
            Err(AppError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn test_contact_info_is_extracted() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.contact.email.as_deref(), Some("jane@example.com"));
        assert_eq!(doc.contact.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_parse_docx_bytes() {
        let bytes = docx_fixture(&[
            "Experience",
            "Backend Engineer at Acme",
            "• Built Go services",
            "• Ran on-call",
            "",
            "Skills",
            "Go, SQL, Docker",
        ]);
        let doc = ResumeParser::default()
            .parse(&bytes, DocumentFormat::Docx)
            .unwrap();
        assert_eq!(doc.sections.len(), 2);
        let entry = doc.sections[0].experience_entries().next().unwrap();
        assert_eq!(entry.bullet_points.len(), 2);
        assert_eq!(doc.sections[1].skills().count(), 3);
    }

    #[test]
    fn test_word_shaped_docx_keeps_blank_lines_and_text_boxes() {
        let para = |text: &str| {
            format!(
                "<w:p w:rsidR=\"00A1\" w:rsidRDefault=\"00B2\"><w:pPr><w:spacing w:after=\"0\"/></w:pPr><w:r w:rsidRPr=\"00C3\"><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"
            )
        };
        let body = [
            format!(
                "<w:p><w:r><w:t>Jane Doe</w:t></w:r><w:r><w:drawing><w:txbxContent>{}</w:txbxContent></w:drawing></w:r><w:r><w:t>Portland, OR</w:t></w:r></w:p>",
                para("jane@example.com")
            ),
            para("Experience"),
            para("Engineer, Globex"),
            para("Built the billing system"),
            "<w:p w:rsidR=\"00A1\" w:rsidRDefault=\"00B2\"/>".to_string(),
            para("Intern, Hooli"),
            para("Wrote integration tests"),
        ]
        .concat();

        let doc = ResumeParser::default()
            .parse(&docx_from_body(&body), DocumentFormat::Docx)
            .unwrap();
        assert_eq!(doc.contact.email.as_deref(), Some("jane@example.com"));

        let covered: Vec<&str> = doc.sections.iter().flat_map(|s| s.raw_text.lines()).collect();
        for line in ["Jane Doe", "jane@example.com", "Portland, OR", "Wrote integration tests"] {
            assert!(covered.contains(&line), "line lost: {line}");
        }

        let experience = doc.sections_of(SectionKind::Experience).next().unwrap();
        let entries: Vec<&ExperienceEntry> = experience.experience_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, "Intern");
        assert_eq!(entries[1].organization, "Hooli");
    }

    #[test]
    fn test_oversized_document_is_unsupported() {
        let bytes = vec![0u8; MAX_DOCUMENT_BYTES + 1];
        assert!(matches!(
            ResumeParser::default().parse(&bytes, DocumentFormat::Pdf),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_custom_classifier_is_used() {
        let classifier = SynonymClassifier::with_synonyms(vec![(SectionKind::Skills, vec!["toolbox"])]);
        let parser = ResumeParser::new(Arc::new(classifier));
        let doc = parser.parse_text("Toolbox\nGo, Rust\nSkills: SQL").unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].kind, SectionKind::Skills);
        assert_eq!(doc.sections[0].skills().count(), 3);
    }
}
