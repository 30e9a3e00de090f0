use serde::{Deserialize, Serialize};

use crate::models::resume::{ResumeDocument, SectionKind};

const MIN_TEXT_CHARS: usize = 50;
const MIN_WORDS: usize = 100;
const MAX_ISSUES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAssessment {
    pub is_valid: bool,
    pub word_count: usize,
    pub has_contact: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub issues: Vec<String>,
}

impl ResumeDocument {
    /// Quick sanity report on an uploaded resume, shown before tailoring.
    pub fn assess(&self) -> ResumeAssessment {
        let text = self.full_text();
        let has_section = |kind| self.sections_of(kind).next().is_some();

        let mut report = ResumeAssessment {
            is_valid: true,
            word_count: text.split_whitespace().count(),
            has_contact: !self.contact.is_empty(),
            has_experience: has_section(SectionKind::Experience),
            has_education: has_section(SectionKind::Education),
            has_skills: has_section(SectionKind::Skills),
            issues: Vec::new(),
        };

        if text.trim().chars().count() < MIN_TEXT_CHARS {
            report.is_valid = false;
            report.issues.push("Resume content is too short".to_string());
            return report;
        }

        if report.word_count < MIN_WORDS {
            report
                .issues
                .push(format!("Resume is very short (less than {MIN_WORDS} words)"));
        }
        if !report.has_contact {
            report.issues.push("No contact information found".to_string());
        }
        if !report.has_experience {
            report.issues.push("No work experience section found".to_string());
        }
        if !report.has_education {
            report.issues.push("No education section found".to_string());
        }
        if !report.has_skills {
            report.issues.push("No skills section found".to_string());
        }

        report.is_valid = report.issues.len() <= MAX_ISSUES;
        report
    }
}
