use serde::{Deserialize, Serialize};

/// Section classes the parser recognizes. Anything else lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Other,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.linkedin.is_none()
            && self.github.is_none()
            && self.website.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub start_date: Option<String>,
    /// `None` for a current position.
    pub end_date: Option<String>,
    /// In source order; order encodes importance as written by the user.
    pub bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: Option<String>,
    pub details: Vec<String>,
}

/// A project listed under a Projects/Portfolio heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    /// Vocabulary skills mentioned in the entry, in order of appearance.
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum StructuredEntry {
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Project(ProjectEntry),
    Skill { name: String },
    Line { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// The heading line as written, absent for text before the first heading.
    pub heading: Option<String>,
    /// Every source line of the section, heading included.
    pub raw_text: String,
    pub structured_entries: Vec<StructuredEntry>,
}

impl Section {
    pub fn experience_entries(&self) -> impl Iterator<Item = &ExperienceEntry> {
        self.structured_entries.iter().filter_map(|e| match e {
            StructuredEntry::Experience(exp) => Some(exp),
            _ => None,
        })
    }

    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.structured_entries.iter().filter_map(|e| match e {
            StructuredEntry::Skill { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// A parsed resume. Lives only for the request that uploaded it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub contact: ContactInfo,
    pub sections: Vec<Section>,
}

impl ResumeDocument {
    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }

    /// The full text in source order.
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.raw_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// True when no heading was recognized, i.e. the heuristics found no structure.
    pub fn is_unstructured(&self) -> bool {
        self.sections.iter().all(|s| s.kind == SectionKind::Other)
    }
}
