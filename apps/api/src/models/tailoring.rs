use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A resume facet the tailoring should emphasize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Skills,
    Experience,
    Achievements,
    Keywords,
}

impl Focus {
    pub const ALL: [Focus; 4] = [
        Focus::Skills,
        Focus::Experience,
        Focus::Achievements,
        Focus::Keywords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Skills => "skills",
            Focus::Experience => "experience",
            Focus::Achievements => "achievements",
            Focus::Keywords => "keywords",
        }
    }

    /// Context categories feeding this facet. `None` means every category.
    pub fn context_categories(&self) -> Option<&'static [&'static str]> {
        match self {
            Focus::Skills => Some(&["skill", "certification"]),
            Focus::Experience => Some(&["experience", "project", "volunteer"]),
            Focus::Achievements => Some(&["achievement", "award", "publication"]),
            Focus::Keywords => None,
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Focus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skills" | "skill" => Ok(Focus::Skills),
            "experience" => Ok(Focus::Experience),
            "achievements" | "achievement" => Ok(Focus::Achievements),
            "keywords" | "keyword" => Ok(Focus::Keywords),
            other => Err(AppError::Validation(format!("Unknown focus '{other}'"))),
        }
    }
}

/// The user's focus selection. An empty selection means every facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSet(BTreeSet<Focus>);

impl FocusSet {
    pub fn new(items: impl IntoIterator<Item = Focus>) -> Self {
        Self(items.into_iter().collect())
    }

    pub fn all() -> Self {
        Self::new(Focus::ALL)
    }

    /// Parses a comma separated list such as `"skills, keywords"`.
    pub fn parse_list(raw: &str) -> Result<Self, AppError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Focus::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, focus: Focus) -> bool {
        self.0.is_empty() || self.0.contains(&focus)
    }

    pub fn iter(&self) -> impl Iterator<Item = Focus> + '_ {
        let explicit: Vec<Focus> = if self.0.is_empty() {
            Focus::ALL.to_vec()
        } else {
            self.0.iter().copied().collect()
        };
        explicit.into_iter()
    }

    /// Whether context filed under `category` is relevant to this selection.
    pub fn matches_category(&self, category: &str) -> bool {
        let category = category.trim().to_ascii_lowercase();
        self.iter().any(|focus| match focus.context_categories() {
            None => true,
            Some(categories) => categories.contains(&category.as_str()),
        })
    }

    pub fn label(&self) -> String {
        self.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// One proposed edit to the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeEntry {
    pub section: String,
    /// Empty when the change is a pure addition.
    pub original_excerpt: String,
    pub new_excerpt: String,
    pub rationale: String,
}

/// The complete output of one tailoring run. Never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringResult {
    pub optimized_resume_text: String,
    pub change_list: Vec<ChangeEntry>,
    pub keyword_coverage: BTreeMap<String, bool>,
    pub suggestions: Vec<String>,
    pub confidence_score: f64,
}

impl TailoringResult {
    /// Human-readable change summary for download next to the tailored text.
    pub fn change_summary(&self) -> String {
        let mut out = String::new();
        for (i, change) in self.change_list.iter().enumerate() {
            out.push_str(&format!("{}. [{}] {}\n", i + 1, change.section, change.rationale));
            if !change.original_excerpt.is_empty() {
                out.push_str(&format!("   - before: {}\n", change.original_excerpt));
            }
            out.push_str(&format!("   + after:  {}\n", change.new_excerpt));
        }
        let missing: Vec<&str> = self
            .keyword_coverage
            .iter()
            .filter(|(_, covered)| !**covered)
            .map(|(k, _)| k.as_str())
            .collect();
        if !missing.is_empty() {
            out.push_str(&format!("Uncovered keywords: {}\n", missing.join(", ")));
        }
        out
    }
}
