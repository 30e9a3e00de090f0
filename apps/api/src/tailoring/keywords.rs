//! Keyword extraction and coverage — pure Rust, deterministic, no LLM call.
//!
//! A fixed skill vocabulary with synonyms ("Golang" counts as "Go") drives
//! both sides: which keywords a posting asks for, and whether the resume or
//! the stored context mentions them. Matching respects word boundaries, so "Go"
//! never matches inside "Google" or "MongoDB", and is case-insensitive except
//! for names that double as everyday words ("Go", "REST"). Those match as
//! written or in all caps.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// One vocabulary entry. `name` is what shows up in `keyword_coverage`.
pub struct SkillTerm {
    pub name: &'static str,
    pub category: &'static str,
    pub aliases: &'static [&'static str],
    /// Match `name` case-sensitively (for common English words like "Go").
    pub strict_case: bool,
}

const fn term(name: &'static str, category: &'static str, aliases: &'static [&'static str]) -> SkillTerm {
    SkillTerm {
        name,
        category,
        aliases,
        strict_case: false,
    }
}

pub static VOCABULARY: &[SkillTerm] = &[
    // programming
    SkillTerm {
        name: "Go",
        category: "programming",
        aliases: &["golang"],
        strict_case: true,
    },
    term("Python", "programming", &[]),
    term("Java", "programming", &[]),
    term("JavaScript", "programming", &["js", "ecmascript"]),
    term("TypeScript", "programming", &["ts"]),
    term("C++", "programming", &["cpp"]),
    term("C#", "programming", &["csharp", ".net"]),
    term("Rust", "programming", &[]),
    term("PHP", "programming", &[]),
    term("Ruby", "programming", &[]),
    SkillTerm {
        name: "Swift",
        category: "programming",
        aliases: &["swiftui"],
        strict_case: true,
    },
    term("Kotlin", "programming", &[]),
    term("Scala", "programming", &[]),
    // web
    term("HTML", "web", &["html5"]),
    term("CSS", "web", &["css3"]),
    term("React", "web", &["react.js", "reactjs"]),
    term("Angular", "web", &["angularjs"]),
    term("Vue", "web", &["vue.js", "vuejs"]),
    term("Node.js", "web", &["node", "nodejs"]),
    term("Django", "web", &[]),
    term("Flask", "web", &[]),
    term("Express.js", "web", &["expressjs"]),
    term("GraphQL", "web", &[]),
    SkillTerm {
        name: "REST",
        category: "web",
        aliases: &["restful", "rest api", "rest apis"],
        strict_case: true,
    },
    // database
    term("SQL", "database", &[]),
    term("MySQL", "database", &[]),
    term("PostgreSQL", "database", &["postgres", "psql"]),
    term("MongoDB", "database", &["mongo"]),
    term("Redis", "database", &[]),
    term("SQLite", "database", &[]),
    term("Oracle", "database", &[]),
    term("Kafka", "database", &["apache kafka"]),
    term("Elasticsearch", "database", &["elastic search"]),
    // cloud
    term("AWS", "cloud", &["amazon web services"]),
    term("Azure", "cloud", &["microsoft azure"]),
    term("GCP", "cloud", &["google cloud", "google cloud platform"]),
    term("Docker", "cloud", &[]),
    term("Kubernetes", "cloud", &["k8s"]),
    term("Terraform", "cloud", &[]),
    term("Jenkins", "cloud", &[]),
    term("CI/CD", "cloud", &["continuous integration", "continuous delivery"]),
    // data
    term("Pandas", "data", &[]),
    term("NumPy", "data", &[]),
    term("scikit-learn", "data", &["sklearn"]),
    term("TensorFlow", "data", &[]),
    term("PyTorch", "data", &[]),
    SkillTerm {
        name: "Spark",
        category: "data",
        aliases: &["apache spark", "pyspark"],
        strict_case: true,
    },
    term("Machine Learning", "data", &["ml"]),
    // practices
    term("Distributed Systems", "practices", &["distributed system", "distributed computing"]),
    term("Microservices", "practices", &["microservice", "micro-services"]),
    term("Agile", "practices", &["scrum"]),
    // tools
    term("Git", "tools", &["github", "gitlab"]),
    term("Jira", "tools", &[]),
    term("Linux", "tools", &["unix"]),
    term("Figma", "tools", &[]),
];

struct CompiledTerm {
    term: &'static SkillTerm,
    pattern: Regex,
}

static COMPILED: LazyLock<Vec<CompiledTerm>> = LazyLock::new(|| {
    VOCABULARY
        .iter()
        .map(|term| {
            let name = if term.strict_case {
                // all-caps lines ("LANGUAGES: GO, RUST") still count
                let upper = term.name.to_uppercase();
                if upper == term.name {
                    phrase_pattern(term.name)
                } else {
                    format!("{}|{}", phrase_pattern(term.name), phrase_pattern(&upper))
                }
            } else {
                format!("(?i:{})", phrase_pattern(term.name))
            };
            let alternatives: Vec<String> = std::iter::once(name)
                .chain(
                    term.aliases
                        .iter()
                        .map(|alias| format!("(?i:{})", phrase_pattern(alias))),
                )
                .collect();
            CompiledTerm {
                term,
                pattern: bounded(&alternatives.join("|")),
            }
        })
        .collect()
});

/// Escapes each word and lets any whitespace run separate them.
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Word-boundary wrapper that also works for terms ending in `+`, `#` or `.js`,
/// where `\b` would not.
fn bounded(inner: &str) -> Regex {
    Regex::new(&format!(r"(?:^|[^\w+#])(?:{inner})(?:$|[^\w+#])")).unwrap()
}

/// Vocabulary entry for `keyword`, matched against the name or any alias.
pub fn lookup(keyword: &str) -> Option<&'static SkillTerm> {
    let wanted = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    VOCABULARY.iter().find(|term| {
        term.name.eq_ignore_ascii_case(&wanted)
            || term.aliases.iter().any(|a| a.eq_ignore_ascii_case(&wanted))
    })
}

/// Canonical display form: the vocabulary name when known, otherwise the
/// trimmed keyword with whitespace collapsed.
pub fn canonical(keyword: &str) -> String {
    match lookup(keyword) {
        Some(term) => term.name.to_string(),
        None => keyword.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Vocabulary skills mentioned in `text`, in order of first appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &'static str)> = COMPILED
        .iter()
        .filter_map(|c| c.pattern.find(text).map(|m| (m.start(), c.term.name)))
        .collect();
    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, name)| name.to_string()).collect()
}

/// Whether `text` mentions `keyword` or one of its synonyms.
pub fn mentions(text: &str, keyword: &str) -> bool {
    if let Some(term) = lookup(keyword) {
        if let Some(compiled) = COMPILED.iter().find(|c| std::ptr::eq(c.term, term)) {
            return compiled.pattern.is_match(text);
        }
    }

    let phrase = phrase_pattern(keyword);
    if phrase.is_empty() {
        return false;
    }
    Regex::new(&format!(r"(?i)(?:^|[^\w+#])(?:{phrase})(?:$|[^\w+#])"))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// keyword → covered, where covered means at least one source mentions it.
/// Keywords are canonicalized, so "golang" and "Go" collapse into one entry.
pub fn coverage<I, S>(keywords: I, sources: &[&str]) -> BTreeMap<String, bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for keyword in keywords {
        let name = canonical(keyword.as_ref());
        if name.is_empty() || map.contains_key(&name) {
            continue;
        }
        let covered = sources.iter().any(|source| mentions(source, &name));
        map.insert(name, covered);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_patterns_compile() {
        assert_eq!(COMPILED.len(), VOCABULARY.len());
    }

    #[test]
    fn test_extract_keywords_in_order() {
        let jd = "Senior Backend Engineer at Acme, requires Go and distributed systems experience. K8s a plus.";
        assert_eq!(
            extract_keywords(jd),
            vec!["Go", "Distributed Systems", "Kubernetes"]
        );
    }

    #[test]
    fn test_go_is_case_sensitive_but_golang_is_not() {
        assert!(mentions("Built services in Go.", "Go"));
        assert!(mentions("GOLANG microservices", "Go"));
        assert!(!mentions("we go above and beyond", "Go"));
        assert!(!mentions("Worked at Google on MongoDB", "Go"));
    }

    #[test]
    fn test_strict_terms_match_in_all_caps() {
        assert!(mentions("LANGUAGES: GO, RUST", "Go"));
        assert!(mentions("SPARK, KAFKA", "Spark"));
        assert!(!mentions("a spark of curiosity", "Spark"));
        assert!(!mentions("gO", "Go"));
        let map = coverage(["Go"], &["TECHNICAL SKILLS\nGO, RUST, SQL"]);
        assert_eq!(map.get("Go"), Some(&true));
    }

    #[test]
    fn test_symbols_respect_boundaries() {
        assert!(mentions("C++, Python", "C++"));
        assert!(!mentions("C++ only", "C#"));
        assert!(mentions("Node.js APIs", "Node.js"));
        assert!(mentions("built in nodejs", "node.js"));
        assert!(!mentions("SCSS modules", "CSS"));
        assert!(!mentions("for the rest of the team", "REST"));
    }

    #[test]
    fn test_unknown_keywords_match_as_phrases() {
        assert!(mentions("Ran event sourcing pipelines", "Event   Sourcing"));
        assert!(!mentions("eventsourcing", "event sourcing"));
        assert!(!mentions("anything", "   "));
    }

    #[test]
    fn test_coverage_collapses_synonyms() {
        let map = coverage(
            ["golang", "Go", "Kafka", "distributed systems"],
            &["Skills: Golang, SQL", "Designed a distributed system for payments"],
        );
        assert_eq!(
            map,
            BTreeMap::from([
                ("Distributed Systems".to_string(), true),
                ("Go".to_string(), true),
                ("Kafka".to_string(), false),
            ])
        );
    }
}
