//! Resume extraction: document bytes → text → `ResumeDocument`.
//!
//! Pure transformation. No network, no disk beyond the bytes handed in.

pub mod assessment;
pub mod classifier;
pub mod contact;
pub mod extract;
pub mod parser;

pub use classifier::{SectionClassifier, SynonymClassifier};
pub use extract::{DocumentFormat, MAX_DOCUMENT_BYTES};
pub use parser::ResumeParser;
