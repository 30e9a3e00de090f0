// Resume tailoring: keyword coverage, prompt orchestration and the pipeline façade.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod handlers;
pub mod keywords;
pub mod orchestrator;
pub mod pipeline;
pub mod prompts;

pub use orchestrator::PromptOrchestrator;
pub use pipeline::{TailorRequest, TailoringOutcome, TailoringPipeline};
