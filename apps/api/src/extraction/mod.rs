// CV extraction: noisy model output → clean text → JSON object → fixed candidate schema.
// All LLM calls go through llm_client::TextGenerator.

pub mod candidate;
pub mod json_extract;
pub mod normalize;
pub mod prompts;

pub use candidate::{parse_candidate, CandidateInfo};
