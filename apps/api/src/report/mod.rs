// Weekly report drafting: request model, task extraction, the two-stage
// generation pipeline, per-session edit state and the HTTP handlers.
// All generation calls go through llm_client::TextGenerator.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod session;
