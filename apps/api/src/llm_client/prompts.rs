// Shared prompt fragments for generation calls.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Every generated task must read as a single sentence suitable for an
/// academic internship log.
pub const ONE_SENTENCE_INSTRUCTION: &str = "Each task should be one sentence.";
