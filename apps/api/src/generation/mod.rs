// Section generation: system-prompt configuration, the LLM-backed generator,
// and tolerant parsing of its output into a Content Map.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod sections;
