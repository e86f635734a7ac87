// Resume/JD alignment: upload handling, prompt composition, suggestion generation.
// All model calls go through llm_client; all document parsing through extraction.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod upload;
