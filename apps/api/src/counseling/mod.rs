// Counseling: profile → prompt → tool loop → advice, plus follow-up chat.
// All model calls go through llm_client; no direct HTTP calls here.

pub mod assembler;
pub mod handlers;
pub mod profile;
pub mod prompts;
pub mod tool_loop;
pub mod tools;
pub mod upload;
