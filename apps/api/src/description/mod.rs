// Job description generation: prompt → structured model output → composed text on the posting.
// All model calls go through llm_client.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod schema;
