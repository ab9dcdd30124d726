//! Prompt construction and response parsing for agents

pub mod parsing;
pub mod template;

pub use parsing::{extract_json_object, missing_fields};
pub use template::PromptTemplate;
