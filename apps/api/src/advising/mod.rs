//! Advising: the parts around the rule-based engine that talk to people.
//! Document ingestion, per-session retrieval context, the advisor seam and
//! the chat/session routes.

pub mod advisor;
pub mod document;
pub mod handlers;
pub mod prompts;
pub mod retrieval;
pub mod session;
