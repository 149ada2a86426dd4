//! Service layer sitting between the HTTP routes and the LLM clients.

pub mod drafting;
