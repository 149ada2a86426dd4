//! DraftDesk — conversational legal-agreement drafting with live preview.
//!
//! ARCHITECTURE
//! ============
//! The server side (`routes`, `services`, `llm`) turns one chat turn into a
//! streamed sequence of event frames: word-granular reply text, extracted
//! document fields, and document-type detection. The client side
//! (`transport`, `stream`, `session`, `preview`, `handoff`) consumes that
//! stream, merges fields into the authoritative store, keeps a debounced
//! preview fresh, and hands the session off to the print view. `fields`,
//! `docs` and `render` are shared by both sides.

pub mod docs;
pub mod fields;
pub mod handoff;
pub mod llm;
pub mod preview;
pub mod prompts;
pub mod protocol;
pub mod render;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod stream;
pub mod transport;
