//! API translation between the client-facing OpenAI format and NVIDIA NIM.
//!
//! Requests are validated and rewritten for the upstream, responses are
//! reshaped with explicit defaults. All translation functions are pure (no I/O).

pub mod nim_types;
pub mod openai_types;
pub mod request;
pub mod response;
