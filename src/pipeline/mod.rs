//! Pipeline stages for PDF-to-presentation conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested alone and the AI backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ analyze ──────────────▶ export
//! (select)  (base64)   (gemini | llm)          (pptx)
//!                        └─ postprocess ─┘
//! ```
//!
//! 1. [`input`]: describe and validate the selected file, then read it
//! 2. [`encode`]: base64-wrap the document for the multimodal request body
//! 3. [`analyze`]: call the collaborator, then parse and
//!    validate its JSON; the only stage with network I/O
//! 4. [`gemini`] / [`llm`]: the two collaborator backends
//! 5. [`postprocess`]: deterministic cleanup of model framing before parsing
//! 6. [`export`]: build the deck and write it atomically

pub mod analyze;
pub mod encode;
pub mod export;
pub mod gemini;
pub mod input;
pub mod llm;
pub mod postprocess;
