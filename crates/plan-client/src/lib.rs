//! Personalised training, recovery and diet plans.
//!
//! A plan is produced by a hosted language model from a handful of player
//! attributes, then rendered as plain text or a landscape PDF.

pub mod attributes;
pub mod client;
pub mod document;
pub mod error;
pub mod prompt;
pub mod responses;

pub use attributes::PlayerAttributes;
pub use client::{OpenAiPlanGenerator, PlanGenerator};
pub use document::render_to_pdf;
pub use error::PlanError;
pub use prompt::{SYSTEM_PROMPT, build_prompt};
