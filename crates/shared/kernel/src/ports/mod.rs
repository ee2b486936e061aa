//! Collaborators the orchestrators talk to but do not own.
//!
//! Implementations are injected as `Arc<dyn …>`; the registry and session store
//! contracts live in their infrastructure crates.

mod fleet;
mod prompt;

pub use fleet::{FleetClient, FleetError, FleetErrorExt};
pub use prompt::{Prompt, PromptError, PromptErrorExt};
