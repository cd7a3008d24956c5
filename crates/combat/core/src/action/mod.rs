//! Ability resolution engine.
//!
//! [`resolve`] takes an actor, an ability and an optional target and applies
//! the ability to the battle state, returning a [`Resolution`] that lists
//! every applied effect and the narration it produced.
mod context;
mod effects;
mod error;
mod resolve;
mod result;

pub use context::ActionContext;
pub use error::ActionError;
pub use resolve::{ActionRequest, check_usable, resolve, select_target};
pub use result::{AppliedEffect, Resolution, ResolveMode};
