//! Async runtime for playing combat-core battles.
//!
//! This crate wraps the synchronous step API of `combat-core` into a
//! [`BattleSession`] that frontends embed: it sources player commands,
//! paces actor steps for presentation, publishes events on a topic bus and
//! snapshots replayable sessions.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the round driver
//! - [`commands`] and [`pacing`] are the pluggable seams frontends implement
//! - [`bus`] provides topic-based event routing
//! - [`snapshot`] and [`rng`] cover save/replay
pub mod bus;
pub mod commands;
pub mod error;
pub mod pacing;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use bus::{Event, EventBus, Topic};
pub use commands::{AutoPilot, ChannelCommands, CommandSource, basic_attack};
pub use error::{Result, RuntimeError};
pub use pacing::{Beat, Pacer, Pacing};
pub use rng::{EntropyRandom, SessionRng};
pub use session::BattleSession;
pub use snapshot::SessionSnapshot;
