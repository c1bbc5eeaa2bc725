//! Game crate for the marquee box-office trivia game.
//!
//! This crate contains the round state machine and the service that runs
//! rounds on top of the catalog, the curator and a round-state store.
//!
//! ## Main Components
//!
//! - **session**: `GameSession`, the state machine of one round
//! - **store**: `RoundStateStore` with in-memory and JSON-file backends
//! - **resolver**: Movie lookups, catalog first and provider second
//! - **service**: `GameService`, the API callers use
//! - **error**: `GameError` and its `ErrorKind`

pub mod error;
pub mod resolver;
pub mod service;
pub mod session;
pub mod store;

pub use error::{ErrorKind, GameError, Result, StorageError};
pub use resolver::MovieResolver;
pub use service::{GameService, RoundStart};
pub use session::{GameSession, GuessOutcome, InvalidGuess, MAX_STRIKES, RoundProgress, RoundStatus};
pub use store::{JsonFileRoundStore, MemoryRoundStore, RoundStateStore, SessionId};
