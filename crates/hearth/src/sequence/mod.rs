//! # Sequence Lifecycle
//!
//! A stateful model keeps hidden state per conversation. Each conversation
//! is a [`Sequence`], identified by a nonzero `u64` and tracked by a
//! [`SequenceManager`].
//!
//! ## States
//!
//! ```text
//!  ABSENT --start--> ACTIVE --end--> TERMINATED
//!     ^                 |  ^              |
//!     |                 +--+ (no control) |
//!     +------- remove / timeout ----------+
//! ```
//!
//! - `start` with id `0` asks the manager to generate an id
//! - `TERMINATED` is absorbing: only removal or timeout clears it
//! - a sequence that sees no memory state update for longer than the
//!   configured timeout is removed by the next sweep, whatever its state
//!
//! Sweeps are run by a [`SequenceSweeper`] on a fixed interval.

mod entry;
mod id;
mod manager;
mod spec;
mod sweeper;

pub use entry::Sequence;
pub use manager::SequenceManager;
pub use spec::{ControlInput, SequenceProcessingSpec};
pub use sweeper::SequenceSweeper;
