//! airlock-core
//!
//! Shared domain model for the airlock distribution: identifier newtypes,
//! protocol constants, the write-once configuration state machine, the
//! persistent commitment/schedule records, the error taxonomy, and the
//! event journal model. No I/O here; everything is plain data.

pub mod constants;
pub mod error;
pub mod types;
pub mod config;
pub mod schedule;
pub mod events;

pub use constants::*;
pub use error::AirlockError;
pub use types::*;
pub use config::*;
pub use schedule::*;
pub use events::*;
