//! Leadbook Core — domain models, the record store contract, and the
//! date-window and aggregation rules shared by every other crate.

pub mod clock;
pub mod display;
pub mod error;
pub mod models;
pub mod repository;
pub mod schedule;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CrmError, CrmResult};
