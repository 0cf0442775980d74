//! SurrealDB repository implementations.

mod followup;
mod lead;

pub use followup::SurrealFollowupRepository;
pub use lead::SurrealLeadRepository;
