//! Leadbook Service — lead aggregation and follow-up scheduling on top
//! of the repository traits.

pub mod config;
pub mod followups;
pub mod leads;

pub use config::ServiceConfig;
pub use followups::FollowupService;
pub use leads::LeadService;
