//! Service configuration.

/// Configuration for the lead and follow-up services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Days ahead of today covered by the upcoming list when the caller
    /// gives no window (default: 7).
    pub upcoming_window_days: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
        }
    }
}
