use backoffice_services::Latency;

/// Tunables for the console's state layer.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Page size stores start with.
    pub default_per_page: usize,
    /// Seconds before the reset-password email can be re-sent.
    pub resend_window_seconds: u32,
    /// Artificial latency of the mock services.
    pub service_latency: Latency,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            resend_window_seconds: 60,
            service_latency: Latency::interactive(),
        }
    }
}

impl ConsoleConfig {
    /// Defaults with all artificial latency removed.
    pub fn for_tests() -> Self {
        Self {
            service_latency: Latency::none(),
            ..Self::default()
        }
    }
}
