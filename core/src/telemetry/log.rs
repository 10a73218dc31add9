use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags every record with a component target.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }

    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("gmcore")
    }
}
