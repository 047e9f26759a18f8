//! Log-based alert listener.
//!
//! Implements [`AlertListener`] by writing to the logger (UART / USB-CDC in
//! production). A push-notification or display adapter would implement the
//! same trait.

use log::warn;

use crate::app::ports::AlertListener;

/// Listener that logs every alert to the serial console.
pub struct LogAlertListener {
    raised: u32,
}

impl LogAlertListener {
    pub fn new() -> Self {
        Self { raised: 0 }
    }
}

impl Default for LogAlertListener {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertListener for LogAlertListener {
    fn on_alert(&mut self) {
        self.raised = self.raised.saturating_add(1);
        warn!(
            "ALERT | soil still dry after watering started (alert #{})",
            self.raised
        );
    }
}
