//! Terminal alert channel.

use std::io::Write;

use pomoquest_core::error::Result;
use pomoquest_core::{Alert, Notifier};

/// Writes alerts to stderr, optionally ringing the terminal bell.
pub struct TerminalNotifier {
    bell: bool,
}

impl TerminalNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl Notifier for TerminalNotifier {
    fn deliver(&mut self, alert: &Alert) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        if self.bell {
            write!(stderr, "\x07")?;
        }
        writeln!(stderr, "[{}] {}", alert.title, alert.body)?;
        Ok(())
    }
}
