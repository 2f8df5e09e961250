// ---------------------------------------------------------------------------
// Shared-passphrase gate
// ---------------------------------------------------------------------------

/// Outcome of the most recent passphrase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateStatus {
    /// Nothing submitted yet.
    #[default]
    Pending,
    Rejected,
    Granted,
}

/// Plain string comparison against one shared passphrase.
///
/// This only keeps casual visitors out of the dashboard; it is not an
/// authentication mechanism. Attempts are never stored.
#[derive(Debug, Clone)]
pub struct PassphraseGate {
    expected: String,
    status: GateStatus,
}

impl PassphraseGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            status: GateStatus::Pending,
        }
    }

    pub fn submit(&mut self, attempt: &str) -> GateStatus {
        self.status = if attempt == self.expected {
            log::info!("Passphrase accepted");
            GateStatus::Granted
        } else {
            log::warn!("Wrong passphrase entered");
            GateStatus::Rejected
        };
        self.status
    }

    pub fn status(&self) -> GateStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == GateStatus::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending() {
        let gate = PassphraseGate::new("123456");
        assert_eq!(gate.status(), GateStatus::Pending);
        assert!(!gate.is_open());
    }

    #[test]
    fn wrong_then_right() {
        let mut gate = PassphraseGate::new("123456");
        assert_eq!(gate.submit("hunter2"), GateStatus::Rejected);
        assert!(!gate.is_open());
        assert_eq!(gate.submit("123456"), GateStatus::Granted);
        assert!(gate.is_open());
    }

    #[test]
    fn comparison_is_exact() {
        let mut gate = PassphraseGate::new("123456");
        assert_eq!(gate.submit("123456 "), GateStatus::Rejected);
        assert_eq!(gate.submit(""), GateStatus::Rejected);
    }
}
