//! Alert record handling: classifying inbound alerts and constructing
//! outbound ones.

use crate::error::EngineError;
use crate::version::{alert_code, AlertLevel};

/// A two-byte alert body as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub code: u8,
}

impl Alert {
    pub fn close_notify() -> Alert {
        Alert {
            level: AlertLevel::Warning,
            code: alert_code::CLOSE_NOTIFY,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Alert, EngineError> {
        if bytes.len() != 2 {
            return Err(EngineError::BadAlert);
        }
        let level = match bytes[0] {
            1 => AlertLevel::Warning,
            2 => AlertLevel::Fatal,
            _ => return Err(EngineError::BadAlert),
        };
        Ok(Alert {
            level,
            code: bytes[1],
        })
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.level as u8, self.code]
    }

    /// Convert an inbound alert into the sticky error the engine should
    /// latch, if any. `close_notify` at warning level is the one alert
    /// that closes the connection without itself becoming a sticky error
    /// (the caller surfaces a clean EOF instead).
    pub fn into_engine_error(self) -> Option<EngineError> {
        if self.code == alert_code::CLOSE_NOTIFY && matches!(self.level, AlertLevel::Warning) {
            None
        } else if matches!(self.level, AlertLevel::Fatal) {
            Some(EngineError::RecvFatalAlert(self.code))
        } else {
            // non-fatal, non-close_notify alerts are logged and ignored by
            // this engine; a handshake processor may care about specific
            // warning codes, which is out of scope here.
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_notify_round_trips() {
        let alert = Alert::close_notify();
        let bytes = alert.to_bytes();
        let parsed = Alert::parse(&bytes).unwrap();
        assert_eq!(parsed, alert);
        assert!(parsed.into_engine_error().is_none());
    }

    #[test]
    fn fatal_alert_becomes_sticky_error() {
        let alert = Alert {
            level: AlertLevel::Fatal,
            code: alert_code::HANDSHAKE_FAILURE,
        };
        assert_eq!(
            alert.into_engine_error(),
            Some(EngineError::RecvFatalAlert(alert_code::HANDSHAKE_FAILURE))
        );
    }

    #[test]
    fn rejects_malformed_alert() {
        assert_eq!(Alert::parse(&[1]), Err(EngineError::BadAlert));
        assert_eq!(Alert::parse(&[9, 0]), Err(EngineError::BadAlert));
    }
}
