//! Observable lifecycle events
//!
//! Every log line that marks a lifecycle step carries one of these as
//! its `event` field, so logs can be filtered by a stable name.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// REST API accepting requests
    ApiServing,
    /// Bridge accepting connections
    BridgeServing,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Transport
    /// Request from a disallowed origin rejected
    OriginRejected,

    // Sessions
    /// Client channel opened
    SessionOpened,
    /// Client channel closed
    SessionClosed,
    /// Client frame could not be understood
    MessageRejected,

    // Aggregation
    /// Aggregation started
    AggregationBegin,
    /// Aggregation produced a reply
    AggregationComplete,
    /// Primary fetch failed, error reply sent
    AggregationFailed,
    /// Session closed before the reply was ready
    AggregationDiscarded,
    /// One picture lookup failed and was replaced by null
    LookupFailed,
    /// Reply could not be queued on a closed session
    ReplyDropped,
    /// Reply could not be serialized, internal error sent instead
    ReplyEncodeFailed,

    // Resource API
    /// View counter increment failed
    ViewCountFailed,
    /// Picture reference in an unknown shape
    ReferenceUnrecognized,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ApiServing => "API_SERVING",
            Event::BridgeServing => "BRIDGE_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::OriginRejected => "ORIGIN_REJECTED",

            Event::SessionOpened => "SESSION_OPENED",
            Event::SessionClosed => "SESSION_CLOSED",
            Event::MessageRejected => "MESSAGE_REJECTED",

            Event::AggregationBegin => "AGGREGATION_BEGIN",
            Event::AggregationComplete => "AGGREGATION_COMPLETE",
            Event::AggregationFailed => "AGGREGATION_FAILED",
            Event::AggregationDiscarded => "AGGREGATION_DISCARDED",
            Event::LookupFailed => "LOOKUP_FAILED",
            Event::ReplyDropped => "REPLY_DROPPED",
            Event::ReplyEncodeFailed => "REPLY_ENCODE_FAILED",

            Event::ViewCountFailed => "VIEW_COUNT_FAILED",
            Event::ReferenceUnrecognized => "REFERENCE_UNRECOGNIZED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::OriginRejected
                | Event::MessageRejected
                | Event::AggregationFailed
                | Event::LookupFailed
                | Event::ViewCountFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::ApiServing,
            Event::BridgeServing,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::OriginRejected,
            Event::SessionOpened,
            Event::SessionClosed,
            Event::MessageRejected,
            Event::AggregationBegin,
            Event::AggregationComplete,
            Event::AggregationFailed,
            Event::AggregationDiscarded,
            Event::LookupFailed,
            Event::ReplyDropped,
            Event::ReplyEncodeFailed,
            Event::ViewCountFailed,
            Event::ReferenceUnrecognized,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::LookupFailed.is_failure());
        assert!(Event::AggregationFailed.is_failure());
        assert!(!Event::SessionOpened.is_failure());
        assert!(!Event::AggregationDiscarded.is_failure());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::SessionOpened), "SESSION_OPENED");
    }
}
