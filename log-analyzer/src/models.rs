use chrono::{DateTime, Utc};

use crate::invariants::{ClientAddress, Endpoint};

/// The three space-separated parts of a quoted request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub endpoint: Endpoint,
    pub protocol: String,
}

/// One fully parsed access-log line. Only the parser builds these, and it
/// never hands out a partially populated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub client_address: ClientAddress,
    /// `-` when the log carries no identity.
    pub identity_role: String,
    pub timestamp: DateTime<Utc>,
    pub request: Request,
    pub response_code: String,
    /// Opaque: the layout doesn't say whether this is a port or a byte count.
    pub port: String,
    pub user_agent: String,
}
