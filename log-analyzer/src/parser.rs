use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use crate::models::{LogEntry, Request};

// 177.71.128.21 - admin [10/Jul/2018:22:21:28 +0200] "GET /intranet-analytics/ HTTP/1.1" 200 3574 "-" "Mozilla/5.0 (X11; ...)"
//
// The referrer may carry backslash-escaped quotes. The user agent runs to the
// last quote on the line so nested quotes stay in it, which also folds any
// trailing quoted field into it. Anything after that quote must be
// quote-free and is ignored.
static COMBINED_LOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?P<address>\S+)\s+\S+\s+(?P<role>\S+)\s+"#,
        r#"\[(?P<timestamp>[^\]]*)\]\s+"#,
        r#""(?P<request>[^"]+)"\s+"#,
        r#"(?P<status>\d+)\s+(?P<port>\S+)\s+"#,
        r#""(?:[^"\\]|\\.)*"\s+"(?P<agent>.*)"[^"]*$"#,
    ))
    .expect("valid combined log pattern")
});

// 10/Jul/2018:22:21:28 +0200
static TIMESTAMP_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2} [+-]\d{4}$")
        .expect("valid timestamp pattern")
});
const TS_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not follow the combined log layout")]
    Layout,
    #[error("request line has {0} tokens, expected method, endpoint and protocol")]
    Request(usize),
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
}

/// Parses one combined-format line, dropping the reason on failure.
pub fn parse(line: &str) -> Option<LogEntry> {
    parse_line(line).ok()
}

pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    let caps = COMBINED_LOG.captures(line).ok_or(ParseError::Layout)?;
    let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());

    let request = parse_request(field("request"))?;
    let timestamp = parse_timestamp(field("timestamp"))?;

    Ok(LogEntry {
        client_address: field("address").to_owned().into(),
        identity_role: field("role").into(),
        timestamp,
        request,
        response_code: field("status").into(),
        port: field("port").into(),
        user_agent: field("agent").into(),
    })
}

// Split on single spaces: a doubled space is an extra (empty) token.
fn parse_request(raw: &str) -> Result<Request, ParseError> {
    let parts: Vec<&str> = raw.split(' ').collect();
    let [method, endpoint, protocol] = parts.as_slice() else {
        return Err(ParseError::Request(parts.len()));
    };
    Ok(Request {
        method: (*method).into(),
        endpoint: endpoint.to_string().into(),
        protocol: (*protocol).into(),
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    if !TIMESTAMP_LAYOUT.is_match(raw) {
        return Err(ParseError::Timestamp(raw.into()));
    }
    DateTime::parse_from_str(raw, TS_FORMAT)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ParseError::Timestamp(raw.into()))
}
