use std::{convert::Infallible, str::FromStr};

use derive_more::{AsRef, Debug, Display, From};

/// Originating address of a request. Any non-whitespace token is accepted,
/// it is never validated as an IP.
#[derive(Debug, Display, AsRef, From, Clone, PartialEq, Eq, Hash)]
pub struct ClientAddress(String);

impl ClientAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ClientAddress {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.into()))
    }
}

/// Request target, either an absolute path or a fully-qualified URI, kept
/// byte for byte as it appeared in the log.
#[derive(Debug, Display, AsRef, From, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Endpoint {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    #[test]
    fn endpoint_keeps_long_uris_verbatim() {
        let uri = format!("http://example.com/{}?q=%20a", "x".repeat(300));
        let endpoint: Endpoint = uri.parse().unwrap();
        assert_that!(endpoint.as_str()).is_equal_to(uri.as_str());
    }

    #[test]
    fn client_address_displays_raw_token() {
        let address = ClientAddress::from("not-an-ip".to_string());
        assert_that!(address.to_string()).is_equal_to("not-an-ip".to_string());
    }
}
