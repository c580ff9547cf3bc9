use crate::Error;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// A websocket relay Url
#[derive(
    AsRef,
    Clone,
    Debug,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    PartialOrd,
    Ord,
    Serialize,
)]
pub struct RelayUrl(pub String);

impl RelayUrl {
    /// Create a new RelayUrl from a string, if it is a valid websocket URL
    pub fn new_validated(s: &str) -> Result<RelayUrl, Error> {
        let uri = s.parse::<http::Uri>()?;

        let scheme = match uri.scheme() {
            Some(s) => s,
            None => return Err(Error::InvalidUrlMissingScheme),
        };

        if scheme.as_str() != "wss" && scheme.as_str() != "ws" {
            return Err(Error::InvalidUrlScheme(scheme.as_str().to_owned()));
        }

        if uri.authority().is_none() {
            return Err(Error::InvalidUrlMissingAuthority);
        }

        Ok(RelayUrl(s.to_owned()))
    }

    /// As &str
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Mock data for testing
    #[allow(dead_code)]
    pub(crate) fn mock() -> RelayUrl {
        RelayUrl("wss://relay.example.com".to_string())
    }
}
