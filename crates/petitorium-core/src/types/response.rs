//! Received response data as seen by plugins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An HTTP response received from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    /// HTTP status code (200, 404, 500, etc.).
    pub status_code: u16,
    /// HTTP status text ("OK", "Not Found", etc.).
    pub status: String,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body.
    #[serde(default)]
    pub body: String,
    /// How long the request took, in milliseconds.
    pub duration_ms: u64,
}

impl ResponseData {
    /// Returns whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Looks up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
