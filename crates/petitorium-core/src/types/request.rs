//! Outgoing request data as seen by plugins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::placeholder::{PLACEHOLDER, placeholder_names};

/// An HTTP request being processed by Petitorium.
///
/// Header names are stored exactly as written by the user or by earlier
/// hooks; the accessor helpers compare names case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    /// HTTP method (GET, POST, PUT, DELETE, etc.).
    pub method: String,
    /// Request URL. May still contain template placeholders such as
    /// `{{protocol}}{{domain}}` until substitution has run.
    pub url: String,
    /// Request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Request body, empty when there is none.
    #[serde(default)]
    pub body: String,
    /// Name of the collection this request belongs to.
    #[serde(default)]
    pub collection: String,
    /// Name of this request within its collection.
    #[serde(default)]
    pub request_name: String,
}

impl RequestData {
    /// Creates a request with the given method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the owning collection and request name.
    pub fn in_collection(mut self, collection: &str, request_name: &str) -> Self {
        self.collection = collection.to_string();
        self.request_name = request_name.to_string();
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Looks up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any existing header whose name differs
    /// only in case. Returns the previous value.
    pub fn set_header(&mut self, name: &str, value: &str) -> Option<String> {
        let previous = self.remove_header(name);
        self.headers.insert(name.to_string(), value.to_string());
        previous
    }

    /// Removes a header, ignoring the case of the name.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let key = self
            .headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.headers.remove(&key)
    }

    /// Returns whether any placeholder is left in the URL, a header value,
    /// or the body.
    pub fn has_placeholders(&self) -> bool {
        self.texts().any(|text| PLACEHOLDER.is_match(text))
    }

    /// Names of the placeholders left in the request, deduplicated, in
    /// order of appearance: URL, then header values by header name, then
    /// body.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.texts().flat_map(placeholder_names) {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    fn texts(&self) -> impl Iterator<Item = &str> {
        let mut headers: Vec<(&String, &String)> = self.headers.iter().collect();
        headers.sort();

        std::iter::once(self.url.as_str())
            .chain(headers.into_iter().map(|(_, value)| value.as_str()))
            .chain(std::iter::once(self.body.as_str()))
    }
}
