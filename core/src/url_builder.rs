//! Step-by-step construction of absolute catalog URLs.
//!
//! # Design
//! `UrlBuilder` concatenates the path positionally and refuses anything that
//! would make the result differ from that concatenation: illegal or
//! unencoded path characters, dot or empty segments, an empty host. Query pairs are
//! appended after validation and are percent-encoded by `url`.

use url::Url;

use crate::error::TransferError;

/// Builder for absolute URLs. `build` is the only fallible step.
#[derive(Debug, Clone, Default)]
pub struct UrlBuilder {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Replace the whole path, e.g. `/api/products/7`.
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Append one `/segment` to the path.
    pub fn segment(mut self, segment: impl std::fmt::Display) -> Self {
        self.path.push('/');
        self.path.push_str(&segment.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Resolve the components into an absolute URL.
    ///
    /// Fails with `TransferError::ResolutionFailed` carrying the attempted
    /// URL text when any component is invalid.
    pub fn build(&self) -> Result<Url, TransferError> {
        let authority = match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        };
        let raw = format!("{}://{authority}{}", self.scheme, self.path);
        let fail = || TransferError::ResolutionFailed(raw.clone());

        if !valid_scheme(&self.scheme) || !valid_host(&self.host) || !valid_path(&self.path) {
            return Err(fail());
        }

        let mut url = Url::parse(&raw).map_err(|_| fail())?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(fail());
        }
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

fn valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c))
}

fn valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}

fn valid_path(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    if path == "/" {
        return true;
    }
    if !path.starts_with('/') {
        return false;
    }
    if path[1..]
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return false;
    }

    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escaped = bytes.get(i + 1..i + 3);
                if !matches!(escaped, Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit())
                {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@/".contains(&b) => i += 1,
            _ => return false,
        }
    }
    true
}
