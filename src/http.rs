//! CSRF header injection for outgoing requests
//!
//! The host page exposes its per-session CSRF token through a meta tag.
//! The token is read once at startup; every state-changing (non-GET)
//! request the host hands us is stamped with the token under a custom
//! header before it goes out. A page without the meta tag simply gets
//! no header injection: that is a recognized absence, not an error.

// Allow dead code - this module is the full request-preparation API;
// parts of it are exercised only by the page module and the tests
#![allow(dead_code)]

use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Request Model
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl Method {
    /// Whether the method is exempt from CSRF injection.
    ///
    /// Only GET is exempt, matching the page script's `method !== 'GET'`
    /// check; HEAD is stamped like any other method.
    pub fn is_csrf_exempt(&self) -> bool {
        matches!(self, Method::Get)
    }
}

/// A simulated outgoing request, as handed to us by the host page.
///
/// Headers keep insertion order; names compare case-insensitively.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        for (existing, v) in &mut self.headers {
            if existing.eq_ignore_ascii_case(name) {
                *v = value;
                return;
            }
        }
        self.headers.push((name.to_string(), value));
    }

    /// Look up a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Meta Tags & Token
// ─────────────────────────────────────────────────────────────────────────────

/// A `<meta name content>` element from the host page's head.
#[derive(Debug, Clone)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

impl MetaTag {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The page's CSRF token, bound to the header name it travels under.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    header_name: String,
    value: String,
}

impl CsrfToken {
    /// Read the token from the page's meta tags.
    ///
    /// The first tag whose name matches `meta_name` and carries a
    /// non-empty content wins. Returns `None` when no such tag exists;
    /// the caller is expected to skip injection entirely in that case.
    pub fn from_meta(metas: &[MetaTag], meta_name: &str, header_name: &str) -> Option<Self> {
        let tag = metas
            .iter()
            .find(|m| m.name == meta_name && !m.content.is_empty())?;

        debug!("CSRF token found in meta tag '{}'", meta_name);
        Some(Self {
            header_name: header_name.to_string(),
            value: tag.content.clone(),
        })
    }

    /// Stamp the token onto a request.
    ///
    /// GET requests are left untouched; everything else gets the exact
    /// token value under the configured header. Applying twice simply
    /// overwrites the header with the same value.
    pub fn apply(&self, request: &mut Request) {
        if request.method.is_csrf_exempt() {
            return;
        }
        request.set_header(&self.header_name, self.value.clone());
    }

    /// The raw token value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
