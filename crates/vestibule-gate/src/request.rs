//! Gate request representation.

/// The slice of an inbound HTTP request the gatekeeper inspects.
///
/// Pass values are base64url by construction, so cookie and query parsing
/// here is plain splitting; no percent-decoding is required for the fields
/// the gate reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    /// Host the request was addressed to.
    pub host: String,
    /// Request path, leading slash included.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    /// Raw `Cookie` header value, if any.
    pub cookie_header: Option<String>,
}

impl GateRequest {
    /// Build a request with neither query nor cookies.
    #[must_use]
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            query: None,
            cookie_header: None,
        }
    }

    /// Attach a raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a raw `Cookie` header.
    #[must_use]
    pub fn with_cookie_header(mut self, header: impl Into<String>) -> Self {
        self.cookie_header = Some(header.into());
        self
    }

    /// Value of the named cookie, if present.
    #[must_use]
    pub fn cookie_value(&self, name: &str) -> Option<&str> {
        self.cookie_header.as_deref()?.split(';').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        })
    }

    /// Value of the named query parameter, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }

    /// Absolute URL of this request with the named query parameter stripped.
    ///
    /// This is where a one-time URL credential gets cleaned out of the
    /// address bar: the redirect target keeps every other parameter.
    #[must_use]
    pub fn canonical_location(&self, strip_param: &str) -> String {
        let kept: Vec<&str> = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                pair.split_once('=')
                    .map_or(*pair != strip_param, |(key, _)| key != strip_param)
            })
            .collect();

        let mut location = format!("https://{}{}", self.host, self.path);
        if !kept.is_empty() {
            location.push('?');
            location.push_str(&kept.join("&"));
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lookup_handles_spacing_and_multiple_cookies() {
        let request = GateRequest::new("shop.example", "/")
            .with_cookie_header("session=abc; waiting-room-pass=xyz ; theme=dark");
        assert_eq!(request.cookie_value("waiting-room-pass"), Some("xyz"));
        assert_eq!(request.cookie_value("session"), Some("abc"));
        assert_eq!(request.cookie_value("missing"), None);
    }

    #[test]
    fn query_param_lookup() {
        let request =
            GateRequest::new("shop.example", "/checkout").with_query("a=1&pass_token=t.t.t&b=2");
        assert_eq!(request.query_param("pass_token"), Some("t.t.t"));
        assert_eq!(request.query_param("a"), Some("1"));
        assert_eq!(request.query_param("c"), None);
    }

    #[test]
    fn canonical_location_strips_only_the_named_param() {
        let request =
            GateRequest::new("shop.example", "/checkout").with_query("a=1&pass_token=t.t.t&b=2");
        assert_eq!(
            request.canonical_location("pass_token"),
            "https://shop.example/checkout?a=1&b=2"
        );
    }

    #[test]
    fn canonical_location_without_remaining_query() {
        let request = GateRequest::new("shop.example", "/checkout").with_query("pass_token=t.t.t");
        assert_eq!(
            request.canonical_location("pass_token"),
            "https://shop.example/checkout"
        );
    }

    #[test]
    fn canonical_location_without_any_query() {
        let request = GateRequest::new("shop.example", "/");
        assert_eq!(request.canonical_location("pass_token"), "https://shop.example/");
    }
}
