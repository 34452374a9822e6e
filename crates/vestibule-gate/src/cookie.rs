//! Pass cookie formatting.

/// Default pass cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "waiting-room-pass";

/// A pass re-emitted as a session cookie.
///
/// `HttpOnly; Secure; Path=/` with a `Max-Age` scoped to the credential's
/// remaining validity, so the cookie and the pass inside it expire together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassCookie {
    /// Cookie name.
    pub name: String,
    /// The encoded pass.
    pub value: String,
    /// Seconds of validity left on the pass.
    pub max_age_secs: u64,
}

impl PassCookie {
    /// Render the `Set-Cookie` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; Secure; Max-Age={}",
            self.name, self.value, self.max_age_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_shape() {
        let cookie = PassCookie {
            name: DEFAULT_COOKIE_NAME.to_string(),
            value: "a.b.c".to_string(),
            max_age_secs: 300,
        };
        assert_eq!(
            cookie.header_value(),
            "waiting-room-pass=a.b.c; Path=/; HttpOnly; Secure; Max-Age=300"
        );
    }
}
