/// Name of the cookie carrying the server's CSRF token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Read-only access to ambient cookie state.
pub trait CookieTokenProvider {
    /// Value of the cookie called `name`, or `None` when it is not set.
    fn token(&self, name: &str) -> Option<String>;
}

/// Extract one cookie value from a `document.cookie` style string
/// (`a=1; csrftoken=abc; b=2`).
///
/// The value runs from the `=` after the name to the next `;` and is trimmed.
/// A name that occurs more than once is treated as absent.
pub fn parse_cookie(cookies: &str, name: &str) -> Option<String> {
    let haystack = format!("; {cookies}");
    let needle = format!("; {name}=");

    let mut parts = haystack.split(needle.as_str());
    parts.next()?;
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let value = tail.split(';').next().unwrap_or_default();
    Some(value.trim().to_string())
}

/// Provider backed by a raw cookie string, e.g. a `Cookie:` header value or a
/// snapshot of `document.cookie`.
#[derive(Clone, Debug, Default)]
pub struct CookieString(pub String);

impl CookieString {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl CookieTokenProvider for CookieString {
    fn token(&self, name: &str) -> Option<String> {
        parse_cookie(&self.0, name)
    }
}

/// Provider for contexts without a cookie store.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCookies;

impl CookieTokenProvider for NoCookies {
    fn token(&self, _name: &str) -> Option<String> {
        None
    }
}

impl<F> CookieTokenProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn token(&self, name: &str) -> Option<String> {
        self(name)
    }
}
