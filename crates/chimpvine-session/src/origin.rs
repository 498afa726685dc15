//! Origin lookup: where the backend lives.
//!
//! The client doesn't decide its server origin itself. When it's embedded
//! in a host page, the page knows which WordPress site served it; when it
//! runs standalone, the environment or a config file does. The
//! [`OriginLookup`] trait hides that difference behind one synchronous
//! method.

/// Environment variable read by [`EnvOrigin::default`].
pub const ORIGIN_ENV_VAR: &str = "CHIMPVINE_ORIGIN";

/// Returns the backend origin, e.g. `https://school.example/wordpress`.
///
/// `None` or an empty string means the origin is unknown, and the session
/// will refuse to make any network call.
///
/// # Example
///
/// ```rust
/// use chimpvine_session::OriginLookup;
///
/// // Closures work directly.
/// let lookup = || Some("http://test".to_string());
/// assert_eq!(lookup.origin().as_deref(), Some("http://test"));
/// ```
pub trait OriginLookup {
    fn origin(&self) -> Option<String>;
}

impl<F> OriginLookup for F
where
    F: Fn() -> Option<String>,
{
    fn origin(&self) -> Option<String> {
        self()
    }
}

/// A fixed origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticOrigin(pub String);

impl StaticOrigin {
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }
}

impl OriginLookup for StaticOrigin {
    fn origin(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the origin from an environment variable at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOrigin {
    var: String,
}

impl EnvOrigin {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvOrigin {
    fn default() -> Self {
        Self::new(ORIGIN_ENV_VAR)
    }
}

impl OriginLookup for EnvOrigin {
    fn origin(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Trims whitespace and trailing slashes; empty becomes `None`.
pub(crate) fn normalize(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_origin() {
        assert_eq!(
            StaticOrigin::new("http://test").origin().as_deref(),
            Some("http://test")
        );
    }

    #[test]
    fn test_env_origin_missing_var_is_none() {
        let lookup = EnvOrigin::new("CHIMPVINE_TEST_ORIGIN_SURELY_UNSET");
        assert_eq!(lookup.origin(), None);
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = || -> Option<String> { None };
        assert_eq!(lookup.origin(), None);
    }

    #[test]
    fn test_normalize_trims_trailing_slashes() {
        assert_eq!(
            normalize(Some("http://test/wordpress//".into())).as_deref(),
            Some("http://test/wordpress")
        );
    }

    #[test]
    fn test_normalize_empty_is_none() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(String::new())), None);
        assert_eq!(normalize(Some("  / ".into())), None);
    }
}
