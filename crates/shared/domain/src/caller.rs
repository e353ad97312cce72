//! Identity of the in-flight request.

/// Caller identity, passed explicitly into every service call that needs it.
///
/// Built by the HTTP layer from a verified bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    login: Option<String>,
}

impl CallerContext {
    /// No authenticated identity
    pub fn anonymous() -> Self {
        Self { login: None }
    }

    /// Identity carrying the caller's login identifier
    pub fn authenticated(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
        }
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }
}
