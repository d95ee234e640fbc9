//! Authentication State

/// Authentication state observed from the surrounding login flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthenticationState {
    /// Whether the current user is authenticated.
    pub is_authenticated: bool,
    /// Subject of the authenticated user, when known.
    pub subject: Option<String>,
}

impl AuthenticationState {
    /// Authenticated state for a subject.
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            subject: Some(subject.into()),
        }
    }

    /// Anonymous state.
    pub fn anonymous() -> Self {
        Self::default()
    }
}
