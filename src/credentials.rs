use std::fmt;

/// Credentials held by a client for its whole lifetime.
///
/// The access token is replaced on every successful authentication and
/// cleared when authentication fails. Nothing is persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// User's login (email)
    pub login: Option<String>,
    /// User's secret key
    pub security_key: Option<String>,
    /// Current bearer token, if any
    pub access_token: Option<String>,
}

impl Credentials {
    pub fn new(login: impl Into<String>, security_key: impl Into<String>) -> Self {
        Credentials {
            login: Some(login.into()),
            security_key: Some(security_key.into()),
            access_token: None,
        }
    }

    /// Set a pre-existing access token
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Check if a token is currently held
    pub fn has_token(&self) -> bool {
        self.access_token.as_deref().map_or(false, |t| !t.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("security_key", &self.security_key.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_creation() {
        let creds = Credentials::new("bot@example.com", "secret");
        assert_eq!(creds.login.as_deref(), Some("bot@example.com"));
        assert!(!creds.has_token());

        let creds = creds.with_access_token("token123");
        assert!(creds.has_token());
    }

    #[test]
    fn test_empty_token_is_no_token() {
        let creds = Credentials::new("bot@example.com", "secret").with_access_token("");
        assert!(!creds.has_token());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("bot@example.com", "secret").with_access_token("token123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("bot@example.com"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("token123"));
    }
}
