//! This gives the required structure to authenticate with the 1fichier API, using an API key
//! sent as a bearer token.

/// The different kind of credentials used for authentication
#[derive(Clone, Default)]
pub enum Credentials {
    ApiKey(String),
    /// Only the public endpoints, like the shared folders, can be used
    #[default]
    Anonymous,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"********").finish(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

impl Credentials {
    /// Creates a credential based on the environment variables
    ///
    /// When `FICHIER_API_KEY` is set, a `Some(Credentials::ApiKey)` will be created.
    ///
    /// If not set, `None` is returned.
    ///
    /// ```rust
    /// use fichier::credentials::Credentials;
    ///
    /// match Credentials::from_env() {
    ///     Some(Credentials::ApiKey(_)) => println!("uses an api key"),
    ///     _ => eprintln!("no credentials provided"),
    /// }
    /// ```
    pub fn from_env() -> Option<Self> {
        std::env::var("FICHIER_API_KEY").ok().map(Self::ApiKey)
    }

    pub fn api_key<S: Into<String>>(value: S) -> Self {
        Self::ApiKey(value.into())
    }

    pub(crate) fn bearer(&self) -> Option<&str> {
        match self {
            Self::ApiKey(value) => Some(value.as_str()),
            Self::Anonymous => None,
        }
    }
}
