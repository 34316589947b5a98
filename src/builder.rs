use crate::classifier::Classifier;
use crate::credentials::Credentials;
use crate::http::HttpTransport;
use crate::retry::RetryPolicy;
use crate::transport::Transport;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Errors that may occur during client configuration and building.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the underlying HTTP client could not be built.
    #[error("unable to build reqwest client")]
    Reqwest(#[from] reqwest::Error),
}

/// Builder for constructing a [`Client`](crate::Client) with custom configuration.
///
/// This allows specifying the base URLs, credentials, timeout, retry policy, error classifier,
/// cancellation token and optionally customizing the inner `reqwest::ClientBuilder`.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Cow<'static, str>,
    share_url: Cow<'static, str>,
    client_builder: Option<reqwest::ClientBuilder>,
    credentials: Credentials,
    timeout: Option<Duration>,
    retry: RetryPolicy,
    classifier: Classifier,
    cancel: CancellationToken,
}

impl Default for ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings:
    ///
    /// - Base URL is set to the public API.
    /// - No credentials are set.
    /// - No timeout, default retry policy and default classifier.
    fn default() -> Self {
        Self {
            base_url: Cow::Borrowed(crate::DEFAULT_BASE_URL),
            share_url: Cow::Borrowed(crate::DEFAULT_SHARE_URL),
            client_builder: None,
            credentials: Credentials::Anonymous,
            timeout: None,
            retry: RetryPolicy::default(),
            classifier: Classifier::default(),
            cancel: CancellationToken::new(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring invalid value {value:?} for {name} environment variable");
            None
        }
    }
}

impl ClientBuilder {
    /// Creates a builder pre-configured using environment variables.
    ///
    /// - Uses `FICHIER_BASE_URL` for the endpoint.
    /// - Uses `FICHIER_API_KEY` for credentials.
    /// - Uses `FICHIER_TIMEOUT`, in milliseconds, for the request timeout.
    /// - Uses `FICHIER_MAX_ATTEMPTS` for the retry policy.
    ///
    /// Invalid numbers are ignored.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(base_url) = std::env::var("FICHIER_BASE_URL") {
            builder.set_base_url(base_url);
        }
        if let Some(credentials) = Credentials::from_env() {
            builder.set_credentials(credentials);
        }
        if let Some(timeout) = parse_env::<u64>("FICHIER_TIMEOUT") {
            builder.set_timeout(Duration::from_millis(timeout));
        }
        if let Some(max_attempts) = parse_env::<u32>("FICHIER_MAX_ATTEMPTS") {
            builder.retry = builder.retry.with_max_attempts(max_attempts);
        }
        builder
    }
}

impl ClientBuilder {
    /// Sets a custom base URL.
    pub fn set_base_url(&mut self, base_url: impl Into<Cow<'static, str>>) {
        self.base_url = base_url.into();
    }

    /// Sets a custom base URL and returns the modified builder.
    pub fn with_base_url(mut self, base_url: impl Into<Cow<'static, str>>) -> Self {
        self.set_base_url(base_url);
        self
    }

    /// Sets the URL the shared folders are read from.
    pub fn set_share_url(&mut self, share_url: impl Into<Cow<'static, str>>) {
        self.share_url = share_url.into();
    }

    /// Sets the URL the shared folders are read from and returns the modified builder.
    pub fn with_share_url(mut self, share_url: impl Into<Cow<'static, str>>) -> Self {
        self.set_share_url(share_url);
        self
    }

    /// Sets a custom `reqwest::ClientBuilder`.
    pub fn set_client_builder(&mut self, client_builder: reqwest::ClientBuilder) {
        self.client_builder = Some(client_builder);
    }

    /// Sets a custom `reqwest::ClientBuilder` and returns the modified builder.
    pub fn with_client_builder(mut self, client_builder: reqwest::ClientBuilder) -> Self {
        self.set_client_builder(client_builder);
        self
    }

    /// Sets the credentials for API authentication.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Sets the credentials and returns the modified builder.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    pub fn set_timeout(&mut self, value: Duration) {
        self.timeout = Some(value);
    }

    pub fn with_timeout(mut self, value: Duration) -> Self {
        self.set_timeout(value);
        self
    }

    pub fn set_retry_policy(&mut self, value: RetryPolicy) {
        self.retry = value;
    }

    pub fn with_retry_policy(mut self, value: RetryPolicy) -> Self {
        self.set_retry_policy(value);
        self
    }

    pub fn set_classifier(&mut self, value: Classifier) {
        self.classifier = value;
    }

    pub fn with_classifier(mut self, value: Classifier) -> Self {
        self.set_classifier(value);
        self
    }

    /// Sets the token cancelling every call of the built client.
    pub fn set_cancellation_token(&mut self, value: CancellationToken) {
        self.cancel = value;
    }

    pub fn with_cancellation_token(mut self, value: CancellationToken) -> Self {
        self.set_cancellation_token(value);
        self
    }

    /// Builds a [`Client`](crate::Client) sending its requests through the given transport.
    ///
    /// The base URL, credentials and timeout are not used, they belong to the transport.
    pub fn build_with_transport(self, transport: Arc<dyn Transport>) -> crate::Client {
        crate::Client {
            transport,
            classifier: Arc::new(self.classifier),
            retry: self.retry,
            cancel: self.cancel,
            share_url: self.share_url,
        }
    }

    /// Builds the [`Client`](crate::Client) with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reqwest`] if the HTTP client could not be built.
    pub fn build(mut self) -> Result<crate::Client, Error> {
        let mut builder = self
            .client_builder
            .take()
            .unwrap_or_default()
            .user_agent(crate::USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let transport = HttpTransport::new(
            builder.build()?,
            self.base_url.clone(),
            self.credentials.clone(),
        );
        Ok(self.build_with_transport(Arc::new(transport)))
    }
}
