//! Client core for the [1fichier](https://1fichier.com) JSON API.
//!
//! Every remote operation goes through the same chain: the request is encoded by the
//! [`codec`], sent by a [`Transport`](transport::Transport), decoded back, and on failure the
//! error is categorized by the [`Classifier`](classifier::Classifier) so the
//! [`RetryPolicy`](retry::RetryPolicy) can decide to try again.
//!
//! ```rust
//! use fichier::{ClientBuilder, Credentials};
//!
//! let _client = ClientBuilder::default()
//!     .with_credentials(Credentials::api_key("my-api-key"))
//!     .build()
//!     .expect("unable to build client");
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod builder;
pub mod classifier;
pub mod codec;
pub mod credentials;
mod date;
pub mod error;
pub mod file;
mod flag;
pub mod folder;
pub mod http;
mod request;
pub mod retry;
pub mod transport;

pub use builder::ClientBuilder;
pub use credentials::Credentials;
pub use error::ApiError;
pub use request::OperationResult;

/// The default user agent for the http client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
/// Base url of the JSON API
pub const DEFAULT_BASE_URL: &str = "https://api.1fichier.com/v1";
/// Base url of the public shared folders
pub const DEFAULT_SHARE_URL: &str = "https://1fichier.com";

/// Client exposing one method per remote operation.
///
/// Cloning it is cheap, the transport and its connection pool are shared.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn transport::Transport>,
    classifier: Arc<classifier::Classifier>,
    retry: retry::RetryPolicy,
    cancel: CancellationToken,
    share_url: Cow<'static, str>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("retry", &self.retry)
            .field("share_url", &self.share_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client on top of any transport, with the default retry policy and classifier
    pub fn new(transport: Arc<dyn transport::Transport>) -> Self {
        Self {
            transport,
            classifier: Arc::new(classifier::Classifier::default()),
            retry: retry::RetryPolicy::default(),
            cancel: CancellationToken::new(),
            share_url: Cow::Borrowed(DEFAULT_SHARE_URL),
        }
    }

    pub fn retry_policy(&self) -> &retry::RetryPolicy {
        &self.retry
    }

    pub fn classifier(&self) -> &classifier::Classifier {
        &self.classifier
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns a client sharing the same transport whose calls stop when `token` is cancelled
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    pub fn with_retry_policy(mut self, value: retry::RetryPolicy) -> Self {
        self.retry = value;
        self
    }

    pub fn with_classifier(mut self, value: classifier::Classifier) -> Self {
        self.classifier = Arc::new(value);
        self
    }

    pub fn with_share_url<U: Into<Cow<'static, str>>>(mut self, value: U) -> Self {
        self.share_url = value.into();
        self
    }
}
