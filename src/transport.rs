//! The seam between the client and the network.

use crate::error::TransportError;
use bytes::Bytes;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Where a request should be sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Path relative to the API base url
    Path(&'static str),
    /// Absolute url, used for the upload nodes and the shared folders
    Url(String),
}

/// A part of a multipart body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub data: Bytes,
}

impl Part {
    pub fn text<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            filename: None,
            data: Bytes::from(value.into()),
        }
    }

    pub fn file<N: Into<String>, F: Into<String>, D: Into<Bytes>>(
        name: N,
        filename: F,
        data: D,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            data: data.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<Part>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: Target,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl Request {
    pub fn get(target: Target) -> Self {
        Self {
            method: Method::Get,
            target,
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn post_json(target: Target, body: Value) -> Self {
        Self {
            method: Method::Post,
            target,
            query: Vec::new(),
            body: Body::Json(body),
        }
    }

    pub fn post_multipart(target: Target, parts: Vec<Part>) -> Self {
        Self {
            method: Method::Post,
            target,
            query: Vec::new(),
            body: Body::Multipart(parts),
        }
    }

    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new<B: Into<Bytes>>(status: u16, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the provider.
///
/// Implementations own their connection pool and must be usable concurrently.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}
