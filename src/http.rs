//! The [`Transport`](crate::transport::Transport) implementation based on reqwest

use crate::credentials::Credentials;
use crate::error::TransportError;
use crate::transport::{Body, Method, Request, Response, Target, Transport};
use std::borrow::Cow;

/// Client for the 1fichier JSON API, over https
#[derive(Clone, Debug)]
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: Cow<'static, str>,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new<U: Into<Cow<'static, str>>>(
        inner: reqwest::Client,
        base_url: U,
        credentials: Credentials,
    ) -> Self {
        Self {
            inner,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn build_url(&self, target: &Target) -> String {
        match target {
            Target::Path(path) => format!("{}/{}", self.base_url.trim_end_matches('/'), path),
            Target::Url(url) => url.clone(),
        }
    }
}

fn build_form(parts: Vec<crate::transport::Part>) -> reqwest::multipart::Form {
    parts
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, part| {
            let inner = match part.filename {
                Some(filename) => {
                    reqwest::multipart::Part::bytes(part.data.to_vec()).file_name(filename)
                }
                None => reqwest::multipart::Part::text(
                    String::from_utf8_lossy(&part.data).into_owned(),
                ),
            };
            form.part(part.name, inner)
        })
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(name = "send", skip_all, fields(method = ?request.method))]
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let uri = self.build_url(&request.target);
        tracing::debug!("calling {uri}");
        let builder = match request.method {
            Method::Get => self.inner.get(uri),
            Method::Post => self.inner.post(uri),
        };
        // some endpoints, like the end of upload, only answer json with this header
        let mut builder = builder.query(&request.query).header("JSON", "1");
        if let Some(token) = self.credentials.bearer() {
            builder = builder.bearer_auth(token);
        }
        let builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(parts) => builder.multipart(build_form(parts)),
        };
        let res = builder.send().await?;
        let status = res.status().as_u16();
        tracing::debug!("responded with status {status}");
        let body = res
            .bytes()
            .await
            .map_err(|err| TransportError::Body(err.to_string()))?;
        Ok(Response { status, body })
    }
}
