//! Resources needed to remove files

use crate::codec::Operation;
use crate::error::ApiError;
use crate::OperationResult;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RemoveFile {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RemoveFilesRequest {
    pub files: Vec<RemoveFile>,
}

impl RemoveFilesRequest {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: urls
                .into_iter()
                .map(|url| RemoveFile { url: url.into() })
                .collect(),
        }
    }
}

impl crate::Client {
    /// Remove files, identified by their urls
    ///
    /// The provider answers with a single result for the whole batch, a partial failure is
    /// reported as is.
    #[tracing::instrument(skip(self, urls))]
    pub async fn remove_files<I, S>(&self, urls: I) -> Result<OperationResult, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params = RemoveFilesRequest::new(urls);
        tracing::debug!("removing {} file(s)", params.files.len());
        self.post_json(Operation::RemoveFiles, &params).await
    }
}
