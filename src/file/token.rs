//! Resources needed to get a download token

use super::get_link::DownloadRequest;
use crate::codec::Operation;
use crate::error::ApiError;

/// Temporary download url of a file
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DownloadToken {
    pub url: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl crate::Client {
    /// Get a temporary url to download a file
    #[tracing::instrument(skip(self))]
    pub async fn get_download_token(
        &self,
        url: &str,
        single: bool,
    ) -> Result<DownloadToken, ApiError> {
        let params = DownloadRequest {
            url: url.to_string(),
            single,
        };
        self.post_json(Operation::DownloadToken, &params).await
    }
}
