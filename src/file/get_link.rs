//! Resources needed to get the download link of a file

use super::SharedLink;
use crate::codec::Operation;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DownloadRequest {
    pub url: String,
    /// Asks for a link that can be used only once, the provider may ignore it
    #[serde(with = "crate::flag")]
    pub single: bool,
}

/// The provider answers with one link per requested file
#[derive(Debug, serde::Deserialize)]
#[serde(try_from = "Vec<SharedLink>")]
struct DownloadLinkResponse(SharedLink);

impl TryFrom<Vec<SharedLink>> for DownloadLinkResponse {
    type Error = &'static str;

    fn try_from(value: Vec<SharedLink>) -> Result<Self, Self::Error> {
        value.into_iter().next().map(Self).ok_or("no link returned")
    }
}

impl crate::Client {
    /// Get the download link of a file
    ///
    /// # Arguments
    ///
    /// * `url` - Url of the file.
    /// * `single` - Whether a single use link is requested, this is only advisory.
    #[tracing::instrument(skip(self))]
    pub async fn get_download_link(&self, url: &str, single: bool) -> Result<SharedLink, ApiError> {
        let params = DownloadRequest {
            url: url.to_string(),
            single,
        };
        self.post_json::<_, DownloadLinkResponse>(Operation::DownloadLink, &params)
            .await
            .map(|res| res.0)
    }
}
