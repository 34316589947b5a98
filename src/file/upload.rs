//! Resources needed to upload a file
//!
//! An upload goes through three steps: a node is requested, the content is sent to this node
//! and the upload is closed to get the links of the uploaded files.

use crate::codec::Operation;
use crate::error::ApiError;
use crate::transport::{Part, Request, Target};
use bytes::Bytes;

/// Upload destination negotiated with the provider, to be used by a single upload
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct UploadTicket {
    pub id: String,
    /// Host of the upload node
    pub url: String,
}

impl UploadTicket {
    fn endpoint(&self, operation: Operation) -> String {
        let host = self.url.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/{}", operation.path())
        } else {
            format!("https://{host}/{}", operation.path())
        }
    }
}

/// Links of an uploaded file
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct UploadedLink {
    pub download: String,
    pub filename: String,
    pub remove: String,
    pub size: String,
    pub whirlpool: String,
}

impl UploadedLink {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.parse().ok()
    }
}

/// Result of a finished upload
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct UploadReceipt {
    /// Number of files still being processed by the provider
    pub incoming: u64,
    pub links: Vec<UploadedLink>,
}

impl crate::Client {
    /// Get a node to upload a file to
    #[tracing::instrument(skip(self))]
    pub async fn get_upload_node(&self) -> Result<UploadTicket, ApiError> {
        let request = Request::get(Target::Path(Operation::UploadNode.path()));
        self.call(Operation::UploadNode, request).await
    }

    /// Send the content of a file to the upload node
    ///
    /// # Arguments
    ///
    /// * `ticket` - Node returned by [`get_upload_node`](Self::get_upload_node).
    /// * `folder_id` - ID of the destination folder.
    /// * `filename` - Name of the file.
    /// * `content` - Content of the file.
    #[tracing::instrument(skip(self, content))]
    pub async fn upload<C: Into<Bytes>>(
        &self,
        ticket: &UploadTicket,
        folder_id: u64,
        filename: &str,
        content: C,
    ) -> Result<(), ApiError> {
        let content: Bytes = content.into();
        tracing::debug!("uploading {} bytes", content.len());
        let request = Request::post_multipart(
            Target::Url(ticket.endpoint(Operation::Upload)),
            vec![
                Part::file("file[]", filename, content),
                Part::text("did", folder_id.to_string()),
            ],
        )
        .with_query("id", ticket.id.as_str());
        self.call_ignoring_body(Operation::Upload, request).await
    }

    /// Close the upload and get the links of the uploaded files
    #[tracing::instrument(skip(self))]
    pub async fn end_upload(&self, ticket: &UploadTicket) -> Result<UploadReceipt, ApiError> {
        let request = Request::get(Target::Url(ticket.endpoint(Operation::EndUpload)))
            .with_query("xid", ticket.id.as_str());
        self.call(Operation::EndUpload, request).await
    }

    /// Upload a file going through all the steps
    #[tracing::instrument(skip(self, content))]
    pub async fn upload_file<C: Into<Bytes>>(
        &self,
        folder_id: u64,
        filename: &str,
        content: C,
    ) -> Result<UploadReceipt, ApiError> {
        let ticket = self.get_upload_node().await?;
        self.upload(&ticket, folder_id, filename, content).await?;
        self.end_upload(&ticket).await
    }
}
