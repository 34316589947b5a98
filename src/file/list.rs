//! Resources needed to list the files of a folder

use super::FileListing;
use crate::codec::Operation;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ListFilesRequest {
    pub folder_id: u64,
}

impl crate::Client {
    /// List the files of a folder
    ///
    /// # Arguments
    ///
    /// * `folder_id` - ID of the folder. Use [`ROOT`](crate::folder::ROOT) for the root folder.
    #[tracing::instrument(skip(self))]
    pub async fn list_files(&self, folder_id: u64) -> Result<FileListing, ApiError> {
        self.post_json(Operation::ListFiles, &ListFilesRequest { folder_id })
            .await
    }
}
