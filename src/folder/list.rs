//! Resources needed to list the sub folders of a folder

use super::FolderListing;
use crate::codec::Operation;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ListFolderRequest {
    pub folder_id: u64,
}

impl crate::Client {
    /// List the sub folders of a folder
    ///
    /// # Arguments
    ///
    /// * `folder_id` - ID of the folder. Use [`ROOT`](crate::folder::ROOT) for the root folder.
    ///
    /// An unknown folder fails with the [`NotFound`](crate::classifier::ErrorClass::NotFound)
    /// class.
    #[tracing::instrument(skip(self))]
    pub async fn list_folders(&self, folder_id: u64) -> Result<FolderListing, ApiError> {
        self.post_json(Operation::ListFolders, &ListFolderRequest { folder_id })
            .await
    }
}
