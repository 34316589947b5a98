//! Resources needed to remove a folder

use crate::codec::Operation;
use crate::error::ApiError;
use crate::OperationResult;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RemoveFolderRequest {
    pub folder_id: u64,
}

impl crate::Client {
    /// Remove a folder
    #[tracing::instrument(skip(self))]
    pub async fn remove_folder(&self, folder_id: u64) -> Result<OperationResult, ApiError> {
        self.post_json(Operation::RemoveFolder, &RemoveFolderRequest { folder_id })
            .await
    }
}
