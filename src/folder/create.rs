//! Resources needed to create a folder

use super::Folder;
use crate::codec::Operation;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct MakeFolderRequest {
    pub name: String,
    pub folder_id: u64,
}

#[derive(Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct MakeFolderResponse {
    pub name: String,
    pub folder_id: u64,
}

impl From<MakeFolderResponse> for Folder {
    fn from(value: MakeFolderResponse) -> Self {
        Self {
            id: value.folder_id,
            name: value.name,
            created: None,
            password_protected: false,
        }
    }
}

impl crate::Client {
    /// Create a folder
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the folder.
    /// * `parent_id` - ID of the parent folder. Use [`ROOT`](crate::folder::ROOT) for the root
    ///   folder.
    ///
    /// A folder with the same name under the same parent fails with the
    /// [`Fatal`](crate::classifier::ErrorClass::Fatal) class and the provider message.
    #[tracing::instrument(skip(self))]
    pub async fn make_folder(&self, name: &str, parent_id: u64) -> Result<Folder, ApiError> {
        let params = MakeFolderRequest {
            name: name.to_string(),
            folder_id: parent_id,
        };
        self.post_json::<_, MakeFolderResponse>(Operation::MakeFolder, &params)
            .await
            .map(Folder::from)
    }
}
