//! Folders of the account and the commands managing them

use chrono::NaiveDateTime;

pub mod create;
pub mod delete;
pub mod list;
pub mod shared;

/// Identifier of the root folder
pub const ROOT: u64 = 0;

/// A structure representing a folder on 1fichier
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    /// Only known when the folder comes from a listing
    #[serde(
        rename = "create_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<String>,
    #[serde(rename = "pass", with = "crate::flag", default)]
    pub password_protected: bool,
}

impl Folder {
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created.as_deref().and_then(crate::date::parse)
    }
}

/// Content of a folder, as returned when listing it
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FolderListing {
    pub folder_id: u64,
    pub name: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "sub_folders")]
    pub folders: Vec<Folder>,
}

impl FolderListing {
    pub fn find_folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|item| item.name == name)
    }
}
