//! Files of the account and the commands managing them

use chrono::NaiveDateTime;

pub mod delete;
pub mod get_link;
pub mod list;
pub mod token;
pub mod upload;

/// A structure representing a file on 1fichier
///
/// The `url` identifies the file, it's used to download or remove it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct File {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub checksum: String,
    #[serde(rename = "content-type")]
    pub content_type: String,
    #[serde(rename = "acl", with = "crate::flag")]
    pub access_control: bool,
    #[serde(rename = "pass", with = "crate::flag")]
    pub password_protected: bool,
    #[serde(rename = "cdn", with = "crate::flag")]
    pub cdn_enabled: bool,
    pub date: String,
}

impl File {
    pub fn uploaded_at(&self) -> Option<NaiveDateTime> {
        crate::date::parse(&self.date)
    }
}

/// Files of a folder, as returned when listing it
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FileListing {
    pub items: Vec<File>,
    #[serde(rename = "Status")]
    pub status: String,
}

impl FileListing {
    pub fn find_file(&self, filename: &str) -> Option<&File> {
        self.items.iter().find(|item| item.filename == filename)
    }
}

/// Public link of a shared file
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SharedLink {
    pub filename: String,
    pub link: String,
    pub size: u64,
}
