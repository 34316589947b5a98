//! Marshaling of typed requests and unmarshaling of the provider responses.
//!
//! Everything in here is a pure transformation, no I/O happens.

use crate::error::{DecodeError, Error, RemoteError};
use serde_json::{Map, Value};

pub mod schema;

/// Status token the provider uses for a successful call
pub const SUCCESS: &str = "OK";

/// All the remote operations known by the client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFolders,
    ListFiles,
    DownloadLink,
    DownloadToken,
    MakeFolder,
    RemoveFolder,
    RemoveFiles,
    UploadNode,
    Upload,
    EndUpload,
    SharedFolder,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListFolders => "list folders",
            Self::ListFiles => "list files",
            Self::DownloadLink => "download link",
            Self::DownloadToken => "download token",
            Self::MakeFolder => "make folder",
            Self::RemoveFolder => "remove folder",
            Self::RemoveFiles => "remove files",
            Self::UploadNode => "upload node",
            Self::Upload => "upload",
            Self::EndUpload => "end upload",
            Self::SharedFolder => "shared folder",
        }
    }

    /// Endpoint of the operation.
    ///
    /// Relative to the API base url, except for the upload related operations that are sent
    /// to the upload node and the shared folder listing that is sent to the share url.
    pub fn path(&self) -> &'static str {
        match self {
            Self::ListFolders => "folder/ls.cgi",
            Self::ListFiles => "file/ls.cgi",
            Self::DownloadLink => "download/get_link.cgi",
            Self::DownloadToken => "download/get_token.cgi",
            Self::MakeFolder => "folder/mkdir.cgi",
            Self::RemoveFolder => "folder/rm.cgi",
            Self::RemoveFiles => "file/rm.cgi",
            Self::UploadNode => "upload/get_upload_server.cgi",
            Self::Upload => "upload.cgi",
            Self::EndUpload => "end.pl",
            Self::SharedFolder => "dir",
        }
    }

    /// Whether the operation can be repeated without duplicating its side effects
    pub fn is_idempotent(&self) -> bool {
        !matches!(
            self,
            Self::MakeFolder | Self::RemoveFolder | Self::RemoveFiles | Self::Upload
        )
    }

    pub fn schema(&self) -> &'static schema::Schema {
        match self {
            Self::ListFolders => &schema::LIST_FOLDERS,
            Self::ListFiles => &schema::LIST_FILES,
            Self::DownloadLink => &schema::DOWNLOAD_LINK,
            Self::DownloadToken => &schema::DOWNLOAD_TOKEN,
            Self::MakeFolder => &schema::MAKE_FOLDER,
            Self::RemoveFolder => &schema::REMOVE_FOLDER,
            Self::RemoveFiles => &schema::REMOVE_FILES,
            Self::UploadNode => &schema::UPLOAD_NODE,
            Self::Upload => &schema::UPLOAD,
            Self::EndUpload => &schema::END_UPLOAD,
            Self::SharedFolder => &schema::SHARED_FOLDER,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the wire representation of a request or a response structure
pub fn encode<P: serde::Serialize>(params: &P) -> Result<Value, Error> {
    serde_json::to_value(params).map_err(Error::Encode)
}

fn status_of<'a>(operation: Operation, object: &'a Map<String, Value>) -> Option<&'a str> {
    operation
        .schema()
        .status
        .and_then(|key| object.get(key))
        .or_else(|| object.get("status"))
        .or_else(|| object.get("Status"))
        .and_then(Value::as_str)
}

fn message_of(object: &Map<String, Value>) -> String {
    object
        .get("message")
        .or_else(|| object.get("Message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Turns a status tag different from [`SUCCESS`] into a [`RemoteError`]
fn check_status(operation: Operation, value: &Value) -> Result<(), RemoteError> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };
    match status_of(operation, object) {
        None | Some(SUCCESS) => Ok(()),
        Some(status) => Err(RemoteError::new(status, message_of(object))),
    }
}

/// Decodes the body of a successful HTTP response into the expected structure
pub fn decode<T: serde::de::DeserializeOwned>(
    operation: Operation,
    bytes: &[u8],
) -> Result<T, Error> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::malformed(operation, err))?;
    check_status(operation, &value)?;
    schema::check(operation, &value)?;
    serde_json::from_value(value)
        .map_err(|err| DecodeError::malformed(operation, err))
        .map_err(Error::from)
}

/// Decodes the parameters of a request, as a mocked provider receives them.
///
/// Only the request fields of the operation's schema are checked, there is no status envelope.
pub fn decode_request<T: serde::de::DeserializeOwned>(
    operation: Operation,
    bytes: &[u8],
) -> Result<T, Error> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::malformed(operation, err))?;
    schema::check_request(operation, &value)?;
    serde_json::from_value(value)
        .map_err(|err| DecodeError::malformed(operation, err))
        .map_err(Error::from)
}

/// Builds the error matching a response with a non 2xx HTTP status.
///
/// The message comes from the body when it is an error envelope, otherwise from its text.
pub fn decode_failure(operation: Operation, code: u16, bytes: &[u8]) -> RemoteError {
    let text = || String::from_utf8_lossy(bytes).trim().to_string();
    let error = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(object)) => {
            let message = message_of(&object);
            RemoteError::new(
                status_of(operation, &object).unwrap_or("KO"),
                if message.is_empty() { text() } else { message },
            )
        }
        _ => RemoteError::new("KO", text()),
    };
    error.with_code(code)
}
