//! Wire schemas of every operation, as a declarative table.
//!
//! The typed structures carry the same names through their serde attributes, the table is
//! what [`decode`](super::decode) checks first so a missing field is reported by its wire path.

use super::Operation;
use crate::error::DecodeError;
use serde_json::Value;

/// JSON kind expected for a field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Integer,
    String,
    /// Array of objects, each following the given fields
    Records(&'static [Field]),
}

/// A required field, named as it appears on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub wire: &'static str,
    pub kind: Kind,
}

const fn int(wire: &'static str) -> Field {
    Field {
        wire,
        kind: Kind::Integer,
    }
}

const fn string(wire: &'static str) -> Field {
    Field {
        wire,
        kind: Kind::String,
    }
}

const fn records(wire: &'static str, fields: &'static [Field]) -> Field {
    Field {
        wire,
        kind: Kind::Records(fields),
    }
}

/// Top level shape of a response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Object(&'static [Field]),
    Array(&'static [Field]),
    /// The response body is not decoded
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schema {
    pub request: &'static [Field],
    pub response: Shape,
    /// Name of the status field, with the exact casing of the endpoint
    pub status: Option<&'static str>,
}

const SUB_FOLDER: &[Field] = &[string("create_date"), int("id"), string("name"), int("pass")];

const FILE_ITEM: &[Field] = &[
    int("acl"),
    int("cdn"),
    string("checksum"),
    string("content-type"),
    string("date"),
    string("filename"),
    int("pass"),
    int("size"),
    string("url"),
];

const SHARED_FILE: &[Field] = &[string("filename"), string("link"), int("size")];

const UPLOADED_LINK: &[Field] = &[
    string("download"),
    string("filename"),
    string("remove"),
    string("size"),
    string("whirlpool"),
];

const OPERATION_RESULT: &[Field] = &[string("status"), string("message")];

const FOLDER_ID: &[Field] = &[int("folder_id")];

const DOWNLOAD_REQUEST: &[Field] = &[string("url"), int("single")];

pub const LIST_FOLDERS: Schema = Schema {
    request: FOLDER_ID,
    response: Shape::Object(&[
        int("folder_id"),
        string("name"),
        string("Status"),
        records("sub_folders", SUB_FOLDER),
    ]),
    status: Some("Status"),
};

pub const LIST_FILES: Schema = Schema {
    request: FOLDER_ID,
    response: Shape::Object(&[records("items", FILE_ITEM), string("Status")]),
    status: Some("Status"),
};

pub const DOWNLOAD_LINK: Schema = Schema {
    request: DOWNLOAD_REQUEST,
    response: Shape::Array(SHARED_FILE),
    status: None,
};

pub const DOWNLOAD_TOKEN: Schema = Schema {
    request: DOWNLOAD_REQUEST,
    response: Shape::Object(&[string("url"), string("Status"), string("Message")]),
    status: Some("Status"),
};

pub const REMOVE_FOLDER: Schema = Schema {
    request: FOLDER_ID,
    response: Shape::Object(OPERATION_RESULT),
    status: Some("status"),
};

pub const REMOVE_FILES: Schema = Schema {
    request: &[records("files", &[string("url")])],
    response: Shape::Object(OPERATION_RESULT),
    status: Some("status"),
};

pub const MAKE_FOLDER: Schema = Schema {
    request: &[string("name"), int("folder_id")],
    response: Shape::Object(&[string("name"), int("folder_id")]),
    status: None,
};

pub const UPLOAD_NODE: Schema = Schema {
    request: &[],
    response: Shape::Object(&[string("id"), string("url")]),
    status: None,
};

pub const UPLOAD: Schema = Schema {
    request: &[],
    response: Shape::Ignored,
    status: None,
};

pub const END_UPLOAD: Schema = Schema {
    request: &[],
    response: Shape::Object(&[int("incoming"), records("links", UPLOADED_LINK)]),
    status: None,
};

pub const SHARED_FOLDER: Schema = Schema {
    request: &[],
    response: Shape::Array(SHARED_FILE),
    status: None,
};

fn check_kind(
    operation: Operation,
    path: &str,
    kind: Kind,
    value: &Value,
) -> Result<(), DecodeError> {
    let valid = match kind {
        Kind::Integer => value.is_i64() || value.is_u64(),
        Kind::String => value.is_string(),
        Kind::Records(fields) => {
            let items = value.as_array().ok_or_else(|| {
                DecodeError::malformed(operation, format!("field `{path}` should be an array"))
            })?;
            for (index, item) in items.iter().enumerate() {
                check_fields(operation, &format!("{path}[{index}]"), fields, item)?;
            }
            true
        }
    };
    if valid {
        Ok(())
    } else {
        Err(DecodeError {
            operation,
            field: Some(path.to_string()),
            message: format!("field `{path}` should be of kind {kind:?}"),
        })
    }
}

fn check_fields(
    operation: Operation,
    prefix: &str,
    fields: &[Field],
    value: &Value,
) -> Result<(), DecodeError> {
    let object = value.as_object().ok_or_else(|| {
        let location = if prefix.is_empty() { "response" } else { prefix };
        DecodeError::malformed(operation, format!("{location} should be an object"))
    })?;
    for field in fields {
        let path = if prefix.is_empty() {
            field.wire.to_string()
        } else {
            format!("{prefix}.{}", field.wire)
        };
        match object.get(field.wire) {
            Some(inner) => check_kind(operation, &path, field.kind, inner)?,
            None => return Err(DecodeError::missing_field(operation, path)),
        }
    }
    Ok(())
}

/// Checks that every field of the request schema is present with the right kind
pub(crate) fn check_request(operation: Operation, value: &Value) -> Result<(), DecodeError> {
    check_fields(operation, "", operation.schema().request, value)
}

/// Checks that every required field of the response schema is present with the right kind.
///
/// Unknown fields are ignored.
pub(crate) fn check(operation: Operation, value: &Value) -> Result<(), DecodeError> {
    match operation.schema().response {
        Shape::Object(fields) => check_fields(operation, "", fields, value),
        Shape::Array(fields) => {
            let items = value.as_array().ok_or_else(|| {
                DecodeError::malformed(operation, "response should be an array")
            })?;
            for (index, item) in items.iter().enumerate() {
                check_fields(operation, &format!("[{index}]"), fields, item)?;
            }
            Ok(())
        }
        Shape::Ignored => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::check;
    use crate::codec::Operation;
    use serde_json::json;

    #[test]
    fn missing_top_level_field_is_named() {
        let value = json!({ "folder_id": 0, "name": "root", "Status": "OK" });
        let err = check(Operation::ListFolders, &value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("sub_folders"));
        assert_eq!(err.operation, Operation::ListFolders);
    }

    #[test]
    fn missing_nested_field_is_named_with_its_path() {
        let value = json!({
            "folder_id": 0,
            "name": "root",
            "Status": "OK",
            "sub_folders": [
                { "id": 1, "name": "a", "create_date": "2020-01-01", "pass": 0 },
                { "name": "b", "create_date": "2020-01-01", "pass": 0 },
            ],
        });
        let err = check(Operation::ListFolders, &value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("sub_folders[1].id"));
    }

    #[test]
    fn wrong_kind_is_named() {
        let value = json!({ "name": "photos", "folder_id": "12" });
        let err = check(Operation::MakeFolder, &value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("folder_id"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let value = json!({ "id": "abc", "url": "up2.1fichier.com", "extra": true });
        assert!(check(Operation::UploadNode, &value).is_ok());
    }

    #[test]
    fn array_items_are_checked() {
        let value = json!([{ "filename": "a.txt", "link": "https://1fichier.com/?a" }]);
        let err = check(Operation::SharedFolder, &value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("[0].size"));
    }
}
