//! Contacts-export model.
//!
//! The session reads the exporter's snake_case JSON: a `connections`
//! array where each entry may carry a `names` array with `display_name`
//! fields. Everything else in the export is ignored.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{NotesError, Result};

/// Stand-in name for a contact whose export has no usable display name.
pub const UNKNOWN_CONTACT: &str = "Unknown Contact";

/// Top level of the contacts export.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactsFile {
    pub connections: Option<Vec<Connection>>,
}

/// One exported contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub names: Option<Vec<ContactName>>,
}

/// One name record of a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactName {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Connection {
    /// The contact's display name, substituting [`UNKNOWN_CONTACT`] when
    /// the export carries no name or only an empty one.
    pub fn display_name(&self) -> &str {
        self.names
            .as_deref()
            .and_then(|names| names.first())
            .and_then(|name| name.display_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_CONTACT)
    }
}

/// Display names for a whole export, placeholders substituted.
pub fn display_names(connections: &[Connection]) -> Vec<String> {
    connections
        .iter()
        .map(|connection| connection.display_name().to_string())
        .collect()
}

/// Load the contacts export.
///
/// The file must exist, parse as JSON, and carry a `connections` list.
/// Any of those failing fails the whole session; there is nothing useful
/// to do without contacts.
pub fn load_contacts(path: &Path) -> Result<Vec<Connection>> {
    if !path.exists() {
        return Err(NotesError::ContactsMissing {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(path)?;
    let file: ContactsFile = serde_json::from_str(&raw)?;
    let connections = file.connections.ok_or(NotesError::MissingConnections)?;
    debug!(contacts = connections.len(), "contacts export loaded");
    Ok(connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_contacts(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("contacts_data.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_display_name_from_first_name_record() {
        let connections: Vec<Connection> = serde_json::from_str(
            r#"[{"names": [{"display_name": "Ada Lovelace"}, {"display_name": "A. L."}]}]"#,
        )
        .unwrap();
        assert_eq!(connections[0].display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_contact_without_names_gets_placeholder() {
        let connection = Connection::default();
        assert_eq!(connection.display_name(), UNKNOWN_CONTACT);
    }

    #[test]
    fn test_empty_names_array_gets_placeholder() {
        let connections: Vec<Connection> = serde_json::from_str(r#"[{"names": []}]"#).unwrap();
        assert_eq!(connections[0].display_name(), UNKNOWN_CONTACT);
    }

    #[test]
    fn test_name_record_without_display_name_gets_placeholder() {
        let connections: Vec<Connection> =
            serde_json::from_str(r#"[{"names": [{"metadata": {}}]}]"#).unwrap();
        assert_eq!(connections[0].display_name(), UNKNOWN_CONTACT);
    }

    #[test]
    fn test_empty_display_name_gets_placeholder() {
        let connections: Vec<Connection> =
            serde_json::from_str(r#"[{"names": [{"display_name": ""}]}]"#).unwrap();
        assert_eq!(connections[0].display_name(), UNKNOWN_CONTACT);
    }

    #[test]
    fn test_snake_case_key_binds_the_name() {
        // The exporter writes snake_case keys; a camelCase `displayName`
        // is just another ignored extra field.
        let connections: Vec<Connection> = serde_json::from_str(
            r#"[
                {"names": [{"display_name": "Ada Lovelace"}]},
                {"names": [{"displayName": "Grace Hopper"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(connections[0].display_name(), "Ada Lovelace");
        assert_eq!(connections[1].display_name(), UNKNOWN_CONTACT);
    }

    #[test]
    fn test_display_names_preserve_export_order() {
        let connections: Vec<Connection> = serde_json::from_str(
            r#"[
                {"names": [{"display_name": "Grace Hopper"}]},
                {},
                {"names": [{"display_name": "Ada Lovelace"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            display_names(&connections),
            vec!["Grace Hopper", "Unknown Contact", "Ada Lovelace"]
        );
    }

    #[test]
    fn test_load_contacts_reads_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_contacts(
            &dir,
            r#"{"connections": [{"names": [{"display_name": "Ada Lovelace"}]}], "totalItems": 1}"#,
        );

        let connections = load_contacts(&path).unwrap();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_load_contacts_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_contacts(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(NotesError::ContactsMissing { .. })));
    }

    #[test]
    fn test_load_contacts_without_connections_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_contacts(&dir, r#"{"totalItems": 0}"#);
        let result = load_contacts(&path);
        assert!(matches!(result, Err(NotesError::MissingConnections)));
    }

    #[test]
    fn test_load_contacts_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_contacts(&dir, "not json at all");
        let result = load_contacts(&path);
        assert!(matches!(result, Err(NotesError::ContactsInvalid(_))));
    }
}
