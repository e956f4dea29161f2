use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::{ExportError, Result};

pub const REST_SNAPSHOT: &str = "products_rest.json";
pub const GRAPHQL_SNAPSHOT: &str = "products_graphql.json";

/// Writes `value` as 2-space indented JSON, replacing any existing file.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)?;
    info!("Saved {}", path.display());
    Ok(())
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| ExportError::io(path, e))
}

/// Reads a snapshot written by [`save_json`].
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_save_overwrites_and_indents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REST_SNAPSHOT);

        save_json(&path, &json!([{"id": 1}, {"id": 2}])).unwrap();
        save_json(&path, &json!([{"id": 3}])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n  {\n    \"id\": 3\n  }\n]");
        let back: Value = load_json(&path).unwrap();
        assert_eq!(back, json!([{"id": 3}]));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.json");
        let err = save_json(&path, &json!({})).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
