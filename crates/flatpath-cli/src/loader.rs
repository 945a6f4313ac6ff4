//! Document loading
//!
//! Reads JSON and TOML documents from disk into [`Value`]s and merges them,
//! in the order given, into one [`FlatMap`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flatpath_core::{Array, FlatMap, FlattenOptions, Record, Value};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Supported input document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> CliResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(DocumentFormat::Toml),
            _ => Err(CliError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read and parse a single document
pub fn load_document(path: &Path) -> CliResult<Value> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;

    debug!("Parsing {} as {:?}", path.display(), format);
    match format {
        DocumentFormat::Json => Ok(Value::from_json_str(&content)?),
        DocumentFormat::Toml => parse_toml(&content),
    }
}

/// Parse a TOML document; the top level is always a table
pub fn parse_toml(content: &str) -> CliResult<Value> {
    let table: toml::Table = content.parse()?;
    Ok(Value::Record(table_to_record(table)))
}

fn table_to_record(table: toml::Table) -> Record {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_value(value)))
        .collect()
}

fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_value).collect::<Array>()),
        toml::Value::Table(table) => Value::Record(table_to_record(table)),
    }
}

/// Load every document and merge them into one map
///
/// Documents are merged in the order given, so later documents override
/// keys set by earlier ones.
pub fn load_documents(paths: &[PathBuf], options: FlattenOptions) -> Result<FlatMap> {
    let mut map = FlatMap::with_options(options).context("Invalid flattening options")?;

    for path in paths {
        let document = load_document(path)
            .with_context(|| format!("Failed to load document {}", path.display()))?;
        let written = map.merge(document);
        if written == 0 {
            info!("{} contributes no entries", path.display());
        }
        debug!(
            "Merged {} ({} writes, {} entries so far)",
            path.display(),
            written,
            map.len()
        );
    }

    info!("Flattened {} document(s) into {} entries", paths.len(), map.len());
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_document(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")).unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a.TOML")).unwrap(), DocumentFormat::Toml);
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.yaml")),
            Err(CliError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_parse_toml_keeps_order_and_types() {
        let value = parse_toml(
            r#"
            name = "svc"
            started = 1979-05-27T07:32:00Z

            [http]
            port = 8080
            ratio = 0.5

            [[backends]]
            host = "a"

            [[backends]]
            host = "b"
            "#,
        )
        .unwrap();

        let record = value.as_record().unwrap();
        assert_eq!(record.keys(), ["name", "started", "http", "backends"]);
        assert_eq!(
            value.to_json().unwrap(),
            json!({
                "name": "svc",
                "started": "1979-05-27T07:32:00Z",
                "http": {"port": 8080, "ratio": 0.5},
                "backends": [{"host": "a"}, {"host": "b"}]
            })
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_document(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let file = temp_document(".json", "{ not json");
        let err = load_document(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Flatpath(_)));
    }

    #[test]
    fn test_load_documents_merges_in_order() {
        let base = temp_document(".json", r#"{"api": {"http": {"auth": {"token": "secret"}, "port": 80}}}"#);
        let overlay = temp_document(".toml", "[api.http]\nport = 8080\n");

        let map = load_documents(
            &[base.path().to_path_buf(), overlay.path().to_path_buf()],
            FlattenOptions::default(),
        )
        .unwrap();

        assert_eq!(map.get("api.http.port"), Some(&Value::from(8080)));
        assert_eq!(map.get("api.http.auth.token"), Some(&Value::from("secret")));
    }

    #[test]
    fn test_load_documents_rejects_empty_separator() {
        let base = temp_document(".json", r#"{"a": 1}"#);
        let err = load_documents(
            &[base.path().to_path_buf()],
            FlattenOptions::new().with_separator(""),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid flattening options"));
    }

    #[test]
    fn test_scalar_list_document_contributes_nothing() {
        let list = temp_document(".json", r#"["asd"]"#);
        let map = load_documents(&[list.path().to_path_buf()], FlattenOptions::default()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_list_of_objects_document_becomes_columns() {
        let base = temp_document(".json", r#"{"host": "localhost"}"#);
        let rows = temp_document(".json", r#"[{"host": "a"}, {"host": "b"}]"#);
        let map = load_documents(
            &[base.path().to_path_buf(), rows.path().to_path_buf()],
            FlattenOptions::default(),
        )
        .unwrap();
        assert_eq!(map.get("host"), Some(&Value::from(json!(["a", "b"]))));
    }
}
