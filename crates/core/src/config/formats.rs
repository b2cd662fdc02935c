//! Format-specific configuration parsers.
//!
//! Every supported source maps to one [`ConfigFormat`] strategy; the loader
//! dispatches on the detected format instead of branching on file names
//! throughout. Each strategy reports exactly one of three things: a document
//! candidate, "file exists but is unusable", or "this file carries no
//! config" — the loader turns these into its terminal states.

use std::path::Path;

use serde_json::Value;

/// The top-level key package manifests nest the task mapping under.
pub const PACKAGE_CONFIG_KEY: &str = "stagehand";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `package.json`: the mapping lives under the `stagehand` key.
    PackageJson,
    /// `package.yaml` / `package.yml`: same key extraction as PackageJson.
    PackageYaml,
    /// `.stagehandrc.json`
    Json,
    /// `.stagehandrc`, `.stagehandrc.yaml`, `.stagehandrc.yml`. YAML is a
    /// superset of JSON, so the extensionless rc file parses through here.
    Yaml,
    /// `.stagehandrc.toml`
    Toml,
    /// A dynamic library config module, loaded rather than parsed.
    Module,
}

impl ConfigFormat {
    /// Choose the parsing strategy for a located config file.
    pub fn detect(path: &Path) -> ConfigFormat {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match file_name {
            "package.json" => return ConfigFormat::PackageJson,
            "package.yaml" | "package.yml" => return ConfigFormat::PackageYaml,
            _ => {}
        }

        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            Some("so") | Some("dylib") | Some("dll") => ConfigFormat::Module,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// What a format strategy made of a located file.
#[derive(Debug)]
pub enum Parsed {
    /// The document parsed to a mapping candidate (not yet normalized).
    Document(Value),
    /// The file exists but its content is unusable: a syntax error in a
    /// YAML/TOML document or package manifest. Callers must stop and report
    /// rather than fall back to other sources.
    Unusable,
    /// The file carries no configuration: the manifest key is absent, or an
    /// rc JSON file failed to parse and is skipped with a warning.
    Absent,
}

/// Parse file content according to the detected format. [`ConfigFormat::Module`]
/// is loaded, not parsed, and never dispatches here.
pub fn parse(format: ConfigFormat, content: &str) -> Parsed {
    match format {
        ConfigFormat::Json => match serde_json::from_str::<Value>(content) {
            Ok(value) => Parsed::Document(value),
            Err(_) => Parsed::Absent,
        },
        ConfigFormat::Yaml => match yaml_document(content) {
            Some(value) => Parsed::Document(value),
            None => Parsed::Unusable,
        },
        ConfigFormat::Toml => match toml_document(content) {
            Some(value) => Parsed::Document(value),
            None => Parsed::Unusable,
        },
        ConfigFormat::PackageJson => match serde_json::from_str::<Value>(content) {
            Ok(manifest) => extract_package_key(&manifest),
            Err(_) => Parsed::Unusable,
        },
        ConfigFormat::PackageYaml => match yaml_document(content) {
            Some(manifest) => extract_package_key(&manifest),
            None => Parsed::Unusable,
        },
        ConfigFormat::Module => Parsed::Absent,
    }
}

fn extract_package_key(manifest: &Value) -> Parsed {
    match manifest.get(PACKAGE_CONFIG_KEY) {
        Some(value) => Parsed::Document(value.clone()),
        None => Parsed::Absent,
    }
}

fn yaml_document(content: &str) -> Option<Value> {
    let document: serde_yaml::Value = serde_yaml::from_str(content).ok()?;
    // Non-string keys have no JSON rendering and make the document unusable
    serde_json::to_value(document).ok()
}

fn toml_document(content: &str) -> Option<Value> {
    let table: toml::Table = content.parse().ok()?;
    serde_json::to_value(table).ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn detects_formats_from_file_names() {
        assert_eq!(
            ConfigFormat::detect(Path::new("package.json")),
            ConfigFormat::PackageJson
        );
        assert_eq!(
            ConfigFormat::detect(Path::new("package.yaml")),
            ConfigFormat::PackageYaml
        );
        assert_eq!(
            ConfigFormat::detect(Path::new("package.yml")),
            ConfigFormat::PackageYaml
        );
        assert_eq!(
            ConfigFormat::detect(Path::new(".stagehandrc.json")),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::detect(Path::new(".stagehandrc.yaml")),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::detect(Path::new(".stagehandrc.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::detect(Path::new("stagehand.config.so")),
            ConfigFormat::Module
        );
    }

    #[test]
    fn extensionless_rc_parses_as_yaml() {
        assert_eq!(
            ConfigFormat::detect(Path::new(".stagehandrc")),
            ConfigFormat::Yaml
        );
        // YAML subsumes JSON, so a JSON-bodied rc file still parses
        match parse(ConfigFormat::Yaml, r#"{ "*": "mytask" }"#) {
            Parsed::Document(value) => assert_eq!(value["*"], "mytask"),
            other => panic!("expected document, got {:?}", other),
        }
    }

    #[test]
    fn invalid_yaml_is_unusable() {
        assert!(matches!(
            parse(ConfigFormat::Yaml, "{ invalid"),
            Parsed::Unusable
        ));
    }

    #[test]
    fn empty_yaml_document_is_null_candidate() {
        // An empty document parses to null; normalization rejects it later,
        // which renders the file found-but-invalid rather than not-found.
        assert!(matches!(
            parse(ConfigFormat::Yaml, ""),
            Parsed::Document(Value::Null)
        ));
    }

    #[test]
    fn invalid_rc_json_is_absent() {
        assert!(matches!(parse(ConfigFormat::Json, "{"), Parsed::Absent));
    }

    #[test]
    fn invalid_manifest_is_unusable() {
        assert!(matches!(
            parse(ConfigFormat::PackageJson, "{"),
            Parsed::Unusable
        ));
        assert!(matches!(
            parse(ConfigFormat::PackageYaml, "{"),
            Parsed::Unusable
        ));
    }

    #[test]
    fn manifest_without_key_is_absent() {
        assert!(matches!(
            parse(ConfigFormat::PackageJson, r#"{ "name": "pkg" }"#),
            Parsed::Absent
        ));
    }

    #[test]
    fn manifest_key_is_extracted() {
        let content = r#"{ "name": "pkg", "stagehand": { "*": "mytask" } }"#;
        match parse(ConfigFormat::PackageJson, content) {
            Parsed::Document(value) => assert_eq!(value["*"], "mytask"),
            other => panic!("expected document, got {:?}", other),
        }
    }
}
