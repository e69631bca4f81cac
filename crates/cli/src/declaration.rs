use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DECLARATION_NAME: &str = "flags.json";
pub const DECLARATION_SCHEMA_VERSION: u32 = 1;

/// A JSON description of the flags a program accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Program name placed at argv[0] (defaults to `flagcheck`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(default)]
    pub flags: Vec<FlagDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDecl {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(flatten)]
    pub default: FlagDefault,
}

/// Flag type plus its default. A missing `default` is the type's zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FlagDefault {
    Integer {
        #[serde(default)]
        default: i64,
    },
    Float {
        #[serde(default)]
        default: f64,
    },
    String {
        #[serde(default)]
        default: String,
    },
    StringList {
        #[serde(default)]
        default: Vec<String>,
    },
    Boolean {
        #[serde(default)]
        default: bool,
    },
}

/// `--long` resolves to the flag named `short`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub long: String,
    pub short: String,
}

pub fn load_declaration(path: &Path) -> Result<Declaration> {
    if !path.exists() {
        bail!("flag declaration not found: {}", path.display());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read flag declaration: {}", path.display()))?;
    let decl: Declaration = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse flag declaration JSON: {}", path.display()))?;

    if let Some(version) = decl.schema_version {
        if version > DECLARATION_SCHEMA_VERSION {
            bail!(
                "unsupported schemaVersion {version} in {} (expected {DECLARATION_SCHEMA_VERSION})",
                path.display()
            );
        }
    }

    Ok(decl)
}

pub fn sample_declaration() -> Declaration {
    Declaration {
        schema_version: Some(DECLARATION_SCHEMA_VERSION),
        program: Some("example".to_string()),
        flags: vec![
            FlagDecl {
                name: "n".to_string(),
                description: "Number of iterations".to_string(),
                default: FlagDefault::Integer { default: 1 },
            },
            FlagDecl {
                name: "ratio".to_string(),
                description: "Sampling ratio".to_string(),
                default: FlagDefault::Float { default: 0.5 },
            },
            FlagDecl {
                name: "output".to_string(),
                description: "Output path".to_string(),
                default: FlagDefault::String {
                    default: "-".to_string(),
                },
            },
            FlagDecl {
                name: "tags".to_string(),
                description: "Labels to attach".to_string(),
                default: FlagDefault::StringList { default: Vec::new() },
            },
            FlagDecl {
                name: "v".to_string(),
                description: "Verbose output".to_string(),
                default: FlagDefault::Boolean { default: false },
            },
        ],
        aliases: vec![
            AliasDecl {
                long: "count".to_string(),
                short: "n".to_string(),
            },
            AliasDecl {
                long: "verbose".to_string(),
                short: "v".to_string(),
            },
        ],
    }
}

pub fn write_sample_declaration(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_DECLARATION_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let mut out = serde_json::to_string_pretty(&sample_declaration())
        .context("failed to serialize flag declaration")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("flagcheck-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn declaration_deserializes_camel_case() {
        let json = r#"{
  "schemaVersion": 1,
  "program": "demo",
  "flags": [
    { "name": "n", "type": "integer", "default": 3, "description": "count" },
    { "name": "r", "type": "float", "default": 2 },
    { "name": "tags", "type": "string-list", "default": ["a"] },
    { "name": "v", "type": "boolean" }
  ],
  "aliases": [ { "long": "count", "short": "n" } ]
}"#;
        let d: Declaration = serde_json::from_str(json).unwrap();
        assert_eq!(d.schema_version, Some(1));
        assert_eq!(d.program.as_deref(), Some("demo"));
        assert_eq!(d.flags.len(), 4);
        assert_eq!(d.flags[0].description, "count");
        assert_eq!(d.flags[0].default, FlagDefault::Integer { default: 3 });
        assert_eq!(d.flags[1].default, FlagDefault::Float { default: 2.0 });
        assert_eq!(
            d.flags[2].default,
            FlagDefault::StringList {
                default: vec!["a".to_string()]
            }
        );
        assert_eq!(d.flags[3].default, FlagDefault::Boolean { default: false });
        assert_eq!(
            d.aliases,
            vec![AliasDecl {
                long: "count".to_string(),
                short: "n".to_string()
            }]
        );
    }

    #[test]
    fn unknown_flag_type_is_rejected() {
        let json = r#"{ "flags": [ { "name": "x", "type": "duration" } ] }"#;
        assert!(serde_json::from_str::<Declaration>(json).is_err());
    }

    #[test]
    fn sample_declaration_round_trips_through_disk() {
        let dir = make_temp_dir("sample");
        let dest = write_sample_declaration(&dir, false).unwrap();
        let loaded = load_declaration(&dest).unwrap();
        assert_eq!(loaded.flags, sample_declaration().flags);
        assert_eq!(loaded.aliases, sample_declaration().aliases);

        let err = write_sample_declaration(&dir, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(write_sample_declaration(&dir, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let dir = make_temp_dir("schema");
        let path = dir.join(DEFAULT_DECLARATION_NAME);
        fs::write(&path, r#"{ "schemaVersion": 2, "flags": [] }"#).unwrap();
        let err = load_declaration(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported schemaVersion 2"));

        let _ = fs::remove_dir_all(&dir);
    }
}
