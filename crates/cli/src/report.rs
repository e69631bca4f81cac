use anyhow::{Context, Result};
use flagset::{FlagKind, FlagSet, FlagSpec, ParseMode};
use serde::Serialize;
use serde_json::{Value, json};

use crate::declaration::{Declaration, FlagDefault};

/// Outcome of parsing one argument vector against a declaration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub program: String,
    pub flags: Vec<FlagReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasReport>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagReport {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub parsed: bool,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AliasReport {
    pub long: String,
    pub target: String,
}

// Owned storage the FlagSet binds to, one per declared flag.
enum Storage {
    Integer(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
    Boolean(bool),
}

impl From<&FlagDefault> for Storage {
    fn from(default: &FlagDefault) -> Self {
        match default {
            FlagDefault::Integer { default } => Self::Integer(*default),
            FlagDefault::Float { default } => Self::Float(*default),
            FlagDefault::String { default } => Self::String(default.clone()),
            FlagDefault::StringList { default } => Self::StringList(default.clone()),
            FlagDefault::Boolean { default } => Self::Boolean(*default),
        }
    }
}

/// Register every declared flag and alias, parse `args`, and describe the
/// result.
///
/// In [`ParseMode::Diagnostic`] any argument error fails the whole run.
pub fn run(
    decl: &Declaration,
    program: &str,
    args: &[String],
    mode: ParseMode,
) -> Result<ParseReport> {
    let mut storage: Vec<Storage> = decl.flags.iter().map(|f| Storage::from(&f.default)).collect();
    let argv = std::iter::once(program.to_string()).chain(args.iter().cloned());
    let mut set = FlagSet::new(argv);

    for (flag, slot) in decl.flags.iter().zip(storage.iter_mut()) {
        let name = flag.name.as_str();
        let description = flag.description.as_str();
        match slot {
            Storage::Integer(v) => {
                let default = *v;
                set.integer(v, name, description, default);
            }
            Storage::Float(v) => {
                let default = *v;
                set.float(v, name, description, default);
            }
            Storage::String(v) => {
                let default = v.clone();
                set.string(v, name, description, default);
            }
            Storage::StringList(v) => {
                let default = v.clone();
                set.string_list(v, name, description, default);
            }
            Storage::Boolean(v) => {
                let default = *v;
                set.boolean(v, name, description, default);
            }
        }
    }
    for alias in &decl.aliases {
        set.alias(&alias.short, alias.long.as_str());
    }

    tracing::debug!(
        flags = decl.flags.len(),
        aliases = decl.aliases.len(),
        args = args.len(),
        "registered declaration"
    );

    let errors = match mode {
        ParseMode::Diagnostic => {
            set.parse(mode).context("argument vector did not parse")?;
            Vec::new()
        }
        ParseMode::Lenient => set.scan().iter().map(ToString::to_string).collect(),
    };

    let mut aliases: Vec<AliasReport> = set
        .aliases()
        .map(|(long, target)| AliasReport {
            long: long.to_string(),
            target: target.to_string(),
        })
        .collect();
    aliases.sort_by(|a, b| a.long.cmp(&b.long));

    Ok(ParseReport {
        program: program.to_string(),
        flags: set.flags().map(flag_report).collect(),
        aliases,
        errors,
    })
}

fn flag_report(spec: &FlagSpec<'_>) -> FlagReport {
    let value = match spec.kind() {
        FlagKind::Integer => json!(spec.value::<i64>()),
        FlagKind::Float => json!(spec.value::<f64>()),
        FlagKind::String => json!(spec.value::<String>()),
        FlagKind::StringList => json!(spec.value::<Vec<String>>()),
        FlagKind::Boolean => json!(spec.value::<bool>()),
    };
    FlagReport {
        name: spec.name().to_string(),
        kind: spec.kind().to_string(),
        description: spec.description().to_string(),
        parsed: spec.is_parsed(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::sample_declaration;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn flag<'r>(report: &'r ParseReport, name: &str) -> &'r FlagReport {
        report
            .flags
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no flag {name} in report"))
    }

    #[test]
    fn lenient_run_reports_values_and_errors() {
        let decl = sample_declaration();
        let argv = args(&["--count", "4", "--tags", "a", "b", "-vx", "--bogus"]);
        let report = run(&decl, "example", &argv, ParseMode::Lenient).unwrap();

        assert_eq!(report.program, "example");
        assert_eq!(flag(&report, "n").value, json!(4));
        assert!(flag(&report, "n").parsed);
        assert_eq!(flag(&report, "tags").value, json!(["a", "b"]));
        assert_eq!(flag(&report, "v").value, json!(true));
        assert_eq!(flag(&report, "ratio").value, json!(0.5));
        assert!(!flag(&report, "ratio").parsed);
        assert_eq!(flag(&report, "output").kind, "string");
        assert_eq!(
            report.errors,
            vec!["x is not an option.", "--bogus is not an argument."]
        );
    }

    #[test]
    fn flags_follow_declaration_order() {
        let decl = sample_declaration();
        let report = run(&decl, "example", &[], ParseMode::Lenient).unwrap();
        let names: Vec<&str> = report.flags.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["n", "ratio", "output", "tags", "v"]);
        let longs: Vec<&str> = report.aliases.iter().map(|a| a.long.as_str()).collect();
        assert_eq!(longs, vec!["count", "verbose"]);
    }

    #[test]
    fn diagnostic_run_fails_on_errors() {
        let decl = sample_declaration();
        let err = run(&decl, "example", &args(&["--bogus"]), ParseMode::Diagnostic).unwrap_err();
        assert!(format!("{err:#}").contains("--bogus is not an argument."));

        let ok = run(&decl, "example", &args(&["-n", "2"]), ParseMode::Diagnostic).unwrap();
        assert!(ok.errors.is_empty());
        assert_eq!(flag(&ok, "n").value, json!(2));
    }
}
