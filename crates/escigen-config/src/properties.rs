use std::collections::BTreeMap;
use std::path::Path;

use toml::{Table, Value};

use crate::errors::{ConfigError, Result};

/// Flat string-keyed configuration map.
///
/// Loaded from TOML; nested tables are flattened into dotted keys so
/// `[generator.item] context.id = "ctx"` and `"generator.item.context.id" =
/// "ctx"` are equivalent. Scalar values are stored as strings, arrays are
/// joined with commas.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { values }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Table = toml::from_str(content)?;
        let mut values = BTreeMap::new();
        flatten_table("", &table, &mut values);
        Ok(Self { values })
    }

    /// Trimmed value for `key`; blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Value for `key` as stored, including blank values.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Apply a `key=value` override as given on the command line.
    pub fn apply_override(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidOverride(assignment.to_string()));
        }
        self.set(key, value.trim());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten_table(prefix: &str, table: &Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(inner) => flatten_table(&full_key, inner, out),
            other => {
                out.insert(full_key, scalar_to_string(other));
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        Value::Integer(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Boolean(value) => value.to_string(),
        Value::Datetime(value) => value.to_string(),
        Value::Array(values) => values
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Table(table) => table.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_tables_into_dotted_keys() {
        let props = Properties::from_toml_str(
            r#"
"generator.target.directory" = "/tmp/out"

[generator.item]
context.id = "escidoc:ctx"
random.num = 3
random.data = true
input.types = ["txt", "pdf"]
"#,
        )
        .unwrap();

        assert_eq!(props.get("generator.target.directory"), Some("/tmp/out"));
        assert_eq!(props.get("generator.item.context.id"), Some("escidoc:ctx"));
        assert_eq!(props.get("generator.item.random.num"), Some("3"));
        assert_eq!(props.get("generator.item.random.data"), Some("true"));
        assert_eq!(props.get("generator.item.input.types"), Some("txt,pdf"));
    }

    #[test]
    fn blank_values_are_absent_but_kept_raw() {
        let props = Properties::from_pairs([("generator.item.manifest.prefix", "  ")]);
        assert_eq!(props.get("generator.item.manifest.prefix"), None);
        assert_eq!(props.get_raw("generator.item.manifest.prefix"), Some("  "));
    }

    #[test]
    fn overrides_require_an_assignment() {
        let mut props = Properties::new();
        props
            .apply_override("generator.context.num = 4")
            .unwrap();
        assert_eq!(props.get("generator.context.num"), Some("4"));
        assert!(matches!(
            props.apply_override("generator.context.num"),
            Err(ConfigError::InvalidOverride(_))
        ));
        assert!(props.apply_override("=4").is_err());
    }
}
