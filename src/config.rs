use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::schema::Schema;

/// Delimited-text options shared by import and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator; must be a single ASCII character.
    pub delimiter: char,
    /// Whether the first line holds column names.
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Returns the delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> DataResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DataError::Config(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}

/// Import settings read from a TOML file.
///
/// When `schema` is present, files are decoded against it directly;
/// otherwise the schema is inferred from the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub csv: CsvOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl ImportConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: ImportConfig =
            toml::from_str(&content).map_err(|e| DataError::Config(e.to_string()))?;
        config.csv.delimiter_byte()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DataResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| DataError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{Kind, Role, Variable};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_options_default() {
        let options = CsvOptions::default();
        assert_eq!(options.delimiter, ',');
        assert!(options.has_header);
        assert_eq!(options.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let options = CsvOptions {
            delimiter: '§',
            has_header: true,
        };
        assert!(matches!(options.delimiter_byte(), Err(DataError::Config(_))));
    }

    #[test]
    fn test_config_load_with_schema() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        write!(
            temp_file,
            r#"
[csv]
delimiter = ";"

[[schema]]
name = "height"
kind = "quantitative"
width = 8
offset = 99

[[schema]]
name = "species"
role = "response"
kind = "categorical"
width = 12
"#
        )
        .expect("Failed to write config");

        let config = ImportConfig::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(config.csv.delimiter, ';');
        assert!(config.csv.has_header);

        let schema = config.schema.expect("schema should be present");
        assert_eq!(schema.len(), 2);
        let height = schema.lookup("height").unwrap();
        assert_eq!(height.offset(), 0);
        assert_eq!(height.role(), Role::Explanatory);
        let species = schema.lookup("species").unwrap();
        assert_eq!(species.kind(), Kind::Categorical);
        assert_eq!(species.role(), Role::Response);
        assert_eq!(species.offset(), 8);
    }

    #[test]
    fn test_config_rejects_duplicate_names() {
        let content = r#"
[[schema]]
name = "a"
kind = "quantitative"
width = 8

[[schema]]
name = "a"
kind = "categorical"
width = 4
"#;
        let result: Result<ImportConfig, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let config = ImportConfig {
            csv: CsvOptions {
                delimiter: '\t',
                has_header: false,
            },
            schema: Some(
                Schema::new(vec![
                    Variable::quantitative::<f64>("x"),
                    Variable::categorical("label", 6),
                ])
                .unwrap(),
            ),
        };
        config.save(temp_file.path()).expect("Failed to save config");

        let loaded = ImportConfig::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(loaded, config);
    }
}
