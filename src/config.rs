// src/config.rs
use crate::error::{AnnotateError, Result};
use crate::utils::common::is_dot_prefix;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub mod server;

/// Configuration for the change-driven annotation handler, resolved once per
/// process from a YAML file or from environment variables.
#[derive(Deserialize, Debug, Clone)]
pub struct HandlerConfig {
    /// Dot-delimited path of the field whose text gets analyzed.
    pub input_field: String,
    /// Dot-delimited path of the field the merged result is written to.
    pub output_field: String,
    /// Ordered list of enabled task names. Unknown names are tolerated and
    /// skipped at dispatch time.
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Allow-set of entity types to retain. Empty keeps every type.
    #[serde(default)]
    pub entity_types: Vec<String>,
    /// Whether entity types outside the allow-set are retained anyway.
    #[serde(default)]
    pub save_common_entities: bool,
    /// Warehouse mirroring; absent disables the mirror entirely.
    #[serde(default)]
    pub mirror: Option<MirrorConfig>,
}

/// Configuration for the analytics-warehouse mirror.
#[derive(Deserialize, Debug, Clone)]
pub struct MirrorConfig {
    pub dataset: String,
    #[serde(default)]
    pub table_prefix: String,
    /// Task set the mirror maintains. Independent of the annotation task
    /// set; empty means all supported tasks.
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl HandlerConfig {
    /// Loads and parses the handler configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<HandlerConfig> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnnotateError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: HandlerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolves the handler configuration from environment variables, the way
    /// an extension host delivers it. `DATASET_ID` being set enables the
    /// warehouse mirror.
    pub fn from_env() -> Result<HandlerConfig> {
        let input_field = require_env("INPUT_FIELD_PATH")?;
        let output_field = require_env("OUTPUT_FIELD_PATH")?;
        let tasks = split_csv(env::var("TASKS").unwrap_or_default());
        let entity_types = split_csv(env::var("ENTITY_TYPES").unwrap_or_default());
        let save_common_entities = match env::var("SAVE_COMMON_ENTITIES") {
            Ok(raw) => parse_bool("SAVE_COMMON_ENTITIES", &raw)?,
            Err(_) => false,
        };

        let mirror = match env::var("DATASET_ID") {
            Ok(dataset) => Some(MirrorConfig {
                dataset,
                table_prefix: env::var("TABLE_PREFIX").unwrap_or_default(),
                tasks: split_csv(env::var("MIRROR_TASKS").unwrap_or_default()),
            }),
            Err(_) => None,
        };

        Ok(HandlerConfig {
            input_field,
            output_field,
            tasks,
            entity_types,
            save_common_entities,
            mirror,
        })
    }

    /// Checks the field-path invariant: input and output paths must differ
    /// and neither may be a dot-segment ancestor of the other. A violation is
    /// a configuration error that suppresses all event processing.
    pub fn validate(&self) -> Result<()> {
        if self.input_field.is_empty() || self.output_field.is_empty() {
            return Err(AnnotateError::ConfigValidationError(
                "input_field and output_field must be non-empty".to_string(),
            ));
        }
        if self.input_field == self.output_field {
            return Err(AnnotateError::ConfigValidationError(format!(
                "input field '{}' and output field '{}' must not be the same",
                self.input_field, self.output_field
            )));
        }
        if is_dot_prefix(&self.input_field, &self.output_field)
            || is_dot_prefix(&self.output_field, &self.input_field)
        {
            return Err(AnnotateError::ConfigValidationError(format!(
                "input field '{}' and output field '{}' must not overlap as dot-path prefixes",
                self.input_field, self.output_field
            )));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| AnnotateError::ConfigError(format!("Missing environment variable {}", name)))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AnnotateError::ConfigError(format!(
            "Invalid boolean '{}' for {}",
            other, name
        ))),
    }
}

fn split_csv(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    macro_rules! assert_config_validation_error {
        ($result:expr, $expected_substring:expr) => {
            match $result {
                Err(AnnotateError::ConfigValidationError(msg)) => {
                    assert!(
                        msg.contains($expected_substring),
                        "Expected validation message containing '{}', got '{}'",
                        $expected_substring,
                        msg
                    );
                }
                other => panic!("Expected ConfigValidationError, got {:?}", other),
            }
        };
    }

    fn base_config() -> HandlerConfig {
        HandlerConfig {
            input_field: "text".to_string(),
            output_field: "nlp".to_string(),
            tasks: vec!["sentiment".to_string()],
            entity_types: vec![],
            save_common_entities: false,
            mirror: None,
        }
    }

    fn create_temp_config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp config");
        file
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_equal_fields_rejected() {
        let config = HandlerConfig {
            output_field: "text".to_string(),
            ..base_config()
        };
        assert_config_validation_error!(config.validate(), "must not be the same");
    }

    #[test]
    fn test_output_under_input_rejected() {
        let config = HandlerConfig {
            input_field: "text".to_string(),
            output_field: "text.nlp".to_string(),
            ..base_config()
        };
        assert_config_validation_error!(config.validate(), "dot-path prefixes");
    }

    #[test]
    fn test_input_under_output_rejected() {
        let config = HandlerConfig {
            input_field: "doc.nlp.text".to_string(),
            output_field: "doc.nlp".to_string(),
            ..base_config()
        };
        assert_config_validation_error!(config.validate(), "dot-path prefixes");
    }

    #[test]
    fn test_shared_ancestor_is_allowed() {
        let config = HandlerConfig {
            input_field: "doc.text".to_string(),
            output_field: "doc.nlp".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_similar_name_is_not_a_prefix() {
        let config = HandlerConfig {
            input_field: "text".to_string(),
            output_field: "textual".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let config = HandlerConfig {
            input_field: "".to_string(),
            ..base_config()
        };
        assert_config_validation_error!(config.validate(), "non-empty");
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml_content = r#"
input_field: text
output_field: nlp
tasks:
  - sentiment
  - entity
entity_types:
  - PERSON
  - LOCATION
save_common_entities: true
mirror:
  dataset: annotations
  table_prefix: "nlp_"
"#;
        let temp_file = create_temp_config_file(yaml_content);
        let config = HandlerConfig::from_yaml_file(temp_file.path()).unwrap();
        assert_eq!(config.input_field, "text");
        assert_eq!(config.output_field, "nlp");
        assert_eq!(config.tasks, vec!["sentiment", "entity"]);
        assert_eq!(config.entity_types, vec!["PERSON", "LOCATION"]);
        assert!(config.save_common_entities);
        let mirror = config.mirror.expect("mirror config");
        assert_eq!(mirror.dataset, "annotations");
        assert_eq!(mirror.table_prefix, "nlp_");
        assert!(mirror.tasks.is_empty());
    }

    #[test]
    fn test_load_from_yaml_minimal() {
        let yaml_content = r#"
input_field: body
output_field: annotations
"#;
        let temp_file = create_temp_config_file(yaml_content);
        let config = HandlerConfig::from_yaml_file(temp_file.path()).unwrap();
        assert!(config.tasks.is_empty());
        assert!(config.mirror.is_none());
        assert!(!config.save_common_entities);
    }

    #[test]
    fn test_load_from_yaml_invalid() {
        let temp_file = create_temp_config_file("input_field: [not, a, string]");
        let result = HandlerConfig::from_yaml_file(temp_file.path());
        assert!(matches!(result, Err(AnnotateError::ConfigError(_))));
    }

    #[test]
    fn test_split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv("sentiment, entity ,,classification".to_string()),
            vec!["sentiment", "entity", "classification"]
        );
        assert!(split_csv("".to_string()).is_empty());
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "FALSE").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
