pub mod cli;
pub mod toml_config;

pub use cli::CliArgs;
pub use toml_config::FileConfig;

use crate::domain::model::GenerationConfig;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RESULTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_results: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub api_key: String,
    pub api_url: Option<String>,
    pub base_url: String,
    pub model: String,
    pub fallback_models: Vec<String>,
    pub probe_models: bool,
    pub generation: GenerationConfig,
    pub timeout: Duration,
}

impl GeneratorSettings {
    /// Primary model followed by the fallbacks, without duplicates, in order.
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::with_capacity(1 + self.fallback_models.len());
        for model in std::iter::once(&self.model).chain(&self.fallback_models) {
            let model = model.trim();
            if !model.is_empty() && !models.iter().any(|m| m == model) {
                models.push(model.to_string());
            }
        }
        models
    }

    /// Key shortened for display in diagnostics.
    pub fn api_key_preview(&self) -> String {
        let shown: String = self.api_key.chars().take(10).collect();
        format!("{}...", shown)
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Loads the optional `--config` file and merges it under the CLI/env values.
    pub fn load(cli: &CliArgs) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::info!("Loading configuration file {}", path.display());
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };
        let settings = Self::resolve(cli, file)?;
        settings.validate()?;
        Ok(settings)
    }

    /// CLI/env values win over the file, the file wins over defaults.
    pub fn resolve(cli: &CliArgs, file: FileConfig) -> Result<Self> {
        let FileConfig {
            server: file_server,
            generator: file_generator,
        } = file;

        let api_key = cli.api_key.clone().or(file_generator.api_key);
        let api_key = validation::validate_required_field("generator.api_key", &api_key)?.clone();

        let fallback_models = if cli.fallback_models.is_empty() {
            file_generator.fallback_models.unwrap_or_default()
        } else {
            cli.fallback_models.clone()
        };

        let defaults = GenerationConfig::default();

        Ok(Self {
            server: ServerSettings {
                host: cli
                    .host
                    .clone()
                    .or(file_server.host)
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
                max_results: cli
                    .max_results
                    .or(file_server.max_results)
                    .unwrap_or(DEFAULT_MAX_RESULTS),
            },
            generator: GeneratorSettings {
                api_key,
                api_url: cli.api_url.clone().or(file_generator.api_url),
                base_url: cli
                    .base_url
                    .clone()
                    .or(file_generator.base_url)
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: cli
                    .model
                    .clone()
                    .or(file_generator.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                fallback_models,
                probe_models: cli.probe_models || file_generator.probe_models.unwrap_or(false),
                generation: GenerationConfig {
                    temperature: cli
                        .temperature
                        .or(file_generator.temperature)
                        .unwrap_or(defaults.temperature),
                    max_output_tokens: cli
                        .max_output_tokens
                        .or(file_generator.max_output_tokens)
                        .unwrap_or(defaults.max_output_tokens),
                },
                timeout: Duration::from_secs(
                    cli.timeout_secs
                        .or(file_generator.timeout_seconds)
                        .unwrap_or(DEFAULT_TIMEOUT_SECS),
                ),
            },
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.generator.validate()
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_positive_number("server.max_results", self.max_results as u64, 1)
    }
}

impl Validate for GeneratorSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("generator.api_key", &self.api_key)?;
        validation::validate_url("generator.base_url", &self.base_url)?;
        if let Some(api_url) = &self.api_url {
            validation::validate_url("generator.api_url", api_url)?;
        }
        validation::validate_non_empty_string("generator.model", &self.model)?;
        validation::validate_range(
            "generator.temperature",
            self.generation.temperature,
            0.0,
            2.0,
        )?;
        validation::validate_positive_number(
            "generator.max_output_tokens",
            self.generation.max_output_tokens as u64,
            1,
        )?;
        validation::validate_positive_number(
            "generator.timeout_seconds",
            self.timeout.as_secs(),
            1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::{GeneratorSection, ServerSection};
    use crate::utils::error::CheckError;

    fn cli_with_key() -> CliArgs {
        CliArgs {
            api_key: Some("cli-key-123456789".to_string()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults_apply_when_nothing_else_is_set() {
        let settings = Settings::resolve(&cli_with_key(), FileConfig::default()).unwrap();

        assert_eq!(settings.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.server.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(settings.generator.model, DEFAULT_MODEL);
        assert_eq!(settings.generator.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.generator.timeout, Duration::from_secs(30));
        assert_eq!(settings.generator.generation, GenerationConfig::default());
        assert!(settings.generator.api_url.is_none());
        assert!(!settings.generator.probe_models);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_startup_error() {
        let err = Settings::resolve(&CliArgs::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, CheckError::MissingConfigError { ref field } if field == "generator.api_key"));
    }

    #[test]
    fn test_cli_overrides_file_and_file_overrides_defaults() {
        let cli = CliArgs {
            model: Some("gemini-1.5-pro".to_string()),
            port: Some(9100),
            ..cli_with_key()
        };
        let file = FileConfig {
            server: ServerSection {
                host: Some("127.0.0.1".to_string()),
                port: Some(9000),
                max_results: None,
            },
            generator: GeneratorSection {
                api_key: Some("file-key".to_string()),
                model: Some("gemini-1.5-flash".to_string()),
                fallback_models: Some(vec!["gemini-pro".to_string()]),
                timeout_seconds: Some(5),
                ..GeneratorSection::default()
            },
        };

        let settings = Settings::resolve(&cli, file).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.generator.api_key, "cli-key-123456789");
        assert_eq!(settings.generator.model, "gemini-1.5-pro");
        assert_eq!(settings.generator.fallback_models, vec!["gemini-pro"]);
        assert_eq!(settings.generator.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_candidate_models_are_ordered_and_deduplicated() {
        let cli = CliArgs {
            model: Some("gemini-2.0-flash".to_string()),
            fallback_models: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-2.0-flash".to_string(),
                " ".to_string(),
                "gemini-pro".to_string(),
            ],
            ..cli_with_key()
        };
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();

        assert_eq!(
            settings.generator.candidate_models(),
            vec!["gemini-2.0-flash", "gemini-1.5-flash", "gemini-pro"]
        );
    }

    #[test]
    fn test_api_key_preview() {
        let settings = Settings::resolve(&cli_with_key(), FileConfig::default()).unwrap();
        assert_eq!(settings.generator.api_key_preview(), "cli-key-12...");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cli = CliArgs {
            temperature: Some(3.0),
            ..cli_with_key()
        };
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();
        assert!(settings.validate().is_err());

        let cli = CliArgs {
            api_url: Some("not a url".to_string()),
            ..cli_with_key()
        };
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();
        assert!(settings.validate().is_err());

        let cli = CliArgs {
            timeout_secs: Some(0),
            ..cli_with_key()
        };
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();
        assert!(settings.validate().is_err());
    }
}
