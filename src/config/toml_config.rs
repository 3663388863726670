use crate::utils::error::{CheckError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorSection {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub fallback_models: Option<Vec<String>>,
    pub probe_models: Option<bool>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
max_results = 50

[generator]
api_key = "test-key"
model = "gemini-1.5-flash"
fallback_models = ["gemini-1.5-pro", "gemini-pro"]
probe_models = true
temperature = 0.2
max_output_tokens = 512
timeout_seconds = 10
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.server.max_results, Some(50));
        assert_eq!(config.generator.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(
            config.generator.fallback_models,
            Some(vec!["gemini-1.5-pro".to_string(), "gemini-pro".to_string()])
        );
        assert_eq!(config.generator.probe_models, Some(true));
        assert_eq!(config.generator.timeout_seconds, Some(10));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.server.port.is_none());
        assert!(config.generator.api_key.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BRANDCHECK_TEST_TOML_KEY", "key-from-env");

        let toml_content = r#"
[generator]
api_key = "${BRANDCHECK_TEST_TOML_KEY}"
model = "${BRANDCHECK_TEST_TOML_UNSET}"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.generator.api_key.as_deref(), Some("key-from-env"));
        assert_eq!(
            config.generator.model.as_deref(),
            Some("${BRANDCHECK_TEST_TOML_UNSET}")
        );

        std::env::remove_var("BRANDCHECK_TEST_TOML_KEY");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = FileConfig::from_toml_str("[generator\nmodel = 1").unwrap_err();
        assert!(matches!(err, CheckError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[generator]\nmodel = \"gemini-2.0-flash-exp\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.generator.model.as_deref(), Some("gemini-2.0-flash-exp"));
    }
}
