use crate::adapters::probe::DEFAULT_BIND_HOST;
use crate::config::validate_provider;
use crate::core::report::REPORT_FILE;
use crate::core::ConfigProvider;
use crate::domain::model::{
    Component, ExtraService, GroupOverride, RegistrySettings, DEFAULT_FRONTEND_PROJECTS,
};
use crate::utils::error::{PortMapError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Keyed by component name, e.g. `[groups.monitoring]`.
    #[serde(default)]
    pub groups: BTreeMap<String, GroupOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub bundle: Option<BundleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub skip: bool,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip: false,
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_frontend_projects")]
    pub frontend_projects: u16,
    #[serde(default)]
    pub strict_ranges: bool,
    #[serde(default)]
    pub extra_services: Vec<ExtraService>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            frontend_projects: DEFAULT_FRONTEND_PROJECTS,
            strict_ranges: false,
            extra_services: Vec::new(),
        }
    }
}

fn default_report_file() -> String {
    REPORT_FILE.to_string()
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_host() -> String {
    DEFAULT_BIND_HOST.to_string()
}

fn default_frontend_projects() -> u16 {
    DEFAULT_FRONTEND_PROJECTS
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PortMapError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, expanding `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortMapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortMapError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        for key in self.groups.keys() {
            key.parse::<Component>().map_err(|_| PortMapError::InvalidConfigValueError {
                field: "groups".to_string(),
                value: key.clone(),
                reason: "Unknown component group".to_string(),
            })?;
        }
        if let Some(bundle) = self.output.bundle.as_ref().filter(|b| b.enabled) {
            validate_required_field("output.bundle.filename", &bundle.filename)?;
        }
        validate_provider(self)
    }

    pub fn bundle_enabled(&self) -> bool {
        self.output.bundle.as_ref().map(|b| b.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn report_file(&self) -> &str {
        &self.output.report_file
    }

    fn bind_host(&self) -> &str {
        &self.scan.host
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn bundle_file(&self) -> Option<&str> {
        self.output
            .bundle
            .as_ref()
            .filter(|b| b.enabled)
            .and_then(|b| b.filename.as_deref())
    }

    fn skip_scan(&self) -> bool {
        self.scan.skip
    }

    fn registry_settings(&self) -> RegistrySettings {
        let group_overrides = self
            .groups
            .iter()
            .filter_map(|(key, overrides)| {
                key.parse::<Component>()
                    .ok()
                    .map(|component| (component, overrides.clone()))
            })
            .collect();

        RegistrySettings {
            frontend_project_count: self.registry.frontend_projects,
            strict_ranges: self.registry.strict_ranges,
            group_overrides,
            extra_services: self.registry.extra_services.clone(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
