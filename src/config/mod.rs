pub mod toml_config;

use crate::adapters::probe::DEFAULT_BIND_HOST;
use crate::core::export::PORT_TABLE_FILE;
use crate::core::generator::SUPPORTED_FORMATS;
use crate::core::report::REPORT_FILE;
use crate::core::ConfigProvider;
use crate::domain::model::{Component, RegistrySettings, DEFAULT_FRONTEND_PROJECTS};
use crate::utils::error::{PortMapError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_output_formats, validate_path,
    validate_range, validate_url, Validate,
};
use std::collections::HashMap;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "compose-portmap"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Assign service ports, detect local conflicts and generate deployment descriptors")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "./deploy"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = REPORT_FILE))]
    pub report_file: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_BIND_HOST, help = "Address used for bind probes"))]
    pub host: String,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_FRONTEND_PROJECTS))]
    pub frontend_projects: u16,

    #[cfg_attr(feature = "cli", arg(long, help = "Do not probe local ports; only registry duplicates are reported"))]
    pub skip_scan: bool,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_value = "json"))]
    pub formats: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Also pack every generated file into this zip archive"))]
    pub bundle: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Fail when a port lies outside its component's reserved range"))]
    pub strict_ranges: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value = "compact"))]
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_path: "./deploy".to_string(),
            report_file: REPORT_FILE.to_string(),
            host: DEFAULT_BIND_HOST.to_string(),
            frontend_projects: DEFAULT_FRONTEND_PROJECTS,
            skip_scan: false,
            formats: vec!["json".to_string()],
            bundle: None,
            strict_ranges: false,
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_file(&self) -> &str {
        &self.report_file
    }

    fn bind_host(&self) -> &str {
        &self.host
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_file(&self) -> Option<&str> {
        self.bundle.as_deref()
    }

    fn skip_scan(&self) -> bool {
        self.skip_scan
    }

    fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            frontend_project_count: self.frontend_projects,
            strict_ranges: self.strict_ranges,
            ..RegistrySettings::default()
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_path("output_path", config.output_path())?;
    validate_file_name("report_file", config.report_file())?;
    validate_non_empty_string("host", config.bind_host())?;
    validate_output_formats("formats", config.output_formats(), &SUPPORTED_FORMATS)?;

    if let Some(bundle) = config.bundle_file() {
        validate_file_name("bundle", bundle)?;
    }

    let settings = config.registry_settings();
    let frontend = Component::FrontendProject.reserved_range();
    validate_range(
        "frontend_projects",
        settings.frontend_project_count,
        0,
        frontend.end - frontend.start,
    )?;

    for (component, overrides) in &settings.group_overrides {
        if let Some(file) = &overrides.descriptor_file {
            validate_file_name(&format!("groups.{}.descriptor_file", component), file)?;
        }
        if let Some(url) = &overrides.health_check_url {
            validate_url(&format!("groups.{}.health_check_url", component), url)?;
        }
    }

    for extra in &settings.extra_services {
        validate_non_empty_string("extra_services.service", &extra.service)?;
        validate_range("extra_services.port", extra.port, 1, u16::MAX)?;
        if let Some(url) = &extra.health_check {
            validate_url("extra_services.health_check", url)?;
        }
    }

    check_output_names(config, &settings)
}

/// Every generated file lands in the same directory, so no two outputs may
/// share a name.
fn check_output_names<C: ConfigProvider>(config: &C, settings: &RegistrySettings) -> Result<()> {
    let mut outputs: Vec<(String, String)> = Component::ALL
        .iter()
        .map(|component| {
            let file = settings
                .group_overrides
                .iter()
                .find(|(c, _)| c == component)
                .and_then(|(_, overrides)| overrides.descriptor_file.clone())
                .unwrap_or_else(|| component.default_descriptor_file());
            (format!("groups.{}.descriptor_file", component), file)
        })
        .collect();

    outputs.push(("report_file".to_string(), config.report_file().to_string()));
    if config.output_formats().iter().any(|f| f == "csv") {
        outputs.push(("formats".to_string(), PORT_TABLE_FILE.to_string()));
    }
    if let Some(bundle) = config.bundle_file() {
        outputs.push(("bundle".to_string(), bundle.to_string()));
    }

    let mut claimed: HashMap<&str, &str> = HashMap::new();
    for (field, file) in &outputs {
        if let Some(first) = claimed.insert(file.as_str(), field.as_str()) {
            return Err(PortMapError::InvalidConfigValueError {
                field: field.clone(),
                value: file.clone(),
                reason: format!("Output file name is already used by {}", first),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cli_config_is_valid() {
        assert!(CliConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let config = CliConfig {
            formats: vec!["xml".to_string()],
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_frontend_overflow() {
        let config = CliConfig {
            frontend_projects: 100,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bundle_with_directory() {
        let config = CliConfig {
            bundle: Some("out/bundle.zip".to_string()),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bundle_named_like_report() {
        let config = CliConfig {
            bundle: Some(REPORT_FILE.to_string()),
            ..CliConfig::default()
        };

        match config.validate().unwrap_err() {
            PortMapError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "bundle");
                assert_eq!(value, REPORT_FILE);
            }
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_report_named_like_port_table() {
        let config = CliConfig {
            report_file: PORT_TABLE_FILE.to_string(),
            formats: vec!["json".to_string(), "csv".to_string()],
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());

        let json_only = CliConfig {
            report_file: PORT_TABLE_FILE.to_string(),
            ..CliConfig::default()
        };
        assert!(json_only.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parses_flags() {
        let config = CliConfig::parse_from([
            "compose-portmap",
            "--output-path",
            "/tmp/deploy",
            "--frontend-projects",
            "4",
            "--formats",
            "json,csv",
            "--skip-scan",
        ]);

        assert_eq!(config.output_path, "/tmp/deploy");
        assert_eq!(config.registry_settings().frontend_project_count, 4);
        assert_eq!(config.formats, vec!["json", "csv"]);
        assert!(config.skip_scan);
        assert_eq!(config.report_file, REPORT_FILE);
    }
}
