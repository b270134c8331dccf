use anyhow::Result;
use compose_portmap::core::report::PortReport;
use compose_portmap::core::ConfigProvider;
use compose_portmap::domain::model::{PortState, Protocol};
use compose_portmap::utils::validation::Validate;
use compose_portmap::{LocalStorage, PortMapEngine, PortMapError, PortPipeline, TomlConfig};
use tempfile::TempDir;

fn all_free(_port: u16, _protocol: Protocol) -> compose_portmap::Result<PortState> {
    Ok(PortState::Free)
}

async fn load_config(temp_dir: &TempDir, body: &str) -> Result<TomlConfig> {
    let output_path = temp_dir.path().join("deploy");
    let normalized_path = output_path.to_str().unwrap().replace('\\', "/");

    let config_content = format!(
        r#"
[output]
path = "{}"
{}"#,
        normalized_path, body
    );

    let config_path = temp_dir.path().join("portmap.toml");
    tokio::fs::write(&config_path, config_content).await?;
    Ok(TomlConfig::from_file(&config_path)?)
}

#[tokio::test]
async fn test_toml_config_drives_full_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
report_file = "ports.json"
formats = ["json", "csv"]

[scan]
skip = true

[registry]
frontend_projects = 3

[[registry.extra_services]]
port = 5007
service = "clickhouse-analytics"
component = "database"
protocol = "tcp"
description = "ClickHouse Analytics"

[groups.monitoring]
descriptor_file = "docker-compose.monitoring.yml"
health_check_url = "http://localhost:9001/-/healthy"
"#,
    )
    .await?;
    config.validate()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    let summary = PortMapEngine::new(pipeline).run().await?;

    let deploy = temp_dir.path().join("deploy");
    assert!(deploy.join("docker-compose.monitoring.yml").exists());
    assert!(!deploy.join("monitoring.deploy.yml").exists());
    assert!(deploy.join("port_allocations.csv").exists());

    let report: PortReport = serde_json::from_slice(&std::fs::read(deploy.join("ports.json"))?)?;
    assert_eq!(report, summary.report);
    assert_eq!(report.port_mapping_summary.total_ports, 45 + 3 + 1);

    let database = report
        .service_configurations
        .iter()
        .find(|s| s.component == "database")
        .unwrap();
    assert_eq!(database.port_count, 7);
    assert_eq!(database.ports.last().unwrap().service, "clickhouse-analytics");

    let monitoring = report
        .service_configurations
        .iter()
        .find(|s| s.component == "monitoring")
        .unwrap();
    assert_eq!(
        monitoring.health_check_url.as_deref(),
        Some("http://localhost:9001/-/healthy")
    );

    let descriptor = std::fs::read_to_string(deploy.join("database.deploy.yml"))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&descriptor)?;
    assert_eq!(
        yaml["services"]["clickhouse_analytics"]["ports"][0].as_str(),
        Some("5007:5007")
    );

    Ok(())
}

#[tokio::test]
async fn test_duplicate_extra_service_port_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[[registry.extra_services]]
port = 5002
service = "second-cache"
component = "database"
protocol = "tcp"
"#,
    )
    .await?;
    config.validate()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    let err = PortMapEngine::new(pipeline).run().await.unwrap_err();

    match &err {
        PortMapError::InvalidRegistry { message } => {
            assert!(message.contains("5002"));
            assert!(message.contains("redis-cache"));
            assert!(message.contains("second-cache"));
        }
        other => panic!("expected InvalidRegistry, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(!temp_dir.path().join("deploy").exists());

    Ok(())
}

#[tokio::test]
async fn test_strict_ranges_reject_misplaced_service() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[registry]
strict_ranges = true

[[registry.extra_services]]
port = 7001
service = "stray-api"
component = "core-platform"
protocol = "http"
"#,
    )
    .await?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    let err = PortMapEngine::new(pipeline).preview().await.unwrap_err();

    assert!(matches!(err, PortMapError::InvalidRegistry { .. }));

    Ok(())
}

#[tokio::test]
async fn test_lenient_ranges_accept_misplaced_service() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[[registry.extra_services]]
port = 7001
service = "stray-api"
component = "core-platform"
protocol = "http"
"#,
    )
    .await?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    let rendered = PortMapEngine::new(pipeline).preview().await?;

    assert_eq!(rendered.report.port_mapping_summary.total_ports, 72);

    Ok(())
}

#[tokio::test]
async fn test_unknown_format_fails_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = load_config(&temp_dir, "").await?;
    config.output.formats = vec!["parquet".to_string()];

    let err = config.validate().unwrap_err();
    assert_eq!(err.exit_code(), 1);

    Ok(())
}

#[tokio::test]
async fn test_descriptor_override_cannot_reuse_another_group_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[groups.monitoring]
descriptor_file = "database.deploy.yml"
"#,
    )
    .await?;

    match config.validate().unwrap_err() {
        PortMapError::InvalidConfigValueError { field, value, reason } => {
            assert_eq!(field, "groups.monitoring.descriptor_file");
            assert_eq!(value, "database.deploy.yml");
            assert!(reason.contains("groups.database.descriptor_file"));
        }
        other => panic!("expected InvalidConfigValueError, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_report_file_cannot_reuse_descriptor_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(&temp_dir, "report_file = \"core-platform.deploy.yml\"\n").await?;

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        PortMapError::InvalidConfigValueError { ref field, .. } if field == "report_file"
    ));
    assert_eq!(err.exit_code(), 1);

    Ok(())
}

#[tokio::test]
async fn test_swapped_descriptor_names_are_accepted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[scan]
skip = true

[groups.database]
descriptor_file = "monitoring.deploy.yml"

[groups.monitoring]
descriptor_file = "database.deploy.yml"
"#,
    )
    .await?;
    config.validate()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    PortMapEngine::new(pipeline).run().await?;

    let deploy = temp_dir.path().join("deploy");
    let database = std::fs::read_to_string(deploy.join("monitoring.deploy.yml"))?;
    let monitoring = std::fs::read_to_string(deploy.join("database.deploy.yml"))?;
    assert!(database.contains("postgresql_main"));
    assert!(monitoring.contains("prometheus"));

    Ok(())
}

#[tokio::test]
async fn test_group_health_check_override_is_report_only() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(
        &temp_dir,
        r#"
[groups.monitoring]
health_check_url = "http://localhost:9001/-/healthy"
"#,
    )
    .await?;
    config.validate()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PortPipeline::new(storage, config, all_free);
    let rendered = PortMapEngine::new(pipeline).preview().await?;

    let monitoring = rendered
        .report
        .service_configurations
        .iter()
        .find(|s| s.component == "monitoring")
        .unwrap();
    assert_eq!(
        monitoring.health_check_url.as_deref(),
        Some("http://localhost:9001/-/healthy")
    );

    let descriptor = rendered
        .artifacts
        .iter()
        .find(|a| a.file_name == "monitoring.deploy.yml")
        .unwrap();
    let yaml: serde_yaml::Value = serde_yaml::from_slice(&descriptor.data)?;
    assert_eq!(
        yaml["services"]["grafana"]["healthcheck"]["test"][3].as_str(),
        Some("http://localhost:9002/health")
    );

    Ok(())
}
