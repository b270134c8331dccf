use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::domain::model::{ComponentGroup, PortEntry};
use crate::utils::error::Result;

pub const COMPOSE_VERSION: &str = "3.8";
pub const RESTART_POLICY: &str = "unless-stopped";

#[derive(Debug, Serialize)]
struct ComposeFile {
    version: &'static str,
    // serde_yaml::Mapping keeps insertion order, so services follow the registry.
    services: Mapping,
    networks: Mapping,
    volumes: Mapping,
}

#[derive(Debug, Serialize)]
struct ComposeService {
    image: String,
    container_name: String,
    ports: Vec<String>,
    environment: Vec<String>,
    healthcheck: HealthCheck,
    restart: &'static str,
    networks: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthCheck {
    test: Vec<String>,
    interval: &'static str,
    timeout: &'static str,
    retries: u32,
}

#[derive(Debug, Serialize)]
struct Driver {
    driver: &'static str,
}

/// Compose service key for an entry: dashes are not valid in every consumer.
pub fn service_key(entry: &PortEntry) -> String {
    entry.service.replace('-', "_")
}

/// Renders the docker-compose document for one component group.
///
/// Every entry gets the same HTTP health-check template, tcp entries included.
pub fn render_descriptor(group: &ComponentGroup) -> Result<String> {
    let component = group.component;

    let mut services = Mapping::new();
    for entry in &group.ports {
        let service = ComposeService {
            image: component.image(),
            container_name: entry.container_name().to_string(),
            ports: vec![format!("{}:{}", entry.port, entry.port)],
            environment: vec![
                format!("PORT={}", entry.port),
                format!("COMPONENT={}", component),
                format!("SERVICE={}", entry.service),
            ],
            healthcheck: HealthCheck {
                test: vec![
                    "CMD".to_string(),
                    "curl".to_string(),
                    "-f".to_string(),
                    entry.health_check_url(),
                ],
                interval: "30s",
                timeout: "10s",
                retries: 3,
            },
            restart: RESTART_POLICY,
            networks: vec![component.network_name()],
        };
        services.insert(Value::String(service_key(entry)), serde_yaml::to_value(service)?);
    }

    let mut networks = Mapping::new();
    networks.insert(
        Value::String(component.network_name()),
        serde_yaml::to_value(Driver { driver: "bridge" })?,
    );

    let mut volumes = Mapping::new();
    volumes.insert(
        Value::String(component.volume_name()),
        serde_yaml::to_value(Driver { driver: "local" })?,
    );

    let document = ComposeFile {
        version: COMPOSE_VERSION,
        services,
        networks,
        volumes,
    };
    Ok(serde_yaml::to_string(&document)?)
}
