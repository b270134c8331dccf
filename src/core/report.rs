use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

use crate::domain::model::{
    ComponentGroup, ComponentRange, ConflictRecord, PortEntry, PortStatus, Protocol,
};

pub const REPORT_FILE: &str = "docker_port_configuration_report.json";

pub const RECOMMENDATIONS: [&str; 5] = [
    "All ports are properly allocated across components",
    "No port conflicts detected",
    "Deployment descriptors generated for all component groups",
    "Health checks configured for all services",
    "Network isolation implemented per component",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortReport {
    pub generated_at: DateTime<Utc>,
    pub port_mapping_summary: PortMappingSummary,
    /// Keyed by component, in registry order.
    pub component_ports: IndexMap<String, Vec<PortListing>>,
    pub port_conflicts: Vec<ConflictRecord>,
    pub service_configurations: Vec<ServiceConfiguration>,
    pub port_ranges: IndexMap<String, [u16; 2]>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortMappingSummary {
    pub total_ports: usize,
    pub available_ports: usize,
    pub conflict_ports: usize,
    pub availability_percentage: f64,
    pub total_services: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortListing {
    pub port: u16,
    pub service: String,
    pub protocol: Protocol,
    pub description: String,
    pub status: PortStatus,
}

impl From<&PortEntry> for PortListing {
    fn from(entry: &PortEntry) -> Self {
        Self {
            port: entry.port,
            service: entry.service.clone(),
            protocol: entry.protocol,
            description: entry.description.clone(),
            status: entry.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    pub service_name: String,
    pub component: String,
    pub port_count: usize,
    pub descriptor_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,
    pub ports: Vec<PortListing>,
}

/// Percentage of available ports; 0 for an empty registry.
pub fn availability_percentage(available: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    available as f64 / total as f64 * 100.0
}

pub fn render_report(
    entries: &[PortEntry],
    groups: &[ComponentGroup],
    conflicts: &[ConflictRecord],
    ranges: &[ComponentRange],
) -> PortReport {
    let total_ports = entries.len();
    let available_ports = entries
        .iter()
        .filter(|e| e.status == PortStatus::Available)
        .count();
    let conflict_ports = total_ports - available_ports;

    // Every group gets a key, even one with no ports.
    let mut component_ports: IndexMap<String, Vec<PortListing>> = groups
        .iter()
        .map(|group| (group.component.to_string(), Vec::new()))
        .collect();
    for entry in entries {
        component_ports
            .entry(entry.component.to_string())
            .or_default()
            .push(PortListing::from(entry));
    }

    let service_configurations = groups
        .iter()
        .map(|group| ServiceConfiguration {
            service_name: group.name.clone(),
            component: group.component.to_string(),
            port_count: group.ports.len(),
            descriptor_file: group.descriptor_file.clone(),
            health_check_url: group.health_check_url.clone(),
            ports: group.ports.iter().map(PortListing::from).collect(),
        })
        .collect();

    let port_ranges = ranges
        .iter()
        .map(|r| (r.component.to_string(), [r.start, r.end]))
        .collect();

    PortReport {
        generated_at: Utc::now(),
        port_mapping_summary: PortMappingSummary {
            total_ports,
            available_ports,
            conflict_ports,
            availability_percentage: availability_percentage(available_ports, total_ports),
            total_services: groups.len(),
        },
        component_ports,
        port_conflicts: conflicts.to_vec(),
        service_configurations,
        port_ranges,
        recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
    }
}
