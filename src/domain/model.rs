use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PortMapError;

/// Component groups known to the registry. Closed set: every entry belongs to
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Component {
    CorePlatform,
    FinancialSystem,
    FrontendIntegration,
    AgentGateway,
    FrontendProject,
    Database,
    ApiGateway,
    Monitoring,
}

impl Component {
    /// Declaration order, which is also the order groups are generated in.
    pub const ALL: [Component; 8] = [
        Component::CorePlatform,
        Component::FinancialSystem,
        Component::FrontendIntegration,
        Component::AgentGateway,
        Component::FrontendProject,
        Component::Database,
        Component::ApiGateway,
        Component::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::CorePlatform => "core-platform",
            Component::FinancialSystem => "financial-system",
            Component::FrontendIntegration => "frontend-integration",
            Component::AgentGateway => "agent-gateway",
            Component::FrontendProject => "frontend-project",
            Component::Database => "database",
            Component::ApiGateway => "api-gateway",
            Component::Monitoring => "monitoring",
        }
    }

    /// Documented reserved range. Not enforced unless strict ranges are on.
    pub fn reserved_range(&self) -> ComponentRange {
        let (start, end) = match self {
            Component::CorePlatform => (8000, 8099),
            Component::FinancialSystem => (8100, 8199),
            Component::FrontendIntegration => (8200, 8299),
            Component::AgentGateway => (8300, 8399),
            Component::FrontendProject => (3000, 3099),
            Component::Database => (5000, 5099),
            Component::ApiGateway => (4000, 4099),
            Component::Monitoring => (9000, 9099),
        };
        ComponentRange {
            component: *self,
            start,
            end,
        }
    }

    pub fn image(&self) -> String {
        format!("{}:latest", self.as_str())
    }

    pub fn network_name(&self) -> String {
        format!("{}_network", self.as_str())
    }

    pub fn volume_name(&self) -> String {
        format!("{}_data", self.as_str())
    }

    pub fn default_descriptor_file(&self) -> String {
        format!("{}.deploy.yml", self.as_str())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = PortMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PortMapError::InvalidConfigValueError {
                field: "component".to_string(),
                value: s.to_string(),
                reason: "Unknown component".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    #[default]
    Available,
    Conflict,
}

impl PortStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortStatus::Available => "available",
            PortStatus::Conflict => "conflict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    pub port: u16,
    pub service: String,
    pub component: Component,
    pub protocol: Protocol,
    pub description: String,
    #[serde(default)]
    pub status: PortStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<String>,
}

impl PortEntry {
    pub fn new(
        port: u16,
        service: impl Into<String>,
        component: Component,
        protocol: Protocol,
        description: impl Into<String>,
    ) -> Self {
        Self {
            port,
            service: service.into(),
            component,
            protocol,
            description: description.into(),
            status: PortStatus::Available,
            container: None,
            health_check: None,
        }
    }

    pub fn with_status(&self, status: PortStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn container_name(&self) -> &str {
        self.container.as_deref().unwrap_or(&self.service)
    }

    pub fn health_check_url(&self) -> String {
        self.health_check
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/health", self.port))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGroup {
    pub name: String,
    pub component: Component,
    pub ports: Vec<PortEntry>,
    pub descriptor_file: String,
    pub health_check_url: Option<String>,
}

impl ComponentGroup {
    pub fn new(component: Component, ports: Vec<PortEntry>) -> Self {
        Self {
            name: component.as_str().to_string(),
            component,
            ports,
            descriptor_file: component.default_descriptor_file(),
            health_check_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRange {
    pub component: Component,
    pub start: u16,
    pub end: u16,
}

impl ComponentRange {
    pub fn contains(&self, port: u16) -> bool {
        port >= self.start && port <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    PortAlreadyUsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub port: u16,
    pub services: [String; 2],
    pub conflict_type: ConflictType,
}

/// Result of one probe of a local port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Free,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub entries: Vec<PortEntry>,
    pub conflicts: Vec<ConflictRecord>,
}

impl ScanOutcome {
    pub fn available_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == PortStatus::Available)
            .count()
    }

    pub fn conflict_count(&self) -> usize {
        self.entries.len() - self.available_count()
    }
}

/// Per-group overrides coming from configuration.
///
/// `health_check_url` is report metadata: it appears in the group's entry under
/// `service_configurations` only. Descriptor health checks stay per service and
/// come from each entry's own `health_check` or its port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupOverride {
    pub descriptor_file: Option<String>,
    pub health_check_url: Option<String>,
}

/// Service declared in configuration on top of the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraService {
    pub port: u16,
    pub service: String,
    pub component: Component,
    pub protocol: Protocol,
    #[serde(default)]
    pub description: String,
    pub container: Option<String>,
    pub health_check: Option<String>,
}

impl From<&ExtraService> for PortEntry {
    fn from(extra: &ExtraService) -> Self {
        PortEntry {
            container: extra.container.clone(),
            health_check: extra.health_check.clone(),
            ..PortEntry::new(
                extra.port,
                extra.service.clone(),
                extra.component,
                extra.protocol,
                extra.description.clone(),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySettings {
    pub frontend_project_count: u16,
    pub strict_ranges: bool,
    pub group_overrides: Vec<(Component, GroupOverride)>,
    pub extra_services: Vec<ExtraService>,
}

pub const DEFAULT_FRONTEND_PROJECTS: u16 = 26;

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            frontend_project_count: DEFAULT_FRONTEND_PROJECTS,
            strict_ranges: false,
            group_overrides: Vec::new(),
            extra_services: Vec::new(),
        }
    }
}
