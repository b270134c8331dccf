use std::collections::HashMap;

use crate::domain::model::{
    Component, ComponentGroup, ComponentRange, PortEntry, Protocol, RegistrySettings,
};
use crate::utils::error::{PortMapError, Result};

/// Validated set of component groups plus their documented ranges.
///
/// Every port and every service name appears at most once. Construction goes
/// through [`Registry::new`], which enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    groups: Vec<ComponentGroup>,
    ranges: Vec<ComponentRange>,
}

impl Registry {
    pub fn new(groups: Vec<ComponentGroup>, ranges: Vec<ComponentRange>) -> Result<Self> {
        check_unique(&groups)?;
        Ok(Self { groups, ranges })
    }

    pub fn groups(&self) -> &[ComponentGroup] {
        &self.groups
    }

    pub fn ranges(&self) -> &[ComponentRange] {
        &self.ranges
    }

    pub fn range_of(&self, component: Component) -> Option<&ComponentRange> {
        self.ranges.iter().find(|r| r.component == component)
    }

    /// All entries in group order.
    pub fn entries(&self) -> Vec<PortEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.ports.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.ports.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries whose port falls outside their component's documented range.
    pub fn out_of_range(&self) -> Vec<&PortEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.ports.iter())
            .filter(|e| {
                self.range_of(e.component)
                    .map(|r| !r.contains(e.port))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Copy of this registry with statuses taken from `entries`, which must be
    /// the scanned form of [`Registry::entries`] in the same order.
    pub fn with_statuses(&self, entries: &[PortEntry]) -> Result<Self> {
        if entries.len() != self.len() {
            return Err(PortMapError::invalid_registry(format!(
                "scan returned {} entries for a registry of {}",
                entries.len(),
                self.len()
            )));
        }

        let mut scanned = entries.iter();
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let mut ports = Vec::with_capacity(group.ports.len());
            for entry in &group.ports {
                // Lengths match, so the iterator cannot run dry here.
                let Some(result) = scanned.next() else { break };
                if result.service != entry.service || result.port != entry.port {
                    return Err(PortMapError::invalid_registry(format!(
                        "scan order mismatch: expected '{}' on {}, got '{}' on {}",
                        entry.service, entry.port, result.service, result.port
                    )));
                }
                ports.push(entry.with_status(result.status));
            }
            groups.push(ComponentGroup {
                ports,
                ..group.clone()
            });
        }

        Ok(Self {
            groups,
            ranges: self.ranges.clone(),
        })
    }
}

fn check_unique(groups: &[ComponentGroup]) -> Result<()> {
    let mut ports: HashMap<u16, &str> = HashMap::new();
    let mut services: HashMap<&str, u16> = HashMap::new();

    for group in groups {
        for entry in &group.ports {
            if entry.component != group.component {
                return Err(PortMapError::invalid_registry(format!(
                    "service '{}' is tagged {} but listed in group {}",
                    entry.service, entry.component, group.name
                )));
            }
            if entry.port == 0 {
                return Err(PortMapError::invalid_registry(format!(
                    "service '{}' has port 0",
                    entry.service
                )));
            }
            if let Some(first) = ports.insert(entry.port, entry.service.as_str()) {
                return Err(PortMapError::invalid_registry(format!(
                    "port {} is assigned to both '{}' and '{}'",
                    entry.port, first, entry.service
                )));
            }
            if let Some(port) = services.insert(entry.service.as_str(), entry.port) {
                return Err(PortMapError::invalid_registry(format!(
                    "service '{}' is declared on both {} and {}",
                    entry.service, port, entry.port
                )));
            }
        }
    }

    Ok(())
}

/// Generates `count` frontend project entries on `range.start + 1 ..= range.start + count`.
pub fn frontend_block(range: &ComponentRange, count: u16) -> Result<Vec<PortEntry>> {
    let capacity = range.end - range.start;
    if count > capacity {
        return Err(PortMapError::invalid_registry(format!(
            "{} frontend projects do not fit in {}-{}",
            count, range.start, range.end
        )));
    }

    Ok((1..=count)
        .map(|i| {
            PortEntry::new(
                range.start + i,
                format!("frontend-project-{:02}", i),
                range.component,
                Protocol::Http,
                format!("Frontend Project {}", i),
            )
        })
        .collect())
}

/// Builds the compiled-in registry, adjusted by `settings`.
pub fn build_registry(settings: &RegistrySettings) -> Result<Registry> {
    let ranges: Vec<ComponentRange> = Component::ALL.iter().map(|c| c.reserved_range()).collect();

    let mut groups = Vec::with_capacity(Component::ALL.len());
    for component in Component::ALL {
        let mut ports = match component {
            Component::FrontendProject => {
                frontend_block(&component.reserved_range(), settings.frontend_project_count)?
            }
            other => service_table(other),
        };
        ports.extend(
            settings
                .extra_services
                .iter()
                .filter(|extra| extra.component == component)
                .map(PortEntry::from),
        );

        let mut group = ComponentGroup::new(component, ports);
        if let Some((_, overrides)) = settings.group_overrides.iter().find(|(c, _)| *c == component) {
            if let Some(file) = &overrides.descriptor_file {
                group.descriptor_file = file.clone();
            }
            group.health_check_url = overrides.health_check_url.clone();
        }
        groups.push(group);
    }

    let registry = Registry::new(groups, ranges)?;

    let stray = registry.out_of_range();
    if !stray.is_empty() {
        let listing = stray
            .iter()
            .map(|e| format!("{}:{} ({})", e.service, e.port, e.component))
            .collect::<Vec<_>>()
            .join(", ");
        if settings.strict_ranges {
            return Err(PortMapError::invalid_registry(format!(
                "ports outside their reserved range: {}",
                listing
            )));
        }
        tracing::warn!("⚠️ Ports outside their reserved range: {}", listing);
    }

    tracing::debug!(
        "Registry built with {} ports across {} groups",
        registry.len(),
        registry.groups().len()
    );
    Ok(registry)
}

type ServiceRow = (u16, &'static str, &'static str);

const CORE_PLATFORM: &[ServiceRow] = &[
    (8001, "platform-memory-core", "Memory Core API"),
    (8002, "platform-agent-orchestration", "Agent Orchestration API"),
    (8003, "platform-venture-factory", "Venture Factory API"),
    (8004, "platform-repository-hub", "Repository Hub API"),
    (8005, "platform-intelligence", "Intelligence API"),
    (8006, "platform-command-center", "Command Center API"),
    (8007, "platform-financial-bridge", "Financial Bridge API"),
];

const FINANCIAL_SYSTEM: &[ServiceRow] = &[
    (8101, "finance-banking-api", "Banking API"),
    (8102, "finance-compliance-api", "Compliance API"),
    (8103, "finance-equity-api", "Equity API"),
    (8104, "finance-transaction-api", "Transaction API"),
    (8105, "finance-payroll-api", "Payroll API"),
    (8106, "finance-dealmaking-api", "Dealmaking API"),
    (8107, "finance-dashboard", "Financial Dashboard"),
    (8108, "finance-reports", "Financial Reports"),
];

const FRONTEND_INTEGRATION: &[ServiceRow] = &[
    (8201, "integration-design-system", "Design System API"),
    (8202, "integration-component-library", "Component Library"),
    (8203, "integration-orchestration", "Orchestration API"),
    (8204, "integration-frontend-proxy", "Frontend Proxy"),
    (8205, "integration-build-system", "Build System API"),
];

const AGENT_GATEWAY: &[ServiceRow] = &[
    (8301, "agents-assistant", "Assistant Agents Gateway"),
    (8302, "agents-swarms", "Swarms Gateway"),
    (8303, "agents-workflow-orchestrator", "Workflow Orchestrator Gateway"),
    (8304, "agents-design-ai", "Design AI Gateway"),
    (8305, "agents-editor-integration", "Editor Integration Gateway"),
    (8306, "agents-github-integration", "GitHub Integration Gateway"),
];

const DATABASE: &[ServiceRow] = &[
    (5001, "postgresql-main", "Main PostgreSQL Database"),
    (5002, "redis-cache", "Redis Cache"),
    (5003, "mongodb-documents", "MongoDB Documents"),
    (5004, "elasticsearch-search", "Elasticsearch Search"),
    (5005, "influxdb-metrics", "InfluxDB Metrics"),
    (5006, "neo4j-graph", "Neo4j Graph Database"),
];

const API_GATEWAY: &[ServiceRow] = &[
    (4001, "api-gateway", "Main API Gateway"),
    (4002, "auth-service", "Authentication Service"),
    (4003, "user-service", "User Management Service"),
    (4004, "notification-service", "Notification Service"),
    (4005, "file-service", "File Management Service"),
    (4006, "email-service", "Email Service"),
    (4007, "sms-service", "SMS Service"),
];

const MONITORING: &[ServiceRow] = &[
    (9001, "prometheus", "Prometheus Metrics"),
    (9002, "grafana", "Grafana Dashboard"),
    (9003, "jaeger", "Jaeger Tracing"),
    (9004, "kibana", "Kibana Logs"),
    (9005, "alertmanager", "Alert Manager"),
    (9006, "node-exporter", "Node Exporter"),
];

fn service_table(component: Component) -> Vec<PortEntry> {
    let (protocol, rows) = match component {
        Component::CorePlatform => (Protocol::Http, CORE_PLATFORM),
        Component::FinancialSystem => (Protocol::Http, FINANCIAL_SYSTEM),
        Component::FrontendIntegration => (Protocol::Http, FRONTEND_INTEGRATION),
        Component::AgentGateway => (Protocol::Http, AGENT_GATEWAY),
        Component::Database => (Protocol::Tcp, DATABASE),
        Component::ApiGateway => (Protocol::Http, API_GATEWAY),
        Component::Monitoring => (Protocol::Http, MONITORING),
        // Generated by frontend_block.
        Component::FrontendProject => return Vec::new(),
    };

    rows.iter()
        .map(|(port, service, description)| {
            PortEntry::new(*port, *service, component, protocol, *description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ExtraService, GroupOverride, PortStatus};
    use std::collections::HashSet;

    #[test]
    fn test_default_registry_shape() {
        let registry = build_registry(&RegistrySettings::default()).unwrap();

        assert_eq!(registry.groups().len(), 8);
        assert_eq!(registry.ranges().len(), 8);
        assert_eq!(registry.len(), 71);
        assert!(registry.out_of_range().is_empty());

        let names: Vec<&str> = registry.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names[0], "core-platform");
        assert_eq!(names[4], "frontend-project");
        assert_eq!(
            registry.groups()[5].descriptor_file,
            "database.deploy.yml"
        );
    }

    #[test]
    fn test_frontend_block_is_contiguous_and_unique() {
        let range = Component::FrontendProject.reserved_range();
        for count in [0u16, 1, 26, 99] {
            let block = frontend_block(&range, count).unwrap();
            assert_eq!(block.len(), count as usize);

            let ports: Vec<u16> = block.iter().map(|e| e.port).collect();
            let unique: HashSet<u16> = ports.iter().copied().collect();
            assert_eq!(unique.len(), ports.len());
            for (i, port) in ports.iter().enumerate() {
                assert_eq!(*port, range.start + 1 + i as u16);
            }
        }
    }

    #[test]
    fn test_frontend_block_names_are_zero_padded() {
        let block = frontend_block(&Component::FrontendProject.reserved_range(), 12).unwrap();
        assert_eq!(block[0].service, "frontend-project-01");
        assert_eq!(block[11].service, "frontend-project-12");
        assert_eq!(block[11].port, 3012);
    }

    #[test]
    fn test_frontend_block_rejects_overflow() {
        let range = Component::FrontendProject.reserved_range();
        let err = frontend_block(&range, 100).unwrap_err();
        assert!(matches!(err, PortMapError::InvalidRegistry { .. }));
    }

    #[test]
    fn test_duplicate_port_fails_build() {
        let settings = RegistrySettings {
            extra_services: vec![ExtraService {
                port: 8001,
                service: "platform-shadow".to_string(),
                component: Component::CorePlatform,
                protocol: Protocol::Http,
                description: String::new(),
                container: None,
                health_check: None,
            }],
            ..RegistrySettings::default()
        };

        let err = build_registry(&settings).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("8001"));
        assert!(message.contains("platform-memory-core"));
        assert!(message.contains("platform-shadow"));
    }

    #[test]
    fn test_duplicate_service_name_fails() {
        let group = ComponentGroup::new(
            Component::Monitoring,
            vec![
                PortEntry::new(9001, "grafana", Component::Monitoring, Protocol::Http, ""),
                PortEntry::new(9002, "grafana", Component::Monitoring, Protocol::Http, ""),
            ],
        );
        assert!(Registry::new(vec![group], vec![]).is_err());
    }

    #[test]
    fn test_extra_service_outside_range_warns_unless_strict() {
        let extra = ExtraService {
            port: 7000,
            service: "legacy-ledger".to_string(),
            component: Component::FinancialSystem,
            protocol: Protocol::Tcp,
            description: "Legacy ledger".to_string(),
            container: None,
            health_check: None,
        };
        let lenient = RegistrySettings {
            extra_services: vec![extra.clone()],
            ..RegistrySettings::default()
        };
        let registry = build_registry(&lenient).unwrap();
        assert_eq!(registry.out_of_range().len(), 1);
        assert_eq!(registry.len(), 72);

        let strict = RegistrySettings {
            strict_ranges: true,
            extra_services: vec![extra],
            ..RegistrySettings::default()
        };
        assert!(build_registry(&strict).is_err());
    }

    #[test]
    fn test_group_overrides_apply() {
        let settings = RegistrySettings {
            group_overrides: vec![(
                Component::Monitoring,
                GroupOverride {
                    descriptor_file: Some("docker-compose.monitoring.yml".to_string()),
                    health_check_url: Some("http://localhost:9001/-/healthy".to_string()),
                },
            )],
            ..RegistrySettings::default()
        };
        let registry = build_registry(&settings).unwrap();
        let monitoring = registry
            .groups()
            .iter()
            .find(|g| g.component == Component::Monitoring)
            .unwrap();
        assert_eq!(monitoring.descriptor_file, "docker-compose.monitoring.yml");
        assert!(monitoring.health_check_url.is_some());
    }

    #[test]
    fn test_with_statuses_copies_scan_results() {
        let registry = build_registry(&RegistrySettings::default()).unwrap();
        let scanned: Vec<PortEntry> = registry
            .entries()
            .into_iter()
            .map(|e| {
                let status = if e.port == 5002 { PortStatus::Conflict } else { PortStatus::Available };
                e.with_status(status)
            })
            .collect();

        let annotated = registry.with_statuses(&scanned).unwrap();
        let redis = annotated
            .entries()
            .into_iter()
            .find(|e| e.service == "redis-cache")
            .unwrap();
        assert_eq!(redis.status, PortStatus::Conflict);

        assert!(registry.with_statuses(&scanned[1..]).is_err());
    }
}
