use crate::core::generator::{render_artifacts, write_artifacts, OutputPlan, Rendered};
use crate::core::registry::{build_registry, Registry};
use crate::core::scanner::Scanner;
use crate::core::{ConfigProvider, Pipeline, PortProbe, ScanOutcome, Storage};
use crate::utils::error::Result;

pub struct PortPipeline<S: Storage, C: ConfigProvider, P: PortProbe> {
    storage: S,
    config: C,
    scanner: Scanner<P>,
}

impl<S: Storage, C: ConfigProvider, P: PortProbe> PortPipeline<S, C, P> {
    pub fn new(storage: S, config: C, probe: P) -> Self {
        Self {
            storage,
            config,
            scanner: Scanner::new(probe),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: PortProbe> Pipeline for PortPipeline<S, C, P> {
    async fn build_registry(&self) -> Result<Registry> {
        let settings = self.config.registry_settings();
        tracing::debug!(
            "Registry settings: {} frontend projects, {} extra services, strict ranges {}",
            settings.frontend_project_count,
            settings.extra_services.len(),
            settings.strict_ranges
        );
        build_registry(&settings)
    }

    async fn scan(&self, registry: &Registry) -> Result<ScanOutcome> {
        if self.config.skip_scan() {
            tracing::info!("⏭️ Skipping live port probes; only registry duplicates are checked");
        } else {
            tracing::debug!("Probing {} ports on {}", registry.len(), self.config.bind_host());
        }
        self.scanner.scan(&registry.entries())
    }

    async fn render(&self, registry: &Registry, outcome: &ScanOutcome) -> Result<Rendered> {
        let plan = OutputPlan {
            report_file: self.config.report_file(),
            formats: self.config.output_formats(),
            bundle_file: self.config.bundle_file(),
        };
        render_artifacts(registry, outcome, &plan)
    }

    async fn write(&self, rendered: &Rendered) -> Result<Vec<String>> {
        tracing::debug!(
            "Writing {} files to {}",
            rendered.artifacts.len(),
            self.config.output_path()
        );
        write_artifacts(&self.storage, &rendered.artifacts).await
    }
}
