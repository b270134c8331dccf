use crate::core::generator::{GenerationSummary, Rendered};
use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct PortMapEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PortMapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Builds, scans and renders without writing anything.
    pub async fn preview(&self) -> Result<Rendered> {
        tracing::info!("🔌 Building port registry...");
        let registry = self.pipeline.build_registry().await?;
        tracing::info!(
            "✅ Registry holds {} ports across {} groups",
            registry.len(),
            registry.groups().len()
        );

        tracing::info!("🔍 Scanning for port conflicts...");
        let outcome = self.pipeline.scan(&registry).await?;
        tracing::info!(
            "Scan finished: {} available, {} conflict",
            outcome.available_count(),
            outcome.conflict_count()
        );

        tracing::info!("🐳 Rendering deployment descriptors...");
        self.pipeline.render(&registry, &outcome).await
    }

    pub async fn run(&self) -> Result<GenerationSummary> {
        let rendered = self.preview().await?;

        let files = self.pipeline.write(&rendered).await?;
        tracing::info!("📊 Wrote {} files", files.len());

        Ok(GenerationSummary {
            report: rendered.report,
            files,
        })
    }
}
