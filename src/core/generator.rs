use crate::core::descriptor::render_descriptor;
use crate::core::export::{bundle, render_port_table, PORT_TABLE_FILE};
use crate::core::registry::Registry;
use crate::core::report::{render_report, PortReport};
use crate::domain::model::ScanOutcome;
use crate::domain::ports::Storage;
use crate::utils::error::{PortMapError, Result};

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

/// One file ready to be written. `target` names what produced it (a component
/// group, `report`, `port-table` or `bundle`) for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub target: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Rendered {
    pub report: PortReport,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub report: PortReport,
    pub files: Vec<String>,
}

/// What to emit besides the per-group descriptors.
#[derive(Debug, Clone, Copy)]
pub struct OutputPlan<'a> {
    pub report_file: &'a str,
    pub formats: &'a [String],
    pub bundle_file: Option<&'a str>,
}

/// Renders every output file in memory. Nothing touches the filesystem here.
///
/// `registry` is the pre-scan registry; statuses come from `outcome`.
pub fn render_artifacts(
    registry: &Registry,
    outcome: &ScanOutcome,
    plan: &OutputPlan<'_>,
) -> Result<Rendered> {
    let annotated = registry.with_statuses(&outcome.entries)?;
    let mut artifacts = Vec::with_capacity(annotated.groups().len() + 3);

    for group in annotated.groups() {
        let descriptor = render_descriptor(group)?;
        tracing::debug!(
            "Rendered {} ({} services)",
            group.descriptor_file,
            group.ports.len()
        );
        artifacts.push(Artifact {
            target: group.name.clone(),
            file_name: group.descriptor_file.clone(),
            data: descriptor.into_bytes(),
        });
    }

    let report = render_report(
        &outcome.entries,
        annotated.groups(),
        &outcome.conflicts,
        annotated.ranges(),
    );
    artifacts.push(Artifact {
        target: "report".to_string(),
        file_name: plan.report_file.to_string(),
        data: serde_json::to_vec_pretty(&report)?,
    });

    if plan.formats.iter().any(|f| f == "csv") {
        artifacts.push(Artifact {
            target: "port-table".to_string(),
            file_name: PORT_TABLE_FILE.to_string(),
            data: render_port_table(&outcome.entries)?,
        });
    }

    if let Some(bundle_file) = plan.bundle_file {
        let files: Vec<(String, Vec<u8>)> = artifacts
            .iter()
            .map(|a| (a.file_name.clone(), a.data.clone()))
            .collect();
        artifacts.push(Artifact {
            target: "bundle".to_string(),
            file_name: bundle_file.to_string(),
            data: bundle(&files)?,
        });
    }

    Ok(Rendered { report, artifacts })
}

/// Writes artifacts in order, stopping at the first failure.
pub async fn write_artifacts<S: Storage>(storage: &S, artifacts: &[Artifact]) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let location = storage.location(&artifact.file_name);
        storage
            .write_file(&artifact.file_name, &artifact.data)
            .await
            .map_err(|e| match e {
                PortMapError::IoError(source) => PortMapError::WriteError {
                    target: artifact.target.clone(),
                    path: location.clone(),
                    source,
                },
                other => other,
            })?;
        tracing::info!("✅ Generated {}", location);
        written.push(location);
    }

    Ok(written)
}
