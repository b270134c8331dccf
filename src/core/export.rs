use std::io::Write;

use serde::Serialize;
use zip::write::{FileOptions, ZipWriter};

use crate::domain::model::{PortEntry, PortStatus, Protocol};
use crate::utils::error::{PortMapError, Result};

pub const PORT_TABLE_FILE: &str = "port_allocations.csv";

#[derive(Debug, Serialize)]
struct PortRow<'a> {
    port: u16,
    service: &'a str,
    component: &'a str,
    protocol: Protocol,
    status: PortStatus,
    description: &'a str,
}

/// Flat CSV listing of every entry, one row per port.
pub fn render_port_table(entries: &[PortEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.serialize(PortRow {
            port: entry.port,
            service: &entry.service,
            component: entry.component.as_str(),
            protocol: entry.protocol,
            status: entry.status,
            description: &entry.description,
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| PortMapError::IoError(e.into_error()))
}

/// Packs already-rendered files into a single zip archive.
pub fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
