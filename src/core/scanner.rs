use std::collections::HashMap;

use crate::domain::model::{ConflictRecord, ConflictType, PortEntry, PortState, PortStatus, ScanOutcome};
use crate::domain::ports::PortProbe;
use crate::utils::error::Result;

/// Sequential conflict scan over a list of entries.
pub struct Scanner<P: PortProbe> {
    probe: P,
}

impl<P: PortProbe> Scanner<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Probes every entry once, in order, and returns annotated copies.
    ///
    /// A port claimed by more than one entry yields a `port_already_used`
    /// record pairing the first claimant with each later one, whatever the
    /// probe says; all claimants are marked `conflict`. Ports held by
    /// processes outside the registry are marked `conflict` without a record.
    pub fn scan(&self, entries: &[PortEntry]) -> Result<ScanOutcome> {
        let mut annotated: Vec<PortEntry> = Vec::with_capacity(entries.len());
        let mut first_claim: HashMap<u16, usize> = HashMap::new();
        let mut conflicts = Vec::new();

        for entry in entries {
            let status = match self.probe.probe(entry.port, entry.protocol)? {
                PortState::Free => PortStatus::Available,
                PortState::Busy => PortStatus::Conflict,
            };
            tracing::debug!("Port {} ({}) -> {}", entry.port, entry.service, status.as_str());

            let mut scanned = entry.with_status(status);
            match first_claim.get(&entry.port).copied() {
                Some(index) => {
                    let first = &mut annotated[index];
                    first.status = PortStatus::Conflict;
                    scanned.status = PortStatus::Conflict;
                    conflicts.push(ConflictRecord {
                        port: entry.port,
                        services: [first.service.clone(), entry.service.clone()],
                        conflict_type: ConflictType::PortAlreadyUsed,
                    });
                }
                None => {
                    first_claim.insert(entry.port, annotated.len());
                }
            }
            annotated.push(scanned);
        }

        if conflicts.is_empty() {
            tracing::info!("✅ No port conflicts found");
        } else {
            tracing::warn!("⚠️ Found {} port conflicts", conflicts.len());
            for conflict in &conflicts {
                tracing::warn!("  Port {}: {:?}", conflict.port, conflict.services);
            }
        }

        Ok(ScanOutcome {
            entries: annotated,
            conflicts,
        })
    }
}
