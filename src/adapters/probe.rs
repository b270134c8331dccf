use std::io::ErrorKind;
use std::net::TcpListener;

use crate::domain::model::{PortState, Protocol};
use crate::domain::ports::PortProbe;
use crate::utils::error::{PortMapError, Result};

pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

/// Bind-and-release probe. Both `http` and `tcp` entries use a stream socket;
/// the listener is dropped as soon as the bind succeeds.
#[derive(Debug, Clone)]
pub struct TcpBindProbe {
    host: String,
}

impl TcpBindProbe {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Default for TcpBindProbe {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_HOST)
    }
}

impl PortProbe for TcpBindProbe {
    fn probe(&self, port: u16, _protocol: Protocol) -> Result<PortState> {
        match TcpListener::bind((self.host.as_str(), port)) {
            Ok(listener) => {
                drop(listener);
                Ok(PortState::Free)
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => Ok(PortState::Busy),
            Err(source) => Err(PortMapError::ProbeError { port, source }),
        }
    }
}

/// Reports every port as free. Registry duplicates are still caught by the
/// scanner's bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeFreeProbe;

impl PortProbe for AssumeFreeProbe {
    fn probe(&self, _port: u16, _protocol: Protocol) -> Result<PortState> {
        Ok(PortState::Free)
    }
}

/// Probe selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum LocalProbe {
    Bind(TcpBindProbe),
    AssumeFree(AssumeFreeProbe),
}

impl LocalProbe {
    pub fn new(host: &str, skip_scan: bool) -> Self {
        if skip_scan {
            LocalProbe::AssumeFree(AssumeFreeProbe)
        } else {
            LocalProbe::Bind(TcpBindProbe::new(host))
        }
    }
}

impl PortProbe for LocalProbe {
    fn probe(&self, port: u16, protocol: Protocol) -> Result<PortState> {
        match self {
            LocalProbe::Bind(probe) => probe.probe(port, protocol),
            LocalProbe::AssumeFree(probe) => probe.probe(port, protocol),
        }
    }
}
