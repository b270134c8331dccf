use crate::core::generator::Rendered;
use crate::core::registry::Registry;
use crate::domain::model::{PortState, Protocol, RegistrySettings, ScanOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` lands once written, for log and error messages.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn report_file(&self) -> &str;
    fn bind_host(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn bundle_file(&self) -> Option<&str>;
    fn skip_scan(&self) -> bool;
    fn registry_settings(&self) -> RegistrySettings;
}

/// Occupancy test for a single local port.
///
/// `Busy` means the address is already taken. Any other OS failure must be
/// returned as an error rather than folded into `Busy`.
pub trait PortProbe: Send + Sync {
    fn probe(&self, port: u16, protocol: Protocol) -> Result<PortState>;
}

impl<F> PortProbe for F
where
    F: Fn(u16, Protocol) -> Result<PortState> + Send + Sync,
{
    fn probe(&self, port: u16, protocol: Protocol) -> Result<PortState> {
        self(port, protocol)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn build_registry(&self) -> Result<Registry>;
    async fn scan(&self, registry: &Registry) -> Result<ScanOutcome>;
    async fn render(&self, registry: &Registry, outcome: &ScanOutcome) -> Result<Rendered>;
    async fn write(&self, rendered: &Rendered) -> Result<Vec<String>>;
}
