pub mod adapters;
pub mod config;
pub mod console;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalProbe, LocalStorage, TcpBindProbe};
pub use config::{CliConfig, TomlConfig};
pub use core::{engine::PortMapEngine, pipeline::PortPipeline};
pub use utils::error::{PortMapError, Result};
