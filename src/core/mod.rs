pub mod descriptor;
pub mod engine;
pub mod export;
pub mod generator;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod scanner;

pub use crate::domain::model::{PortEntry, ScanOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, PortProbe, Storage};
pub use crate::utils::error::Result;
