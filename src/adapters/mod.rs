// Adapters layer: concrete implementations of the domain ports (probes, storage).

pub mod probe;
pub mod storage;

pub use probe::{AssumeFreeProbe, LocalProbe, TcpBindProbe};
pub use storage::LocalStorage;
