//! Export and import pipelines.
//!
//! Each pipeline is one synchronous operation: it runs to completion or
//! fails before any mutation. The JSON weights document is the only channel
//! between the two.

pub mod export;
pub mod import;

pub use export::{export_weights, ExportStats};
pub use import::{import_weights, ImportStats};
