//! # skinweights
//!
//! Transfer per-vertex skin weights (vertex group influences) between two
//! meshes that share a rig but not necessarily topology. Export writes each
//! vertex's position, UV coordinate and (bone, weight) influence list to a
//! JSON document; import matches every target vertex to its nearest source
//! record, by 3D position or by UV, and copies the matched influence list
//! into the target's vertex groups.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math re-exports, atomic file writes
//! - [`mesh`] - Mesh snapshot types ([`mesh::MeshData`])
//! - [`host`] - [`host::MeshProvider`] capability interface and adapters
//! - [`document`] - Weights document model and JSON serialization
//! - [`matching`] - Nearest-source search (brute force and k-d tree)
//! - [`transfer`] - The export and import pipelines
//!
//! ## Example
//!
//! ```
//! use skinweights::prelude::*;
//! use skinweights::util::Vec3;
//!
//! # fn main() -> skinweights::Result<()> {
//! let mut scene = MemoryMeshProvider::new();
//! let mut mesh = MeshData::new("source", vec![Vec3::ZERO, Vec3::X]);
//! mesh.group_mut_or_create("Bone_A").set_weight(1, 0.8);
//! scene.insert(mesh);
//! scene.insert(MeshData::new("target", vec![Vec3::new(0.9, 0.0, 0.0)]));
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("weights.json");
//! export_weights(&scene, "source", &path)?;
//! import_weights(&mut scene, "target", &path, MatchMode::Position)?;
//!
//! let target = scene.mesh("target").unwrap();
//! assert_eq!(target.group("Bone_A").unwrap().weight(0), Some(0.8));
//! # Ok(())
//! # }
//! ```

pub mod util;
pub mod mesh;
pub mod host;
pub mod document;
pub mod matching;
pub mod transfer;

// Re-export commonly used types
pub use util::{Error, Result};
pub use document::ExportDocument;
pub use matching::MatchMode;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::document::{ExportDocument, InfluenceEntry, VertexRecord};
    pub use crate::host::{FileMeshProvider, MemoryMeshProvider, MeshProvider, WeightPlan};
    pub use crate::matching::{MatchMode, NearestIndex, VertexMatch};
    pub use crate::mesh::{LoopUv, MeshData, VertexGroup};
    pub use crate::transfer::{export_weights, import_weights, ExportStats, ImportStats};
    pub use crate::util::{Error, Result};
}
