//! Weights document: the data model and its JSON serialization.
//!
//! The on-disk format is a top-level JSON array with one object per source
//! vertex, in vertex-index order:
//!
//! ```json
//! [
//!   {
//!     "position": [0.0, 0.0, 0.0],
//!     "uv": [0.5, 0.5],
//!     "influences": [{"bone": "Bone_A", "weight": 0.2}]
//!   }
//! ]
//! ```
//!
//! Array position is the only identity a record has. `uv` is omitted when
//! the source mesh had no UV coordinate for that vertex; such a document
//! cannot be used for UV matching. There is no version field.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::mesh::MeshData;
use crate::util::{write_atomic, Error, Result};

/// One bone's contribution to a vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEntry {
    /// Bone identifier, unique within a record's influence list.
    pub bone: String,
    /// Influence weight, nominally in [0, 1]. Weights need not sum to 1;
    /// the host engine normalizes on write.
    pub weight: f32,
}

/// Influence list; most vertices carry only a handful of bones.
pub type Influences = SmallVec<[InfluenceEntry; 4]>;

/// One source vertex: position, optional UV, and its influence list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Local-space position.
    pub position: [f32; 3],
    /// Active-UV-layer coordinate; absent when the mesh had none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<[f32; 2]>,
    /// Ordered (bone, weight) influence entries.
    pub influences: Influences,
}

/// An exported weights document: one record per source vertex, in vertex
/// order at export time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportDocument {
    pub records: Vec<VertexRecord>,
}

impl ExportDocument {
    /// Number of vertex records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the document has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a document from a mesh snapshot.
    ///
    /// Emits one record per vertex with its position, resolved per-vertex UV
    /// (if the mesh has a UV layer), and one influence entry per group with a
    /// weight above zero for that vertex. Zero-weight entries are omitted.
    pub fn from_mesh(mesh: &MeshData) -> Self {
        let uvs = mesh.vertex_uvs();
        let records = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let mut influences = Influences::new();
                for group in &mesh.groups {
                    if let Some(w) = group.weight(i as u32) {
                        if w > 0.0 {
                            influences.push(InfluenceEntry {
                                bone: group.name.clone(),
                                weight: w,
                            });
                        }
                    }
                }
                VertexRecord {
                    position: pos.to_array(),
                    uv: uvs.as_ref().and_then(|u| u[i]).map(|uv| uv.to_array()),
                    influences,
                }
            })
            .collect();
        Self { records }
    }

    /// Read and validate a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: Self = serde_json::from_slice(&bytes)
            .map_err(|e| Error::malformed(format!("{}: {}", path.display(), e)))?;
        doc.validate()?;
        debug!(records = doc.len(), path = %path.display(), "loaded weights document");
        Ok(doc)
    }

    /// Serialize and write the document atomically (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self).map_err(|e| Error::WriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        write_atomic(path, &bytes)?;
        debug!(records = self.len(), path = %path.display(), "wrote weights document");
        Ok(())
    }

    /// Structural validation beyond what the JSON parse enforces: at least
    /// one record, finite coordinates and weights, bone names unique within
    /// each record.
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::malformed("document contains no vertex records"));
        }
        for (i, record) in self.records.iter().enumerate() {
            if record.position.iter().any(|c| !c.is_finite()) {
                return Err(Error::malformed(format!(
                    "record {}: non-finite \"position\"",
                    i
                )));
            }
            if let Some(uv) = record.uv {
                if uv.iter().any(|c| !c.is_finite()) {
                    return Err(Error::malformed(format!("record {}: non-finite \"uv\"", i)));
                }
            }
            for (j, entry) in record.influences.iter().enumerate() {
                if !entry.weight.is_finite() {
                    return Err(Error::malformed(format!(
                        "record {}: non-finite weight for bone '{}'",
                        i, entry.bone
                    )));
                }
                // Influence lists are short; a pairwise scan beats hashing.
                if record.influences[..j].iter().any(|e| e.bone == entry.bone) {
                    return Err(Error::malformed(format!(
                        "record {}: duplicate bone '{}'",
                        i, entry.bone
                    )));
                }
            }
        }
        Ok(())
    }

    /// Positions of all records, for POSITION-mode matching.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.records.iter().map(|r| r.position).collect()
    }

    /// UVs of all records, for UV-mode matching. Fails with
    /// [`Error::MissingUv`] naming the first record that lacks one.
    pub fn uvs(&self) -> Result<Vec<[f32; 2]>> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r.uv.ok_or_else(|| {
                    Error::missing_uv(format!("document record {} has no \"uv\" field", i))
                })
            })
            .collect()
    }
}
