//! JSON-file mesh provider, used by the CLI.
//!
//! A mesh reference is a filesystem path to a JSON mesh description:
//!
//! ```json
//! {
//!   "name": "Body",
//!   "positions": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
//!   "uv_loops": [{"vertex": 0, "uv": [0.0, 0.0]}],
//!   "groups": [{"name": "Bone_A", "weights": [[0, 0.5]]}]
//! }
//! ```
//!
//! `uv_loops` is optional (mesh without a UV layer); `groups` defaults to
//! empty. Applying a weight plan rewrites the file atomically.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{apply_plan, MeshProvider, WeightPlan};
use crate::mesh::{LoopUv, MeshData, VertexGroup};
use crate::util::{write_atomic, Error, Result};

#[derive(Serialize, Deserialize)]
struct MeshFile {
    name: String,
    positions: Vec<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uv_loops: Option<Vec<LoopUvFile>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupFile>,
}

#[derive(Serialize, Deserialize)]
struct LoopUvFile {
    vertex: u32,
    uv: [f32; 2],
}

#[derive(Serialize, Deserialize)]
struct GroupFile {
    name: String,
    weights: Vec<(u32, f32)>,
}

impl From<MeshFile> for MeshData {
    fn from(file: MeshFile) -> Self {
        MeshData {
            name: file.name,
            positions: file.positions.into_iter().map(Vec3::from).collect(),
            uv_loops: file.uv_loops.map(|loops| {
                loops
                    .into_iter()
                    .map(|lp| LoopUv {
                        vertex: lp.vertex,
                        uv: Vec2::from(lp.uv),
                    })
                    .collect()
            }),
            groups: file
                .groups
                .into_iter()
                .map(|g| VertexGroup {
                    name: g.name,
                    weights: g.weights.into_iter().collect(),
                })
                .collect(),
        }
    }
}

impl From<&MeshData> for MeshFile {
    fn from(mesh: &MeshData) -> Self {
        MeshFile {
            name: mesh.name.clone(),
            positions: mesh.positions.iter().map(|p| p.to_array()).collect(),
            uv_loops: mesh.uv_loops.as_ref().map(|loops| {
                loops
                    .iter()
                    .map(|lp| LoopUvFile {
                        vertex: lp.vertex,
                        uv: lp.uv.to_array(),
                    })
                    .collect()
            }),
            groups: mesh
                .groups
                .iter()
                .map(|g| GroupFile {
                    name: g.name.clone(),
                    weights: g.weights.iter().map(|(&v, &w)| (v, w)).collect(),
                })
                .collect(),
        }
    }
}

/// Mesh provider backed by JSON files on disk.
#[derive(Debug, Default)]
pub struct FileMeshProvider;

impl FileMeshProvider {
    pub fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<MeshData> {
        if !path.exists() {
            return Err(Error::NoActiveMesh(path.display().to_string()));
        }
        let bytes = std::fs::read(path).map_err(|source| Error::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let file: MeshFile = serde_json::from_slice(&bytes).map_err(|e| {
            Error::invalid_mesh(format!("{}: {}", path.display(), e))
        })?;
        let mesh = MeshData::from(file);
        mesh.validate()?;
        Ok(mesh)
    }

    fn save(path: &Path, mesh: &MeshData) -> Result<()> {
        let file = MeshFile::from(mesh);
        let bytes = serde_json::to_vec_pretty(&file).map_err(|e| Error::WriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        write_atomic(path, &bytes)
    }
}

impl MeshProvider for FileMeshProvider {
    fn fetch(&self, mesh_ref: &str) -> Result<MeshData> {
        Self::load(Path::new(mesh_ref))
    }

    fn apply(&mut self, mesh_ref: &str, plan: &WeightPlan) -> Result<()> {
        let path = PathBuf::from(mesh_ref);
        let mut mesh = Self::load(&path)?;
        apply_plan(&mut mesh, plan);
        Self::save(&path, &mesh)
    }
}
