//! Mesh snapshot types.
//!
//! A [`MeshData`] is an immutable snapshot of the data the tool needs from a
//! host mesh: local-space vertex positions, the active UV layer's per-loop
//! coordinates, and the named vertex groups with their sparse per-vertex
//! weights. Host engines produce and consume these through
//! [`crate::host::MeshProvider`].

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use crate::util::{Error, Result};

/// One loop's UV coordinate, tied to the vertex the loop references.
///
/// A vertex shared across split UV islands appears in several loops with
/// different UVs; per-vertex resolution picks the lowest loop index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopUv {
    /// Index of the vertex this loop references.
    pub vertex: u32,
    /// UV coordinate at this loop.
    pub uv: Vec2,
}

/// A named vertex group: a bone's influence on the mesh.
///
/// Weights are sparse; vertices without an entry have no influence from
/// this group. BTreeMap keeps iteration order deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexGroup {
    pub name: String,
    pub weights: BTreeMap<u32, f32>,
}

impl VertexGroup {
    /// Create an empty group with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: BTreeMap::new(),
        }
    }

    /// Weight of `vertex` in this group, if assigned.
    pub fn weight(&self, vertex: u32) -> Option<f32> {
        self.weights.get(&vertex).copied()
    }

    /// Assign `weight` to `vertex`, replacing any previous value.
    pub fn set_weight(&mut self, vertex: u32, weight: f32) {
        self.weights.insert(vertex, weight);
    }
}

/// Snapshot of a mesh's geometry and skinning data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Mesh name, used in diagnostics.
    pub name: String,
    /// Local-space vertex positions; index = vertex index.
    pub positions: Vec<Vec3>,
    /// Active UV layer as per-loop coordinates, `None` if the mesh has no
    /// UV layer. Loop order follows the host mesh's loop indices.
    pub uv_loops: Option<Vec<LoopUv>>,
    /// Vertex groups in the host's group order.
    pub groups: Vec<VertexGroup>,
}

impl MeshData {
    /// Create a mesh snapshot with positions only.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            uv_loops: None,
            groups: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Check if the mesh has a UV layer.
    pub fn has_uvs(&self) -> bool {
        self.uv_loops.is_some()
    }

    /// Find a group by name.
    pub fn group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Find a group by name, creating it (empty) if absent.
    pub fn group_mut_or_create(&mut self, name: &str) -> &mut VertexGroup {
        if let Some(i) = self.groups.iter().position(|g| g.name == name) {
            return &mut self.groups[i];
        }
        let i = self.groups.len();
        self.groups.push(VertexGroup::new(name));
        &mut self.groups[i]
    }

    /// Resolve one UV coordinate per vertex from the loop table.
    ///
    /// The first loop referencing a vertex wins (lowest loop index); vertices
    /// referenced by no loop resolve to `None`. Returns `None` when the mesh
    /// has no UV layer at all.
    pub fn vertex_uvs(&self) -> Option<Vec<Option<Vec2>>> {
        let loops = self.uv_loops.as_ref()?;
        let mut uvs = vec![None; self.positions.len()];
        for lp in loops {
            let slot = &mut uvs[lp.vertex as usize];
            if slot.is_none() {
                *slot = Some(lp.uv);
            }
        }
        Some(uvs)
    }

    /// Check internal consistency: loop and group vertex indices must be in
    /// range, coordinates and weights finite.
    pub fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        for (i, p) in self.positions.iter().enumerate() {
            if !p.is_finite() {
                return Err(Error::invalid_mesh(format!(
                    "mesh '{}': vertex {} has a non-finite position",
                    self.name, i
                )));
            }
        }
        if let Some(loops) = &self.uv_loops {
            for (i, lp) in loops.iter().enumerate() {
                if lp.vertex as usize >= n {
                    return Err(Error::invalid_mesh(format!(
                        "mesh '{}': loop {} references vertex {} (mesh has {} vertices)",
                        self.name, i, lp.vertex, n
                    )));
                }
                if !lp.uv.is_finite() {
                    return Err(Error::invalid_mesh(format!(
                        "mesh '{}': loop {} has a non-finite UV",
                        self.name, i
                    )));
                }
            }
        }
        for group in &self.groups {
            for (&vertex, &weight) in &group.weights {
                if vertex as usize >= n {
                    return Err(Error::invalid_mesh(format!(
                        "mesh '{}': group '{}' references vertex {} (mesh has {} vertices)",
                        self.name, group.name, vertex, n
                    )));
                }
                if !weight.is_finite() {
                    return Err(Error::invalid_mesh(format!(
                        "mesh '{}': group '{}' has a non-finite weight for vertex {}",
                        self.name, group.name, vertex
                    )));
                }
            }
        }
        Ok(())
    }
}
