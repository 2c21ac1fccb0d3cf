//! Host-engine access.
//!
//! The tool never touches a 3D engine's object graph directly; it goes
//! through [`MeshProvider`], a capability interface that hands out
//! [`MeshData`] snapshots and accepts fully resolved [`WeightPlan`]s. Two
//! adapters ship with the crate: [`MemoryMeshProvider`] for in-process
//! scenes (and tests), and [`FileMeshProvider`] for JSON mesh files (the
//! CLI). Engine integrations substitute their own.

mod file;

pub use file::FileMeshProvider;

use std::collections::HashMap;

use crate::mesh::MeshData;
use crate::util::{Error, Result};

/// All weight writes for one vertex group, resolved before any mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupAssignment {
    /// Vertex group name (bone identifier). Created on the mesh if absent.
    pub group: String,
    /// (vertex index, weight) pairs; each replaces the existing weight.
    pub weights: Vec<(u32, f32)>,
}

/// A complete, validated set of weight writes for one mesh.
///
/// The import pipeline builds the whole plan before handing it to a
/// provider, so a mesh is only ever mutated by a plan that covers every
/// matched target vertex. Groups absent from the plan are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightPlan {
    /// Assignments ordered by group name for deterministic application.
    pub assignments: Vec<GroupAssignment>,
}

impl WeightPlan {
    /// Number of groups the plan writes to.
    pub fn group_count(&self) -> usize {
        self.assignments.len()
    }

    /// Total number of (vertex, weight) writes.
    pub fn weight_count(&self) -> usize {
        self.assignments.iter().map(|a| a.weights.len()).sum()
    }
}

/// Capability interface over a host engine's mesh data.
pub trait MeshProvider {
    /// Snapshot the referenced mesh. Fails with [`Error::NoActiveMesh`] when
    /// the reference does not resolve.
    fn fetch(&self, mesh_ref: &str) -> Result<MeshData>;

    /// Apply a resolved weight plan to the referenced mesh, creating missing
    /// vertex groups and replacing (vertex, group) weights.
    fn apply(&mut self, mesh_ref: &str, plan: &WeightPlan) -> Result<()>;
}

/// Apply a plan to a mesh snapshot in place. Shared by the built-in
/// providers; engine adapters translate the plan to their own write calls.
pub fn apply_plan(mesh: &mut MeshData, plan: &WeightPlan) {
    for assignment in &plan.assignments {
        let group = mesh.group_mut_or_create(&assignment.group);
        for &(vertex, weight) in &assignment.weights {
            group.set_weight(vertex, weight);
        }
    }
}

/// In-memory scene of named meshes.
#[derive(Debug, Default)]
pub struct MemoryMeshProvider {
    meshes: HashMap<String, MeshData>,
}

impl MemoryMeshProvider {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh; its name becomes its reference.
    pub fn insert(&mut self, mesh: MeshData) {
        self.meshes.insert(mesh.name.clone(), mesh);
    }

    /// Borrow a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&MeshData> {
        self.meshes.get(name)
    }
}

impl MeshProvider for MemoryMeshProvider {
    fn fetch(&self, mesh_ref: &str) -> Result<MeshData> {
        let mesh = self
            .meshes
            .get(mesh_ref)
            .ok_or_else(|| Error::NoActiveMesh(mesh_ref.to_string()))?;
        mesh.validate()?;
        Ok(mesh.clone())
    }

    fn apply(&mut self, mesh_ref: &str, plan: &WeightPlan) -> Result<()> {
        let mesh = self
            .meshes
            .get_mut(mesh_ref)
            .ok_or_else(|| Error::NoActiveMesh(mesh_ref.to_string()))?;
        apply_plan(mesh, plan);
        Ok(())
    }
}
