//! Import pipeline: weights document to target mesh vertex groups.
//!
//! Phases per invocation: load the document, fetch the target snapshot,
//! resolve every match, build the full weight plan, then apply it through
//! the provider. Any failure before the apply step leaves the target mesh
//! unmodified.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::document::ExportDocument;
use crate::host::{GroupAssignment, MeshProvider, WeightPlan};
use crate::matching::{MatchMode, NearestIndex, VertexMatch};
use crate::mesh::MeshData;
use crate::util::{Error, Result};

/// Import statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImportStats {
    /// Target vertices matched (= target vertex count).
    pub matched: usize,
    /// Vertex groups written (created or updated).
    pub groups_written: usize,
    /// Total (vertex, weight) writes.
    pub weights_written: usize,
    /// Largest match distance, for diagnostics.
    pub max_distance: f32,
}

/// Import skin weights from `path` onto the referenced mesh.
///
/// Every target vertex is matched to its nearest document record in the
/// chosen coordinate space and receives that record's influence list with
/// replace semantics; groups absent from a matched record are untouched.
/// Missing vertex groups are created, named by bone identifier.
pub fn import_weights<P>(
    provider: &mut P,
    mesh_ref: &str,
    path: &Path,
    mode: MatchMode,
) -> Result<ImportStats>
where
    P: MeshProvider + ?Sized,
{
    let doc = ExportDocument::load(path)?;
    let mesh = provider.fetch(mesh_ref)?;
    debug!(
        mesh = %mesh.name,
        records = doc.len(),
        vertices = mesh.vertex_count(),
        %mode,
        "importing skin weights"
    );

    let matches = match_document(&doc, &mesh, mode)?;
    let plan = build_plan(&doc, &matches);

    let stats = ImportStats {
        matched: matches.len(),
        groups_written: plan.group_count(),
        weights_written: plan.weight_count(),
        max_distance: matches.iter().map(|m| m.distance).fold(0.0, f32::max),
    };
    provider.apply(mesh_ref, &plan)?;
    info!(
        mesh = %mesh.name,
        matched = stats.matched,
        groups = stats.groups_written,
        weights = stats.weights_written,
        max_distance = stats.max_distance as f64,
        "import complete"
    );
    Ok(stats)
}

/// Match every target vertex against the document in the chosen space.
pub fn match_document(
    doc: &ExportDocument,
    target: &MeshData,
    mode: MatchMode,
) -> Result<Vec<VertexMatch>> {
    match mode {
        MatchMode::Position => {
            let index = NearestIndex::build(doc.positions())?;
            let targets: Vec<[f32; 3]> =
                target.positions.iter().map(|p| p.to_array()).collect();
            Ok(index.match_all(&targets))
        }
        MatchMode::Uv => {
            let index = NearestIndex::build(doc.uvs()?)?;
            let targets = target_uvs(target)?;
            Ok(index.match_all(&targets))
        }
    }
}

fn target_uvs(target: &MeshData) -> Result<Vec<[f32; 2]>> {
    let uvs = target.vertex_uvs().ok_or_else(|| {
        Error::missing_uv(format!("target mesh '{}' has no UV layer", target.name))
    })?;
    uvs.into_iter()
        .enumerate()
        .map(|(i, uv)| {
            uv.map(|v| v.to_array()).ok_or_else(|| {
                Error::missing_uv(format!(
                    "target mesh '{}': vertex {} has no UV coordinate",
                    target.name, i
                ))
            })
        })
        .collect()
}

/// Turn resolved matches into a weight plan: one write per influence entry
/// of each matched record, grouped by bone and ordered by group name.
fn build_plan(doc: &ExportDocument, matches: &[VertexMatch]) -> WeightPlan {
    let mut by_group: BTreeMap<&str, Vec<(u32, f32)>> = BTreeMap::new();
    for (target_vertex, m) in matches.iter().enumerate() {
        for entry in &doc.records[m.source].influences {
            by_group
                .entry(entry.bone.as_str())
                .or_default()
                .push((target_vertex as u32, entry.weight));
        }
    }
    WeightPlan {
        assignments: by_group
            .into_iter()
            .map(|(group, weights)| GroupAssignment {
                group: group.to_string(),
                weights,
            })
            .collect(),
    }
}
