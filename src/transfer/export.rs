//! Export pipeline: mesh snapshot to weights document on disk.

use std::path::Path;

use tracing::{debug, info};

use crate::document::ExportDocument;
use crate::host::MeshProvider;
use crate::util::Result;

/// Export statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Records written (= source vertex count).
    pub vertices: usize,
    /// Vertex groups on the source mesh.
    pub groups: usize,
    /// Total influence entries emitted.
    pub influences: usize,
    /// Records carrying a UV coordinate.
    pub with_uv: usize,
}

/// Export the referenced mesh's skin weights to `path` as JSON.
///
/// Emits one record per vertex (position, resolved UV when a UV layer
/// exists, and all non-zero group weights) and writes the file atomically.
/// The mesh is not mutated.
pub fn export_weights<P>(provider: &P, mesh_ref: &str, path: &Path) -> Result<ExportStats>
where
    P: MeshProvider + ?Sized,
{
    let mesh = provider.fetch(mesh_ref)?;
    debug!(
        mesh = %mesh.name,
        vertices = mesh.vertex_count(),
        groups = mesh.groups.len(),
        "exporting skin weights"
    );

    let doc = ExportDocument::from_mesh(&mesh);
    doc.save(path)?;

    let stats = ExportStats {
        vertices: doc.len(),
        groups: mesh.groups.len(),
        influences: doc.records.iter().map(|r| r.influences.len()).sum(),
        with_uv: doc.records.iter().filter(|r| r.uv.is_some()).count(),
    };
    info!(
        mesh = %mesh.name,
        records = stats.vertices,
        influences = stats.influences,
        path = %path.display(),
        "export complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryMeshProvider;
    use crate::mesh::MeshData;
    use crate::util::Error;
    use glam::Vec3;

    #[test]
    fn test_export_missing_mesh() {
        let provider = MemoryMeshProvider::new();
        let dir = tempfile::tempdir().unwrap();
        let err =
            export_weights(&provider, "ghost", &dir.path().join("w.json")).unwrap_err();
        assert!(matches!(err, Error::NoActiveMesh(_)));
    }

    #[test]
    fn test_export_stats() {
        let mut mesh = MeshData::new("m", vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let group = mesh.group_mut_or_create("Bone_A");
        group.set_weight(0, 0.2);
        group.set_weight(2, 0.9);
        let mut provider = MemoryMeshProvider::new();
        provider.insert(mesh);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        let stats = export_weights(&provider, "m", &path).unwrap();

        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.influences, 2);
        assert_eq!(stats.with_uv, 0);
        assert!(path.exists());
    }
}
