/// Mesh statistics for inspection and comparison
use nalgebra::Vector3;
use std::collections::{HashMap, HashSet};

use crate::geometry::Mesh;

#[derive(Debug, Clone, PartialEq)]
pub struct MeshStats {
    pub name: String,
    pub vertices: usize,
    pub faces: usize,
    /// Vertices whose position repeats an earlier vertex.
    pub duplicates: usize,
    pub unique_edges: usize,
    pub has_vertex_normals: bool,
    pub has_face_normals: bool,
    pub watertight: bool,
    pub extents: Vector3<f32>,
    pub area: f64,
    /// Only defined for watertight meshes.
    pub volume: Option<f64>,
}

impl MeshStats {
    pub fn compute(name: impl Into<String>, mesh: &Mesh) -> Self {
        let (weld, unique) = mesh.weld_map();
        let welded_edges = edge_face_counts(mesh, Some(weld.as_slice()));
        let watertight = !mesh.faces.is_empty() && welded_edges.values().all(|&n| n == 2);

        let area = mesh.triangles().map(|t| t.area()).sum();
        let volume = watertight.then(|| {
            mesh.triangles()
                .map(|t| t.signed_volume())
                .sum::<f64>()
                .abs()
        });
        let extents = mesh
            .bounds()
            .map(|(min, max)| max - min)
            .unwrap_or_else(Vector3::zeros);

        Self {
            name: name.into(),
            vertices: mesh.vertices.len(),
            faces: mesh.faces.len(),
            duplicates: mesh.vertices.len() - unique,
            unique_edges: edge_face_counts(mesh, None).len(),
            has_vertex_normals: mesh.normals.as_ref().is_some_and(|n| !n.is_empty()),
            has_face_normals: mesh.triangles().any(|t| t.cross().norm() > 0.0),
            watertight,
            extents,
            area,
            volume,
        }
    }
}

/// Faces per undirected edge, optionally after remapping vertex indices.
fn edge_face_counts(mesh: &Mesh, remap: Option<&[u32]>) -> HashMap<(u32, u32), usize> {
    let resolve = |i: u32| remap.map_or(i, |r| r[i as usize]);
    let mut counts = HashMap::new();
    for face in &mesh.faces {
        let [a, b, c] = face.map(resolve);
        // collapsed faces would count an edge against itself
        let distinct: HashSet<u32> = [a, b, c].into_iter().collect();
        if distinct.len() < 3 {
            continue;
        }
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *counts.entry((u.min(v), u.max(v))).or_insert(0) += 1;
        }
    }
    counts
}
