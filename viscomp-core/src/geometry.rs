/// Geometry primitives for mesh inspection and rendering
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::HashMap;

/// A triangle face resolved to positions
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal; its length is twice the triangle area.
    pub fn cross(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let n = self.cross();
        let len = n.norm();
        if len > f32::EPSILON {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    pub fn area(&self) -> f64 {
        self.cross().cast::<f64>().norm() * 0.5
    }

    /// Signed volume of the tetrahedron spanned with the origin.
    pub fn signed_volume(&self) -> f64 {
        let [a, b, c] = self.vertices.map(|v| v.coords.cast::<f64>());
        a.dot(&b.cross(&c)) / 6.0
    }
}

/// An indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
    /// Per-vertex normals, when the source file carried them.
    pub normals: Option<Vec<Vector3<f32>>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            normals: None,
        }
    }

    /// Build from a triangle soup, welding exactly-equal positions.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut mesh = Self::with_capacity(triangles.len() * 3, triangles.len());
        for triangle in triangles {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&triangle.vertices);
            mesh.faces.push([base, base + 1, base + 2]);
        }
        mesh.merge_vertices();
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn triangle(&self, face: usize) -> Triangle {
        let [a, b, c] = self.faces[face];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    /// Map of each vertex to the first vertex sharing its exact position.
    pub fn weld_map(&self) -> (Vec<u32>, usize) {
        let mut seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            let key = position_key(v);
            let target = *seen.entry(key).or_insert(i as u32);
            remap.push(target);
        }
        let unique = seen.len();
        (remap, unique)
    }

    /// Collapse vertices with identical positions and reindex faces.
    pub fn merge_vertices(&mut self) {
        let mut seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut vertices = Vec::new();
        let mut normals = self.normals.as_ref().map(|_| Vec::new());

        for (i, v) in self.vertices.iter().enumerate() {
            let next = vertices.len() as u32;
            let index = *seen.entry(position_key(v)).or_insert_with(|| {
                vertices.push(*v);
                if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                    out.push(src[i]);
                }
                next
            });
            remap.push(index);
        }

        for face in &mut self.faces {
            for index in face.iter_mut() {
                *index = remap[*index as usize];
            }
        }
        self.vertices = vertices;
        self.normals = normals;
    }

    /// Join several meshes into one, offsetting face indices.
    pub fn concatenate(meshes: impl IntoIterator<Item = Mesh>) -> Self {
        let mut out = Self::new();
        let mut all_normals = true;
        let mut normals = Vec::new();

        for mesh in meshes {
            let base = out.vertices.len() as u32;
            match &mesh.normals {
                Some(n) if all_normals => normals.extend_from_slice(n),
                _ => all_normals = false,
            }
            out.vertices.extend_from_slice(&mesh.vertices);
            out.faces
                .extend(mesh.faces.iter().map(|f| [f[0] + base, f[1] + base, f[2] + base]));
        }

        if all_normals && !out.vertices.is_empty() {
            out.normals = Some(normals);
        }
        out
    }

    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        for v in &mut self.vertices {
            *v = matrix.transform_point(v);
        }
        let normal_matrix = matrix
            .fixed_view::<3, 3>(0, 0)
            .clone_owned()
            .try_inverse()
            .map(|m| m.transpose());
        match normal_matrix {
            Some(m) => {
                for n in self.normals.iter_mut().flatten() {
                    *n = (m * *n).normalize();
                }
            }
            None => self.normals = None,
        }
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }

    /// Copy centered at the origin with its largest extent scaled to 2.
    pub fn normalized(&self) -> Self {
        let mut mesh = self.clone();
        let Some((min, max)) = self.bounds() else {
            return mesh;
        };
        let center = nalgebra::center(&min, &max);
        let extent = (max - min).max();
        let factor = if extent > f32::EPSILON { 2.0 / extent } else { 1.0 };
        for v in &mut mesh.vertices {
            *v = Point3::from((*v - center) * factor);
        }
        mesh
    }

    /// Create a simple cube mesh for testing
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        // counter-clockwise seen from outside
        let faces = vec![
            [4, 5, 6],
            [4, 6, 7], // front
            [0, 3, 2],
            [0, 2, 1], // back
            [3, 7, 6],
            [3, 6, 2], // top
            [0, 1, 5],
            [0, 5, 4], // bottom
            [1, 2, 6],
            [1, 6, 5], // right
            [0, 4, 7],
            [0, 7, 3], // left
        ];
        Self {
            vertices,
            faces,
            normals: None,
        }
    }
}

/// Hashable key for an exact position; `-0.0` and `0.0` map together.
fn position_key(p: &Point3<f32>) -> [u32; 3] {
    [p.x, p.y, p.z].map(|c| if c == 0.0 { 0u32 } else { c.to_bits() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal_and_area() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        );
        assert!((t.calculate_normal() - Vector3::z()).norm() < 1e-6);
        assert!((t.area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(Triangle::new(p, p, p).calculate_normal(), Vector3::zeros());
    }

    #[test]
    fn test_from_triangles_welds_vertices() {
        let cube = Mesh::cube(2.0);
        let soup: Vec<Triangle> = cube.triangles().collect();
        let mesh = Mesh::from_triangles(&soup);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);
    }

    #[test]
    fn test_concatenate_offsets_indices() {
        let joined = Mesh::concatenate([Mesh::cube(1.0), Mesh::cube(2.0)]);
        assert_eq!(joined.vertices.len(), 16);
        assert_eq!(joined.faces.len(), 24);
        assert_eq!(joined.faces[12], [12, 13, 14]);
        assert!(joined.normals.is_none());
    }

    #[test]
    fn test_normalized_fits_unit_box() {
        let mut mesh = Mesh::cube(10.0);
        mesh.transform(&Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)));
        let (min, max) = mesh.normalized().bounds().unwrap();
        assert!((min - Point3::new(-1.0, -1.0, -1.0)).norm() < 1e-6);
        assert!((max - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
        assert!(Mesh::new().is_empty());
    }
}
