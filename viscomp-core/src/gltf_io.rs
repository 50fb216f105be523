/// glTF 2.0 loading (via the `gltf` crate) and binary GLB export
use nalgebra::{Matrix4, Point3, Vector3};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Mesh;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const MODE_TRIANGLES: u32 = 4;

/// Load a `.gltf` or `.glb` file, flattening the scene into one mesh.
pub fn load_gltf(path: &Path) -> Result<Mesh> {
    let (document, buffers, _images) = gltf::import(path)?;
    flatten(&document, &buffers)
}

/// Same as [`load_gltf`] for in-memory data. External buffer URIs are not supported.
pub fn parse_gltf(data: &[u8]) -> Result<Mesh> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    flatten(&document, &buffers)
}

fn flatten(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Mesh> {
    let mut parts = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, &Matrix4::identity(), buffers, &mut parts)?;
            }
        }
        // no scene graph, take meshes as authored
        None => {
            for mesh in document.meshes() {
                for primitive in mesh.primitives() {
                    parts.extend(read_primitive(&primitive, buffers)?);
                }
            }
        }
    }
    debug!(parts = parts.len(), "flattened glTF document");
    Ok(Mesh::concatenate(parts))
}

fn collect_node(
    node: &gltf::Node,
    parent: &Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> Result<()> {
    let world = parent * Matrix4::from(node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(mut part) = read_primitive(&primitive, buffers)? {
                part.transform(&world);
                out.push(part);
            }
        }
    }
    for child in node.children() {
        collect_node(&child, &world, buffers, out)?;
    }
    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<Mesh>> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        debug!(mode = ?primitive.mode(), "skipping non-triangle primitive");
        return Ok(None);
    }

    let reader =
        primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let Some(positions) = reader.read_positions() else {
        return Ok(None);
    };
    let vertices: Vec<Point3<f32>> = positions.map(Point3::from).collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    let faces: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    check_indices(&faces, vertices.len())?;
    let normals = reader
        .read_normals()
        .map(|normals| normals.map(Vector3::from).collect());

    Ok(Some(Mesh {
        vertices,
        faces,
        normals,
    }))
}

/// Every face corner must name an existing vertex.
fn check_indices(faces: &[[u32; 3]], vertex_count: usize) -> Result<()> {
    match faces.iter().flatten().find(|&&i| i as usize >= vertex_count) {
        Some(index) => Err(Error::InvalidMesh(format!(
            "face index {} out of range for {} vertices",
            index, vertex_count
        ))),
        None => Ok(()),
    }
}

/// Write the mesh as a single-node binary glTF.
pub fn write_glb<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    let (min, max) = mesh
        .bounds()
        .filter(|_| !mesh.is_empty())
        .ok_or_else(|| Error::InvalidMesh("cannot write an empty mesh as glTF".to_string()))?;
    check_indices(&mesh.faces, mesh.vertices.len())?;

    let mut bin: Vec<u8> = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut attributes = serde_json::Map::new();

    let positions_offset = bin.len();
    for v in &mesh.vertices {
        extend_f32(&mut bin, v.coords.as_slice());
    }
    views.push(json!({
        "buffer": 0,
        "byteOffset": positions_offset,
        "byteLength": bin.len() - positions_offset,
        "target": ARRAY_BUFFER,
    }));
    attributes.insert("POSITION".into(), json!(accessors.len()));
    accessors.push(json!({
        "bufferView": views.len() - 1,
        "componentType": COMPONENT_FLOAT,
        "count": mesh.vertices.len(),
        "type": "VEC3",
        "min": [min.x, min.y, min.z],
        "max": [max.x, max.y, max.z],
    }));

    if let Some(normals) = &mesh.normals {
        let offset = bin.len();
        for n in normals {
            extend_f32(&mut bin, n.as_slice());
        }
        views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bin.len() - offset,
            "target": ARRAY_BUFFER,
        }));
        attributes.insert("NORMAL".into(), json!(accessors.len()));
        accessors.push(json!({
            "bufferView": views.len() - 1,
            "componentType": COMPONENT_FLOAT,
            "count": normals.len(),
            "type": "VEC3",
        }));
    }

    let indices_offset = bin.len();
    for index in mesh.faces.iter().flatten() {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    views.push(json!({
        "buffer": 0,
        "byteOffset": indices_offset,
        "byteLength": bin.len() - indices_offset,
        "target": ELEMENT_ARRAY_BUFFER,
    }));
    let indices_accessor = accessors.len();
    accessors.push(json!({
        "bufferView": views.len() - 1,
        "componentType": COMPONENT_UNSIGNED_INT,
        "count": mesh.faces.len() * 3,
        "type": "SCALAR",
    }));

    let document = json!({
        "asset": { "version": "2.0", "generator": "viscomp" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{
            "primitives": [{
                "attributes": attributes,
                "indices": indices_accessor,
                "mode": MODE_TRIANGLES,
            }]
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": views,
        "accessors": accessors,
    });

    assemble_glb(&document, bin, writer)
}

/// Frame a JSON document and its binary buffer as a GLB container.
fn assemble_glb<W: Write>(
    document: &serde_json::Value,
    mut bin: Vec<u8>,
    writer: &mut W,
) -> Result<()> {
    let mut json_chunk = serde_json::to_vec(document)?;
    pad_to_four(&mut json_chunk, b' ');
    pad_to_four(&mut bin, 0);

    let total = 12 + 8 + json_chunk.len() + 8 + bin.len();
    writer.write_all(GLB_MAGIC)?;
    writer.write_all(&GLB_VERSION.to_le_bytes())?;
    writer.write_all(&(total as u32).to_le_bytes())?;
    write_chunk(writer, CHUNK_JSON, &json_chunk)?;
    write_chunk(writer, CHUNK_BIN, &bin)?;
    Ok(())
}

fn extend_f32(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn pad_to_four(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

fn write_chunk<W: Write>(writer: &mut W, kind: u32, data: &[u8]) -> Result<()> {
    writer.write_all(&(data.len() as u32).to_le_bytes())?;
    writer.write_all(&kind.to_le_bytes())?;
    writer.write_all(data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glb_layout() {
        let mut bytes = Vec::new();
        write_glb(&Mesh::cube(1.0), &mut bytes).unwrap();
        assert_eq!(&bytes[0..4], b"glTF");
        let total = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        assert_eq!(total, bytes.len());
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn test_glb_reads_back() {
        let mut cube = Mesh::cube(2.0);
        cube.normals = Some(cube.vertices.iter().map(|v| v.coords.normalize()).collect());
        let mut bytes = Vec::new();
        write_glb(&cube, &mut bytes).unwrap();

        let mesh = parse_gltf(&bytes).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces, cube.faces);
        assert_eq!(mesh.normals.map(|n| n.len()), Some(8));
    }

    /// Split a GLB into its JSON document and binary chunk.
    fn split_glb(bytes: &[u8]) -> (serde_json::Value, Vec<u8>) {
        let chunk_len =
            |at: usize| u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as usize;
        let json_len = chunk_len(12);
        let document = serde_json::from_slice(&bytes[20..20 + json_len]).unwrap();
        let bin_start = 20 + json_len;
        let bin_len = chunk_len(bin_start);
        let bin = bytes[bin_start + 8..bin_start + 8 + bin_len].to_vec();
        (document, bin)
    }

    fn cube_glb() -> (serde_json::Value, Vec<u8>) {
        let mut bytes = Vec::new();
        write_glb(&Mesh::cube(1.0), &mut bytes).unwrap();
        split_glb(&bytes)
    }

    #[test]
    fn test_out_of_range_index_is_rejected_on_load() {
        let (document, mut bin) = cube_glb();
        // indices follow the 8 positions (8 * 12 bytes)
        bin[96..100].copy_from_slice(&99u32.to_le_bytes());
        let mut bytes = Vec::new();
        assemble_glb(&document, bin, &mut bytes).unwrap();

        assert!(matches!(parse_gltf(&bytes), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_out_of_range_index_is_rejected_on_write() {
        let mut mesh = Mesh::cube(1.0);
        mesh.faces[0] = [0, 1, 99];
        let mut bytes = Vec::new();
        assert!(matches!(write_glb(&mesh, &mut bytes), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_scene_graph_is_flattened() {
        let (mut document, bin) = cube_glb();
        let primitive = document["meshes"][0]["primitives"][0].clone();
        document["meshes"][0]["primitives"] = json!([primitive.clone(), primitive]);
        document["nodes"] = json!([
            { "mesh": 0, "translation": [10.0, 0.0, 0.0], "children": [1] },
            { "mesh": 0, "scale": [2.0, 2.0, 2.0] },
        ]);
        let mut bytes = Vec::new();
        assemble_glb(&document, bin, &mut bytes).unwrap();

        let mesh = parse_gltf(&bytes).unwrap();
        // two nodes, each drawing the two-primitive cube
        assert_eq!(mesh.faces.len(), 48);
        assert_eq!(mesh.vertices.len(), 32);

        // child is scaled first, then moved with its parent
        let (min, max) = mesh.bounds().unwrap();
        assert!((min - Point3::new(9.0, -1.0, -1.0)).norm() < 1e-5);
        assert!((max - Point3::new(11.0, 1.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let mut bytes = Vec::new();
        assert!(matches!(
            write_glb(&Mesh::new(), &mut bytes),
            Err(Error::InvalidMesh(_))
        ));
    }
}
