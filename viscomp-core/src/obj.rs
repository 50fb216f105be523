/// Wavefront OBJ reader and writer
///
/// Only geometry is kept: `v`, `vn` and `f` statements. Polygons are
/// triangulated as fans, texture coordinates and materials are ignored.
use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{map_res, opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, tuple},
    IResult,
};
use std::io::Write;

use crate::error::{Error, Result};
use crate::geometry::Mesh;

/// One `v/vt/vn` corner of a face, raw (1-based or negative) indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    vertex: i64,
    normal: Option<i64>,
}

pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut file_normals: Vec<Vector3<f32>> = Vec::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();
    let mut corner_normals: Vec<(u32, usize)> = Vec::new();
    let mut every_corner_has_normal = true;

    for (number, raw) in input.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("vn ") {
            let (x, y, z) = vector3(rest).map_err(|_| Error::obj(line_no, "bad normal"))?;
            file_normals.push(Vector3::new(x, y, z));
        } else if let Some(rest) = line.strip_prefix("v ") {
            let (x, y, z) = vector3(rest).map_err(|_| Error::obj(line_no, "bad vertex"))?;
            positions.push(Point3::new(x, y, z));
        } else if let Some(rest) = line.strip_prefix("f ") {
            let (_, corners) = face(rest).map_err(|_| Error::obj(line_no, "bad face"))?;
            if corners.len() < 3 {
                return Err(Error::obj(line_no, "face needs at least three vertices"));
            }

            let mut resolved = Vec::with_capacity(corners.len());
            for corner in &corners {
                let v = resolve(corner.vertex, positions.len())
                    .ok_or_else(|| Error::obj(line_no, "vertex index out of range"))?;
                match corner.normal {
                    Some(n) => {
                        let n = resolve(n, file_normals.len())
                            .ok_or_else(|| Error::obj(line_no, "normal index out of range"))?;
                        corner_normals.push((v, n as usize));
                    }
                    None => every_corner_has_normal = false,
                }
                resolved.push(v);
            }

            for i in 1..resolved.len() - 1 {
                faces.push([resolved[0], resolved[i], resolved[i + 1]]);
            }
        }
    }

    let normals = (every_corner_has_normal && !corner_normals.is_empty()).then(|| {
        let mut normals = vec![Vector3::zeros(); positions.len()];
        for (v, n) in corner_normals {
            normals[v as usize] = file_normals[n];
        }
        normals
    });

    Ok(Mesh {
        vertices: positions,
        faces,
        normals,
    })
}

/// Turn a 1-based or negative (relative) index into a 0-based one.
fn resolve(index: i64, len: usize) -> Option<u32> {
    let zero_based = match index {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => return None,
    };
    (zero_based >= 0 && (zero_based as usize) < len).then_some(zero_based as u32)
}

fn vector3(input: &str) -> std::result::Result<(f32, f32, f32), nom::Err<nom::error::Error<&str>>> {
    let (_, (x, _, y, _, z)) = tuple((
        preceded(space0, float),
        space1,
        float,
        space1,
        float,
    ))(input)?;
    Ok((x, y, z))
}

fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(tag("-")), digit1)), str::parse)(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, vertex) = index(input)?;
    let (input, normal) = opt(alt((
        preceded(tag("//"), index),
        preceded(tuple((tag("/"), opt(index), tag("/"))), index),
    )))(input)?;
    // bare texture index: v/vt
    let (input, _) = opt(preceded(tag("/"), index))(input)?;
    Ok((input, Corner { vertex, normal }))
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    preceded(space0, separated_list1(space1, corner))(input)
}

pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# written by viscomp")?;
    writeln!(writer, "# {} vertices, {} faces", mesh.vertices.len(), mesh.faces.len())?;
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    if let Some(normals) = &mesh.normals {
        for n in normals {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }
    let with_normals = mesh.normals.is_some();
    for face in &mesh.faces {
        let [a, b, c] = face.map(|i| i + 1);
        if with_normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1/1/1 2/1/1 3/1/1 4/1/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        let normals = mesh.normals.unwrap();
        assert!(normals.iter().all(|n| *n == Vector3::z()));
    }

    #[test]
    fn test_corner_forms() {
        assert_eq!(corner("3").unwrap().1, Corner { vertex: 3, normal: None });
        assert_eq!(corner("3/7").unwrap().1, Corner { vertex: 3, normal: None });
        assert_eq!(corner("3//2").unwrap().1, Corner { vertex: 3, normal: Some(2) });
        assert_eq!(corner("-1/4/5").unwrap().1, Corner { vertex: -1, normal: Some(5) });
    }

    #[test]
    fn test_negative_indices() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, Error::Obj { line: 2, .. }));
    }

    #[test]
    fn test_write_then_read_cube() {
        let mut text = Vec::new();
        write_obj(&Mesh::cube(1.0), &mut text).unwrap();
        let mesh = parse_obj(std::str::from_utf8(&text).unwrap()).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces, Mesh::cube(1.0).faces);
    }
}
