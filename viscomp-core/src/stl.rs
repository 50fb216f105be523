/// STL reader and writer for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::opt,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use std::io::Write;

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::stl("file too small to be a valid STL"));
    }

    let (body, triangle_count) = binary_count(&data[HEADER_LEN..])
        .map_err(|_| Error::stl("missing triangle count"))?;
    let triangle_count = triangle_count as usize;
    if body.len() < triangle_count * FACET_LEN {
        return Err(Error::stl(format!(
            "unexpected end of file: {} triangles declared, {} bytes of facets",
            triangle_count,
            body.len()
        )));
    }

    let (_, triangles) = count(binary_facet, triangle_count)(body)
        .map_err(|e| Error::stl(format!("malformed facet: {:?}", e)))?;
    Ok(Mesh::from_triangles(&triangles))
}

fn binary_count(input: &[u8]) -> IResult<&[u8], u32> {
    le_u32(input)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    // stored normal is recomputed from the winding
    let (input, _normal) = binary_vector(input)?;
    let (input, (v0, v1, v2)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    // attribute byte count
    let (input, _) = le_u16(input)?;
    Ok((input, Triangle::new(v0, v1, v2)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match parse_ascii_stl_impl(input) {
        Ok((_, triangles)) => Ok(Mesh::from_triangles(&triangles)),
        Err(e) => Err(Error::stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?;
    Ok((input, triangles))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v1, v2, v3)))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    // Binary files may also start with "solid", so only trust ASCII when it parses
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Write a binary STL with recomputed face normals.
pub fn write_binary_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    let mut header = [b' '; HEADER_LEN];
    let label = b"binary STL written by viscomp";
    header[..label.len()].copy_from_slice(label);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;

    for triangle in mesh.triangles() {
        let normal = triangle.calculate_normal();
        write_vector(writer, &normal)?;
        for v in &triangle.vertices {
            write_vector(writer, &v.coords)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

fn write_vector<W: Write>(writer: &mut W, v: &Vector3<f32>) -> Result<()> {
    for c in v.iter() {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

/// Write an ASCII STL.
pub fn write_ascii_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> Result<()> {
    writeln!(writer, "solid {}", name)?;
    for triangle in mesh.triangles() {
        let n = triangle.calculate_normal();
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &triangle.vertices {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let result = parse_binary_stl(&data);
        assert!(result.is_ok());
        let mesh = result.unwrap();
        assert_eq!(mesh.faces.len(), 0);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut data = vec![0u8; 84 + 49];
        data[80..84].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(parse_binary_stl(&data), Err(Error::Stl(_))));
        assert!(parse_binary_stl(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_binary_write_then_read_cube() {
        let cube = Mesh::cube(2.0);
        let mut bytes = Vec::new();
        write_binary_stl(&cube, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert_eq!(&bytes[80..84], &12u32.to_le_bytes());

        let mesh = parse_stl(&bytes).unwrap();
        assert_eq!(mesh.faces.len(), 12);
        assert_eq!(mesh.vertices.len(), 8);
    }

    #[test]
    fn test_parse_named_ascii_solid() {
        let text = "solid wedge\n\
            facet normal 0 0 1\n\
              outer loop\n\
                vertex 0 0 0\n\
                vertex 1 0 0\n\
                vertex 0 1 0\n\
              endloop\n\
            endfacet\n\
            facet normal 0 0 1\n\
              outer loop\n\
                vertex 1 0 0\n\
                vertex 1 1 0\n\
                vertex 0 1 0\n\
              endloop\n\
            endfacet\n\
            endsolid wedge\n";
        let mesh = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.vertices.len(), 4);
    }

    #[test]
    fn test_ascii_writer_output_parses() {
        let mut text = Vec::new();
        write_ascii_stl(&Mesh::cube(1.0), "cube", &mut text).unwrap();
        let mesh = parse_ascii_stl(std::str::from_utf8(&text).unwrap()).unwrap();
        assert_eq!(mesh.faces.len(), 12);
    }
}
