/// Extension-based dispatch over the supported mesh formats
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::{gltf_io, obj, stl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Obj,
    Stl,
    Gltf,
    Glb,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 4] = [Self::Obj, Self::Stl, Self::Gltf, Self::Glb];

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Stl => "stl",
            Self::Gltf => "gltf",
            Self::Glb => "glb",
        }
    }

    /// `.gltf` output is not produced; glTF is always written as binary GLB.
    pub fn can_write(self) -> bool {
        !matches!(self, Self::Gltf)
    }

    /// GLB and glTF hold the same content.
    pub fn same_family(self, other: MeshFormat) -> bool {
        let family = |f: MeshFormat| match f {
            Self::Gltf | Self::Glb => Self::Gltf,
            f => f,
        };
        family(self) == family(other)
    }
}

impl FromStr for MeshFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            "gltf" => Ok(Self::Gltf),
            "glb" => Ok(Self::Glb),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_ascii_uppercase())
    }
}

/// Load any supported mesh file as a single mesh.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let format = MeshFormat::from_path(path)?;
    debug!(path = %path.display(), %format, "loading mesh");

    let mesh = match format {
        MeshFormat::Stl => stl::parse_stl(&fs::read(path)?)?,
        MeshFormat::Obj => obj::parse_obj(&fs::read_to_string(path)?)?,
        MeshFormat::Gltf | MeshFormat::Glb => gltf_io::load_gltf(path)?,
    };

    if mesh.is_empty() {
        return Err(Error::EmptyMesh(path.to_path_buf()));
    }
    Ok(mesh)
}

/// Write `mesh` in the format named by the extension of `path`.
pub fn export_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let format = MeshFormat::from_path(path)?;
    if !format.can_write() {
        return Err(write_unsupported(format));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        MeshFormat::Stl => stl::write_binary_stl(mesh, &mut writer)?,
        MeshFormat::Obj => obj::write_obj(mesh, &mut writer)?,
        MeshFormat::Glb => gltf_io::write_glb(mesh, &mut writer)?,
        MeshFormat::Gltf => return Err(write_unsupported(format)),
    }
    writer.flush()?;
    info!(path = %path.display(), %format, faces = mesh.faces.len(), "exported mesh");
    Ok(())
}

fn write_unsupported(format: MeshFormat) -> Error {
    Error::UnsupportedFormat(format!("{} export (write .glb instead)", format))
}
