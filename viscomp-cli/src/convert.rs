use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use viscomp_core::{export_mesh, load_mesh, MeshFormat};

#[derive(Args, Debug, Clone)]
#[command(about = "Convert a mesh to other formats")]
pub struct ConvertArgs {
    /// Mesh to convert (.obj, .stl, .gltf, .glb)
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Target formats, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_target,
        default_values = ["stl", "obj", "glb"]
    )]
    pub to: Vec<MeshFormat>,

    /// Directory for the converted files
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub out_dir: PathBuf,
}

fn parse_target(s: &str) -> Result<MeshFormat, String> {
    let format: MeshFormat = s.parse().map_err(|e| format!("{e}"))?;
    if !format.can_write() {
        return Err(format!("{format} cannot be written, use glb"));
    }
    Ok(format)
}

pub fn execute(args: ConvertArgs) -> Result<()> {
    let source = MeshFormat::from_path(&args.input)?;
    let mesh = load_mesh(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let targets = conversion_targets(source, &args.to);
    if targets.is_empty() {
        info!("Nothing to convert: every target has the same format as the input");
    }
    for target in targets {
        let path = output_path(&args.input, source, target, &args.out_dir);
        export_mesh(&mesh, &path).with_context(|| format!("Failed to export {}", path.display()))?;
        println!("  [OK] Exported: {}", path.display());
    }
    Ok(())
}

/// Requested formats other than the source's, without repeats.
fn conversion_targets(source: MeshFormat, requested: &[MeshFormat]) -> Vec<MeshFormat> {
    let mut targets = Vec::new();
    for &format in requested {
        if !format.same_family(source) && !targets.contains(&format) {
            targets.push(format);
        }
    }
    targets
}

/// `<stem>_from_<source ext>.<target ext>` inside `out_dir`.
fn output_path(input: &Path, source: MeshFormat, target: MeshFormat, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    out_dir.join(format!("{stem}_from_{}.{}", source.extension(), target.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use viscomp_core::Mesh;

    #[test]
    fn test_output_path_naming() {
        let path = output_path(
            Path::new("models/model_one.obj"),
            MeshFormat::Obj,
            MeshFormat::Glb,
            Path::new("output"),
        );
        assert_eq!(path, Path::new("output/model_one_from_obj.glb"));
    }

    #[test]
    fn test_targets_skip_source_family() {
        let all = [MeshFormat::Stl, MeshFormat::Obj, MeshFormat::Glb];
        assert_eq!(
            conversion_targets(MeshFormat::Gltf, &all),
            vec![MeshFormat::Stl, MeshFormat::Obj]
        );
        assert_eq!(
            conversion_targets(MeshFormat::Stl, &[MeshFormat::Obj, MeshFormat::Obj]),
            vec![MeshFormat::Obj]
        );
    }

    #[test]
    fn test_gltf_target_is_rejected() {
        assert!(parse_target("gltf").is_err());
        assert_eq!(parse_target("GLB"), Ok(MeshFormat::Glb));
    }

    #[test]
    fn test_convert_stl_to_obj_and_glb() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("part.stl");
        export_mesh(&Mesh::cube(1.0), &input).unwrap();
        let out_dir = dir.path().join("out");

        execute(ConvertArgs {
            input,
            to: vec![MeshFormat::Stl, MeshFormat::Obj, MeshFormat::Glb],
            out_dir: out_dir.clone(),
        })
        .unwrap();

        assert!(!out_dir.join("part_from_stl.stl").exists());
        for name in ["part_from_stl.obj", "part_from_stl.glb"] {
            let mesh = load_mesh(&out_dir.join(name)).unwrap();
            assert_eq!(mesh.faces.len(), 12);
        }
    }
}
