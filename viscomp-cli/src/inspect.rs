use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, Table};
use tracing::{error, warn};
use viscomp_core::{load_mesh, MeshStats};

#[derive(Args, Debug, Clone)]
#[command(about = "Print statistics for mesh files and compare them")]
pub struct InspectArgs {
    /// Mesh files (.obj, .stl, .gltf, .glb)
    #[arg(value_name = "FILES", required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let stats = collect_stats(&args.files);
    if stats.is_empty() {
        println!("No model was loaded. Check that the files exist and are valid meshes.");
        return Ok(());
    }

    let mut writer = io::stdout().lock();
    for s in &stats {
        write_stats_block(s, &mut writer)?;
    }
    write_comparison_table(&stats, &mut writer)?;
    Ok(())
}

/// Load every file that exists and parses; the rest are reported and skipped.
fn collect_stats(files: &[PathBuf]) -> Vec<MeshStats> {
    let mut stats = Vec::new();
    for path in files {
        if !path.exists() {
            warn!("Not found: {}, skipping", path.display());
            continue;
        }
        match load_mesh(path) {
            Ok(mesh) => stats.push(MeshStats::compute(display_name(path), &mesh)),
            Err(e) => error!("Could not load {}: {e}", path.display()),
        }
    }
    stats
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn write_stats_block<W: Write>(s: &MeshStats, mut writer: W) -> io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(writer, "\n{rule}")?;
    writeln!(writer, "  Model: {}", s.name)?;
    writeln!(writer, "{rule}")?;
    writeln!(writer, "  Vertices          : {}", s.vertices)?;
    writeln!(writer, "  Faces             : {}", s.faces)?;
    writeln!(writer, "  Unique edges      : {}", s.unique_edges)?;
    writeln!(writer, "  Vertex normals    : {}", yes_no(s.has_vertex_normals))?;
    writeln!(writer, "  Face normals      : {}", yes_no(s.has_face_normals))?;
    writeln!(writer, "  Duplicate vertices: {}", s.duplicates)?;
    writeln!(writer, "  Watertight        : {}", s.watertight)?;
    writeln!(
        writer,
        "  Bounding box      : X={:.4}  Y={:.4}  Z={:.4}",
        s.extents.x, s.extents.y, s.extents.z
    )?;
    writeln!(writer, "  Surface area      : {:.4}", s.area)?;
    match s.volume {
        Some(volume) => writeln!(writer, "  Volume            : {volume:.4}")?,
        None => writeln!(writer, "  Volume            : N/A (mesh is not closed)")?,
    }
    writeln!(writer, "{rule}")?;
    Ok(())
}

fn write_comparison_table<W: Write>(stats: &[MeshStats], mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Model", "Vertices", "Faces", "Duplicates", "Watertight", "Area"]);

    for s in stats {
        table.add_row(vec![
            s.name.clone(),
            s.vertices.to_string(),
            s.faces.to_string(),
            s.duplicates.to_string(),
            yes_no(s.watertight).to_string(),
            format!("{:.4}", s.area),
        ]);
    }
    for column in 1..6 {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    writeln!(writer, "\nComparison between models")?;
    writeln!(writer, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use viscomp_core::{export_mesh, Mesh};

    fn cube_stats() -> MeshStats {
        MeshStats::compute("cube.stl", &Mesh::cube(1.0))
    }

    #[test]
    fn test_missing_and_broken_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("cube.obj");
        export_mesh(&Mesh::cube(1.0), &good).unwrap();
        let broken = dir.path().join("broken.obj");
        std::fs::write(&broken, "f 1 2 3\n").unwrap();
        let missing = dir.path().join("missing.stl");

        let stats = collect_stats(&[missing, broken, good]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "cube.obj");
        assert_eq!(stats[0].faces, 12);
    }

    #[test]
    fn test_nothing_loaded_is_not_an_error() {
        let args = InspectArgs {
            files: vec![PathBuf::from("/nonexistent/model.obj")],
        };
        assert!(execute(args).is_ok());
    }

    #[test]
    fn test_stats_block() {
        let mut out = Vec::new();
        write_stats_block(&cube_stats(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Model: cube.stl"));
        assert!(text.contains("Unique edges      : 18"));
        assert!(text.contains("Surface area      : 6.0000"));
        assert!(text.contains("Volume            : 1.0000"));
    }

    #[test]
    fn test_open_mesh_has_no_volume() {
        let mut mesh = Mesh::cube(1.0);
        mesh.faces.pop();
        let mut out = Vec::new();
        write_stats_block(&MeshStats::compute("open", &mesh), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("N/A"));
    }

    #[test]
    fn test_comparison_table_lists_every_model() {
        let mut other = cube_stats();
        other.name = "second.glb".into();
        let mut out = Vec::new();
        write_comparison_table(&[cube_stats(), other], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Watertight"));
        assert!(text.contains("cube.stl"));
        assert!(text.contains("second.glb"));
        assert!(text.contains("6.0000"));
    }
}
