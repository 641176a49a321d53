//! tessel - Load OBJ meshes into indexed vertex/index buffers
//!
//! Loads every file given on the command line, lays the meshes out in a
//! preview scene, and reports what the renderer would receive.

mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tessel_assets::{AssetServer, MeshStats};
use tessel_core::Vec3;
use tessel_scene::Scene;
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::Settings;

const USAGE: &str = "usage: tessel [--json] [--material <texture>] <file.obj>...\n       tessel --init-config";

#[derive(Debug, Default, PartialEq)]
struct Args {
    files: Vec<PathBuf>,
    material: Option<PathBuf>,
    json: bool,
    init_config: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--init-config" => parsed.init_config = true,
            "--material" => {
                let texture = args.next().context("--material needs a texture path")?;
                parsed.material = Some(PathBuf::from(texture));
            }
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with("--") => bail!("unknown flag '{flag}'\n{USAGE}"),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let settings = Settings::load();

    if args.init_config {
        let path = settings.save().context("Failed to write settings")?;
        println!("{}", path.display());
        return Ok(());
    }
    if args.files.is_empty() {
        bail!("no input files\n{USAGE}");
    }

    let mut server = AssetServer::with_options(&settings.assets.base_path, settings.mesh);
    let mut scene = Scene::new();

    let material = match &args.material {
        Some(path) => Some(
            server
                .load_material(path)
                .with_context(|| format!("Failed to load material {}", path.display()))?,
        ),
        None => None,
    };

    for (i, path) in args.files.iter().enumerate() {
        let handle = server
            .load_mesh(path)
            .with_context(|| format!("Failed to load mesh {}", path.display()))?;
        let name = server.get_mesh(handle).map(|m| m.name().to_string()).unwrap_or_default();

        let node = scene.spawn(name, Vec3::new(i as f32 * settings.scene.spacing, 0.0, 0.0));
        scene.set_mesh(node, handle)?;
        if let Some(material) = material {
            scene.set_material(node, material)?;
        }
    }

    let stats: Vec<MeshStats> = scene
        .roots()
        .filter_map(|node| scene.get(node)?.mesh)
        .filter_map(|handle| server.get_mesh(handle))
        .map(|mesh| mesh.stats())
        .collect();

    info!(
        "{} meshes loaded, {} drawable objects",
        server.mesh_count(),
        scene.draw_list().len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for s in &stats {
            print!(
                "{}: {} vertices, {} indices, {} triangles",
                s.name, s.vertices, s.indices, s.triangles
            );
            match s.bounds {
                Some(b) => println!(", bounds {:?} .. {:?}", b.min.to_array(), b.max.to_array()),
                None => println!(),
            }
        }
    }

    Ok(())
}
