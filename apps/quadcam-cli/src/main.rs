use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use quadcam_camera::{CameraConfig, CameraSystem, look_at};
use quadcam_common::WindowConfig;
use quadcam_input::{InputEvent, InputHandler, Key, KeyAction};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quadcam-cli", about = "CLI tool for quadcam camera operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the look-at view matrix for an eye and target
    LookAt {
        /// Camera position as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        eye: Vec3,
        /// Point looked at as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        target: Vec3,
        /// World up as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,1,0")]
        up: Vec3,
    },
    /// Replay a JSON array of input events through the camera
    Replay {
        /// Script file
        #[arg(short, long)]
        script: PathBuf,
        /// Camera config JSON
        #[arg(long)]
        camera_config: Option<PathBuf>,
    },
    /// Hold keys for a number of fixed-length frames
    Simulate {
        /// Number of frames
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Keys held for the whole run, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "w")]
        keys: Vec<Key>,
        /// Camera config JSON
        #[arg(long)]
        camera_config: Option<PathBuf>,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got {s:?}"));
    };
    let parse = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("invalid component {v:?}: {e}"))
    };
    Ok(Vec3::new(parse(x)?, parse(y)?, parse(z)?))
}

fn load_camera(path: Option<&Path>) -> anyhow::Result<CameraSystem> {
    let config = match path {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("load camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    Ok(CameraSystem::new(config, &WindowConfig::default()))
}

fn print_matrix(m: &Mat4) {
    // Rows, so the translation shows up in the last column.
    for r in 0..4 {
        let row = m.row(r);
        println!(
            "  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
            row.x, row.y, row.z, row.w
        );
    }
}

fn print_camera(cam: &CameraSystem) {
    let s = cam.state();
    println!(
        "position=({:.3}, {:.3}, {:.3}) front=({:.3}, {:.3}, {:.3})",
        s.position.x, s.position.y, s.position.z, s.front.x, s.front.y, s.front.z
    );
    println!(
        "yaw={:.2} pitch={:.2} fov={:.2}",
        s.yaw, s.pitch, s.fov
    );
    println!("view:");
    print_matrix(&cam.view_matrix());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("quadcam-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", quadcam_common::crate_info());
            println!("input: {}", quadcam_input::crate_info());
            println!("camera: {}", quadcam_camera::crate_info());
            println!("render: {}", quadcam_render_wgpu::crate_info());
            println!(
                "defaults: {}",
                CameraConfig::default().to_json_pretty()?
            );
        }
        Commands::LookAt { eye, target, up } => {
            if eye == target {
                bail!("eye and target coincide; no view direction");
            }
            let view = look_at(eye, target, up);
            if !view.is_finite() {
                bail!("up vector is parallel to the view direction");
            }
            println!("look_at eye={eye} target={target} up={up}");
            print_matrix(&view);

            let reference = Mat4::look_at_rh(eye, target, up);
            println!(
                "Match glam look_at_rh: {}",
                if view.abs_diff_eq(reference, 1e-5) {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
        Commands::Replay {
            script,
            camera_config,
        } => {
            let json = std::fs::read_to_string(&script)
                .with_context(|| format!("read script {}", script.display()))?;
            let events: Vec<InputEvent> = serde_json::from_str(&json)
                .with_context(|| format!("parse script {}", script.display()))?;

            let mut cam = load_camera(camera_config.as_deref())?;
            for event in &events {
                cam.handle(event);
            }
            tracing::info!("replayed {} events", events.len());
            println!("Replayed {} events from {}", events.len(), script.display());
            print_camera(&cam);
        }
        Commands::Simulate {
            frames,
            dt,
            keys,
            camera_config,
        } => {
            let mut cam = load_camera(camera_config.as_deref())?;
            for key in &keys {
                cam.on_key(*key, KeyAction::Pressed);
            }
            let start = cam.state().position;
            for frame in 1..=frames {
                cam.frame(frame as f32 * dt);
            }
            let travelled = (cam.state().position - start).length();

            let names: Vec<String> = keys.iter().map(Key::to_string).collect();
            println!(
                "Simulated {frames} frames of {dt}s holding [{}]: travelled {travelled:.3}",
                names.join(", ")
            );
            print_camera(&cam);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_parsing() {
        assert_eq!(parse_vec3("0,0,3"), Ok(Vec3::new(0.0, 0.0, 3.0)));
        assert_eq!(parse_vec3(" -1 , 2.5, 0 "), Ok(Vec3::new(-1.0, 2.5, 0.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn cli_parses_negative_vectors() {
        let cli = Cli::parse_from([
            "quadcam-cli",
            "look-at",
            "--eye",
            "-1,0,3",
            "--target",
            "0,0,0",
        ]);
        match cli.command {
            Commands::LookAt { eye, up, .. } => {
                assert_eq!(eye, Vec3::new(-1.0, 0.0, 3.0));
                assert_eq!(up, Vec3::Y);
            }
            _ => panic!("expected look-at"),
        }
    }

    #[test]
    fn cli_parses_key_list() {
        let cli = Cli::parse_from(["quadcam-cli", "simulate", "--keys", "w,d", "-f", "10"]);
        match cli.command {
            Commands::Simulate { keys, frames, .. } => {
                assert_eq!(keys, vec![Key::W, Key::D]);
                assert_eq!(frames, 10);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn demo_script_replays() {
        let json = include_str!("../../../demos/look_around.json");
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        let mut cam = load_camera(None).unwrap();
        for event in &events {
            cam.handle(event);
        }
        let s = cam.state();
        assert!(s.yaw > -90.0);
        assert!(s.pitch > 0.0);
        assert_eq!(s.fov, 30.0);
        assert!(!cam.is_key_pressed(Key::W));
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn demo_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/slow_camera.json");
        let cam = load_camera(Some(path.as_path())).unwrap();
        assert_eq!(cam.config().movement_speed, 2.5);
    }

    #[test]
    fn cli_rejects_unknown_key() {
        let res = Cli::try_parse_from(["quadcam-cli", "simulate", "--keys", "q"]);
        assert!(res.is_err());
    }
}
