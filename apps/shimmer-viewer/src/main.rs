use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shimmer_assets::{
    AssetBundle, AssetLoader, AssetSlot, FilterMode, GlyphSetLoader, StartupLoads, TextLoader,
    TextureLoader,
};
use shimmer_common::Color;
use shimmer_frame::FrameLoop;
use shimmer_input::{InputController, OrbitController};
use shimmer_panel::ControlPanel;
use shimmer_params::ParamValue;
use shimmer_render::{DebugTextRenderer, Renderer};
use shimmer_runtime::SceneRuntime;

#[derive(Parser)]
#[command(name = "shimmer-viewer", about = "Headless viewer for the shimmer demo scene")]
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
    /// Load the demo assets and run a scripted edit session
    Run {
        /// Directory holding shader.vs, shader.fs, font.json, envmap.png
        #[arg(short, long, default_value = "demos/assets")]
        assets: PathBuf,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("shimmer-viewer v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", shimmer_assets::crate_info());
            println!("params: {}", shimmer_params::crate_info());
            println!("frame: {}", shimmer_frame::crate_info());
            println!("render: {}", shimmer_render::crate_info());
            println!("input: {}", shimmer_input::crate_info());
            println!("panel: {}", shimmer_panel::crate_info());
            println!("runtime: {}", shimmer_runtime::crate_info());
        }
        Commands::Run { assets, frames } => run_session(&assets, frames)?,
    }

    Ok(())
}

/// Resolve the four startup loads and seal the bundle.
fn load_bundle(dir: &Path) -> anyhow::Result<AssetBundle> {
    let loads = [
        (AssetSlot::VertexShader, TextLoader.load(&dir.join("shader.vs"))?),
        (
            AssetSlot::FragmentShader,
            TextLoader.load(&dir.join("shader.fs"))?,
        ),
        (AssetSlot::GlyphSet, GlyphSetLoader.load(&dir.join("font.json"))?),
        (
            AssetSlot::EnvMap,
            TextureLoader::with_filter(FilterMode::Nearest).load(&dir.join("envmap.png"))?,
        ),
    ];

    let mut startup = StartupLoads::new();
    let mut bundle = None;
    for (slot, asset) in loads {
        if let Some(done) = startup.complete(slot, asset)? {
            bundle = Some(done);
        }
    }
    bundle.ok_or_else(|| anyhow::anyhow!("startup loads never completed"))
}

/// Build the demo control surface over the runtime's parameters.
fn build_panel(runtime: &SceneRuntime) -> anyhow::Result<ControlPanel> {
    let handles = *runtime.handles();
    let range = |h| runtime.registry().range(h).ok().flatten();

    let mut panel = ControlPanel::new("shimmer");
    panel.add_control("message", handles.message, None);

    panel
        .folder("Geometry")
        .add_control("depth", handles.height, range(handles.height))
        .add_control(
            "curve segments",
            handles.curve_segments,
            range(handles.curve_segments),
        );

    panel
        .folder("Bevel")
        .add_control("enabled", handles.bevel_enabled, None)
        .add_control(
            "thickness",
            handles.bevel_thickness,
            range(handles.bevel_thickness),
        )
        .add_control("size", handles.bevel_size, range(handles.bevel_size))
        .add_control("offset", handles.bevel_offset, range(handles.bevel_offset))
        .add_control(
            "segments",
            handles.bevel_segments,
            range(handles.bevel_segments),
        );

    panel
        .folder("Thin Film")
        .add_control(
            "thickness",
            handles.film_thickness,
            range(handles.film_thickness),
        )
        .add_control("index", handles.film_index, range(handles.film_index))
        .add_control(
            "polarization",
            handles.film_polarization,
            range(handles.film_polarization),
        );

    panel
        .folder("Misc")
        .add_control("spin rate", handles.spin_rate, range(handles.spin_rate))
        .add_control("light color", handles.light_color, None);

    Ok(panel)
}

/// Edits a user might make, delivered at fixed frame numbers.
fn scripted_edit(runtime: &SceneRuntime, frame: u64) -> Option<(shimmer_params::ParamHandle, ParamValue)> {
    let handles = runtime.handles();
    match frame {
        30 => Some((handles.message, ParamValue::Text("shimmer".into()))),
        45 => Some((handles.film_thickness, ParamValue::Float(1200.0))),
        60 => Some((handles.height, ParamValue::Float(80.0))),
        75 => Some((handles.spin_rate, ParamValue::Float(0.5))),
        90 => Some((handles.bevel_enabled, ParamValue::Bool(false))),
        105 => Some((handles.light_color, ParamValue::Color(Color::from_hex(0x88ccff)))),
        _ => None,
    }
}

fn run_session(assets: &Path, frames: u64) -> anyhow::Result<()> {
    let bundle = load_bundle(assets)?;
    tracing::info!(dir = %assets.display(), "startup loads complete");

    let mut runtime = SceneRuntime::new(bundle)?;
    let panel = build_panel(&runtime)?;
    println!("{}", panel.render_text(runtime.registry()));

    let mut orbit = OrbitController::new(400.0);
    let mut renderer = DebugTextRenderer::new();
    let mut frame_loop = FrameLoop::new();
    let mut frame = 0u64;

    frame_loop.run(Some(frames), |delta| {
        frame += 1;

        // A rejected edit leaves the scene consistent; rendering stays
        // best-effort.
        if let Some((handle, value)) = scripted_edit(&runtime, frame) {
            match runtime.set_value(handle, value) {
                Ok(stored) => tracing::info!(frame, ?stored, "edit applied"),
                Err(err) => tracing::error!(frame, %err, "edit rejected"),
            }
        }

        // A slow steady drag, consumed before the view is read.
        orbit.queue_drag(4.0);
        orbit.update();

        runtime.tick(delta);
        let view = orbit.view();
        let line = renderer.render(&runtime.frame(&view), delta);
        if frame % 30 == 0 || frame == 1 {
            println!("{line}");
        }
        true
    });

    println!("{}", panel.render_text(runtime.registry()));
    println!(
        "rebuilds={} disposals={} avg_frame={:?}",
        runtime.rebuilds(),
        runtime.disposals(),
        frame_loop.timer().average(),
    );

    let disposed = runtime.shutdown()?;
    tracing::info!(?disposed, frames = frame_loop.frames(), "session ended");
    Ok(())
}
