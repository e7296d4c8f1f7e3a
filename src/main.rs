use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use starship_film::hud::{LandingTelemetry, OrbitTelemetry};
use starship_film::logging::init_logging;
use starship_film::pipeline::{self, Production};
use starship_film::renderer::VideoEncoder;
use starship_film::rocket::{build_lander, build_rocket, RocketParams};
use starship_film::scenes::build_scene;
use starship_film::storyboard::SceneEntry;
use starship_film::{AppConfig, AssetLoader, RenderEngine, SceneKind, Storyboard, StoryboardParser};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "starship-film")]
#[command(about = "Procedural Starship promo film renderer", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./starship-film.{toml,json} if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storyboard file (JSON or TOML); the built-in five-scene film otherwise
    #[arg(long, global = true)]
    storyboard: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single scene to its clip
    Render {
        #[arg(value_enum)]
        scene: SceneKind,

        /// Render frames only, without encoding
        #[arg(long)]
        frames_only: bool,
    },
    /// Render one frame of a scene to an image
    Still {
        #[arg(value_enum)]
        scene: SceneKind,

        /// Scene time in seconds
        #[arg(short, long, default_value_t = 0.0)]
        time: f32,

        /// Output image (PNG)
        #[arg(short, long, default_value = "still.png")]
        output: PathBuf,
    },
    /// Concatenate rendered clips into the final film, skipping missing ones
    Assemble {
        /// Clips in film order; the storyboard's clips when omitted
        clips: Vec<PathBuf>,

        /// Final film path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print HUD telemetry at a point of a scene
    Hud {
        #[arg(value_enum)]
        kind: HudKind,

        /// Scene progress in [0, 1]
        #[arg(short, long, default_value_t = 0.0)]
        progress: f32,

        /// Orbital leg (orbit HUD only)
        #[arg(long, default_value_t = 0)]
        leg: usize,

        /// Print JSON instead of the text panel
        #[arg(long)]
        json: bool,
    },
    /// Print the shapes of a rocket preset as JSON
    Rocket {
        /// liftoff, orbit or lander
        preset: String,
    },
    /// Storyboard helpers
    Storyboard {
        #[command(subcommand)]
        action: StoryboardAction,
    },
}

#[derive(Subcommand)]
enum StoryboardAction {
    /// Write the built-in storyboard as JSON
    Init {
        /// Destination file; stdout when omitted
        file: Option<PathBuf>,
    },
    /// Validate and summarize a storyboard
    Show { file: Option<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum HudKind {
    Landing,
    Orbit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging.level);

    let storyboard = match &cli.storyboard {
        Some(path) => StoryboardParser::parse_file(path)?,
        None => pipeline::default_storyboard(&config)?,
    };

    match cli.command {
        None => {
            println!("🎬 Starship film\n");
            println!("{}", StoryboardParser::summarize(&storyboard));
            let mut loader = AssetLoader::new(&config.assets.base_path);
            let production = Production::new(&config, storyboard);
            let report = production.run(&mut loader)?;
            println!("\n📊 Asset Statistics:");
            println!("  {}", loader.stats());
            println!("\n✨ Film assembled\n{}", report);
        }
        Some(Commands::Render { scene, frames_only }) => {
            let entry = storyboard
                .scenes
                .iter()
                .find(|entry| entry.kind == scene)
                .cloned()
                .unwrap_or_else(|| SceneEntry::new(scene.default_id(), scene));
            let mut loader = AssetLoader::new(&config.assets.base_path);

            if frames_only || !VideoEncoder::is_available() {
                if !frames_only {
                    pipeline::print_ffmpeg_hint();
                }
                let frames_dir = pipeline::frames_dir_for(&config, &entry.id);
                render_frames(&storyboard, &entry, &mut loader, &config, &frames_dir)?;
                println!("Frames are saved in: {}", frames_dir.display());
            } else {
                let production = Production::new(&config, storyboard);
                let clip = production.render_scene(&entry, &mut loader)?;
                println!("✨ Clip created: {}", clip.display());
            }
        }
        Some(Commands::Still {
            scene,
            time,
            output,
        }) => {
            let (width, height) = storyboard.metadata.resolution.dimensions();
            let fps = storyboard.metadata.fps;
            let mut loader = AssetLoader::new(&config.assets.base_path);
            let film_scene = build_scene(scene, &mut loader, &config.assets);
            let engine = RenderEngine::new(film_scene.as_ref(), width, height, fps);

            let frame = (time.max(0.0) * fps as f32).round() as u32;
            engine.render_frame(frame).save_image(&output)?;
            println!("🖼️  Frame {} of {:?} saved to {}", frame, scene, output.display());
        }
        Some(Commands::Assemble { clips, output }) => {
            let production = Production::new(&config, storyboard);
            let clips = if clips.is_empty() {
                production.clip_paths()
            } else {
                clips
            };
            let output = output.unwrap_or_else(|| production.final_output());

            let report = production.assembler().assemble(&clips, &output)?;
            println!("{}", report);
        }
        Some(Commands::Hud {
            kind,
            progress,
            leg,
            json,
        }) => {
            let progress = progress.clamp(0.0, 1.0);
            match kind {
                HudKind::Landing => {
                    let readout = LandingTelemetry::default().at(progress);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&readout)?);
                    } else {
                        println!("{}", readout);
                    }
                }
                HudKind::Orbit => {
                    let readout = OrbitTelemetry::default()
                        .at(leg, progress)
                        .context("Orbit telemetry has no legs")?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&readout)?);
                    } else {
                        println!("{}", readout);
                    }
                }
            }
        }
        Some(Commands::Rocket { preset }) => {
            let params = RocketParams::preset(&preset).with_context(|| {
                format!("Unknown rocket preset '{}' (liftoff, orbit, lander)", preset)
            })?;
            let json = if preset == "lander" {
                let (assembly, gear) = build_lander(&params);
                serde_json::to_string_pretty(&serde_json::json!({
                    "assembly": assembly,
                    "gear": gear,
                }))?
            } else {
                serde_json::to_string_pretty(&build_rocket(&params))?
            };
            println!("{}", json);
        }
        Some(Commands::Storyboard { action }) => match action {
            StoryboardAction::Init { file } => {
                let json = serde_json::to_string_pretty(&pipeline::default_storyboard(&config)?)?;
                match file {
                    Some(path) => {
                        std::fs::write(&path, json).with_context(|| {
                            format!("Failed to write storyboard: {}", path.display())
                        })?;
                        println!("📝 Storyboard written to {}", path.display());
                    }
                    None => println!("{}", json),
                }
            }
            StoryboardAction::Show { file } => {
                let storyboard = match file {
                    Some(path) => StoryboardParser::parse_file(&path)?,
                    None => storyboard,
                };
                println!("📋 Storyboard Summary:");
                println!("{}", StoryboardParser::summarize(&storyboard));
            }
        },
    }

    Ok(())
}

fn render_frames(
    storyboard: &Storyboard,
    entry: &SceneEntry,
    loader: &mut AssetLoader,
    config: &AppConfig,
    frames_dir: &Path,
) -> Result<()> {
    let (width, height) = storyboard.metadata.resolution.dimensions();
    let scene = build_scene(entry.kind, loader, &config.assets);
    let engine = RenderEngine::new(scene.as_ref(), width, height, storyboard.metadata.fps);
    let frames = engine.render(frames_dir)?;
    println!("🎨 Rendered {} frames of '{}'", frames, entry.id);
    Ok(())
}
