pub mod assembly;
pub mod assets;
pub mod config;
pub mod display;
pub mod geometry;
pub mod hud;
pub mod logging;
pub mod palette;
pub mod parser;
pub mod pipeline;
pub mod rate;
pub mod renderer;
pub mod rocket;
pub mod scenes;
pub mod storyboard;

pub use assembly::{AssemblyPlan, AssemblyReport, ClipConcatenator, FilmAssembler};
pub use assets::AssetLoader;
pub use config::AppConfig;
pub use parser::StoryboardParser;
pub use pipeline::Production;
pub use renderer::{Compositor, FrameBuffer, RenderEngine, Timeline};
pub use storyboard::{SceneKind, Storyboard};
