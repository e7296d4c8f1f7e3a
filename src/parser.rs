use crate::storyboard::Storyboard;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Storyboard parser that handles JSON/TOML files
pub struct StoryboardParser;

impl StoryboardParser {
    /// Parse a storyboard, picking the format from the file extension
    pub fn parse_file(path: &Path) -> Result<Storyboard> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(path),
            _ => Self::parse_json(path),
        }
    }

    /// Parse a JSON storyboard file
    pub fn parse_json(path: &Path) -> Result<Storyboard> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read storyboard file: {}", path.display()))?;

        let storyboard: Storyboard = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON storyboard: {}", path.display()))?;

        Self::validate(&storyboard)?;

        Ok(storyboard)
    }

    /// Parse a TOML storyboard file
    pub fn parse_toml(path: &Path) -> Result<Storyboard> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read storyboard file: {}", path.display()))?;

        let storyboard: Storyboard = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML storyboard: {}", path.display()))?;

        Self::validate(&storyboard)?;

        Ok(storyboard)
    }

    /// Validate the storyboard structure
    pub fn validate(storyboard: &Storyboard) -> Result<()> {
        if storyboard.metadata.title.is_empty() {
            anyhow::bail!("Storyboard title cannot be empty");
        }

        if storyboard.metadata.fps == 0 {
            anyhow::bail!("FPS must be greater than 0");
        }

        let (width, height) = storyboard.metadata.resolution.dimensions();
        if width == 0 || height == 0 {
            anyhow::bail!("Resolution must be non-zero, got {}x{}", width, height);
        }

        if storyboard.scenes.is_empty() {
            anyhow::bail!("Storyboard must contain at least one scene");
        }

        let mut seen = HashSet::new();
        for (idx, scene) in storyboard.scenes.iter().enumerate() {
            if scene.id.is_empty() {
                anyhow::bail!("Scene {} has empty ID", idx);
            }

            if !seen.insert(scene.id.as_str()) {
                anyhow::bail!("Duplicate scene ID '{}'", scene.id);
            }
        }

        Ok(())
    }

    /// Get a summary of the storyboard structure
    pub fn summarize(storyboard: &Storyboard) -> String {
        let (width, height) = storyboard.metadata.resolution.dimensions();
        let mut summary = String::new();
        summary.push_str(&format!("Title: {}\n", storyboard.metadata.title));
        summary.push_str(&format!("Resolution: {}x{}\n", width, height));
        summary.push_str(&format!("FPS: {}\n", storyboard.metadata.fps));
        summary.push_str(&format!("Scenes: {}\n", storyboard.scenes.len()));

        for (idx, scene) in storyboard.scenes.iter().enumerate() {
            let source = match &scene.clip {
                Some(clip) => format!("clip {}", clip.display()),
                None => "rendered".to_string(),
            };
            summary.push_str(&format!(
                "  Scene {}: '{}' ({:?}, {})\n",
                idx + 1,
                scene.id,
                scene.kind,
                source
            ));
        }

        if let Some(output) = &storyboard.output {
            summary.push_str(&format!("Output: {}\n", output.display()));
        }

        summary
    }
}
