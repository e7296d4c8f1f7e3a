use crate::config::FilmConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Codec settings for the final film
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub codec: String,
    pub preset: String,
    pub bitrate: String,
    pub fps: u32,
}

impl EncodeSettings {
    pub fn from_config(film: &FilmConfig, fps: u32) -> Self {
        Self {
            codec: film.codec.clone(),
            preset: film.preset.clone(),
            bitrate: film.bitrate.clone(),
            fps,
        }
    }
}

/// Handles video encoding using external FFmpeg process
pub struct VideoEncoder;

impl VideoEncoder {
    /// Check if FFmpeg is available
    pub fn is_available() -> bool {
        Command::new("ffmpeg").arg("-version").output().is_ok()
    }

    /// Encode a sequence of frames to a video file
    ///
    /// # Arguments
    /// * `frame_pattern` - Pattern for input frames (e.g., "frames/frame_%05d.ppm")
    /// * `output_path` - Path for the output video (e.g., "intro.mp4")
    /// * `fps` - Frames per second
    /// * `width` - Video width
    /// * `height` - Video height
    pub fn encode(
        frame_pattern: &Path,
        output_path: &Path,
        fps: u32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if !Self::is_available() {
            anyhow::bail!("FFmpeg not found. Please install ffmpeg to enable video encoding.");
        }

        info!("🎥 Encoding video to {}...", output_path.display());

        let status = Command::new("ffmpeg")
            .arg("-y") // Overwrite output
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg("image2") // Input format
            .arg("-framerate")
            .arg(fps.to_string())
            .arg("-i")
            .arg(frame_pattern)
            .arg("-c:v")
            .arg("libx264") // Video codec
            .arg("-pix_fmt")
            .arg("yuv420p") // Pixel format for compatibility
            .arg("-s")
            .arg(format!("{}x{}", width, height))
            .arg(output_path)
            .status()
            .context("Failed to execute ffmpeg")?;

        if !status.success() {
            anyhow::bail!("FFmpeg encoding failed");
        }

        Ok(())
    }

    /// Join clips end to end into `output_path`, re-encoding with `settings`
    pub fn concat(clips: &[PathBuf], output_path: &Path, settings: &EncodeSettings) -> Result<()> {
        if clips.is_empty() {
            anyhow::bail!("No clips to concatenate");
        }
        if !Self::is_available() {
            anyhow::bail!("FFmpeg not found. Please install ffmpeg to assemble the film.");
        }

        let list_path = output_path.with_extension("concat.txt");
        std::fs::write(&list_path, concat_list(clips)?)
            .with_context(|| format!("Failed to write concat list: {}", list_path.display()))?;

        info!("🎞️  Concatenating {} clips into {}", clips.len(), output_path.display());

        let status = Command::new("ffmpeg")
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(&list_path)
            .args(concat_output_args(settings))
            .arg(output_path)
            .status();
        let _ = std::fs::remove_file(&list_path);
        let status = status.context("Failed to execute ffmpeg")?;

        if !status.success() {
            anyhow::bail!("FFmpeg concatenation failed");
        }

        Ok(())
    }
}

/// Concat-demuxer list with one quoted absolute path per line
pub fn concat_list(clips: &[PathBuf]) -> Result<String> {
    let mut list = String::new();
    for clip in clips {
        let absolute = std::path::absolute(clip)
            .with_context(|| format!("Failed to resolve clip path: {}", clip.display()))?;
        let escaped = absolute.to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    Ok(list)
}

fn concat_output_args(settings: &EncodeSettings) -> Vec<String> {
    vec![
        "-c:v".to_string(),
        settings.codec.clone(),
        "-preset".to_string(),
        settings.preset.clone(),
        "-b:v".to_string(),
        settings.bitrate.clone(),
        "-r".to_string(),
        settings.fps.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-an".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_list_quotes_paths() {
        let clips = vec![
            PathBuf::from("/clips/intro.mp4"),
            PathBuf::from("/clips/it's.mp4"),
        ];
        let list = concat_list(&clips).unwrap();
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines[0], "file '/clips/intro.mp4'");
        assert_eq!(lines[1], "file '/clips/it'\\''s.mp4'");
    }

    #[test]
    fn test_concat_list_makes_paths_absolute() {
        let list = concat_list(&[PathBuf::from("media/outro.mp4")]).unwrap();
        let path = list
            .trim()
            .trim_start_matches("file '")
            .trim_end_matches('\'');
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("media/outro.mp4"));
    }

    #[test]
    fn test_output_args_follow_settings() {
        let settings = EncodeSettings::from_config(&FilmConfig::default(), 60);
        let args = concat_output_args(&settings);
        let joined = args.join(" ");
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-preset medium"));
        assert!(joined.contains("-b:v 8000k"));
        assert!(joined.contains("-r 60"));
        assert!(joined.ends_with("-an"));
        assert!(!joined.contains("-c:a"));
    }

    #[test]
    fn test_concat_rejects_empty_input() {
        let settings = EncodeSettings::from_config(&FilmConfig::default(), 60);
        let err = VideoEncoder::concat(&[], Path::new("out.mp4"), &settings).unwrap_err();
        assert!(err.to_string().contains("No clips"));
    }
}
