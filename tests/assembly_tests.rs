use anyhow::Result;
use starship_film::assembly::{ClipConcatenator, FilmAssembler};
use starship_film::storyboard::Storyboard;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Default)]
struct RecordingConcatenator {
    calls: Mutex<Vec<(Vec<PathBuf>, PathBuf)>>,
}

impl ClipConcatenator for RecordingConcatenator {
    fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((clips.to_vec(), output.to_path_buf()));
        std::fs::write(output, b"film")?;
        Ok(())
    }
}

#[test]
fn test_missing_clip_is_skipped_and_order_kept() {
    let dir = TempDir::new().unwrap();
    let clips_dir = dir.path().join("clips");
    std::fs::create_dir_all(&clips_dir).unwrap();

    let storyboard = Storyboard::default();
    let candidates = storyboard.clip_paths(&clips_dir);
    assert_eq!(candidates.len(), 5);

    // Everything but the Mars landing was rendered
    for clip in &candidates {
        if !clip.ends_with("starship_mars_landing.mp4") {
            std::fs::write(clip, b"clip").unwrap();
        }
    }

    let output = dir.path().join("Compiled/1080p60/Complete_Film.mp4");
    let assembler = FilmAssembler::new(RecordingConcatenator::default());
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let report = tracing::subscriber::with_default(subscriber, || {
        assembler.assemble(&candidates, &output)
    })
    .unwrap();

    let names: Vec<String> = report
        .clips
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "intro.mp4",
            "starship_liftoff.mp4",
            "starship_scene.mp4",
            "outro.mp4"
        ]
    );
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].ends_with("starship_mars_landing.mp4"));
    assert!(output.exists());

    let calls = assembler.concatenator().calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, report.clips);

    let logs = logs.contents();
    let warnings: Vec<&str> = logs
        .lines()
        .filter(|line| line.contains("Missing clip, skipping"))
        .collect();
    assert_eq!(warnings.len(), 1, "logs:\n{}", logs);
    assert!(warnings[0].contains("WARN"));
    assert!(warnings[0].contains("starship_mars_landing.mp4"));
}

#[test]
fn test_all_missing_fails_without_concatenating() {
    let dir = TempDir::new().unwrap();
    let candidates = Storyboard::default().clip_paths(dir.path());
    let output = dir.path().join("film.mp4");

    let assembler = FilmAssembler::new(RecordingConcatenator::default());
    let err = assembler.assemble(&candidates, &output).unwrap_err();

    assert!(err.to_string().contains("No rendered clips"));
    assert!(!output.exists());
}
