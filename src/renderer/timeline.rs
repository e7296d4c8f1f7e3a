/// Frame-accurate layout of consecutive timed segments (scene beats)
#[derive(Debug, Clone)]
pub struct Timeline {
    fps: u32,
    total_frames: u32,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
struct Segment {
    id: String,
    start_frame: u32,
    end_frame: u32,
}

/// Position inside the timeline: which segment, and how far through it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub segment: usize,
    /// Linear progress in `[0, 1]`; the last frame of a segment reaches 1
    pub progress: f32,
}

impl Cue {
    pub fn new(segment: usize, progress: f32) -> Self {
        Self { segment, progress }
    }

    /// Progress of `segment` as seen from this cue: 0 before it, 1 after it
    pub fn of(&self, segment: usize) -> f32 {
        if self.segment < segment {
            0.0
        } else if self.segment > segment {
            1.0
        } else {
            self.progress
        }
    }

    /// Whether this cue is at or past `segment`
    pub fn reached(&self, segment: usize) -> bool {
        self.segment >= segment
    }
}

impl Timeline {
    /// Lay out `(id, duration in seconds)` segments back to back
    pub fn new<I, S>(fps: u32, segments: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut laid_out = Vec::new();
        let mut current_frame = 0;

        for (id, duration) in segments {
            let frames = (duration * fps as f32).round().max(0.0) as u32;
            laid_out.push(Segment {
                id: id.into(),
                start_frame: current_frame,
                end_frame: current_frame + frames,
            });
            current_frame += frames;
        }

        Self {
            fps,
            total_frames: current_frame,
            segments: laid_out,
        }
    }

    /// Get segment id at given frame number
    pub fn segment_at_frame(&self, frame: u32) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| frame >= s.start_frame && frame < s.end_frame)
            .map(|s| s.id.as_str())
    }

    /// Segment index and local progress at `frame`
    pub fn cue_at_frame(&self, frame: u32) -> Option<Cue> {
        self.segments
            .iter()
            .enumerate()
            .find(|(_, s)| frame >= s.start_frame && frame < s.end_frame)
            .map(|(index, s)| {
                let frames = s.end_frame - s.start_frame;
                let progress = if frames <= 1 {
                    1.0
                } else {
                    (frame - s.start_frame) as f32 / (frames - 1) as f32
                };
                Cue::new(index, progress)
            })
    }

    /// Get total frame count
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Get FPS
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Convert frame number to time in seconds
    pub fn frame_to_time(&self, frame: u32) -> f32 {
        frame as f32 / self.fps as f32
    }

    pub fn duration(&self) -> f32 {
        self.frame_to_time(self.total_frames)
    }
}
