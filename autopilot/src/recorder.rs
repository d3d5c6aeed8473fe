//! Flight-log capture. Recording is an injected capability: the runner always
//! captures through a `FrameRecorder`, and callers that want no log pass the
//! no-op implementation.

use anyhow::{Context, Result};
use lander_sim_core::sim::Observation;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait FrameRecorder {
    fn capture_frame(&mut self, frame: u32, state: &Observation) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

pub struct NullRecorder;

impl FrameRecorder for NullRecorder {
    fn capture_frame(&mut self, _frame: u32, _state: &Observation) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct FrameRow<'a> {
    frame: u32,
    state: &'a Observation,
}

/// Appends one JSON line per captured frame; a replayable stand-in for video
/// capture in a headless lab.
pub struct JsonlRecorder {
    path: PathBuf,
    writer: BufWriter<File>,
    frames: u32,
}

impl JsonlRecorder {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("failed creating {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            frames: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl FrameRecorder for JsonlRecorder {
    fn capture_frame(&mut self, frame: u32, state: &Observation) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &FrameRow { frame, state })
            .context("failed encoding flight-log frame")?;
        self.writer
            .write_all(b"\n")
            .with_context(|| format!("failed writing {}", self.path.display()))?;
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("failed flushing {}", self.path.display()))
    }
}
