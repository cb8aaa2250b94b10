//! Stub toolchain shared by the unit tests.

use crate::error::ToolchainError;
use crate::render::math::{png_header, Toolchain};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Step at which the stub misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    Compile,
    NoSvg,
    NoDepth,
    TruncatedPng,
}

#[derive(Debug, Default)]
struct StubState {
    invocations: AtomicUsize,
    last_workdir: Mutex<Option<PathBuf>>,
    last_dpi: Mutex<Option<u32>>,
}

/// Toolchain that fakes latex, dvisvgm and dvipng.
///
/// The "DVI" is a copy of the TeX source and the SVG embeds it, so
/// different formulas yield different bytes. The PNG is a bare header
/// with the configured dimensions.
#[derive(Debug, Clone)]
pub struct StubToolchain {
    width: u32,
    height: u32,
    depth: u32,
    failure: Option<StubFailure>,
    state: Arc<StubState>,
}

impl StubToolchain {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            failure: None,
            state: Arc::default(),
        }
    }

    pub fn failing(mut self, failure: StubFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Number of tool invocations so far, across clones.
    pub fn invocations(&self) -> usize {
        self.state.invocations.load(Ordering::SeqCst)
    }

    pub fn last_workdir(&self) -> Option<PathBuf> {
        self.state.last_workdir.lock().unwrap().clone()
    }

    pub fn last_dpi(&self) -> Option<u32> {
        *self.state.last_dpi.lock().unwrap()
    }

    fn record(&self, workdir: &Path) {
        self.state.invocations.fetch_add(1, Ordering::SeqCst);
        *self.state.last_workdir.lock().unwrap() = Some(workdir.to_path_buf());
    }
}

fn stem(file: &str) -> &str {
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}

impl Toolchain for StubToolchain {
    fn compile(&self, workdir: &Path, tex_file: &str) -> Result<(), ToolchainError> {
        self.record(workdir);
        if self.failure == Some(StubFailure::Compile) {
            return Err(ToolchainError::Spawn {
                tool: "latex".to_string(),
                source: io::Error::new(io::ErrorKind::Other, "stub compile failure"),
            });
        }
        let tex = std::fs::read(workdir.join(tex_file)).map_err(ToolchainError::WorkDir)?;
        std::fs::write(workdir.join(format!("{}.dvi", stem(tex_file))), tex)
            .map_err(ToolchainError::WorkDir)
    }

    fn dvi_to_svg(&self, workdir: &Path, dvi_file: &str) -> Result<(), ToolchainError> {
        self.record(workdir);
        if self.failure == Some(StubFailure::NoSvg) {
            return Ok(());
        }
        let dvi = std::fs::read_to_string(workdir.join(dvi_file)).map_err(ToolchainError::WorkDir)?;
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><desc>{}</desc></svg>\n",
            dvi
        );
        std::fs::write(workdir.join(format!("{}.svg", stem(dvi_file))), svg)
            .map_err(ToolchainError::WorkDir)
    }

    fn dvi_to_png(
        &self,
        workdir: &Path,
        _dvi_file: &str,
        png_file: &str,
        dpi: u32,
    ) -> Result<String, ToolchainError> {
        self.record(workdir);
        *self.state.last_dpi.lock().unwrap() = Some(dpi);

        let mut png = png_header(self.width, self.height);
        if self.failure == Some(StubFailure::TruncatedPng) {
            png.truncate(12);
        }
        std::fs::write(workdir.join(png_file), png).map_err(ToolchainError::WorkDir)?;

        if self.failure == Some(StubFailure::NoDepth) {
            Ok(" [1] ".to_string())
        } else {
            Ok(format!(" [1 depth={}] ", self.depth))
        }
    }
}
