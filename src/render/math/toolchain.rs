//! External TeX programs.

use crate::config::ToolPaths;
use crate::error::ToolchainError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Number of trailing output lines kept in a failure report.
const OUTPUT_TAIL_LINES: usize = 20;

/// The three conversions a formula goes through.
///
/// Every step runs with `workdir` as its current directory and refers to
/// files by name relative to it.
pub trait Toolchain: Send + Sync {
    /// Compile `tex_file` to a DVI file of the same stem.
    fn compile(&self, workdir: &Path, tex_file: &str) -> Result<(), ToolchainError>;

    /// Convert `dvi_file` to an SVG file of the same stem.
    fn dvi_to_svg(&self, workdir: &Path, dvi_file: &str) -> Result<(), ToolchainError>;

    /// Rasterize `dvi_file` to `png_file` at `dpi`, returning the tool's
    /// report (which carries the `depth=` field).
    fn dvi_to_png(
        &self,
        workdir: &Path,
        dvi_file: &str,
        png_file: &str,
        dpi: u32,
    ) -> Result<String, ToolchainError>;
}

/// Toolchain that runs `latex`, `dvisvgm` and `dvipng` as subprocesses.
#[derive(Debug, Clone, Default)]
pub struct SystemToolchain {
    tools: ToolPaths,
}

impl SystemToolchain {
    /// Create a toolchain using the given program names.
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    fn run(&self, program: &str, args: &[&str], workdir: &Path) -> Result<String, ToolchainError> {
        debug!(program, ?args, workdir = %workdir.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolchainError::Spawn {
                tool: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolchainError::Failed {
                tool: program.to_string(),
                status: output.status,
                output: tail(&format!("{}{}", stdout, stderr)),
            });
        }

        Ok(stdout)
    }
}

impl Toolchain for SystemToolchain {
    fn compile(&self, workdir: &Path, tex_file: &str) -> Result<(), ToolchainError> {
        self.run(&self.tools.latex, &["-halt-on-error", tex_file], workdir)
            .map(drop)
    }

    fn dvi_to_svg(&self, workdir: &Path, dvi_file: &str) -> Result<(), ToolchainError> {
        // Without --cache=none the element order differs between runs,
        // which makes committed artifacts churn.
        self.run(
            &self.tools.dvisvgm,
            &["--cache=none", "-n", "-b", "min", "-e", dvi_file],
            workdir,
        )
        .map(drop)
    }

    fn dvi_to_png(
        &self,
        workdir: &Path,
        dvi_file: &str,
        png_file: &str,
        dpi: u32,
    ) -> Result<String, ToolchainError> {
        let dpi = dpi.to_string();
        self.run(
            &self.tools.dvipng,
            &["-T", "tight", "-D", &dpi, "--depth", "-o", png_file, dvi_file],
            workdir,
        )
    }
}

fn tail(output: &str) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}
