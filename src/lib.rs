//! # adoc-mathsvg
//!
//! Markup extensions that render LaTeX formulas to SVG images at build time,
//! plus a comment-widget embed.
//!
//! ## Features
//!
//! - **Inline math**: `math:[E = mc^2]` becomes an `<img>` sized in `ex` so the
//!   formula lines up with the surrounding text
//! - **Block math**: a listing styled `[math]` becomes an image block
//! - **Comments**: `disqus::page-id[]` embeds the Disqus widget
//!
//! Formulas are compiled with `latex`, converted with `dvisvgm`, and measured
//! with `dvipng`. Each SVG is written to the output directory as
//! `math-<16 hex digits of SHA-256(formula)>.svg`, so unchanged formulas keep
//! their file names and contents across builds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adoc_mathsvg::{process, Config};
//!
//! let input = r#"
//! The energy is math:[E = mc^2].
//!
//! [math]
//! ----
//! \int_0^1 x\,dx = \frac{1}{2}
//! ----
//! "#;
//!
//! // MATH_OUTPUT names the directory the SVG files go to
//! let config = Config::from_env();
//! let html = process(input, &config).unwrap();
//! println!("{}", html);
//! ```
//!
//! ## Syntax Reference
//!
//! ### Inline formulas
//!
//! `math:[formula]`. A `]` inside the formula is written `\]`.
//!
//! ### Block formulas
//!
//! ```text
//! [math,width=300]
//! ----
//! a^2 + b^2 = c^2
//! ----
//! ```
//!
//! Without `width` or `height` the image gets a height matching the
//! formula; without `align`, `role` or `float` it gets the role
//! `text-indent`.
//!
//! ### Comments
//!
//! `disqus::my-post[]` on a line of its own; requires a `[disqus]` section
//! in the configuration.
//!
//! ## Configuration
//!
//! See [`config`] for the TOML format. `MATH_OUTPUT` overrides
//! `math.output_dir`.
//!
//! ## Errors
//!
//! A failing tool or a missing output directory aborts the whole run;
//! nothing is skipped silently.

pub mod ast;
pub mod config;
pub mod error;
pub mod extensions;
pub mod parser;
pub mod render;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Convenience re-exports
pub use ast::{Attributes, Document};
pub use config::{Config, DisqusConfig, MathConfig, MetricSettings, ToolPaths};
pub use error::{ConfigError, Error, ParseError, Result, ToolchainError};
pub use extensions::Registry;
pub use parser::parse;
pub use render::{expand, ConversionResult, FormulaRenderer, Metrics, SystemToolchain, Toolchain};
pub use store::{artifact_name, ArtifactStore};

/// Parse a document and expand it with the default extensions.
///
/// This is a convenience function that combines `parse`,
/// `Registry::with_defaults`, and `expand`.
pub fn process(input: &str, config: &Config) -> Result<String> {
    let doc = parse(input)?;
    let registry = Registry::with_defaults(config)?;
    expand(&doc, &registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::{MathBlock, MathInlineMacro, MathPipeline};
    use crate::testing::StubToolchain;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn stub_registry(stub: &StubToolchain, output_dir: Option<&Path>) -> Registry {
        let pipeline = MathPipeline::new(
            FormulaRenderer::new(stub.clone(), MetricSettings::default()),
            ArtifactStore::new(output_dir.map(Path::to_path_buf)),
        );
        let mut registry = Registry::new();
        registry
            .inline_macro(MathInlineMacro::new(pipeline.clone()))
            .block(MathBlock::new(pipeline));
        registry
    }

    #[test]
    fn test_full_pipeline() {
        let input = r#"= Formulas

The square math:[x^2] is inline.

[math]
----
E=mc^2
----

Done.
"#;
        let dir = tempfile::tempdir().unwrap();
        let stub = StubToolchain::new(120, 200, 10);
        let registry = stub_registry(&stub, Some(dir.path()));

        let html = expand(&parse(input).unwrap(), &registry).unwrap();

        let expected = r#"= Formulas

The square <img src="math-5b029881cc5d477a.svg" class="inlinemath" style="height:3.125ex;vertical-align:-0.156ex;" alt="x^2"/> is inline.

<div class="imageblock text-indent">
<div class="content">
<img src="math-f2be93acefe99825.svg" alt="E=mc^2" height="27">
</div>
</div>

Done.
"#;
        assert_eq!(html, expected);
        assert!(dir.path().join("math-5b029881cc5d477a.svg").exists());
        assert!(dir.path().join("math-f2be93acefe99825.svg").exists());
    }

    #[test]
    fn test_empty_formulas_produce_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubToolchain::new(10, 10, 1);
        let registry = stub_registry(&stub, Some(dir.path()));

        let html = expand(&parse("a math:[] b\n[math]\n----\n----\nc").unwrap(), &registry).unwrap();

        assert_eq!(html, "a  b\nc");
        assert_eq!(stub.invocations(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_aborts() {
        let stub = StubToolchain::new(10, 10, 1);
        let registry = stub_registry(&stub, None);

        let err = expand(&parse("first math:[x]").unwrap(), &registry).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingOutputDir)));
    }

    #[test]
    fn test_process_without_math() {
        let config = Config::default();
        let input = "Plain text, no formulas.\n";
        assert_eq!(process(input, &config).unwrap(), input);
    }

    #[test]
    fn test_process_with_disqus() {
        let config = Config::from_toml_str(
            "[disqus]\nsite_id = \"example\"\nbase_url = \"https://example.org/\"\n",
        )
        .unwrap();

        let html = process("Comments:\n\ndisqus::hello-world[]\n", &config).unwrap();
        assert!(html.starts_with("Comments:\n\n<div id='disqus_thread'></div>\n"));
        assert!(html.contains("this.page.url = 'https://example.org/hello-world/';"));
    }

    #[test]
    fn test_process_reports_parse_errors() {
        let err = process("[math]\n----\nx", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::UnterminatedBlock { .. })));
    }
}
