//! Configuration for the math and comment-widget extensions.
//!
//! Configuration is read from TOML and overridden by the environment:
//!
//! ```text
//! [math]
//! output_dir = "public/math"
//! scaling_factor = 4.0
//!
//! [math.tools]
//! latex = "/usr/bin/latex"
//!
//! [disqus]
//! site_id = "example"
//! base_url = "https://example.org/"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the directory rendered formulas are written to.
pub const MATH_OUTPUT_ENV: &str = "MATH_OUTPUT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Formula rendering and storage.
    pub math: MathConfig,
    /// Comment widget; the `disqus` macro is only registered when set.
    pub disqus: Option<DisqusConfig>,
}

/// Formula rendering and storage settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathConfig {
    /// Directory that receives `math-*.svg` artifacts.
    pub output_dir: Option<PathBuf>,
    /// Pixel metrics used to size the rendered images.
    pub metrics: MetricSettings,
    /// External programs.
    pub tools: ToolPaths,
}

/// Constants that relate raster pixels to the surrounding page's font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSettings {
    /// Main HTML font size in pixels.
    pub font_size_px: f64,
    /// CSS pixels per ex of the main font.
    pub px_per_ex: f64,
    /// Selected so that a simple single-line formula is as tall as the main font.
    pub dpi_per_px: f64,
    /// Oversampling for dvipng; at least 2.0 for high-density displays.
    pub scaling_factor: f64,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            font_size_px: 16.0,
            px_per_ex: 8.5,
            dpi_per_px: 14.454,
            scaling_factor: 4.0,
        }
    }
}

impl MetricSettings {
    /// Resolution passed to dvipng.
    pub fn dpi(&self) -> u32 {
        (self.font_size_px * self.dpi_per_px * self.scaling_factor).round() as u32
    }

    /// Raster pixels per ex once the oversampling is divided out.
    pub fn raster_px_per_ex(&self) -> f64 {
        self.font_size_px * self.scaling_factor
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("math.font_size_px", self.font_size_px),
            ("math.px_per_ex", self.px_per_ex),
            ("math.dpi_per_px", self.dpi_per_px),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting {
                    key,
                    message: format!("must be a positive number, got {}", value),
                });
            }
        }
        if !(self.scaling_factor.is_finite() && self.scaling_factor >= 2.0) {
            return Err(ConfigError::InvalidSetting {
                key: "math.scaling_factor",
                message: format!("must be at least 2.0, got {}", self.scaling_factor),
            });
        }
        Ok(())
    }
}

/// Program names (or paths) of the TeX toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub latex: String,
    pub dvisvgm: String,
    pub dvipng: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            latex: "latex".to_string(),
            dvisvgm: "dvisvgm".to_string(),
            dvipng: "dvipng".to_string(),
        }
    }
}

/// Comment widget settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisqusConfig {
    /// Disqus shortname; the embed script is loaded from `//<site_id>.disqus.com`.
    pub site_id: String,
    /// Site root that page identifiers are appended to.
    pub base_url: String,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(input)?;
        let config = convert_config(raw);
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override settings from the environment (`MATH_OUTPUT`).
    ///
    /// An empty `MATH_OUTPUT` counts as unset.
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(MATH_OUTPUT_ENV).filter(|dir| !dir.is_empty()) {
            self.math.output_dir = Some(PathBuf::from(dir));
        }
    }

    /// Check that all settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.math.metrics.validate()
    }
}

/// Raw configuration structure for deserialization.
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    math: RawMathConfig,
    disqus: Option<DisqusConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct RawMathConfig {
    output_dir: Option<PathBuf>,
    font_size_px: Option<f64>,
    px_per_ex: Option<f64>,
    dpi_per_px: Option<f64>,
    scaling_factor: Option<f64>,
    #[serde(default)]
    tools: ToolPaths,
}

fn convert_config(raw: RawConfig) -> Config {
    let defaults = MetricSettings::default();
    let math = raw.math;

    Config {
        math: MathConfig {
            output_dir: math.output_dir,
            metrics: MetricSettings {
                font_size_px: math.font_size_px.unwrap_or(defaults.font_size_px),
                px_per_ex: math.px_per_ex.unwrap_or(defaults.px_per_ex),
                dpi_per_px: math.dpi_per_px.unwrap_or(defaults.dpi_per_px),
                scaling_factor: math.scaling_factor.unwrap_or(defaults.scaling_factor),
            },
            tools: math.tools,
        },
        disqus: raw.disqus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.math.tools.dvipng, "dvipng");
        assert!(config.disqus.is_none());
    }

    #[test]
    fn test_default_dpi() {
        // 16 * 14.454 * 4 = 925.056
        assert_eq!(MetricSettings::default().dpi(), 925);
        assert_eq!(MetricSettings::default().raster_px_per_ex(), 64.0);
    }

    #[test]
    fn test_full_config() {
        let input = r#"
[math]
output_dir = "public/math"
scaling_factor = 2.0

[math.tools]
latex = "/opt/tex/bin/latex"

[disqus]
site_id = "example"
base_url = "https://example.org/"
"#;
        let config = Config::from_toml_str(input).unwrap();
        assert_eq!(config.math.output_dir, Some(PathBuf::from("public/math")));
        assert_eq!(config.math.metrics.scaling_factor, 2.0);
        assert_eq!(config.math.metrics.font_size_px, 16.0);
        assert_eq!(config.math.tools.latex, "/opt/tex/bin/latex");
        assert_eq!(config.math.tools.dvisvgm, "dvisvgm");
        assert_eq!(config.disqus.unwrap().site_id, "example");
    }

    #[test]
    fn test_low_scaling_factor_rejected() {
        let err = Config::from_toml_str("[math]\nscaling_factor = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { key: "math.scaling_factor", .. }
        ));
    }

    #[test]
    fn test_non_positive_font_size_rejected() {
        let err = Config::from_toml_str("[math]\nfont_size_px = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { key: "math.font_size_px", .. }
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("[math\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    // All environment access stays in this one test; tests run in parallel.
    #[test]
    fn test_math_output_env() {
        std::env::remove_var(MATH_OUTPUT_ENV);
        assert_eq!(Config::from_env().math.output_dir, None);

        std::env::set_var(MATH_OUTPUT_ENV, "/srv/site/math");
        assert_eq!(
            Config::from_env().math.output_dir,
            Some(PathBuf::from("/srv/site/math"))
        );

        let mut config = Config::from_toml_str("[math]\noutput_dir = \"public/math\"").unwrap();
        config.apply_env();
        assert_eq!(config.math.output_dir, Some(PathBuf::from("/srv/site/math")));

        std::env::set_var(MATH_OUTPUT_ENV, "");
        assert_eq!(Config::from_env().math.output_dir, None);
        let mut config = Config::from_toml_str("[math]\noutput_dir = \"public/math\"").unwrap();
        config.apply_env();
        assert_eq!(config.math.output_dir, Some(PathBuf::from("public/math")));

        std::env::remove_var(MATH_OUTPUT_ENV);
        let mut config = Config::from_toml_str("[math]\noutput_dir = \"public/math\"").unwrap();
        config.apply_env();
        assert_eq!(config.math.output_dir, Some(PathBuf::from("public/math")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/adoc-mathsvg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
