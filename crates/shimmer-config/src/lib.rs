//! Shimmer configuration system
//!
//! Loads settings from `shimmer.toml`, then lets environment variables
//! override individual values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "shimmer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ShimmerToml {
    /// Overlay appearance and motion
    pub shimmer: ShimmerSettings,
    /// Demo application settings
    pub demo: DemoConfig,
}

/// Overlay settings. Names are parsed by the scene crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShimmerSettings {
    /// `left-to-right`, `right-to-left`, `top-to-bottom` or `bottom-to-top`
    pub direction: Option<String>,
    /// Highlight tint as sRGB RGBA bytes
    pub color: Option<[u8; 4]>,
    /// Length of one sweep in seconds
    pub duration_secs: f32,
    /// `bounds` (the overlay's own size) or `viewport`
    pub extent: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DemoMode {
    #[default]
    Window,
    Headless,
}

impl DemoMode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" => Some(Self::Window),
            "headless" => Some(Self::Headless),
            _ => None,
        }
    }
}

/// Demo application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub mode: DemoMode,
    /// Logical surface width (headless) or initial window width
    pub width: u32,
    pub height: u32,
    /// Seconds before the example screen swaps placeholders for content
    pub load_delay_secs: f32,
    /// Number of frames written in headless mode
    pub frames: u32,
    /// Simulated frame rate in headless mode
    pub fps: f32,
    /// Directory for headless PNG frames
    pub output_dir: PathBuf,
}

impl Default for ShimmerSettings {
    fn default() -> Self {
        Self {
            direction: None,
            color: None,
            duration_secs: 1.5,
            extent: None,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            mode: DemoMode::Window,
            width: 390,
            height: 844,
            load_delay_secs: 100.0,
            frames: 90,
            fps: 60.0,
            output_dir: PathBuf::from("frames"),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

/// A sweep needs a finite, positive cycle length.
pub fn is_valid_duration(secs: f32) -> bool {
    secs.is_finite() && secs > 0.0
}

impl ShimmerToml {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `shimmer.toml` from the current directory, falling back to defaults
    /// when the file is missing or malformed.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_lookup(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn merge_with_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(direction) = lookup("SHIMMER_DIRECTION") {
            self.shimmer.direction = Some(direction);
        }
        match parse_env::<f32>("SHIMMER_DURATION", lookup("SHIMMER_DURATION")) {
            Some(secs) if is_valid_duration(secs) => self.shimmer.duration_secs = secs,
            Some(secs) => log::warn!("ignoring SHIMMER_DURATION={secs}: must be positive"),
            None => {}
        }
        if let Some(extent) = lookup("SHIMMER_EXTENT") {
            self.shimmer.extent = Some(extent);
        }

        if let Some(raw) = lookup("DEMO_MODE") {
            match DemoMode::parse(&raw) {
                Some(mode) => self.demo.mode = mode,
                None => log::warn!("ignoring DEMO_MODE={raw:?}: expected window or headless"),
            }
        }
        if let Some(secs) = parse_env::<f32>("DEMO_LOAD_DELAY", lookup("DEMO_LOAD_DELAY")) {
            self.demo.load_delay_secs = secs;
        }
        if let Some(frames) = parse_env::<u32>("DEMO_FRAMES", lookup("DEMO_FRAMES")) {
            self.demo.frames = frames;
        }
        if let Some(fps) = parse_env::<f32>("DEMO_FPS", lookup("DEMO_FPS")) {
            self.demo.fps = fps;
        }
        if let Some(dir) = lookup("DEMO_OUTPUT") {
            self.demo.output_dir = PathBuf::from(dir);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from shimmer.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ShimmerToml::default();
        assert_eq!(config.shimmer.duration_secs, 1.5);
        assert!(config.shimmer.direction.is_none());
        assert_eq!(config.demo.mode, DemoMode::Window);
        assert_eq!(config.demo.load_delay_secs, 100.0);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = ShimmerToml::default();
        config.shimmer.color = Some([0, 0, 255, 255]);
        config.demo.mode = DemoMode::Headless;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ShimmerToml = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[shimmer]\ndirection = \"top-to-bottom\"\n\n[demo]\nframes = 12").unwrap();

        let config = ShimmerToml::load_from_file(file.path()).unwrap();
        assert_eq!(config.shimmer.direction.as_deref(), Some("top-to-bottom"));
        assert_eq!(config.shimmer.duration_secs, 1.5);
        assert_eq!(config.demo.frames, 12);
        assert_eq!(config.demo.width, 390);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShimmerToml::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[demo]\nframes = \"many\"").unwrap();
        let err = ShimmerToml::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_merge_with_env() {
        let mut config = ShimmerToml::default();
        config.merge_with_lookup(env(&[
            ("SHIMMER_DIRECTION", "rtl"),
            ("DEMO_MODE", "headless"),
            ("DEMO_FRAMES", "not-a-number"),
        ]));

        assert_eq!(config.shimmer.direction.as_deref(), Some("rtl"));
        assert_eq!(config.demo.mode, DemoMode::Headless);
        // Invalid values leave the default in place.
        assert_eq!(config.demo.frames, 90);
    }

    #[test]
    fn test_env_duration_must_be_positive() {
        for raw in ["0", "-2.5", "NaN", "inf"] {
            let mut config = ShimmerToml::default();
            config.merge_with_lookup(env(&[("SHIMMER_DURATION", raw)]));
            assert_eq!(config.shimmer.duration_secs, 1.5, "SHIMMER_DURATION={raw}");
        }

        let mut config = ShimmerToml::default();
        config.merge_with_lookup(env(&[("SHIMMER_DURATION", " 2.25 ")]));
        assert_eq!(config.shimmer.duration_secs, 2.25);
    }
}
