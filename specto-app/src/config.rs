//! Configuration file for Specto
//!
//! Simple `key=value` text file; CLI flags override whatever it holds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use specto_analysis::{DEFAULT_SAMPLE_RATE, DEFAULT_SCALE_FACTOR, DEFAULT_WINDOW_SIZE};
use specto_tui::{MAX_CEILING, MIN_CEILING};

use crate::cli::Args;

/// Default display ceiling
pub const DEFAULT_CEILING: f64 = 2000.0;
/// Default theme name
pub const DEFAULT_THEME: &str = "phosphor-green";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub window_size: usize,
    pub sample_rate: u32,
    pub scale_factor: f64,
    /// `None` selects the host default input
    pub device_index: Option<usize>,
    pub theme: String,
    pub ceiling: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            scale_factor: DEFAULT_SCALE_FACTOR,
            device_index: None,
            theme: DEFAULT_THEME.to_string(),
            ceiling: DEFAULT_CEILING,
        }
    }
}

impl Config {
    /// Load config from `path`, or the default location
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> io::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        match Self::load_from(&path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(Self::parse(&content))
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.serialize())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("specto")
            .join("config.txt")
    }

    /// Override file values with any flags given on the command line
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(window_size) = args.window_size {
            self.window_size = window_size;
        }
        if let Some(sample_rate) = args.sample_rate {
            self.sample_rate = sample_rate;
        }
        if let Some(scale_factor) = args.scale_factor {
            self.scale_factor = scale_factor;
        }
        if args.device_index.is_some() {
            self.device_index = args.device_index;
        }
        if let Some(ref theme) = args.theme {
            self.theme = theme.clone();
        }
        if let Some(ceiling) = args.ceiling {
            match checked_ceiling(ceiling) {
                Some(ceiling) => self.ceiling = ceiling,
                None => tracing::warn!(ceiling, "ignoring invalid --ceiling"),
            }
        }
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "window_size" => {
                        set_parsed(&mut config.window_size, key, value);
                    }
                    "sample_rate" => {
                        set_parsed(&mut config.sample_rate, key, value);
                    }
                    "scale_factor" => {
                        set_parsed(&mut config.scale_factor, key, value);
                    }
                    "ceiling" => {
                        let mut ceiling = config.ceiling;
                        if set_parsed(&mut ceiling, key, value) {
                            match checked_ceiling(ceiling) {
                                Some(ceiling) => config.ceiling = ceiling,
                                None => tracing::warn!(key, value, "ignoring invalid config value"),
                            }
                        }
                    }
                    "device_index" => {
                        if value.is_empty() {
                            config.device_index = None;
                        } else {
                            let mut index = 0usize;
                            if set_parsed(&mut index, key, value) {
                                config.device_index = Some(index);
                            }
                        }
                    }
                    "theme" => {
                        if !value.is_empty() {
                            config.theme = value.to_string();
                        }
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = vec![
            "# Specto Configuration".to_string(),
            format!("window_size={}", self.window_size),
            format!("sample_rate={}", self.sample_rate),
            format!("scale_factor={}", self.scale_factor),
        ];

        if let Some(index) = self.device_index {
            lines.push(format!("device_index={}", index));
        }
        lines.push(format!("theme={}", self.theme));
        lines.push(format!("ceiling={}", self.ceiling));

        lines.join("\n")
    }
}

/// A usable display ceiling: finite and positive, clamped to the zoom range
fn checked_ceiling(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then(|| value.clamp(MIN_CEILING, MAX_CEILING))
}

/// Parse `value` into `slot`, leaving it untouched (and warning) on failure
fn set_parsed<T: FromStr>(slot: &mut T, key: &str, value: &str) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => {
            tracing::warn!(key, value, "ignoring invalid config value");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse(""), Config::default());
    }

    #[test]
    fn test_parse_values() {
        let content = "window_size=1024\nsample_rate = 48000\nscale_factor=12.5\n\
                       device_index=3\ntheme=amber\nceiling=500";
        let config = Config::parse(content);
        assert_eq!(config.window_size, 1024);
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.scale_factor, 12.5);
        assert_eq!(config.device_index, Some(3));
        assert_eq!(config.theme, "amber");
        assert_eq!(config.ceiling, 500.0);
    }

    #[test]
    fn test_parse_with_comments_and_unknown_keys() {
        let content = "# Comment\nwindow_size=256\ncolour=mauve\n# Another comment";
        let config = Config::parse(content);
        assert_eq!(config.window_size, 256);
        assert_eq!(config.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = Config::parse("window_size=lots\ndevice_index=-1\nsample_rate=");
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.device_index, None);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_invalid_ceiling_is_rejected() {
        for bad in ["-5", "0", "NaN", "inf"] {
            let config = Config::parse(&format!("ceiling={}", bad));
            assert_eq!(config.ceiling, DEFAULT_CEILING, "ceiling={}", bad);
        }
        // Out of zoom range but usable: clamped
        assert_eq!(Config::parse("ceiling=0.25").ceiling, MIN_CEILING);

        let mut config = Config::parse("ceiling=500");
        for bad in [-5.0, f64::NAN] {
            config.apply_args(&Args {
                ceiling: Some(bad),
                ..Default::default()
            });
            assert_eq!(config.ceiling, 500.0);
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            window_size: 2048,
            device_index: Some(1),
            theme: "cyberpunk".into(),
            ..Default::default()
        };

        let parsed = Config::parse(&config.serialize());
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_args_override_file() {
        let mut config = Config::parse("window_size=256\ntheme=amber");
        let args = Args {
            window_size: Some(4096),
            device_index: Some(0),
            ..Default::default()
        };
        config.apply_args(&args);

        assert_eq!(config.window_size, 4096);
        assert_eq!(config.device_index, Some(0));
        assert_eq!(config.theme, "amber");
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("specto-missing-config-test.txt");
        let _ = fs::remove_file(&path);
        assert_eq!(Config::load(Some(path.as_path())).unwrap(), Config::default());
    }
}
