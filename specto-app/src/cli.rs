//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments
///
/// Every option left unset falls back to the config file, then to the
/// built-in default.
#[derive(Parser, Debug, Default)]
#[command(name = "specto")]
#[command(about = "Real-time audio spectrum analyzer for the terminal", long_about = None)]
pub struct Args {
    /// Samples per analysis window (power of two)
    #[arg(long, value_name = "N")]
    pub window_size: Option<usize>,

    /// Requested capture sample rate
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Magnitude scale factor applied to every bin
    #[arg(long = "scale", value_name = "FACTOR")]
    pub scale_factor: Option<f64>,

    /// Input device index, as shown by --list-devices
    #[arg(long = "device", value_name = "INDEX")]
    pub device_index: Option<usize>,

    /// Theme: phosphor-green, amber, cyberpunk
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Magnitude that fills the spectrum panel
    #[arg(long, value_name = "VALUE")]
    pub ceiling: Option<f64>,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["specto"]).unwrap();
        assert!(args.window_size.is_none());
        assert!(args.device_index.is_none());
        assert!(!args.list_devices);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "specto",
            "--window-size",
            "1024",
            "--scale",
            "50",
            "--device",
            "2",
            "--theme",
            "amber",
            "--list-devices",
        ])
        .unwrap();
        assert_eq!(args.window_size, Some(1024));
        assert_eq!(args.scale_factor, Some(50.0));
        assert_eq!(args.device_index, Some(2));
        assert_eq!(args.theme.as_deref(), Some("amber"));
        assert!(args.list_devices);
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Args::try_parse_from(["specto", "--sample-rate", "fast"]).is_err());
    }
}
