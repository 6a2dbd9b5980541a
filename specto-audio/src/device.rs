//! Input device enumeration, selection and stream config negotiation

use std::fmt;

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, SampleFormat, SampleRate, SupportedStreamConfig};

use crate::error::CaptureError;

/// Sample formats the capture callback can convert, most preferred first
const PREFERRED_FORMATS: [SampleFormat; 3] = [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16];

/// Summary of one input device, as listed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position in the host's input device list; what `device_index` selects
    pub index: usize,
    pub name: String,
    pub is_default: bool,
    pub channels: Option<u16>,
    pub sample_rate: Option<u32>,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_default { '*' } else { ' ' };
        write!(f, "{marker} [{}] {}", self.index, self.name)?;
        if let (Some(channels), Some(rate)) = (self.channels, self.sample_rate) {
            write!(f, " ({channels} ch @ {rate} Hz)")?;
        }
        Ok(())
    }
}

/// List the default host's input devices
pub fn list_input_devices() -> Result<Vec<DeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let mut result = Vec::new();
    for (index, device) in host.input_devices()?.enumerate() {
        let name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());
        let default_config = device.default_input_config().ok();
        result.push(DeviceInfo {
            index,
            is_default: default_name.as_deref() == Some(name.as_str()),
            channels: default_config.as_ref().map(|c| c.channels()),
            sample_rate: default_config.as_ref().map(|c| c.sample_rate().0),
            name,
        });
    }
    Ok(result)
}

/// Pick an input device by list index, or the host default for `None`
pub fn select_input_device(host: &Host, index: Option<usize>) -> Result<Device, CaptureError> {
    match index {
        None => host
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no default input device".into())),
        Some(index) => {
            let devices: Vec<Device> = host.input_devices()?.collect();
            let available = devices.len();
            if available == 0 {
                return Err(CaptureError::DeviceUnavailable("no input devices found".into()));
            }
            devices
                .into_iter()
                .nth(index)
                .ok_or(CaptureError::DeviceIndexOutOfRange { index, available })
        }
    }
}

/// Find a supported config at `requested_rate`, falling back to the device
/// default when no convertible format supports that rate.
pub fn negotiate_config(
    device: &Device,
    requested_rate: u32,
) -> Result<SupportedStreamConfig, CaptureError> {
    let ranges: Vec<_> = device.supported_input_configs()?.collect();

    for format in PREFERRED_FORMATS {
        let matching = ranges.iter().find(|range| {
            range.sample_format() == format
                && rate_in_range(requested_rate, range.min_sample_rate().0, range.max_sample_rate().0)
        });
        if let Some(range) = matching {
            return Ok(range.clone().with_sample_rate(SampleRate(requested_rate)));
        }
    }

    let fallback = device.default_input_config()?;
    tracing::warn!(
        requested = requested_rate,
        using = fallback.sample_rate().0,
        "requested sample rate not supported, using device default"
    );
    Ok(fallback)
}

#[inline]
fn rate_in_range(rate: u32, min: u32, max: u32) -> bool {
    min <= rate && rate <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_line() {
        let info = DeviceInfo {
            index: 2,
            name: "USB Mic".into(),
            is_default: true,
            channels: Some(1),
            sample_rate: Some(48000),
        };
        assert_eq!(info.to_string(), "* [2] USB Mic (1 ch @ 48000 Hz)");

        let bare = DeviceInfo {
            index: 0,
            name: "Line In".into(),
            is_default: false,
            channels: None,
            sample_rate: None,
        };
        assert_eq!(bare.to_string(), "  [0] Line In");
    }

    #[test]
    fn test_rate_in_range() {
        assert!(rate_in_range(44100, 8000, 192000));
        assert!(rate_in_range(44100, 44100, 44100));
        assert!(!rate_in_range(44100, 48000, 48000));
    }
}
