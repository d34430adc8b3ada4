//! SM series I/Q source.

use crate::blocks::SourceHandle;

#[cfg(feature = "sm")]
use crate::blocks::Source;
#[cfg(feature = "sm")]
use crate::device::sm::SmDevice;
#[cfg(feature = "sm")]
use crate::Result;

/// Pending configuration of an SM series receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct SmParams {
    /// Center frequency in Hz.
    pub center: f64,
    /// Reference level in dBm.
    pub ref_level: f64,
    /// Attenuator setting, or -1 to derive it from the reference level.
    pub atten: i32,
    /// Decimation from the base I/Q rate.
    pub decimation: i32,
    /// Enable the software bandwidth filter.
    pub software_filter: bool,
    /// I/Q bandwidth in Hz.
    pub bandwidth: f64,
}

impl Default for SmParams {
    fn default() -> Self {
        Self {
            center: 1.0e9,
            ref_level: -20.0,
            atten: -1,
            decimation: 1,
            software_filter: false,
            bandwidth: 20.0e6,
        }
    }
}

impl SourceHandle<SmParams> {
    /// Set the center frequency in Hz.
    pub fn set_center(&self, center: f64) {
        self.update(|p| p.center = center);
    }

    /// Set the reference level in dBm.
    pub fn set_ref_level(&self, ref_level: f64) {
        self.update(|p| p.ref_level = ref_level);
    }

    /// Set the attenuator, or -1 for automatic selection.
    pub fn set_atten(&self, atten: i32) {
        self.update(|p| p.atten = atten);
    }

    /// Set the decimation factor.
    pub fn set_decimation(&self, decimation: i32) {
        self.update(|p| p.decimation = decimation);
    }

    /// Enable or disable the software bandwidth filter.
    pub fn set_software_filter(&self, enabled: bool) {
        self.update(|p| p.software_filter = enabled);
    }

    /// Set the I/Q bandwidth in Hz.
    pub fn set_bandwidth(&self, bandwidth: f64) {
        self.update(|p| p.bandwidth = bandwidth);
    }
}

/// SM series source backed by real hardware.
#[cfg(feature = "sm")]
pub type SmSource = Source<SmDevice>;

/// Builder for an [`SmSource`].
#[cfg(feature = "sm")]
#[derive(Debug, Clone)]
pub struct SmSourceBuilder {
    params: SmParams,
    purge: bool,
    serial: Option<i32>,
}

#[cfg(feature = "sm")]
impl SmSourceBuilder {
    /// Builder with default parameters.
    pub fn new() -> Self {
        Self {
            params: SmParams::default(),
            purge: false,
            serial: None,
        }
    }

    /// Center frequency in Hz.
    pub fn center(mut self, center: f64) -> Self {
        self.params.center = center;
        self
    }

    /// Reference level in dBm.
    pub fn ref_level(mut self, ref_level: f64) -> Self {
        self.params.ref_level = ref_level;
        self
    }

    /// Attenuator setting, or -1 for automatic selection.
    pub fn atten(mut self, atten: i32) -> Self {
        self.params.atten = atten;
        self
    }

    /// Decimation factor.
    pub fn decimation(mut self, decimation: i32) -> Self {
        self.params.decimation = decimation;
        self
    }

    /// Enable the software bandwidth filter.
    pub fn software_filter(mut self, enabled: bool) -> Self {
        self.params.software_filter = enabled;
        self
    }

    /// I/Q bandwidth in Hz.
    pub fn bandwidth(mut self, bandwidth: f64) -> Self {
        self.params.bandwidth = bandwidth;
        self
    }

    /// Discard buffered samples before every read.
    pub fn purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    /// Open this specific instrument instead of the first one found.
    pub fn serial(mut self, serial: i32) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Open the device and wrap it in a source.
    ///
    /// The serial number is resolved from the builder, then the `sm.serial`
    /// config key, otherwise the first unopened device is claimed.
    pub fn build(self) -> Result<SmSource> {
        let dev = match self.serial.or_else(|| crate::config::get("sm.serial")) {
            Some(serial) => SmDevice::open_serial(serial)?,
            None => SmDevice::open()?,
        };
        Ok(Source::new(dev, self.params, self.purge))
    }
}

#[cfg(feature = "sm")]
impl Default for SmSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
