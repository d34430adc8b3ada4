//! BB60 series I/Q source.

use crate::blocks::SourceHandle;

#[cfg(feature = "bb")]
use crate::blocks::Source;
#[cfg(feature = "bb")]
use crate::device::bb::BbDevice;
#[cfg(feature = "bb")]
use crate::Result;

/// Pending configuration of a BB60 series receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct BbParams {
    /// Center frequency in Hz.
    pub center: f64,
    /// Reference level in dBm; sets sensitivity and front-end attenuation.
    pub ref_level: f64,
    /// Power-of-two decimation from the 40 MS/s base rate.
    pub decimation: i32,
    /// Software filter bandwidth in Hz.
    pub bandwidth: f64,
}

impl Default for BbParams {
    fn default() -> Self {
        Self {
            center: 1.0e9,
            ref_level: -20.0,
            decimation: 1,
            bandwidth: 27.0e6,
        }
    }
}

impl SourceHandle<BbParams> {
    /// Set the center frequency in Hz.
    pub fn set_center(&self, center: f64) {
        self.update(|p| p.center = center);
    }

    /// Set the reference level in dBm.
    pub fn set_ref_level(&self, ref_level: f64) {
        self.update(|p| p.ref_level = ref_level);
    }

    /// Set the power-of-two decimation factor.
    pub fn set_decimation(&self, decimation: i32) {
        self.update(|p| p.decimation = decimation);
    }

    /// Set the software filter bandwidth in Hz.
    pub fn set_bandwidth(&self, bandwidth: f64) {
        self.update(|p| p.bandwidth = bandwidth);
    }
}

/// BB60 source backed by real hardware.
#[cfg(feature = "bb")]
pub type BbSource = Source<BbDevice>;

/// Builder for a [`BbSource`].
#[cfg(feature = "bb")]
#[derive(Debug, Clone)]
pub struct BbSourceBuilder {
    params: BbParams,
    purge: bool,
    serial: Option<u32>,
}

#[cfg(feature = "bb")]
impl BbSourceBuilder {
    /// Builder with default parameters.
    pub fn new() -> Self {
        Self {
            params: BbParams::default(),
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

    /// Power-of-two decimation factor.
    pub fn decimation(mut self, decimation: i32) -> Self {
        self.params.decimation = decimation;
        self
    }

    /// Software filter bandwidth in Hz.
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
    pub fn serial(mut self, serial: u32) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Open the device and wrap it in a source.
    ///
    /// The serial number is resolved from the builder, then the `bb.serial`
    /// config key, otherwise the first unopened device is claimed.
    pub fn build(self) -> Result<BbSource> {
        let dev = match self.serial.or_else(|| crate::config::get("bb.serial")) {
            Some(serial) => BbDevice::open_serial(serial)?,
            None => BbDevice::open()?,
        };
        Ok(Source::new(dev, self.params, self.purge))
    }
}

#[cfg(feature = "bb")]
impl Default for BbSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
