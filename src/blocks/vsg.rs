//! VSG60 I/Q sink.

use crate::blocks::SinkHandle;

#[cfg(feature = "vsg")]
use crate::blocks::Sink;
#[cfg(feature = "vsg")]
use crate::device::vsg::VsgDevice;
#[cfg(feature = "vsg")]
use crate::Result;

/// Pending configuration of a VSG60 generator.
#[derive(Debug, Clone, PartialEq)]
pub struct VsgParams {
    /// Center frequency in Hz.
    pub center: f64,
    /// Sample rate in samples per second.
    pub sample_rate: f64,
    /// Output level in dBm.
    pub level: f64,
    /// Fixed-point DC offset correction for the I arm.
    pub i_offset: i16,
    /// Fixed-point DC offset correction for the Q arm.
    pub q_offset: i16,
}

impl Default for VsgParams {
    fn default() -> Self {
        Self {
            center: 1.0e9,
            sample_rate: 50.0e6,
            level: -20.0,
            i_offset: 0,
            q_offset: 0,
        }
    }
}

impl SinkHandle<VsgParams> {
    /// Set the center frequency in Hz.
    pub fn set_center(&self, center: f64) {
        self.update(|p| p.center = center);
    }

    /// Set the sample rate in samples per second.
    pub fn set_sample_rate(&self, sample_rate: f64) {
        self.update(|p| p.sample_rate = sample_rate);
    }

    /// Set the output level in dBm.
    pub fn set_level(&self, level: f64) {
        self.update(|p| p.level = level);
    }

    /// Set the I arm DC offset correction.
    pub fn set_i_offset(&self, i_offset: i16) {
        self.update(|p| p.i_offset = i_offset);
    }

    /// Set the Q arm DC offset correction.
    pub fn set_q_offset(&self, q_offset: i16) {
        self.update(|p| p.q_offset = q_offset);
    }
}

/// VSG60 sink backed by real hardware.
#[cfg(feature = "vsg")]
pub type VsgSink = Sink<VsgDevice>;

/// Builder for a [`VsgSink`].
#[cfg(feature = "vsg")]
#[derive(Debug, Clone)]
pub struct VsgSinkBuilder {
    params: VsgParams,
    serial: Option<i32>,
}

#[cfg(feature = "vsg")]
impl VsgSinkBuilder {
    /// Builder with default parameters.
    pub fn new() -> Self {
        Self {
            params: VsgParams::default(),
            serial: None,
        }
    }

    /// Center frequency in Hz.
    pub fn center(mut self, center: f64) -> Self {
        self.params.center = center;
        self
    }

    /// Sample rate in samples per second.
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.params.sample_rate = sample_rate;
        self
    }

    /// Output level in dBm.
    pub fn level(mut self, level: f64) -> Self {
        self.params.level = level;
        self
    }

    /// Fixed-point I/Q DC offset correction.
    pub fn iq_offset(mut self, i_offset: i16, q_offset: i16) -> Self {
        self.params.i_offset = i_offset;
        self.params.q_offset = q_offset;
        self
    }

    /// Open this specific instrument instead of the first one found.
    pub fn serial(mut self, serial: i32) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Open the device and wrap it in a sink.
    ///
    /// The serial number is resolved from the builder, then the `vsg.serial`
    /// config key, otherwise the first unopened device is claimed.
    pub fn build(self) -> Result<VsgSink> {
        let dev = match self.serial.or_else(|| crate::config::get("vsg.serial")) {
            Some(serial) => VsgDevice::open_serial(serial)?,
            None => VsgDevice::open()?,
        };
        Ok(Sink::new(dev, self.params))
    }
}

#[cfg(feature = "vsg")]
impl Default for VsgSinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
