//! Device sessions and the capability surface the adapters are written
//! against.
//!
//! Each instrument family module wraps its closed-source vendor library in a
//! safe session type that opens the device on construction and aborts and
//! closes it on drop. The families differ only in the parameters they accept
//! and the vendor entry points they call, so the streaming adapters in
//! [`crate::blocks`] are generic over the two capability traits below, and
//! the [`sim`] devices implement the same traits for tests and downstream
//! flowgraph simulations.

use num_complex::Complex32;

use crate::Result;

#[cfg(feature = "bb")]
pub mod bb;
pub mod sim;
#[cfg(feature = "sm")]
pub mod sm;
#[cfg(feature = "sp")]
pub mod sp;
#[cfg(feature = "vsg")]
pub mod vsg;

/// Streaming parameters achieved by a receiver after reconfiguration.
///
/// The device coerces requests it cannot satisfy exactly, so these may
/// differ from the values asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    /// Achieved sample rate in samples per second.
    pub sample_rate: f64,
    /// Achieved I/Q bandwidth in Hz.
    pub bandwidth: f64,
}

/// Output parameters achieved by a generator after reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TxInfo {
    /// Achieved center frequency in Hz.
    pub frequency: f64,
    /// Achieved sample rate in samples per second.
    pub sample_rate: f64,
    /// Achieved output level in dBm.
    pub level: f64,
    /// Achieved fixed-point I/Q DC offset correction.
    pub offset: (i16, i16),
}

/// An opened instrument that can stream I/Q samples to the host.
pub trait ReceiverDevice {
    /// Full pending configuration for this family.
    type Params;

    /// Push the complete configuration to the device, re-enter continuous
    /// I/Q streaming mode, and report the achieved streaming parameters.
    ///
    /// The acquisition pipeline must be idle while this runs; the adapter
    /// only calls it at a work-call boundary.
    fn apply(&mut self, params: &Self::Params) -> Result<StreamInfo>;

    /// Blocking read of exactly `buf.len()` samples.
    ///
    /// `purge` discards any samples buffered in the vendor API before the
    /// acquisition starts, so the data returned is fresh rather than a
    /// continuation of the previous read.
    fn acquire(&mut self, buf: &mut [Complex32], purge: bool) -> Result<()>;
}

/// An opened instrument that consumes I/Q samples from the host.
pub trait TransmitterDevice {
    /// Full pending configuration for this family.
    type Params;

    /// Push the complete configuration to the device and report the values
    /// it actually applied.
    fn apply(&mut self, params: &Self::Params) -> Result<TxInfo>;

    /// Submit `buf` for transmission and flush internally queued samples
    /// before returning.
    fn transmit(&mut self, buf: &[Complex32]) -> Result<()>;
}
