//! Streaming adapter blocks.
//!
//! All four instrument families share one protocol: setters update a pending
//! configuration and mark it dirty under a lock, and the work hook applies
//! the merged configuration at its next invocation, immediately before the
//! blocking transfer call. The devices require the acquisition pipeline to
//! be idle while parameters change, so a configuration is never pushed while
//! a transfer is outstanding.
//!
//! The generic [`Source`] and [`Sink`] carry that protocol; the family
//! modules contribute the parameter sets, the named setters, and builders
//! that open real hardware.

pub mod bb;
pub mod sm;
pub mod sp;
pub mod vsg;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use num_complex::Complex32;

use crate::device::ReceiverDevice;
use crate::device::StreamInfo;
use crate::device::TransmitterDevice;
use crate::device::TxInfo;
use crate::Result;

/// A block that produces samples into a runtime-owned output buffer.
///
/// The hosting runtime drives this from a single worker thread, once per
/// buffer. The call blocks for one buffer's worth of device transfer time
/// and either fills `output` completely or fails.
pub trait SourceBlock {
    /// Produce exactly `output.len()` samples; returns the count produced.
    fn work(&mut self, output: &mut [Complex32]) -> Result<usize>;
}

/// A block that consumes samples from a runtime-owned input buffer.
pub trait SinkBlock {
    /// Consume all of `input`; returns the count consumed.
    fn work(&mut self, input: &[Complex32]) -> Result<usize>;
}

#[derive(Debug)]
struct Shared<P> {
    params: P,
    dirty: bool,
}

/// Cloneable control surface of a [`Source`].
///
/// Setters may be called from any thread while the block is streaming. Each
/// setter updates its own field and marks the configuration dirty; when
/// several race between two work calls, the final merged state wins per
/// field. The change takes effect at the next work-call boundary.
#[derive(Debug)]
pub struct SourceHandle<P> {
    shared: Arc<Mutex<Shared<P>>>,
    purge: Arc<AtomicBool>,
}

impl<P> Clone for SourceHandle<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            purge: Arc::clone(&self.purge),
        }
    }
}

impl<P> SourceHandle<P> {
    pub(crate) fn update(&self, f: impl FnOnce(&mut P)) {
        let mut shared = self.shared.lock().unwrap();
        f(&mut shared.params);
        shared.dirty = true;
    }

    /// Discard samples buffered in the vendor API before each read.
    ///
    /// Purge is consumed per read rather than pushed to the device, so this
    /// does not trigger a reconfiguration.
    pub fn set_purge(&self, purge: bool) {
        self.purge.store(purge, Ordering::Relaxed);
    }
}

/// Cloneable control surface of a [`Sink`].
#[derive(Debug)]
pub struct SinkHandle<P> {
    shared: Arc<Mutex<Shared<P>>>,
}

impl<P> Clone for SinkHandle<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P> SinkHandle<P> {
    pub(crate) fn update(&self, f: impl FnOnce(&mut P)) {
        let mut shared = self.shared.lock().unwrap();
        f(&mut shared.params);
        shared.dirty = true;
    }
}

/// Output-only adapter: one opened receiver, the pending configuration, and
/// a reusable transfer buffer.
pub struct Source<D: ReceiverDevice> {
    dev: D,
    shared: Arc<Mutex<Shared<D::Params>>>,
    purge: Arc<AtomicBool>,
    buf: Vec<Complex32>,
    info: Option<StreamInfo>,
}

impl<D: ReceiverDevice> Source<D> {
    /// Wrap an opened device.
    ///
    /// The initial configuration counts as dirty, so the first work call
    /// always pushes it before acquiring anything.
    pub fn new(dev: D, params: D::Params, purge: bool) -> Self {
        Self {
            dev,
            shared: Arc::new(Mutex::new(Shared {
                params,
                dirty: true,
            })),
            purge: Arc::new(AtomicBool::new(purge)),
            buf: Vec::new(),
            info: None,
        }
    }

    /// Control handle for setter calls from other threads.
    pub fn handle(&self) -> SourceHandle<D::Params> {
        SourceHandle {
            shared: Arc::clone(&self.shared),
            purge: Arc::clone(&self.purge),
        }
    }

    /// Streaming parameters the device reported at the last
    /// reconfiguration, or `None` before the first work call.
    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.info
    }
}

impl<D: ReceiverDevice> SourceBlock for Source<D> {
    fn work(&mut self, output: &mut [Complex32]) -> Result<usize> {
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.dirty {
                let info = self.dev.apply(&shared.params)?;
                info!(
                    sample_rate = info.sample_rate,
                    bandwidth = info.bandwidth,
                    "receiver reconfigured"
                );
                self.info = Some(info);
                shared.dirty = false;
            }
        }
        // Lock released: setters landing while the read below blocks take
        // effect at the next boundary.

        if self.buf.len() != output.len() {
            self.buf = vec![Complex32::new(0.0, 0.0); output.len()];
        }

        let purge = self.purge.load(Ordering::Relaxed);
        self.dev.acquire(&mut self.buf, purge)?;

        output.copy_from_slice(&self.buf);
        Ok(output.len())
    }
}

/// Input-only adapter: one opened generator and the pending configuration.
///
/// Samples are submitted straight from the runtime's input buffer; no
/// intermediate copy is needed on the transmit path.
pub struct Sink<D: TransmitterDevice> {
    dev: D,
    shared: Arc<Mutex<Shared<D::Params>>>,
    info: Option<TxInfo>,
}

impl<D: TransmitterDevice> Sink<D> {
    /// Wrap an opened device. The initial configuration counts as dirty.
    pub fn new(dev: D, params: D::Params) -> Self {
        Self {
            dev,
            shared: Arc::new(Mutex::new(Shared {
                params,
                dirty: true,
            })),
            info: None,
        }
    }

    /// Control handle for setter calls from other threads.
    pub fn handle(&self) -> SinkHandle<D::Params> {
        SinkHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Output parameters the device reported at the last reconfiguration,
    /// or `None` before the first work call.
    pub fn tx_info(&self) -> Option<TxInfo> {
        self.info
    }
}

impl<D: TransmitterDevice> SinkBlock for Sink<D> {
    fn work(&mut self, input: &[Complex32]) -> Result<usize> {
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.dirty {
                let info = self.dev.apply(&shared.params)?;
                info!(
                    frequency = info.frequency,
                    sample_rate = info.sample_rate,
                    level = info.level,
                    i_offset = info.offset.0 as i64,
                    q_offset = info.offset.1 as i64,
                    "generator reconfigured"
                );
                self.info = Some(info);
                shared.dirty = false;
            }
        }

        self.dev.transmit(input)?;
        Ok(input.len())
    }
}
