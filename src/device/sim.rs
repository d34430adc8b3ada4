//! Simulated devices.
//!
//! These stand in for the vendor libraries when no hardware is attached:
//! they accept the same capability calls, run scripted status codes through
//! the same severity filter the real sessions use, and record every call for
//! inspection. The crate's own tests are written against them, and they are
//! public so downstream flowgraph tests can use them too.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use num_complex::Complex32;

use super::ReceiverDevice;
use super::StreamInfo;
use super::TransmitterDevice;
use super::TxInfo;
use crate::error::check;
use crate::Result;
use crate::Status;

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A configuration was pushed to the device.
    Apply,
    /// A blocking read ran: requested length, purge flag, and the address of
    /// the transfer buffer that was filled.
    Acquire {
        /// Number of samples requested.
        len: usize,
        /// Whether buffered samples were discarded first.
        purge: bool,
        /// Address of the caller's transfer buffer.
        ptr: usize,
    },
    /// Samples were submitted for transmission.
    Transmit {
        /// Number of samples submitted.
        len: usize,
    },
    /// Internally queued samples were flushed.
    Flush,
    /// The session was aborted (device dropped).
    Abort,
}

/// Cloneable view of a sim device's call log.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}

/// Cloneable view of the configurations a sim device has received.
#[derive(Debug)]
pub struct Applied<P>(Arc<Mutex<Vec<P>>>);

impl<P> Clone for Applied<P> {
    fn clone(&self) -> Self {
        Applied(Arc::clone(&self.0))
    }
}

impl<P: Clone> Applied<P> {
    /// All configurations received, oldest first.
    pub fn all(&self) -> Vec<P> {
        self.0.lock().unwrap().clone()
    }

    /// Most recent configuration, if any.
    pub fn last(&self) -> Option<P> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl<P> Applied<P> {
    /// Number of configurations received.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Whether any configuration has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cloneable view of the samples a [`SimTransmitter`] has accepted.
#[derive(Debug, Clone, Default)]
pub struct Transmitted(Arc<Mutex<Vec<Complex32>>>);

impl Transmitted {
    /// All samples submitted so far, in submission order.
    pub fn samples(&self) -> Vec<Complex32> {
        self.0.lock().unwrap().clone()
    }

    /// Number of samples submitted so far.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Whether any samples have been submitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simulated receiver. Produces a monotonically counting ramp so tests can
/// check that samples reach the output buffer intact and in order.
#[derive(Debug)]
pub struct SimReceiver<P> {
    recorder: Recorder,
    applied: Applied<P>,
    apply_statuses: VecDeque<Status>,
    acquire_statuses: VecDeque<Status>,
    info: StreamInfo,
    counter: u64,
}

impl<P> SimReceiver<P> {
    /// Simulated receiver reporting plausible achieved parameters.
    pub fn new() -> Self {
        Self::with_info(StreamInfo {
            sample_rate: 50.0e6,
            bandwidth: 40.0e6,
        })
    }

    /// Simulated receiver reporting `info` from every reconfiguration.
    pub fn with_info(info: StreamInfo) -> Self {
        Self {
            recorder: Recorder::default(),
            applied: Applied(Arc::new(Mutex::new(Vec::new()))),
            apply_statuses: VecDeque::new(),
            acquire_statuses: VecDeque::new(),
            info,
            counter: 0,
        }
    }

    /// View of the call log, valid after the device moves into an adapter.
    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    /// View of the received configurations.
    pub fn applied(&self) -> Applied<P> {
        self.applied.clone()
    }

    /// Queue a status code for an upcoming `apply`. Unscripted calls succeed.
    pub fn script_apply(&mut self, status: Status) {
        self.apply_statuses.push_back(status);
    }

    /// Queue a status code for an upcoming `acquire`.
    pub fn script_acquire(&mut self, status: Status) {
        self.acquire_statuses.push_back(status);
    }
}

impl<P> Default for SimReceiver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> ReceiverDevice for SimReceiver<P> {
    type Params = P;

    fn apply(&mut self, params: &P) -> Result<StreamInfo> {
        self.recorder.push(Event::Apply);
        self.applied.0.lock().unwrap().push(params.clone());
        let status = self.apply_statuses.pop_front().unwrap_or(Status::OK);
        check("SimReceiver::apply", status, || "scripted status".into())?;
        Ok(self.info)
    }

    fn acquire(&mut self, buf: &mut [Complex32], purge: bool) -> Result<()> {
        self.recorder.push(Event::Acquire {
            len: buf.len(),
            purge,
            ptr: buf.as_ptr() as usize,
        });
        let status = self.acquire_statuses.pop_front().unwrap_or(Status::OK);
        // A fatal status produces no data; the buffer stays untouched.
        check("SimReceiver::acquire", status, || "scripted status".into())?;
        for sample in buf.iter_mut() {
            *sample = Complex32::new(self.counter as f32, 0.0);
            self.counter += 1;
        }
        Ok(())
    }
}

impl<P> Drop for SimReceiver<P> {
    fn drop(&mut self) {
        self.recorder.push(Event::Abort);
    }
}

/// Simulated transmitter. Keeps every submitted sample for inspection.
#[derive(Debug)]
pub struct SimTransmitter<P> {
    recorder: Recorder,
    applied: Applied<P>,
    transmitted: Transmitted,
    apply_statuses: VecDeque<Status>,
    transmit_statuses: VecDeque<Status>,
    info: TxInfo,
}

impl<P> SimTransmitter<P> {
    /// Simulated transmitter reporting plausible achieved parameters.
    pub fn new() -> Self {
        Self::with_info(TxInfo {
            frequency: 1.0e9,
            sample_rate: 50.0e6,
            level: -20.0,
            offset: (0, 0),
        })
    }

    /// Simulated transmitter reporting `info` from every reconfiguration.
    pub fn with_info(info: TxInfo) -> Self {
        Self {
            recorder: Recorder::default(),
            applied: Applied(Arc::new(Mutex::new(Vec::new()))),
            transmitted: Transmitted::default(),
            apply_statuses: VecDeque::new(),
            transmit_statuses: VecDeque::new(),
            info,
        }
    }

    /// View of the call log, valid after the device moves into an adapter.
    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    /// View of the received configurations.
    pub fn applied(&self) -> Applied<P> {
        self.applied.clone()
    }

    /// View of the accepted samples.
    pub fn transmitted(&self) -> Transmitted {
        self.transmitted.clone()
    }

    /// Queue a status code for an upcoming `apply`. Unscripted calls succeed.
    pub fn script_apply(&mut self, status: Status) {
        self.apply_statuses.push_back(status);
    }

    /// Queue a status code for an upcoming `transmit`.
    pub fn script_transmit(&mut self, status: Status) {
        self.transmit_statuses.push_back(status);
    }
}

impl<P> Default for SimTransmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> TransmitterDevice for SimTransmitter<P> {
    type Params = P;

    fn apply(&mut self, params: &P) -> Result<TxInfo> {
        self.recorder.push(Event::Apply);
        self.applied.0.lock().unwrap().push(params.clone());
        let status = self.apply_statuses.pop_front().unwrap_or(Status::OK);
        check("SimTransmitter::apply", status, || "scripted status".into())?;
        Ok(self.info)
    }

    fn transmit(&mut self, buf: &[Complex32]) -> Result<()> {
        self.recorder.push(Event::Transmit { len: buf.len() });
        let status = self.transmit_statuses.pop_front().unwrap_or(Status::OK);
        check("SimTransmitter::transmit", status, || {
            "scripted status".into()
        })?;
        self.transmitted.0.lock().unwrap().extend_from_slice(buf);
        self.recorder.push(Event::Flush);
        Ok(())
    }
}

impl<P> Drop for SimTransmitter<P> {
    fn drop(&mut self) {
        self.recorder.push(Event::Abort);
    }
}
