#![warn(missing_docs)]

//! I/Q streaming blocks for Signal Hound spectrum analyzers and signal
//! generators.
//!
//! Four instrument families are supported, each wrapping its vendor library
//! behind a cargo feature of the same name:
//! * **`bb`**: BB60 series real-time spectrum analyzers (`bb_api`)
//! * **`sm`**: SM series high-performance spectrum analyzers (`sm_api`)
//! * **`sp`**: SP145 spectrum analyzers (`sp_api`)
//! * **`vsg`**: VSG60 vector signal generators (`vsg_api`)
//!
//! Every block follows the same shape: it owns one opened instrument, a
//! pending configuration guarded by a lock, and a work hook the hosting
//! dataflow runtime drives once per buffer. Setter calls may arrive from any
//! thread; they update the pending configuration and mark it dirty, and the
//! change is pushed to the device at the next work-call boundary, never while
//! a transfer is outstanding. The devices require an idle acquisition
//! pipeline during reconfiguration, so this boundary rule is load-bearing,
//! not cosmetic.
//!
//! ## Example
//!
//! Driving an SM series source against a simulated device (no hardware or
//! vendor library required):
//!
//! ```
//! use signal_hound::blocks::sm::SmParams;
//! use signal_hound::blocks::{Source, SourceBlock};
//! use signal_hound::device::sim::SimReceiver;
//! use signal_hound::Complex32;
//!
//! let dev = SimReceiver::new();
//! let mut src = Source::new(dev, SmParams::default(), false);
//!
//! let handle = src.handle();
//! handle.set_center(2.4e9);
//!
//! let mut buf = vec![Complex32::new(0.0, 0.0); 4096];
//! let n = src.work(&mut buf)?;
//! assert_eq!(n, 4096);
//! # Ok::<(), signal_hound::Error>(())
//! ```
//!
//! With a hardware feature enabled, the per-family builders open a real
//! instrument instead:
//!
//! ```ignore
//! use signal_hound::blocks::sm::SmSourceBuilder;
//!
//! let mut src = SmSourceBuilder::new()
//!     .center(2.4e9)
//!     .ref_level(-20.0)
//!     .decimation(2)
//!     .build()?;
//! ```

/// Logging macros
#[macro_use]
pub extern crate tracing;

pub use num_complex;
pub use num_complex::Complex32;

pub mod blocks;
pub mod config;
pub mod device;
mod error;
mod logging;

pub use error::Error;
pub use error::Result;
pub use error::Status;
pub use logging::init;
