//! VSG60 session (`vsg_api`).

use std::ffi::CStr;
use std::os::raw::c_int;

use num_complex::Complex32;

use crate::blocks::vsg::VsgParams;
use crate::device::TransmitterDevice;
use crate::device::TxInfo;
use crate::error::check;
use crate::error::check_open;
use crate::Result;
use crate::Status;

mod ffi {
    use std::os::raw::c_char;
    use std::os::raw::c_int;

    // vsgDeviceNotFoundErr
    pub const VSG_DEVICE_NOT_FOUND: c_int = -1;

    #[link(name = "vsg_api")]
    extern "C" {
        pub fn vsgOpenDevice(device: *mut c_int) -> c_int;
        pub fn vsgOpenDeviceBySerial(device: *mut c_int, serial_number: c_int) -> c_int;
        pub fn vsgCloseDevice(device: c_int) -> c_int;
        pub fn vsgAbort(device: c_int) -> c_int;
        pub fn vsgGetSerialNumber(device: c_int, serial_number: *mut c_int) -> c_int;
        pub fn vsgSetFrequency(device: c_int, frequency_hz: f64) -> c_int;
        pub fn vsgSetSampleRate(device: c_int, sample_rate: f64) -> c_int;
        pub fn vsgSetLevel(device: c_int, level: f64) -> c_int;
        pub fn vsgSetIQOffset(device: c_int, i_offset: i16, q_offset: i16) -> c_int;
        pub fn vsgGetFrequency(device: c_int, frequency_hz: *mut f64) -> c_int;
        pub fn vsgGetSampleRate(device: c_int, sample_rate: *mut f64) -> c_int;
        pub fn vsgGetLevel(device: c_int, level: *mut f64) -> c_int;
        pub fn vsgGetIQOffset(device: c_int, i_offset: *mut i16, q_offset: *mut i16) -> c_int;
        pub fn vsgSubmitIQ(device: c_int, iq: *const f32, len: c_int) -> c_int;
        pub fn vsgFlush(device: c_int) -> c_int;
        pub fn vsgGetErrorString(status: c_int) -> *const c_char;
        pub fn vsgGetAPIVersion() -> *const c_char;
    }
}

fn status_text(code: i32) -> String {
    unsafe { CStr::from_ptr(ffi::vsgGetErrorString(code)) }
        .to_string_lossy()
        .into_owned()
}

fn vsg_check(call: &'static str, code: c_int) -> Result<()> {
    check(call, Status(code), || status_text(code))
}

fn vsg_open_check(call: &'static str, code: c_int) -> Result<()> {
    check_open(call, Status(code), ffi::VSG_DEVICE_NOT_FOUND, || {
        status_text(code)
    })
}

/// One opened VSG60. Aborts the output stream and releases the device when
/// dropped.
#[derive(Debug)]
pub struct VsgDevice {
    handle: c_int,
}

impl VsgDevice {
    /// Claim the first unopened VSG device on the system.
    pub fn open() -> Result<Self> {
        let mut handle: c_int = -1;
        vsg_open_check("vsgOpenDevice", unsafe { ffi::vsgOpenDevice(&mut handle) })?;
        Self::describe(handle)
    }

    /// Open the VSG device with the given serial number.
    pub fn open_serial(serial: i32) -> Result<Self> {
        let mut handle: c_int = -1;
        vsg_open_check("vsgOpenDeviceBySerial", unsafe {
            ffi::vsgOpenDeviceBySerial(&mut handle, serial)
        })?;
        Self::describe(handle)
    }

    fn describe(handle: c_int) -> Result<Self> {
        let dev = Self { handle };
        let mut serial: c_int = 0;
        vsg_check("vsgGetSerialNumber", unsafe {
            ffi::vsgGetSerialNumber(dev.handle, &mut serial)
        })?;
        let version = unsafe { CStr::from_ptr(ffi::vsgGetAPIVersion()) }.to_string_lossy();
        info!(api_version = %version, serial, "VSG device opened");
        Ok(dev)
    }
}

impl TransmitterDevice for VsgDevice {
    type Params = VsgParams;

    fn apply(&mut self, params: &VsgParams) -> Result<TxInfo> {
        let h = self.handle;
        unsafe {
            vsg_check("vsgSetFrequency", ffi::vsgSetFrequency(h, params.center))?;
            vsg_check("vsgSetSampleRate", ffi::vsgSetSampleRate(h, params.sample_rate))?;
            vsg_check("vsgSetLevel", ffi::vsgSetLevel(h, params.level))?;
            vsg_check(
                "vsgSetIQOffset",
                ffi::vsgSetIQOffset(h, params.i_offset, params.q_offset),
            )?;

            // The generator rounds requests it cannot hit exactly; read the
            // applied values back.
            let mut frequency = 0.0;
            let mut sample_rate = 0.0;
            let mut level = 0.0;
            let mut i_offset: i16 = 0;
            let mut q_offset: i16 = 0;
            vsg_check("vsgGetFrequency", ffi::vsgGetFrequency(h, &mut frequency))?;
            vsg_check("vsgGetSampleRate", ffi::vsgGetSampleRate(h, &mut sample_rate))?;
            vsg_check("vsgGetLevel", ffi::vsgGetLevel(h, &mut level))?;
            vsg_check(
                "vsgGetIQOffset",
                ffi::vsgGetIQOffset(h, &mut i_offset, &mut q_offset),
            )?;
            Ok(TxInfo {
                frequency,
                sample_rate,
                level,
                offset: (i_offset, q_offset),
            })
        }
    }

    fn transmit(&mut self, buf: &[Complex32]) -> Result<()> {
        let code = unsafe {
            ffi::vsgSubmitIQ(
                self.handle,
                buf.as_ptr().cast::<f32>(),
                buf.len() as c_int,
            )
        };
        vsg_check("vsgSubmitIQ", code)?;
        // Do not return with samples queued: the runtime assumes the buffer
        // has been consumed.
        vsg_check("vsgFlush", unsafe { ffi::vsgFlush(self.handle) })
    }
}

impl Drop for VsgDevice {
    fn drop(&mut self) {
        // The device must be idle before the session is released.
        unsafe {
            ffi::vsgAbort(self.handle);
            ffi::vsgCloseDevice(self.handle);
        }
    }
}
