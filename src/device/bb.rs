//! BB60 series session (`bb_api`).

use std::ffi::CStr;
use std::os::raw::c_int;
use std::ptr;

use num_complex::Complex32;

use crate::blocks::bb::BbParams;
use crate::device::ReceiverDevice;
use crate::device::StreamInfo;
use crate::error::check;
use crate::error::check_open;
use crate::Result;
use crate::Status;

mod ffi {
    use std::os::raw::c_char;
    use std::os::raw::c_int;
    use std::os::raw::c_void;

    // bbDeviceNotFoundErr
    pub const BB_DEVICE_NOT_FOUND: c_int = -1;
    pub const BB_STREAMING: c_int = 4;
    pub const BB_STREAM_IQ: c_int = 0;
    pub const BB_DATA_TYPE_32FC: c_int = 0;
    pub const BB_TRUE: c_int = 1;
    pub const BB_FALSE: c_int = 0;

    #[link(name = "bb_api")]
    extern "C" {
        pub fn bbOpenDevice(device: *mut c_int) -> c_int;
        pub fn bbOpenDeviceBySerialNumber(device: *mut c_int, serial_number: u32) -> c_int;
        pub fn bbCloseDevice(device: c_int) -> c_int;
        pub fn bbAbort(device: c_int) -> c_int;
        pub fn bbGetSerialNumber(device: c_int, serial_number: *mut u32) -> c_int;
        pub fn bbConfigureIQCenter(device: c_int, center_freq_hz: f64) -> c_int;
        pub fn bbConfigureRefLevel(device: c_int, ref_level: f64) -> c_int;
        pub fn bbConfigureIQ(device: c_int, downsample_factor: c_int, bandwidth: f64) -> c_int;
        pub fn bbConfigureIQDataType(device: c_int, data_type: c_int) -> c_int;
        pub fn bbInitiate(device: c_int, mode: c_int, flag: c_int) -> c_int;
        pub fn bbQueryIQParameters(
            device: c_int,
            sample_rate: *mut f64,
            bandwidth: *mut f64,
        ) -> c_int;
        pub fn bbGetIQUnpacked(
            device: c_int,
            iq_data: *mut c_void,
            iq_count: c_int,
            triggers: *mut c_int,
            trigger_count: c_int,
            purge: c_int,
            data_remaining: *mut c_int,
            sample_loss: *mut c_int,
            sec: *mut c_int,
            nano: *mut c_int,
        ) -> c_int;
        pub fn bbGetErrorString(status: c_int) -> *const c_char;
        pub fn bbGetAPIVersion() -> *const c_char;
    }
}

fn status_text(code: i32) -> String {
    unsafe { CStr::from_ptr(ffi::bbGetErrorString(code)) }
        .to_string_lossy()
        .into_owned()
}

fn bb_check(call: &'static str, code: c_int) -> Result<()> {
    check(call, Status(code), || status_text(code))
}

fn bb_open_check(call: &'static str, code: c_int) -> Result<()> {
    check_open(call, Status(code), ffi::BB_DEVICE_NOT_FOUND, || {
        status_text(code)
    })
}

/// One opened BB60. Aborts any active measurement and releases the device
/// when dropped.
#[derive(Debug)]
pub struct BbDevice {
    handle: c_int,
}

impl BbDevice {
    /// Claim the first unopened BB device on the system.
    pub fn open() -> Result<Self> {
        let mut handle: c_int = -1;
        bb_open_check("bbOpenDevice", unsafe { ffi::bbOpenDevice(&mut handle) })?;
        Self::describe(handle)
    }

    /// Open the BB device with the given serial number.
    pub fn open_serial(serial: u32) -> Result<Self> {
        let mut handle: c_int = -1;
        bb_open_check("bbOpenDeviceBySerialNumber", unsafe {
            ffi::bbOpenDeviceBySerialNumber(&mut handle, serial)
        })?;
        Self::describe(handle)
    }

    fn describe(handle: c_int) -> Result<Self> {
        let dev = Self { handle };
        let mut serial: u32 = 0;
        bb_check("bbGetSerialNumber", unsafe {
            ffi::bbGetSerialNumber(dev.handle, &mut serial)
        })?;
        let version = unsafe { CStr::from_ptr(ffi::bbGetAPIVersion()) }.to_string_lossy();
        info!(api_version = %version, serial, "BB device opened");
        Ok(dev)
    }
}

impl ReceiverDevice for BbDevice {
    type Params = BbParams;

    fn apply(&mut self, params: &BbParams) -> Result<StreamInfo> {
        let h = self.handle;
        unsafe {
            bb_check("bbConfigureIQCenter", ffi::bbConfigureIQCenter(h, params.center))?;
            bb_check(
                "bbConfigureRefLevel",
                ffi::bbConfigureRefLevel(h, params.ref_level),
            )?;
            bb_check(
                "bbConfigureIQ",
                ffi::bbConfigureIQ(h, params.decimation, params.bandwidth),
            )?;
            bb_check(
                "bbConfigureIQDataType",
                ffi::bbConfigureIQDataType(h, ffi::BB_DATA_TYPE_32FC),
            )?;

            bb_check(
                "bbInitiate",
                ffi::bbInitiate(h, ffi::BB_STREAMING, ffi::BB_STREAM_IQ),
            )?;

            let mut sample_rate = 0.0;
            let mut bandwidth = 0.0;
            bb_check(
                "bbQueryIQParameters",
                ffi::bbQueryIQParameters(h, &mut sample_rate, &mut bandwidth),
            )?;
            Ok(StreamInfo {
                sample_rate,
                bandwidth,
            })
        }
    }

    fn acquire(&mut self, buf: &mut [Complex32], purge: bool) -> Result<()> {
        let code = unsafe {
            ffi::bbGetIQUnpacked(
                self.handle,
                buf.as_mut_ptr().cast(),
                buf.len() as c_int,
                ptr::null_mut(),
                0,
                if purge { ffi::BB_TRUE } else { ffi::BB_FALSE },
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        bb_check("bbGetIQUnpacked", code)
    }
}

impl Drop for BbDevice {
    fn drop(&mut self) {
        // The device must be idle before the session is released.
        unsafe {
            ffi::bbAbort(self.handle);
            ffi::bbCloseDevice(self.handle);
        }
    }
}
