//! SP145 session (`sp_api`).

use std::ffi::CStr;
use std::os::raw::c_int;
use std::os::raw::c_void;
use std::ptr;

use num_complex::Complex32;

use crate::blocks::sp::SpParams;
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

    // spDeviceNotFoundErr
    pub const SP_DEVICE_NOT_FOUND: c_int = -1;
    pub const SP_MODE_IQ_STREAMING: c_int = 3;
    pub const SP_DATA_TYPE_32FC: c_int = 0;
    pub const SP_TRUE: c_int = 1;
    pub const SP_FALSE: c_int = 0;

    #[link(name = "sp_api")]
    extern "C" {
        pub fn spOpenDevice(device: *mut c_int) -> c_int;
        pub fn spOpenDeviceBySerial(device: *mut c_int, serial_number: c_int) -> c_int;
        pub fn spCloseDevice(device: c_int) -> c_int;
        pub fn spAbort(device: c_int) -> c_int;
        pub fn spGetSerialNumber(device: c_int, serial_number: *mut c_int) -> c_int;
        pub fn spSetIQDataType(device: c_int, data_type: c_int) -> c_int;
        pub fn spSetIQCenterFreq(device: c_int, center_freq_hz: f64) -> c_int;
        pub fn spSetIQSampleRate(device: c_int, decimation: c_int) -> c_int;
        pub fn spSetIQSoftwareFilter(device: c_int, enabled: c_int) -> c_int;
        pub fn spSetIQBandwidth(device: c_int, bandwidth: f64) -> c_int;
        pub fn spSetRefLevel(device: c_int, ref_level: f64) -> c_int;
        pub fn spSetAttenuator(device: c_int, atten: c_int) -> c_int;
        pub fn spConfigure(device: c_int, mode: c_int) -> c_int;
        pub fn spGetIQParameters(
            device: c_int,
            sample_rate: *mut f64,
            bandwidth: *mut f64,
        ) -> c_int;
        pub fn spGetIQ(
            device: c_int,
            iq_buf: *mut c_void,
            iq_buf_size: c_int,
            triggers: *mut f64,
            trigger_buf_size: c_int,
            ns_since_epoch: *mut i64,
            purge: c_int,
            sample_loss: *mut c_int,
            samples_remaining: *mut c_int,
        ) -> c_int;
        pub fn spGetErrorString(status: c_int) -> *const c_char;
        pub fn spGetAPIVersion() -> *const c_char;
    }
}

// The vendor returns pointers to static strings.
fn status_text(code: i32) -> String {
    unsafe { CStr::from_ptr(ffi::spGetErrorString(code)) }
        .to_string_lossy()
        .into_owned()
}

fn sp_check(call: &'static str, code: c_int) -> Result<()> {
    check(call, Status(code), || status_text(code))
}

fn sp_open_check(call: &'static str, code: c_int) -> Result<()> {
    check_open(call, Status(code), ffi::SP_DEVICE_NOT_FOUND, || {
        status_text(code)
    })
}

fn sp_bool(b: bool) -> c_int {
    if b {
        ffi::SP_TRUE
    } else {
        ffi::SP_FALSE
    }
}

/// One opened SP145. Aborts any active measurement and releases the device
/// when dropped.
#[derive(Debug)]
pub struct SpDevice {
    handle: c_int,
}

impl SpDevice {
    /// Claim the first unopened SP device on the system.
    pub fn open() -> Result<Self> {
        let mut handle: c_int = -1;
        sp_open_check("spOpenDevice", unsafe { ffi::spOpenDevice(&mut handle) })?;
        Self::describe(handle)
    }

    /// Open the SP device with the given serial number.
    pub fn open_serial(serial: i32) -> Result<Self> {
        let mut handle: c_int = -1;
        sp_open_check("spOpenDeviceBySerial", unsafe {
            ffi::spOpenDeviceBySerial(&mut handle, serial)
        })?;
        Self::describe(handle)
    }

    fn describe(handle: c_int) -> Result<Self> {
        let dev = Self { handle };
        let mut serial: c_int = 0;
        sp_check("spGetSerialNumber", unsafe {
            ffi::spGetSerialNumber(dev.handle, &mut serial)
        })?;
        let version = unsafe { CStr::from_ptr(ffi::spGetAPIVersion()) }.to_string_lossy();
        info!(api_version = %version, serial, "SP device opened");
        Ok(dev)
    }
}

impl ReceiverDevice for SpDevice {
    type Params = SpParams;

    fn apply(&mut self, params: &SpParams) -> Result<StreamInfo> {
        let h = self.handle;
        unsafe {
            sp_check("spSetIQDataType", ffi::spSetIQDataType(h, ffi::SP_DATA_TYPE_32FC))?;
            sp_check("spSetIQCenterFreq", ffi::spSetIQCenterFreq(h, params.center))?;
            sp_check("spSetIQSampleRate", ffi::spSetIQSampleRate(h, params.decimation))?;
            sp_check(
                "spSetIQSoftwareFilter",
                ffi::spSetIQSoftwareFilter(h, sp_bool(params.software_filter)),
            )?;
            sp_check("spSetRefLevel", ffi::spSetRefLevel(h, params.ref_level))?;
            sp_check("spSetAttenuator", ffi::spSetAttenuator(h, params.atten))?;
            sp_check("spSetIQBandwidth", ffi::spSetIQBandwidth(h, params.bandwidth))?;

            sp_check("spConfigure", ffi::spConfigure(h, ffi::SP_MODE_IQ_STREAMING))?;

            let mut sample_rate = 0.0;
            let mut bandwidth = 0.0;
            sp_check(
                "spGetIQParameters",
                ffi::spGetIQParameters(h, &mut sample_rate, &mut bandwidth),
            )?;
            Ok(StreamInfo {
                sample_rate,
                bandwidth,
            })
        }
    }

    fn acquire(&mut self, buf: &mut [Complex32], purge: bool) -> Result<()> {
        let code = unsafe {
            ffi::spGetIQ(
                self.handle,
                buf.as_mut_ptr().cast::<c_void>(),
                buf.len() as c_int,
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                sp_bool(purge),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        sp_check("spGetIQ", code)
    }
}

impl Drop for SpDevice {
    fn drop(&mut self) {
        // The device must be idle before the session is released.
        unsafe {
            ffi::spAbort(self.handle);
            ffi::spCloseDevice(self.handle);
        }
    }
}
