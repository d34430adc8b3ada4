//! SM series session (`sm_api`).

use std::ffi::CStr;
use std::os::raw::c_int;
use std::os::raw::c_void;
use std::ptr;

use num_complex::Complex32;

use crate::blocks::sm::SmParams;
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

    // smDeviceNotFoundErr
    pub const SM_DEVICE_NOT_FOUND: c_int = -1;
    pub const SM_MODE_IQ_STREAMING: c_int = 3;
    pub const SM_DATA_TYPE_32FC: c_int = 0;
    pub const SM_TRUE: c_int = 1;
    pub const SM_FALSE: c_int = 0;

    #[link(name = "sm_api")]
    extern "C" {
        pub fn smOpenDevice(device: *mut c_int) -> c_int;
        pub fn smOpenDeviceBySerial(device: *mut c_int, serial_number: c_int) -> c_int;
        pub fn smCloseDevice(device: c_int) -> c_int;
        pub fn smAbort(device: c_int) -> c_int;
        pub fn smGetDeviceInfo(
            device: c_int,
            device_type: *mut c_int,
            serial_number: *mut c_int,
        ) -> c_int;
        pub fn smSetIQDataType(device: c_int, data_type: c_int) -> c_int;
        pub fn smSetIQCenterFreq(device: c_int, center_freq_hz: f64) -> c_int;
        pub fn smSetIQSampleRate(device: c_int, decimation: c_int) -> c_int;
        pub fn smSetIQBandwidth(device: c_int, enabled: c_int, bandwidth: f64) -> c_int;
        pub fn smSetRefLevel(device: c_int, ref_level: f64) -> c_int;
        pub fn smSetAttenuator(device: c_int, atten: c_int) -> c_int;
        pub fn smConfigure(device: c_int, mode: c_int) -> c_int;
        pub fn smGetIQParameters(
            device: c_int,
            sample_rate: *mut f64,
            bandwidth: *mut f64,
        ) -> c_int;
        pub fn smGetIQ(
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
        pub fn smGetErrorString(status: c_int) -> *const c_char;
        pub fn smGetAPIVersion() -> *const c_char;
    }
}

fn status_text(code: i32) -> String {
    unsafe { CStr::from_ptr(ffi::smGetErrorString(code)) }
        .to_string_lossy()
        .into_owned()
}

fn sm_check(call: &'static str, code: c_int) -> Result<()> {
    check(call, Status(code), || status_text(code))
}

fn sm_open_check(call: &'static str, code: c_int) -> Result<()> {
    check_open(call, Status(code), ffi::SM_DEVICE_NOT_FOUND, || {
        status_text(code)
    })
}

fn sm_bool(b: bool) -> c_int {
    if b {
        ffi::SM_TRUE
    } else {
        ffi::SM_FALSE
    }
}

/// One opened SM series analyzer (SM200/SM435). Aborts any active
/// measurement and releases the device when dropped.
#[derive(Debug)]
pub struct SmDevice {
    handle: c_int,
}

impl SmDevice {
    /// Claim the first unopened SM device on the system.
    pub fn open() -> Result<Self> {
        let mut handle: c_int = -1;
        sm_open_check("smOpenDevice", unsafe { ffi::smOpenDevice(&mut handle) })?;
        Self::describe(handle)
    }

    /// Open the SM device with the given serial number.
    pub fn open_serial(serial: i32) -> Result<Self> {
        let mut handle: c_int = -1;
        sm_open_check("smOpenDeviceBySerial", unsafe {
            ffi::smOpenDeviceBySerial(&mut handle, serial)
        })?;
        Self::describe(handle)
    }

    fn describe(handle: c_int) -> Result<Self> {
        let dev = Self { handle };
        let mut device_type: c_int = 0;
        let mut serial: c_int = 0;
        sm_check("smGetDeviceInfo", unsafe {
            ffi::smGetDeviceInfo(dev.handle, &mut device_type, &mut serial)
        })?;
        let version = unsafe { CStr::from_ptr(ffi::smGetAPIVersion()) }.to_string_lossy();
        info!(api_version = %version, serial, device_type, "SM device opened");
        Ok(dev)
    }
}

impl ReceiverDevice for SmDevice {
    type Params = SmParams;

    fn apply(&mut self, params: &SmParams) -> Result<StreamInfo> {
        let h = self.handle;
        unsafe {
            sm_check("smSetIQDataType", ffi::smSetIQDataType(h, ffi::SM_DATA_TYPE_32FC))?;
            sm_check("smSetIQCenterFreq", ffi::smSetIQCenterFreq(h, params.center))?;
            sm_check("smSetIQSampleRate", ffi::smSetIQSampleRate(h, params.decimation))?;
            sm_check("smSetRefLevel", ffi::smSetRefLevel(h, params.ref_level))?;
            sm_check("smSetAttenuator", ffi::smSetAttenuator(h, params.atten))?;
            sm_check(
                "smSetIQBandwidth",
                ffi::smSetIQBandwidth(h, sm_bool(params.software_filter), params.bandwidth),
            )?;

            sm_check("smConfigure", ffi::smConfigure(h, ffi::SM_MODE_IQ_STREAMING))?;

            let mut sample_rate = 0.0;
            let mut bandwidth = 0.0;
            sm_check(
                "smGetIQParameters",
                ffi::smGetIQParameters(h, &mut sample_rate, &mut bandwidth),
            )?;
            Ok(StreamInfo {
                sample_rate,
                bandwidth,
            })
        }
    }

    fn acquire(&mut self, buf: &mut [Complex32], purge: bool) -> Result<()> {
        let code = unsafe {
            ffi::smGetIQ(
                self.handle,
                buf.as_mut_ptr().cast::<c_void>(),
                buf.len() as c_int,
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                sm_bool(purge),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        sm_check("smGetIQ", code)
    }
}

impl Drop for SmDevice {
    fn drop(&mut self) {
        // The device must be idle before the session is released.
        unsafe {
            ffi::smAbort(self.handle);
            ffi::smCloseDevice(self.handle);
        }
    }
}
