//! Status taxonomy and error type.

use thiserror::Error;

/// Raw status code returned by every vendor API call.
///
/// The sign carries the severity: negative codes are fatal, zero is success,
/// positive codes are warnings (clamped settings, calibration drift, sample
/// loss). All four vendor libraries share this convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub i32);

impl Status {
    /// Successful call.
    pub const OK: Status = Status(0);

    /// Call succeeded without warnings.
    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Call succeeded but data may be uncalibrated or partially lost.
    pub fn is_warning(self) -> bool {
        self.0 > 0
    }

    /// Call failed; the operation did not complete.
    pub fn is_fatal(self) -> bool {
        self.0 < 0
    }
}

/// Errors surfaced by device sessions and adapter blocks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A vendor API call returned a fatal status. The device session should
    /// be considered unusable; dropping the adapter aborts and closes it.
    #[error("{call}: {message} (status {code})")]
    Device {
        /// Name of the vendor call that failed.
        call: &'static str,
        /// Raw vendor status code.
        code: i32,
        /// Vendor-provided description of the status.
        message: String,
    },
    /// No instrument of the requested family was present when the session
    /// was opened. Retrying after the device is connected is safe.
    #[error("no instrument present")]
    NoDevice,
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Filter a vendor status by severity.
///
/// Warnings are reported and swallowed so the transfer that produced them can
/// still complete with whatever data the device returned; fatal codes end the
/// current operation.
pub(crate) fn check(
    call: &'static str,
    status: Status,
    message: impl FnOnce() -> String,
) -> Result<()> {
    if status.is_ok() {
        Ok(())
    } else if status.is_warning() {
        warn!("{}: {} (status {})", call, message(), status.0);
        Ok(())
    } else {
        Err(Error::Device {
            call,
            code: status.0,
            message: message(),
        })
    }
}

/// [`check`] for open calls. Each family has one status code meaning the
/// instrument is simply not attached; that one becomes [`Error::NoDevice`]
/// so hosts can tell "plug in the device" apart from a real fault.
pub(crate) fn check_open(
    call: &'static str,
    status: Status,
    not_found: i32,
    message: impl FnOnce() -> String,
) -> Result<()> {
    if status.0 == not_found {
        return Err(Error::NoDevice);
    }
    check(call, status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_sign() {
        assert!(Status(0).is_ok());
        assert!(Status(1).is_warning());
        assert!(Status(-1).is_fatal());
    }

    #[test]
    fn warnings_pass_check() {
        assert!(check("call", Status(4), || "uncal data".into()).is_ok());
    }

    #[test]
    fn fatal_codes_fail_check() {
        let err = check("spOpenDevice", Status(-1), || "device not found".into());
        match err {
            Err(Error::Device { call, code, .. }) => {
                assert_eq!(call, "spOpenDevice");
                assert_eq!(code, -1);
            }
            other => panic!("expected device error, got {other:?}"),
        }
    }

    #[test]
    fn absent_instrument_maps_to_no_device() {
        let err = check_open("spOpenDevice", Status(-1), -1, || "device not found".into());
        assert!(matches!(err, Err(Error::NoDevice)));
    }

    #[test]
    fn other_open_failures_stay_device_errors() {
        let err = check_open("spOpenDevice", Status(-4), -1, || "invalid device".into());
        assert!(matches!(err, Err(Error::Device { code: -4, .. })));
    }

    #[test]
    fn successful_open_passes_check() {
        assert!(check_open("spOpenDevice", Status(0), -1, || String::new()).is_ok());
    }
}
