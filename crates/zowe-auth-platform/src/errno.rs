//! Errno values reported by the z/OS password check.

use zowe_auth::PlatformErrorType;

/// A known errno of the platform password service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPwdErrno {
    /// Symbolic name.
    pub name: &'static str,
    /// Numeric value.
    pub errno: i32,
    /// Explanation suitable for the classification.
    pub explanation: &'static str,
    /// Who the explanation is for.
    pub error_type: PlatformErrorType,
}

const fn errno(
    name: &'static str,
    errno: i32,
    explanation: &'static str,
    error_type: PlatformErrorType,
) -> PlatformPwdErrno {
    PlatformPwdErrno {
        name,
        errno,
        explanation,
        error_type,
    }
}

static KNOWN: &[PlatformPwdErrno] = &[
    errno(
        "EACCES",
        111,
        "Permission is denied; the specified password is incorrect",
        PlatformErrorType::UserExplained,
    ),
    errno(
        "EINVAL",
        121,
        "Invalid input parameters",
        PlatformErrorType::Default,
    ),
    errno(
        "ENOSYS",
        134,
        "The function is not supported on this system",
        PlatformErrorType::Internal,
    ),
    errno(
        "EPERM",
        139,
        "The calling address space is not authorized to use this service or a load from a not program-controlled library was done in the address space",
        PlatformErrorType::Internal,
    ),
    errno(
        "ESRCH",
        143,
        "The user ID provided is not defined to the security product or is not connected to a group that is defined to the security product",
        PlatformErrorType::UserExplained,
    ),
    errno(
        "EMVSERR",
        157,
        "An MVS environmental error has been detected",
        PlatformErrorType::Internal,
    ),
    errno(
        "EMVSSAFEXTRERR",
        163,
        "The user's access to the security product is revoked",
        PlatformErrorType::UserExplained,
    ),
    errno(
        "EMVSSAF2ERR",
        164,
        "An error occurred in the security product",
        PlatformErrorType::Internal,
    ),
    errno(
        "EMVSEXPIRE",
        168,
        "The password for the specified identity has expired",
        PlatformErrorType::UserExplained,
    ),
    errno(
        "EMVSPASSWORD",
        169,
        "The new password is not valid",
        PlatformErrorType::UserExplained,
    ),
];

impl PlatformPwdErrno {
    /// Look up a numeric errno.
    pub fn from_errno(errno: i32) -> Option<&'static PlatformPwdErrno> {
        KNOWN.iter().find(|e| e.errno == errno)
    }

    /// All known errnos.
    pub fn all() -> &'static [PlatformPwdErrno] {
        KNOWN
    }
}
