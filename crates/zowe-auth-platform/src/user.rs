//! Identity authorities that check a user id and password.

use std::sync::Arc;

use crate::errno::PlatformPwdErrno;
use crate::{PlatformError, Result};

/// What the authority reported for a rejected (or explicitly accepted) check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReturned {
    /// Whether the credentials were accepted.
    pub success: bool,
    /// Return code of the native call.
    pub rc: i32,
    /// Platform errno.
    pub errno: i32,
    /// Secondary reason code.
    pub errno2: i32,
    /// Symbolic errno, when known.
    pub errno_msg: Option<String>,
}

impl PlatformReturned {
    /// An explicit success.
    pub fn success() -> Self {
        Self {
            success: true,
            rc: 0,
            errno: 0,
            errno2: 0,
            errno_msg: None,
        }
    }

    /// A failure with the given codes.
    pub fn failure(rc: i32, errno: i32, errno2: i32) -> Self {
        Self {
            success: false,
            rc,
            errno,
            errno2,
            errno_msg: PlatformPwdErrno::from_errno(errno).map(|e| e.name.to_string()),
        }
    }
}

/// An external authority answering password checks.
///
/// Calls are synchronous and may block for as long as the platform takes.
/// `Ok(None)` and `Ok(Some(r))` with `r.success` both mean the credentials
/// were accepted.
pub trait PlatformUser: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Check a user id and password.
    fn authenticate(&self, userid: &str, password: &str) -> Result<Option<PlatformReturned>>;
}

/// Stand-in authority for development profiles. Accepts every password.
#[derive(Debug, Clone, Default)]
pub struct MockPlatformUser;

impl PlatformUser for MockPlatformUser {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn authenticate(&self, userid: &str, _password: &str) -> Result<Option<PlatformReturned>> {
        log::debug!("Mock authority accepting {userid}");
        Ok(Some(PlatformReturned::success()))
    }
}

/// Raw result of the native password check (`__passwd` style).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeReturned {
    /// 0 on success, -1 on failure.
    pub rc: i32,
    /// Errno set by the call.
    pub errno: i32,
    /// Errno2 reason code set by the call.
    pub errno2: i32,
}

/// Narrow interface to the operating system's security service.
pub trait NativeSecurity: Send + Sync + 'static {
    /// Verify `password` for `userid`.
    fn passwd(&self, userid: &str, password: &str) -> Result<NativeReturned>;
}

/// Loads the native security service.
pub trait NativeSecurityFactory: Send + Sync {
    /// Load the service, failing if this platform does not provide one.
    fn load(&self) -> Result<Arc<dyn NativeSecurity>>;
}

/// Factory for platforms without a native security service.
#[derive(Debug, Clone, Default)]
pub struct UnavailableNative;

impl NativeSecurityFactory for UnavailableNative {
    fn load(&self) -> Result<Arc<dyn NativeSecurity>> {
        Err(PlatformError::NativeUnavailable(format!(
            "no SAF binding is linked into this build (target os: {})",
            std::env::consts::OS
        )))
    }
}

/// Authority backed by SAF through the native security service.
pub struct SafPlatformUser {
    native: Arc<dyn NativeSecurity>,
}

impl SafPlatformUser {
    /// Load the native service through `factory`.
    pub fn new(factory: &dyn NativeSecurityFactory) -> Result<Self> {
        Ok(Self {
            native: factory.load()?,
        })
    }
}

impl PlatformUser for SafPlatformUser {
    fn name(&self) -> &'static str {
        "saf"
    }

    fn authenticate(&self, userid: &str, password: &str) -> Result<Option<PlatformReturned>> {
        let returned = self.native.passwd(userid, password)?;
        if returned.rc == 0 {
            return Ok(None);
        }
        Ok(Some(PlatformReturned::failure(
            returned.rc,
            returned.errno,
            returned.errno2,
        )))
    }
}
