//! Platform password authentication for the Zowe gateway.
//!
//! Password credentials are checked by an external identity authority: SAF
//! on z/OS, reached through a narrow native interface, or a mock authority
//! everywhere else. Which one answers is decided once at startup by an
//! [`AuthorityBinding`].
//!
//! # Modules
//!
//! - [`errno`]: Known errnos of the platform password check
//! - [`user`]: Authority trait and its mock and SAF implementations
//! - [`binding`]: Profile-driven, one-time authority selection
//! - [`provider`]: [`zowe_auth::CredentialValidator`] for password credentials

pub mod binding;
pub mod errno;
pub mod error;
pub mod provider;
pub mod user;

pub use binding::{AuthorityBinding, ZOS_PROFILE};
pub use errno::PlatformPwdErrno;
pub use error::{PlatformError, Result};
pub use provider::PlatformAuthenticationProvider;
pub use user::{
    MockPlatformUser, NativeReturned, NativeSecurity, NativeSecurityFactory, PlatformReturned,
    PlatformUser, SafPlatformUser, UnavailableNative,
};
