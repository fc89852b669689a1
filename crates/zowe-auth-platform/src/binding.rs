//! One-time selection of the identity authority.

use std::sync::{Arc, OnceLock};

use crate::Result;
use crate::user::{MockPlatformUser, NativeSecurityFactory, PlatformUser, SafPlatformUser};

/// Profile that selects the SAF authority.
pub const ZOS_PROFILE: &str = "zos";

/// Holds the authority answering password checks.
///
/// The first successful [`bind`](Self::bind) decides; later calls return the
/// same authority whatever profiles they are given.
#[derive(Default)]
pub struct AuthorityBinding {
    user: OnceLock<Arc<dyn PlatformUser>>,
}

impl AuthorityBinding {
    /// An unbound binding.
    pub const fn new() -> Self {
        Self {
            user: OnceLock::new(),
        }
    }

    /// Process-wide binding.
    pub fn global() -> &'static AuthorityBinding {
        static GLOBAL: AuthorityBinding = AuthorityBinding::new();
        &GLOBAL
    }

    /// The bound authority, if binding already happened.
    pub fn get(&self) -> Option<Arc<dyn PlatformUser>> {
        self.user.get().cloned()
    }

    /// Bind the authority for the active profiles, unless already bound.
    ///
    /// The `zos` profile selects SAF through `factory`; anything else selects
    /// the mock authority.
    pub fn bind(
        &self,
        profiles: &[String],
        factory: &dyn NativeSecurityFactory,
    ) -> Result<Arc<dyn PlatformUser>> {
        if let Some(user) = self.user.get() {
            return Ok(user.clone());
        }

        let user: Arc<dyn PlatformUser> = if profiles.iter().any(|p| p == ZOS_PROFILE) {
            Arc::new(SafPlatformUser::new(factory)?)
        } else {
            log::warn!(
                "The mock authentication provider is used. This application should not be used in production"
            );
            Arc::new(MockPlatformUser)
        };

        // A concurrent bind may have won; its authority is the one kept.
        let _ = self.user.set(user.clone());
        let bound = self.user.get().cloned().unwrap_or(user);
        log::info!("Platform authority bound: {}", bound.name());
        Ok(bound)
    }
}
