//! Module Lifecycle
//!
//! Load registers every node and hands back the live device. Unload (or
//! dropping the loaded module) tears the registration down.

use crate::chrdev::{DeviceHost, Registration};
use crate::config::{DRIVER_NAME, VERSION};
use crate::drivers::numcheck::NumCheck;
use crate::error::DriverResult;

/// A loaded driver instance
pub struct LoadedModule<'h, H: DeviceHost> {
    registration: Registration<'h, H>,
    device: NumCheck,
}

impl<'h, H: DeviceHost> LoadedModule<'h, H> {
    /// Register the devices with `host`.
    pub fn load(host: &'h mut H) -> DriverResult<Self> {
        let registration = Registration::register(host)?;
        log::info!(
            "{} v{}: initialized and loaded ({} nodes at {})",
            DRIVER_NAME,
            VERSION,
            registration.node_count(),
            registration.base()
        );

        Ok(Self {
            registration,
            device: NumCheck::new(),
        })
    }

    /// File operations for the registered nodes
    #[inline]
    pub fn device(&self) -> &NumCheck {
        &self.device
    }

    #[inline]
    pub fn registration(&self) -> &Registration<'h, H> {
        &self.registration
    }

    /// Unregister every node and log the unload.
    pub fn unload(self) {
        drop(self.registration);
        log::info!("{}: unloaded", DRIVER_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrdev::{CharDeviceOps, DevT};
    use crate::error::DriverError;
    use crate::testing::{FailAt, MockHost, UserPages, MOCK_MAJOR};

    #[test]
    fn test_load_write_unload() {
        let mut host = MockHost::new();
        let module = LoadedModule::load(&mut host).unwrap();

        assert_eq!(module.registration().dev(1), Some(DevT::new(MOCK_MAJOR, 1)));

        let device = module.device();
        let pages = UserPages::new(b"17\n");
        assert!(device.open(1).is_ok());
        assert_eq!(device.write(1, &pages, pages.slice()), Ok(3));
        assert!(device.release(1).is_ok());

        module.unload();
        assert!(host.is_clean());
    }

    #[test]
    fn test_drop_unregisters() {
        let mut host = MockHost::new();
        drop(LoadedModule::load(&mut host).unwrap());
        assert!(host.is_clean());
    }

    #[test]
    fn test_load_failure() {
        let mut host = MockHost::failing(FailAt::Device(0));
        assert_eq!(
            LoadedModule::load(&mut host).err().map(DriverError::errno),
            Some(-19)
        );
        assert!(host.is_clean());
    }
}
