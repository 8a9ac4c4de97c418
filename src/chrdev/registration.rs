//! Device Registration
//!
//! Acquires the char-device region, the device class, and one cdev plus
//! one node per minor. [`Registration`] owns everything it acquired and
//! gives it back in reverse order when dropped, including after a
//! partial failure inside [`Registration::register`].

use core::fmt;

use crate::config::devices::{FIRST_MINOR, NUM_DEVICES};
use crate::config::{DRIVER_CLASS, DRIVER_NAME};
use crate::error::DriverResult;

use super::{DevT, FileOps};

/// Operations every node is registered with
pub const DEVICE_OPS: FileOps = FileOps::OPEN.union(FileOps::WRITE).union(FileOps::RELEASE);

/// Kernel services needed to publish the device nodes.
///
/// Release methods cannot fail; they are only ever called on handles the
/// matching acquire method returned.
pub trait DeviceHost {
    /// Handle for a created device class
    type Class;
    /// Handle for an added cdev
    type Cdev;

    /// Reserve `count` minors starting at `first_minor` under a dynamic major
    fn alloc_chrdev_region(&mut self, first_minor: u32, count: u32, name: &str)
        -> DriverResult<DevT>;
    fn unregister_chrdev_region(&mut self, base: DevT, count: u32);

    fn class_create(&mut self, name: &str) -> DriverResult<Self::Class>;
    fn class_destroy(&mut self, class: &Self::Class);

    /// Make `dev` live with the given operation set
    fn cdev_add(&mut self, dev: DevT, ops: FileOps) -> DriverResult<Self::Cdev>;
    fn cdev_del(&mut self, cdev: &Self::Cdev);

    /// Create the visible node for `dev`
    fn device_create(
        &mut self,
        class: &Self::Class,
        dev: DevT,
        name: fmt::Arguments<'_>,
    ) -> DriverResult<()>;
    fn device_destroy(&mut self, class: &Self::Class, dev: DevT);
}

struct DeviceSlot<C> {
    dev: DevT,
    cdev: C,
    node: bool,
}

/// Live registration of all device nodes
pub struct Registration<'h, H: DeviceHost> {
    host: &'h mut H,
    base: DevT,
    class: H::Class,
    devices: [Option<DeviceSlot<H::Cdev>>; NUM_DEVICES as usize],
}

impl<'h, H: DeviceHost> Registration<'h, H> {
    /// Register the region, class and every device node.
    ///
    /// On error nothing stays registered.
    pub fn register(host: &'h mut H) -> DriverResult<Self> {
        let base = host
            .alloc_chrdev_region(FIRST_MINOR, NUM_DEVICES, DRIVER_NAME)
            .map_err(|e| {
                log::error!("char-device region allocation failed: {}", e);
                e
            })?;

        let class = match host.class_create(DRIVER_CLASS) {
            Ok(class) => class,
            Err(e) => {
                log::error!("class creation failed: {}", e);
                host.unregister_chrdev_region(base, NUM_DEVICES);
                return Err(e);
            }
        };

        let mut registration = Self {
            host,
            base,
            class,
            devices: core::array::from_fn(|_| None),
        };

        // Any early return drops `registration`, which releases what was
        // acquired so far.
        for index in 0..NUM_DEVICES {
            let dev = base.offset(index);

            let cdev = registration.host.cdev_add(dev, DEVICE_OPS).map_err(|e| {
                log::error!("cdev add failed for {}: {}", dev, e);
                e
            })?;
            registration.devices[index as usize] = Some(DeviceSlot {
                dev,
                cdev,
                node: false,
            });

            registration
                .host
                .device_create(
                    &registration.class,
                    dev,
                    format_args!("{}{}", DRIVER_NAME, index),
                )
                .map_err(|e| {
                    log::error!("device node creation failed for {}: {}", dev, e);
                    e
                })?;
            if let Some(slot) = registration.devices[index as usize].as_mut() {
                slot.node = true;
            }
        }

        Ok(registration)
    }

    /// First device number of the region
    #[inline]
    pub fn base(&self) -> DevT {
        self.base
    }

    /// Device number of a registered minor
    pub fn dev(&self, index: u32) -> Option<DevT> {
        self.devices
            .get(index as usize)?
            .as_ref()
            .map(|slot| slot.dev)
    }

    /// Number of nodes that are live
    pub fn node_count(&self) -> usize {
        self.devices
            .iter()
            .flatten()
            .filter(|slot| slot.node)
            .count()
    }
}

impl<H: DeviceHost> Drop for Registration<'_, H> {
    fn drop(&mut self) {
        for slot in self.devices.iter_mut().rev() {
            if let Some(slot) = slot.take() {
                if slot.node {
                    self.host.device_destroy(&self.class, slot.dev);
                }
                self.host.cdev_del(&slot.cdev);
            }
        }
        self.host.class_destroy(&self.class);
        self.host.unregister_chrdev_region(self.base, NUM_DEVICES);
    }
}
