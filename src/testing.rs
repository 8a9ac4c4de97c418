//! Test doubles for the host-facing traits

use std::cell::Cell;
use std::collections::BTreeSet;

use core::fmt;

use crate::chrdev::{DevT, DeviceHost, FileOps};
use crate::error::{DriverError, DriverResult};
use crate::uaccess::{UserMemory, UserSlice};

/// Address the fake user mapping starts at
pub const USER_BASE: usize = 0x4000_1000;

/// Fake user memory backed by a byte vector.
///
/// Counts copies and remembers the highest address any copy reached.
pub struct UserPages {
    bytes: Vec<u8>,
    fault: bool,
    copies: Cell<usize>,
    max_end: Cell<usize>,
}

impl UserPages {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            fault: false,
            copies: Cell::new(0),
            max_end: Cell::new(USER_BASE),
        }
    }

    /// A mapping whose every copy faults
    pub fn faulting() -> Self {
        Self {
            fault: true,
            ..Self::new(&[])
        }
    }

    pub fn base(&self) -> usize {
        USER_BASE
    }

    /// The whole mapping as a writer would declare it
    pub fn slice(&self) -> UserSlice {
        UserSlice::new(USER_BASE, self.bytes.len()).unwrap()
    }

    pub fn copies(&self) -> usize {
        self.copies.get()
    }

    pub fn max_end(&self) -> usize {
        self.max_end.get()
    }
}

impl UserMemory for UserPages {
    fn copy_from_user(&self, dst: &mut [u8], src: usize) -> DriverResult<()> {
        if self.fault {
            return Err(DriverError::Efault);
        }

        let offset = src.checked_sub(USER_BASE).ok_or(DriverError::Efault)?;
        let end = offset.checked_add(dst.len()).ok_or(DriverError::Efault)?;
        let source = self.bytes.get(offset..end).ok_or(DriverError::Efault)?;

        dst.copy_from_slice(source);
        self.copies.set(self.copies.get() + 1);
        self.max_end.set(self.max_end.get().max(USER_BASE + end));
        Ok(())
    }
}

/// Major number handed out by [`MockHost`]
pub const MOCK_MAJOR: u32 = 240;

/// Registration step a [`MockHost`] refuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Region,
    Class,
    Cdev(u32),
    Device(u32),
}

/// Successful host calls, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AllocRegion(DevT, u32),
    UnregisterRegion(DevT, u32),
    ClassCreate(String),
    ClassDestroy,
    CdevAdd(DevT, FileOps),
    CdevDel(DevT),
    DeviceCreate(DevT, String),
    DeviceDestroy(DevT),
}

/// Recording [`DeviceHost`]
#[derive(Default)]
pub struct MockHost {
    events: Vec<Event>,
    fail: Option<FailAt>,
    region: bool,
    class: bool,
    cdevs: BTreeSet<DevT>,
    nodes: BTreeSet<DevT>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(at: FailAt) -> Self {
        Self {
            fail: Some(at),
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Nothing acquired is still held
    pub fn is_clean(&self) -> bool {
        !self.region && !self.class && self.cdevs.is_empty() && self.nodes.is_empty()
    }
}

impl DeviceHost for MockHost {
    type Class = u32;
    type Cdev = DevT;

    fn alloc_chrdev_region(
        &mut self,
        first_minor: u32,
        count: u32,
        _name: &str,
    ) -> DriverResult<DevT> {
        if self.fail == Some(FailAt::Region) {
            return Err(DriverError::Ebusy);
        }
        let base = DevT::new(MOCK_MAJOR, first_minor);
        self.region = true;
        self.events.push(Event::AllocRegion(base, count));
        Ok(base)
    }

    fn unregister_chrdev_region(&mut self, base: DevT, count: u32) {
        self.region = false;
        self.events.push(Event::UnregisterRegion(base, count));
    }

    fn class_create(&mut self, name: &str) -> DriverResult<u32> {
        if self.fail == Some(FailAt::Class) {
            return Err(DriverError::Enomem);
        }
        self.class = true;
        self.events.push(Event::ClassCreate(name.to_string()));
        Ok(1)
    }

    fn class_destroy(&mut self, _class: &u32) {
        self.class = false;
        self.events.push(Event::ClassDestroy);
    }

    fn cdev_add(&mut self, dev: DevT, ops: FileOps) -> DriverResult<DevT> {
        if self.fail == Some(FailAt::Cdev(dev.minor())) {
            return Err(DriverError::Ebusy);
        }
        self.cdevs.insert(dev);
        self.events.push(Event::CdevAdd(dev, ops));
        Ok(dev)
    }

    fn cdev_del(&mut self, cdev: &DevT) {
        self.cdevs.remove(cdev);
        self.events.push(Event::CdevDel(*cdev));
    }

    fn device_create(
        &mut self,
        _class: &u32,
        dev: DevT,
        name: fmt::Arguments<'_>,
    ) -> DriverResult<()> {
        if self.fail == Some(FailAt::Device(dev.minor())) {
            return Err(DriverError::Enodev);
        }
        self.nodes.insert(dev);
        self.events.push(Event::DeviceCreate(dev, name.to_string()));
        Ok(())
    }

    fn device_destroy(&mut self, _class: &u32, dev: DevT) {
        self.nodes.remove(&dev);
        self.events.push(Event::DeviceDestroy(dev));
    }
}
