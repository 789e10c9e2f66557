//! Disk I/O layer for a FAT file system driver.
//!
//! Maps the sector based drive contract (status, initialize, read, write and
//! ioctl keyed by a physical drive number) onto concrete backing stores: a
//! RAM disk, or a flash device whose native block size is smaller than a
//! sector.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod drive;
pub mod drivers;

pub use config::{Geometry, GeometryError};
pub use device::{
    block::{BlockDevice, BlockDeviceIoError, BlockDeviceMetadata},
    disk::{Disk, DiskError, DiskStatus, IoctlCommand, IoctlResponse, UnknownIoctlCommand},
};
pub use drive::{DRIVE_MMC, DRIVE_RAM, DRIVE_USB, DriveRegistrationError, DriveTable};
pub use drivers::{
    block::MemoryFlash,
    disk::{FlashDisk, RamDisk},
};
