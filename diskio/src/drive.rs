//! Dispatch from physical drive numbers to disk implementations

use alloc::{collections::btree_map::BTreeMap, sync::Arc, vec::Vec};

use log::debug;
use thiserror::Error;

use crate::device::disk::{Disk, DiskError, DiskStatus, IoctlCommand, IoctlResponse};

/// Drive number conventionally used for the RAM disk
pub const DRIVE_RAM: u8 = 0;
/// Drive number conventionally used for an MMC/SD card
pub const DRIVE_MMC: u8 = 1;
/// Drive number conventionally used for USB mass storage
pub const DRIVE_USB: u8 = 2;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DriveRegistrationError {
    #[error("physical drive {0} is already registered")]
    DriveConflict(u8),
}

/// Maps physical drive numbers to disks. This is the surface a FAT driver
/// calls into; every operation is keyed by the drive number.
#[derive(Default)]
pub struct DriveTable {
    drives: BTreeMap<u8, Arc<dyn Disk>>,
}

impl DriveTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes all the conventional drive numbers to the same disk
    pub fn single(disk: Arc<dyn Disk>) -> Self {
        let drives = [DRIVE_RAM, DRIVE_MMC, DRIVE_USB]
            .into_iter()
            .map(|pdrv| (pdrv, disk.clone()))
            .collect();

        Self { drives }
    }

    pub fn register(
        &mut self,
        pdrv: u8,
        disk: Arc<dyn Disk>,
    ) -> Result<(), DriveRegistrationError> {
        // Make sure no other disk is registered under this number
        if self.drives.contains_key(&pdrv) {
            return Err(DriveRegistrationError::DriveConflict(pdrv));
        }

        self.drives.insert(pdrv, disk);

        Ok(())
    }

    pub fn get(&self, pdrv: u8) -> Option<Arc<dyn Disk>> {
        self.drives.get(&pdrv).cloned()
    }

    pub fn drives(&self) -> Vec<u8> {
        self.drives.keys().copied().collect()
    }

    pub fn status(&self, pdrv: u8) -> DiskStatus {
        match self.drives.get(&pdrv) {
            Some(disk) => disk.status(),
            None => DiskStatus::NOT_INITIALIZED,
        }
    }

    pub fn initialize(&self, pdrv: u8) -> DiskStatus {
        match self.drives.get(&pdrv) {
            Some(disk) => disk.initialize(),
            None => DiskStatus::NOT_INITIALIZED,
        }
    }

    pub fn read(
        &self,
        pdrv: u8,
        buffer: &mut [u8],
        sector: u64,
        count: usize,
    ) -> Result<(), DiskError> {
        self.disk(pdrv)?.read(buffer, sector, count)
    }

    #[cfg(not(feature = "readonly"))]
    pub fn write(
        &self,
        pdrv: u8,
        buffer: &[u8],
        sector: u64,
        count: usize,
    ) -> Result<(), DiskError> {
        self.disk(pdrv)?.write(buffer, sector, count)
    }

    /// Forwards a raw control code. Codes outside the known set are a
    /// generic error.
    pub fn ioctl(&self, pdrv: u8, command: u8) -> Result<IoctlResponse, DiskError> {
        let disk = self.disk(pdrv)?;

        let command = IoctlCommand::try_from(command).map_err(|err| {
            debug!("drive {pdrv}: {err}");
            DiskError::Error
        })?;

        disk.ioctl(command)
    }

    fn disk(&self, pdrv: u8) -> Result<&Arc<dyn Disk>, DiskError> {
        self.drives.get(&pdrv).ok_or_else(|| {
            debug!("no disk registered for physical drive {pdrv}");
            DiskError::InvalidParameter
        })
    }
}
