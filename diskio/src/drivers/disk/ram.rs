use alloc::{vec, vec::Vec};

use log::debug;
use spin::RwLock;

use crate::device::disk::{Disk, DiskError, IoctlCommand, IoctlResponse};

/// A disk which keeps its sectors in memory. Contents are lost when the disk
/// is dropped.
pub struct RamDisk {
    sector_size: usize,
    data: RwLock<Vec<u8>>,
}

impl RamDisk {
    /// Creates a zero filled disk of `sector_count` sectors
    pub fn new(sector_size: usize, sector_count: usize) -> Self {
        assert_ne!(sector_size, 0, "ram disk sectors cannot be empty");

        Self {
            sector_size,
            data: RwLock::new(vec![0; sector_size * sector_count]),
        }
    }

    pub fn sector_count(&self) -> u64 {
        (self.data.read().len() / self.sector_size) as u64
    }

    /// Returns the byte range a request covers within the backing buffer
    fn byte_range(
        &self,
        buffer_len: usize,
        sector: u64,
        count: usize,
    ) -> Result<core::ops::Range<usize>, DiskError> {
        let len = count
            .checked_mul(self.sector_size)
            .ok_or(DiskError::InvalidParameter)?;

        if buffer_len < len {
            debug!("buffer of {buffer_len} bytes cannot hold {count} sectors");
            return Err(DiskError::InvalidParameter);
        }

        let end = sector
            .checked_add(count as u64)
            .ok_or(DiskError::InvalidParameter)?;

        if end > self.sector_count() {
            debug!("sectors {sector}..{end} out of range for ram disk");
            return Err(DiskError::InvalidParameter);
        }

        let start = sector as usize * self.sector_size;
        Ok(start..start + len)
    }
}

impl Disk for RamDisk {
    fn read(&self, buffer: &mut [u8], sector: u64, count: usize) -> Result<(), DiskError> {
        let range = self.byte_range(buffer.len(), sector, count)?;
        let data = self.data.read();

        buffer[..range.len()].copy_from_slice(&data[range]);

        Ok(())
    }

    fn write(&self, buffer: &[u8], sector: u64, count: usize) -> Result<(), DiskError> {
        let range = self.byte_range(buffer.len(), sector, count)?;
        let len = range.len();
        let mut data = self.data.write();

        data[range].copy_from_slice(&buffer[..len]);

        Ok(())
    }

    fn ioctl(&self, command: IoctlCommand) -> Result<IoctlResponse, DiskError> {
        Ok(match command {
            IoctlCommand::Sync => IoctlResponse::Done,
            IoctlCommand::GetSectorCount => IoctlResponse::SectorCount(self.sector_count()),
            IoctlCommand::GetSectorSize => IoctlResponse::SectorSize(self.sector_size),
            IoctlCommand::GetBlockSize => IoctlResponse::BlockSize(self.sector_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SECTOR_SIZE, device::disk::DiskStatus};

    #[test]
    fn is_always_ready() {
        let disk = RamDisk::new(SECTOR_SIZE, 4);

        assert_eq!(disk.status(), DiskStatus::empty());
        assert_eq!(disk.initialize(), DiskStatus::empty());
    }

    #[test]
    fn sectors_survive_a_round_trip() {
        let disk = RamDisk::new(SECTOR_SIZE, 8);
        let data: Vec<u8> = (0..3 * SECTOR_SIZE).map(|i| i as u8).collect();
        let mut readback = vec![0u8; 3 * SECTOR_SIZE];

        disk.write(&data, 5, 3).unwrap();
        disk.read(&mut readback, 5, 3).unwrap();

        assert_eq!(readback, data);

        // neighbouring sectors are untouched
        let mut first = vec![0xEEu8; SECTOR_SIZE];
        disk.read(&mut first, 4, 1).unwrap();
        assert!(first.iter().all(|&b| b == 0));
    }

    #[test]
    fn larger_buffers_are_only_partially_used() {
        let disk = RamDisk::new(SECTOR_SIZE, 2);
        let mut buf = vec![0xEEu8; 2 * SECTOR_SIZE];

        disk.read(&mut buf, 1, 1).unwrap();

        assert!(buf[..SECTOR_SIZE].iter().all(|&b| b == 0));
        assert!(buf[SECTOR_SIZE..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn rejects_bad_ranges() {
        let disk = RamDisk::new(SECTOR_SIZE, 2);
        let mut buf = vec![0u8; SECTOR_SIZE];

        assert_eq!(disk.read(&mut buf, 2, 1), Err(DiskError::InvalidParameter));
        assert_eq!(disk.read(&mut buf, 0, 2), Err(DiskError::InvalidParameter));
        assert_eq!(disk.write(&buf, u64::MAX, 1), Err(DiskError::InvalidParameter));
        assert_eq!(disk.read(&mut buf, 9, 0), Err(DiskError::InvalidParameter));
    }

    #[test]
    fn ioctl_reports_configured_size() {
        let disk = RamDisk::new(SECTOR_SIZE, 128);

        assert_eq!(disk.ioctl(IoctlCommand::Sync), Ok(IoctlResponse::Done));
        assert_eq!(
            disk.ioctl(IoctlCommand::GetSectorCount),
            Ok(IoctlResponse::SectorCount(128))
        );
        assert_eq!(
            disk.ioctl(IoctlCommand::GetBlockSize),
            Ok(IoctlResponse::BlockSize(SECTOR_SIZE))
        );
    }
}
