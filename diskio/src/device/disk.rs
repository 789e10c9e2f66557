//! The sector level contract a FAT file system driver expects from each
//! physical drive

use thiserror::Error;

use super::block::BlockDeviceIoError;

/// A drive which serves fixed size logical sectors to a file system
pub trait Disk: Send + Sync {
    /// Returns the current drive status. An empty set means the drive is
    /// ready.
    fn status(&self) -> DiskStatus {
        DiskStatus::empty()
    }

    /// Brings the drive into a ready state and returns the resulting status
    fn initialize(&self) -> DiskStatus {
        self.status()
    }

    /// Reads `count` sectors starting at `sector` into `buffer`
    fn read(&self, buffer: &mut [u8], sector: u64, count: usize) -> Result<(), DiskError>;

    /// Writes `count` sectors starting at `sector` from `buffer`
    fn write(&self, buffer: &[u8], sector: u64, count: usize) -> Result<(), DiskError>;

    /// Handles an out-of-band control request
    fn ioctl(&self, command: IoctlCommand) -> Result<IoctlResponse, DiskError>;
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DiskStatus: u8 {
        const NOT_INITIALIZED = 0x01;
        const NO_DISK = 0x02;
        const WRITE_PROTECTED = 0x04;
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DiskError {
    /// A hard error occurred while talking to the backing store
    #[error("disk I/O error")]
    Error,
    /// The request was malformed (unknown drive, out of range, short buffer)
    #[error("invalid parameter")]
    InvalidParameter,
    /// The exact status reported by the backing device
    #[error(transparent)]
    Device(#[from] BlockDeviceIoError),
}

impl DiskError {
    /// The numeric disk result code for this error. Success is 0.
    pub fn code(self) -> u8 {
        match self {
            Self::Error => 1,
            Self::InvalidParameter => 4,
            Self::Device(e) => e.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlCommand {
    /// Flush any pending writes. Every disk here writes through.
    Sync,
    /// Number of logical sectors on the drive
    GetSectorCount,
    /// Size of a logical sector in bytes
    GetSectorSize,
    /// Erase block size reported to the file system
    GetBlockSize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown ioctl command {0}")]
pub struct UnknownIoctlCommand(pub u8);

impl TryFrom<u8> for IoctlCommand {
    type Error = UnknownIoctlCommand;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sync),
            1 => Ok(Self::GetSectorCount),
            2 => Ok(Self::GetSectorSize),
            3 => Ok(Self::GetBlockSize),
            other => Err(UnknownIoctlCommand(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlResponse {
    Done,
    SectorCount(u64),
    SectorSize(usize),
    BlockSize(usize),
}
