use thiserror::Error;

/// Represents a backing store (usually a flash chip) which reads and writes
/// data in fixed size blocks addressed by absolute byte offset
pub trait BlockDevice: Send + Sync {
    fn metadata(&self) -> BlockDeviceMetadata;

    /// Reads one block starting at `offset` into `buf` and returns the number
    /// of bytes actually read. A count lower than `buf.len()` is a short read.
    fn read(&self, _offset: usize, _buf: &mut [u8]) -> Result<usize, BlockDeviceIoError> {
        Err(BlockDeviceIoError::OperationNotSupported)
    }

    /// Writes one block from `buf` starting at `offset`
    fn write(&self, _offset: usize, _buf: &[u8]) -> Result<(), BlockDeviceIoError> {
        Err(BlockDeviceIoError::OperationNotSupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDeviceMetadata {
    pub block_size: usize,
    pub total_blocks: usize,
}

impl BlockDeviceMetadata {
    pub fn capacity(&self) -> usize {
        self.block_size * self.total_blocks
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BlockDeviceIoError {
    /// Returned if this operation is not supported on this device
    #[error("operation not supported by the device")]
    OperationNotSupported,
    /// The provided offset was not aligned to the block size
    #[error("offset is not aligned to the block size")]
    UnalignedOffset,
    /// The provided offset was out of range for the device
    #[error("offset is out of range for the device")]
    OffsetOutOfBounds,
    /// The provided buffer was not a multiple of the block size
    #[error("buffer length does not match the block size")]
    MismatchedBlockSize,
    #[error("device is write protected")]
    WriteProtected,
    #[error("device is not ready")]
    NotReady,
    /// The device reported a failure it could not classify further
    #[error("device reported a hardware failure")]
    Failed,
}

impl BlockDeviceIoError {
    /// The numeric disk result code this status maps to when handed to a FAT
    /// driver
    pub fn code(self) -> u8 {
        match self {
            Self::OperationNotSupported | Self::Failed => 1,
            Self::WriteProtected => 2,
            Self::NotReady => 3,
            Self::UnalignedOffset | Self::OffsetOutOfBounds | Self::MismatchedBlockSize => 4,
        }
    }
}
