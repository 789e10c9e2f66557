//! In-memory serial flash device

use alloc::{vec, vec::Vec};
use core::sync::atomic::{AtomicBool, Ordering};

use spin::RwLock;

use crate::device::block::{BlockDevice, BlockDeviceIoError, BlockDeviceMetadata};

/// A flash part emulated in RAM. Reads and writes operate on exactly one
/// block at a block aligned byte offset.
pub struct MemoryFlash {
    block_size: usize,
    total_blocks: usize,
    data: RwLock<Vec<u8>>,
    write_protected: AtomicBool,
}

impl MemoryFlash {
    /// Creates an erased (all `0xFF`) flash part
    pub fn new(block_size: usize, total_blocks: usize) -> Self {
        Self {
            block_size,
            total_blocks,
            data: RwLock::new(vec![0xFF; block_size * total_blocks]),
            write_protected: AtomicBool::new(false),
        }
    }

    pub fn set_write_protected(&self, protected: bool) {
        self.write_protected.store(protected, Ordering::Relaxed);
    }

    /// Copies `len` raw bytes starting at `offset` out of the part
    pub fn dump(&self, offset: usize, len: usize) -> Vec<u8> {
        self.data.read()[offset..offset + len].to_vec()
    }

    fn check_offset(&self, offset: usize) -> Result<(), BlockDeviceIoError> {
        if offset % self.block_size != 0 {
            return Err(BlockDeviceIoError::UnalignedOffset);
        }

        if offset >= self.block_size * self.total_blocks {
            return Err(BlockDeviceIoError::OffsetOutOfBounds);
        }

        Ok(())
    }
}

impl BlockDevice for MemoryFlash {
    fn metadata(&self) -> BlockDeviceMetadata {
        BlockDeviceMetadata {
            block_size: self.block_size,
            total_blocks: self.total_blocks,
        }
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, BlockDeviceIoError> {
        self.check_offset(offset)?;

        let data = self.data.read();

        // The last read on the part may come up short if the caller asks for
        // more than what is left
        let read_size = buf.len().min(data.len() - offset);
        buf[..read_size].copy_from_slice(&data[offset..offset + read_size]);

        Ok(read_size)
    }

    fn write(&self, offset: usize, buf: &[u8]) -> Result<(), BlockDeviceIoError> {
        if self.write_protected.load(Ordering::Relaxed) {
            return Err(BlockDeviceIoError::WriteProtected);
        }

        self.check_offset(offset)?;

        if buf.len() != self.block_size {
            return Err(BlockDeviceIoError::MismatchedBlockSize);
        }

        self.data.write()[offset..offset + buf.len()].copy_from_slice(buf);

        Ok(())
    }
}
