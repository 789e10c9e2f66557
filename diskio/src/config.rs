//! Sizes of the logical sectors served to the file system and of the blocks
//! native to the backing flash device

use thiserror::Error;

/// Size in bytes of the sectors the file system reads and writes
pub const SECTOR_SIZE: usize = 512;

/// Native block size of the serial flash part
pub const FLASH_BLOCK_SIZE: usize = 256;

/// Number of native blocks on the serial flash part
pub const FLASH_TOTAL_BLOCKS: usize = 3072;

/// Capacity of the scratch buffer used to stage block writes. No device may
/// use a larger block.
pub const MAX_BLOCK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    sector_size: usize,
    block_size: usize,
    total_blocks: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("sector and block sizes must be non-zero")]
    ZeroSize,
    #[error("block size {0} exceeds the scratch capacity")]
    BlockTooLarge(usize),
    #[error("sector size {sector_size} is not a multiple of block size {block_size}")]
    NotAMultiple {
        sector_size: usize,
        block_size: usize,
    },
}

impl Geometry {
    /// The geometry of the default flash part
    pub const FLASH: Self = Self {
        sector_size: SECTOR_SIZE,
        block_size: FLASH_BLOCK_SIZE,
        total_blocks: FLASH_TOTAL_BLOCKS,
    };

    pub fn new(
        sector_size: usize,
        block_size: usize,
        total_blocks: usize,
    ) -> Result<Self, GeometryError> {
        if sector_size == 0 || block_size == 0 {
            return Err(GeometryError::ZeroSize);
        }

        if block_size > MAX_BLOCK_SIZE {
            return Err(GeometryError::BlockTooLarge(block_size));
        }

        if sector_size % block_size != 0 {
            return Err(GeometryError::NotAMultiple {
                sector_size,
                block_size,
            });
        }

        Ok(Self {
            sector_size,
            block_size,
            total_blocks,
        })
    }

    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    /// Number of device blocks composing one logical sector
    pub fn blocks_per_sector(&self) -> usize {
        self.sector_size / self.block_size
    }

    /// Number of whole logical sectors that fit on the device
    pub fn sector_count(&self) -> u64 {
        (self.total_blocks as u64 * self.block_size as u64) / self.sector_size as u64
    }

    /// Byte offset of the first block of `sector`
    pub fn sector_address(&self, sector: u64) -> usize {
        sector as usize * self.sector_size
    }
}
