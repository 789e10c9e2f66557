//! Serves logical sectors from a flash device with a smaller native block
//! size. Each sector is split into `sector_size / block_size` consecutive
//! block operations.

use alloc::sync::Arc;

use log::{debug, trace, warn};

use crate::{
    config::{Geometry, GeometryError, MAX_BLOCK_SIZE},
    device::{
        block::BlockDevice,
        disk::{Disk, DiskError, IoctlCommand, IoctlResponse},
    },
};

pub struct FlashDisk<D: ?Sized> {
    device: Arc<D>,
    geometry: Geometry,
}

impl<D: BlockDevice + ?Sized> FlashDisk<D> {
    /// Creates a disk serving `sector_size` byte sectors from `device`. The
    /// device is shared, not owned.
    pub fn new(device: Arc<D>, sector_size: usize) -> Result<Self, GeometryError> {
        let metadata = device.metadata();
        let geometry = Geometry::new(sector_size, metadata.block_size, metadata.total_blocks)?;

        Ok(Self { device, geometry })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Validates a sector range against the buffer and the device size and
    /// returns the number of buffer bytes the request covers
    fn check_request(
        &self,
        buffer_len: usize,
        sector: u64,
        count: usize,
    ) -> Result<usize, DiskError> {
        let len = count
            .checked_mul(self.geometry.sector_size())
            .ok_or(DiskError::InvalidParameter)?;

        if buffer_len < len {
            debug!("buffer of {buffer_len} bytes cannot hold {count} sectors");
            return Err(DiskError::InvalidParameter);
        }

        let end = sector
            .checked_add(count as u64)
            .ok_or(DiskError::InvalidParameter)?;

        if end > self.geometry.sector_count() {
            debug!(
                "sectors {sector}..{end} out of range for {} sector flash disk",
                self.geometry.sector_count()
            );
            return Err(DiskError::InvalidParameter);
        }

        Ok(len)
    }
}

impl<D: BlockDevice + ?Sized> Disk for FlashDisk<D> {
    fn read(&self, buffer: &mut [u8], sector: u64, count: usize) -> Result<(), DiskError> {
        let len = self.check_request(buffer.len(), sector, count)?;
        let sector_size = self.geometry.sector_size();
        let block_size = self.geometry.block_size();

        for (index, sector_buf) in buffer[..len].chunks_exact_mut(sector_size).enumerate() {
            let mut address = self.geometry.sector_address(sector + index as u64);

            for block in sector_buf.chunks_exact_mut(block_size) {
                trace!("flash read {block_size} bytes at {address:#x}");

                // Any short or failed block read surfaces as a generic error,
                // whatever the device reported
                match self.device.read(address, block) {
                    Ok(read) if read == block_size => {}
                    Ok(read) => {
                        warn!("short flash read at {address:#x}: {read} of {block_size} bytes");
                        return Err(DiskError::Error);
                    }
                    Err(err) => {
                        warn!("flash read at {address:#x} failed: {err}");
                        return Err(DiskError::Error);
                    }
                }

                address += block_size;
            }
        }

        Ok(())
    }

    fn write(&self, buffer: &[u8], sector: u64, count: usize) -> Result<(), DiskError> {
        let len = self.check_request(buffer.len(), sector, count)?;
        let sector_size = self.geometry.sector_size();
        let block_size = self.geometry.block_size();

        let mut scratch = heapless::Vec::<u8, MAX_BLOCK_SIZE>::new();

        for (index, sector_buf) in buffer[..len].chunks_exact(sector_size).enumerate() {
            let mut address = self.geometry.sector_address(sector + index as u64);

            for block in sector_buf.chunks_exact(block_size) {
                trace!("flash write {block_size} bytes at {address:#x}");

                scratch.clear();
                scratch
                    .extend_from_slice(block)
                    .map_err(|_| DiskError::InvalidParameter)?;

                // The device status is handed back unchanged
                self.device.write(address, &scratch).map_err(|err| {
                    warn!("flash write at {address:#x} failed: {err}");
                    DiskError::Device(err)
                })?;

                address += block_size;
            }
        }

        Ok(())
    }

    fn ioctl(&self, command: IoctlCommand) -> Result<IoctlResponse, DiskError> {
        Ok(match command {
            // Every block write goes straight to the device
            IoctlCommand::Sync => IoctlResponse::Done,
            IoctlCommand::GetSectorCount => {
                IoctlResponse::SectorCount(self.geometry.sector_count())
            }
            IoctlCommand::GetSectorSize => IoctlResponse::SectorSize(self.geometry.sector_size()),
            IoctlCommand::GetBlockSize => IoctlResponse::BlockSize(self.geometry.sector_size()),
        })
    }
}
