use std::sync::Arc;

use diskio::{
    BlockDeviceIoError, DRIVE_MMC, DRIVE_RAM, DiskError, DiskStatus, DriveTable, FlashDisk,
    IoctlResponse, MemoryFlash, RamDisk,
    config::{FLASH_BLOCK_SIZE, FLASH_TOTAL_BLOCKS, SECTOR_SIZE},
};

fn table() -> (Arc<MemoryFlash>, DriveTable) {
    let flash = Arc::new(MemoryFlash::new(FLASH_BLOCK_SIZE, FLASH_TOTAL_BLOCKS));

    let mut table = DriveTable::new();
    table
        .register(DRIVE_RAM, Arc::new(RamDisk::new(SECTOR_SIZE, 64)))
        .unwrap();
    table
        .register(
            DRIVE_MMC,
            Arc::new(FlashDisk::new(flash.clone(), SECTOR_SIZE).unwrap()),
        )
        .unwrap();

    (flash, table)
}

#[test]
fn drives_report_their_own_geometry() {
    let (_, table) = table();

    assert_eq!(table.initialize(DRIVE_RAM), DiskStatus::empty());
    assert_eq!(table.initialize(DRIVE_MMC), DiskStatus::empty());

    assert_eq!(table.ioctl(DRIVE_RAM, 1), Ok(IoctlResponse::SectorCount(64)));
    assert_eq!(table.ioctl(DRIVE_MMC, 1), Ok(IoctlResponse::SectorCount(1536)));
    assert_eq!(table.ioctl(DRIVE_MMC, 3), Ok(IoctlResponse::BlockSize(512)));
    assert_eq!(table.ioctl(DRIVE_MMC, 9).map_err(DiskError::code), Err(1));
}

#[test]
fn erased_flash_reads_back_as_ones() {
    let (_, table) = table();
    let mut buf = vec![0u8; SECTOR_SIZE];

    table.read(DRIVE_MMC, &mut buf, 1535, 1).unwrap();

    assert!(buf.iter().all(|&b| b == 0xFF));
}

#[cfg(not(feature = "readonly"))]
#[test]
fn sectors_copy_between_drives() {
    let (flash, table) = table();
    let data: Vec<u8> = (0..4 * SECTOR_SIZE).map(|i| (i * 7) as u8).collect();

    table.write(DRIVE_RAM, &data, 10, 4).unwrap();

    let mut staged = vec![0u8; 4 * SECTOR_SIZE];
    table.read(DRIVE_RAM, &mut staged, 10, 4).unwrap();
    table.write(DRIVE_MMC, &staged, 100, 4).unwrap();

    assert_eq!(flash.dump(100 * SECTOR_SIZE, 4 * SECTOR_SIZE), data);

    let mut readback = vec![0u8; 4 * SECTOR_SIZE];
    table.read(DRIVE_MMC, &mut readback, 100, 4).unwrap();
    assert_eq!(readback, data);
}

#[cfg(not(feature = "readonly"))]
#[test]
fn write_protection_surfaces_with_its_own_code() {
    let (flash, table) = table();
    let data = vec![0u8; SECTOR_SIZE];

    flash.set_write_protected(true);
    let err = table.write(DRIVE_MMC, &data, 0, 1).unwrap_err();

    assert_eq!(err, DiskError::Device(BlockDeviceIoError::WriteProtected));
    assert_eq!(err.code(), 2);

    // nothing reached the part
    assert!(flash.dump(0, SECTOR_SIZE).iter().all(|&b| b == 0xFF));
}

#[test]
fn requests_past_the_end_are_parameter_errors() {
    let (_, table) = table();
    let mut buf = vec![0u8; 2 * SECTOR_SIZE];

    let err = table.read(DRIVE_MMC, &mut buf, 1535, 2).unwrap_err();

    assert_eq!(err, DiskError::InvalidParameter);
    assert_eq!(err.code(), 4);
}
