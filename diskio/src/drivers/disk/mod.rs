mod flash;
mod ram;

pub use flash::FlashDisk;
pub use ram::RamDisk;
