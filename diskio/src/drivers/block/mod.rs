mod flash;

pub use flash::MemoryFlash;
