pub mod block;
pub mod disk;
