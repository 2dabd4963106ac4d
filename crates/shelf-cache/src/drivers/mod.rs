pub mod memory;

pub use memory::MemoryCacheDriver;
