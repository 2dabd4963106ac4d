pub mod memory;

pub use memory::MemoryFileDriver;
