pub mod memory;

pub use memory::MemoryDriver;
