pub mod memory;

pub use memory::MemoryNotificationDriver;
