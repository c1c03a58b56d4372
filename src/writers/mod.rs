//! Byte destinations for formatted events
//!
//! Any `std::io::Write + Send` value can back an output. These are the
//! ones the crate provides.

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

pub use console::ConsoleWriter;
#[cfg(feature = "file")]
pub use file::FileWriter;
pub use memory::MemoryWriter;
