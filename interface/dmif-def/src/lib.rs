#![no_std]

#[cfg(test)]
extern crate std;

pub mod code;
pub mod version;

pub use code::RawCode;
pub use version::InterfaceVersion;
