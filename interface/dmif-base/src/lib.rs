#![no_std]

extern crate alloc;

use alloc::string::String;

#[macro_use]
mod _macro;

pub mod config;
pub mod io;
pub mod num;

pub use config::{Config, TableConfig};
pub use dmif_def::{InterfaceVersion, RawCode};
pub use io::{Driver, IoctlCmd, OpenFlags, Session, Stat};
pub use num::{DeviceNumber, NumberingScheme};

pub type DriverResult<T = ()> = Result<T, KError>;

/// Error vocabulary a driver speaks across the contract boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KError {
    #[error("IO error")]
    Io,
    #[error("No memory")]
    NoMem,
    #[error("Try Again")]
    Again,
    #[error("Busy")]
    Busy,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Bad Address: {0:#x}")]
    BadAddr(usize),
    #[error("Invalid Argument `{name}`: [{val}]")]
    InvalidArg { name: &'static str, val: String },
    #[error("Not supported")]
    NotSupported,
}

impl KError {
    /// Errno-style code for the external boundary.
    pub fn code(&self) -> RawCode {
        match self {
            KError::Io => RawCode::EIO,
            KError::NoMem => RawCode::ENOMEM,
            KError::Again => RawCode::EAGAIN,
            KError::Busy => RawCode::EBUSY,
            KError::PermissionDenied => RawCode::EACCES,
            KError::BadAddr(_) => RawCode::EFAULT,
            KError::InvalidArg { .. } => RawCode::EINVAL,
            KError::NotSupported => RawCode::ENOTSUP,
        }
    }
}
