use alloc::boxed::Box;

use crate::{DriverResult, KError, custom_type};

custom_type!(#[doc = "Driver-defined ioctl command"], IoctlCmd, u32, "{:#x}");

/// Access mode selected at `open`. Exactly one per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlags {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl OpenFlags {
    pub const RDONLY: u8 = 0x01;
    pub const WRONLY: u8 = 0x02;
    pub const RDWR: u8 = 0x04;

    /// Decode the external bit encoding. Exactly one mode bit must be set;
    /// any combination is rejected rather than coerced.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            Self::RDONLY => Some(Self::ReadOnly),
            Self::WRONLY => Some(Self::WriteOnly),
            Self::RDWR => Some(Self::ReadWrite),
            _ => None,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Self::ReadOnly => Self::RDONLY,
            Self::WriteOnly => Self::WRONLY,
            Self::ReadWrite => Self::RDWR,
        }
    }

    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    pub const fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// Point-in-time device status snapshot, valid only at the instant returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stat {
    /// Size of the backing data in bytes.
    pub size: u32,
    /// Mode (permission) bits.
    pub mode: u32,
}

/// One configured driver instance.
///
/// Created by the registered factory, destroyed by dropping. All sessions
/// are opened through it and must not outlive it.
pub trait Driver: Send {
    /// Open one session with the given access mode.
    ///
    /// A driver may reserve exclusive or shared access here; whichever policy
    /// it picks must be documented on the concrete driver.
    fn open(&mut self, flags: OpenFlags) -> DriverResult<Box<dyn Session>>;
}

/// One open session on a driver instance.
///
/// Serialization of calls on a session is the caller's job; a session is not
/// shared between callers unless the concrete driver says otherwise.
pub trait Session: Send {
    /// Read up to `buf.len()` bytes. Short reads are normal; `Ok(0)` signals
    /// end-of-data.
    fn read(&mut self, buf: &mut [u8]) -> DriverResult<usize>;

    /// Write up to `buf.len()` bytes. Short writes are normal; the caller
    /// re-invokes for the remainder.
    fn write(&mut self, buf: &[u8]) -> DriverResult<usize>;

    /// Driver-defined escape hatch (seek, mode changes, feature negotiation).
    fn ioctl(&mut self, _cmd: IoctlCmd, _arg: usize) -> DriverResult {
        Err(KError::NotSupported)
    }

    /// Push buffered output to the device. Unbuffered drivers keep the
    /// default no-op.
    fn flush(&mut self) -> DriverResult {
        Ok(())
    }

    /// Snapshot of the device status.
    fn stat(&self) -> DriverResult<Stat>;

    /// Session teardown hook, called once before the session is dropped.
    fn close(&mut self) -> DriverResult {
        Ok(())
    }
}
