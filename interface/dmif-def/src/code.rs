use core::fmt::{self, Display};

/// Errno-style status code exposed at the external boundary.
///
/// Zero means success. Non-zero values identify a failure class; callers
/// without out-of-band knowledge of the concrete driver may only branch on
/// zero/non-zero.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct RawCode(pub i32);

impl RawCode {
    pub const OK: RawCode = RawCode(0);
    /// I/O error
    pub const EIO: RawCode = RawCode(5);
    /// Bad handle or context id
    pub const EBADF: RawCode = RawCode(9);
    /// Try again
    pub const EAGAIN: RawCode = RawCode(11);
    /// Out of memory
    pub const ENOMEM: RawCode = RawCode(12);
    /// Permission denied
    pub const EACCES: RawCode = RawCode(13);
    /// Bad address
    pub const EFAULT: RawCode = RawCode(14);
    /// Device or resource busy
    pub const EBUSY: RawCode = RawCode(16);
    /// No such device
    pub const ENODEV: RawCode = RawCode(19);
    /// Invalid argument
    pub const EINVAL: RawCode = RawCode(22);
    /// No space left
    pub const ENOSPC: RawCode = RawCode(28);
    /// Operation not supported
    pub const ENOTSUP: RawCode = RawCode(95);

    pub const fn is_ok(&self) -> bool {
        self.0 == 0
    }

    pub const fn raw(&self) -> i32 {
        self.0
    }
}

impl From<RawCode> for i32 {
    fn from(value: RawCode) -> Self {
        value.0
    }
}

impl Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawCode({})", self.0)
    }
}
