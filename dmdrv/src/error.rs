use alloc::string::String;

use dmif_base::{InterfaceVersion, KError, OpenFlags};
use dmif_def::RawCode;

use crate::{
    context::{ContextId, HandleId},
    numbering::NumberingError,
};

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("driver `{name}` version {version} not registered")]
    NotRegistered {
        name: String,
        version: InterfaceVersion,
    },
    #[error(transparent)]
    Numbering(#[from] NumberingError),
    #[error("invalid context: {0:?}")]
    InvalidContext(ContextId),
    #[error("invalid handle: {0:?}")]
    InvalidHandle(HandleId),
    #[error("context {0:?} still has open handles")]
    ContextBusy(ContextId),
    #[error("{op} on a handle open with {flags:?}")]
    AccessMode { op: &'static str, flags: OpenFlags },
    #[error(transparent)]
    Driver(#[from] KError),
}

impl DriverError {
    /// Errno-style code for the external boundary. Zero never appears here;
    /// success is not an error.
    pub fn code(&self) -> RawCode {
        match self {
            DriverError::NotRegistered { .. } => RawCode::ENODEV,
            DriverError::Numbering(e) => e.code(),
            DriverError::InvalidContext(_) | DriverError::InvalidHandle(_) => RawCode::EBADF,
            DriverError::ContextBusy(_) => RawCode::EBUSY,
            DriverError::AccessMode { .. } => RawCode::EACCES,
            DriverError::Driver(e) => e.code(),
        }
    }
}
