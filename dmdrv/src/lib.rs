#![no_std]

extern crate alloc;

use spin::Mutex;

mod context;
pub mod error;
mod id;
mod manager;
pub mod numbering;
pub mod register;

pub use context::{ContextId, HandleId};
pub use dmif_base::{
    Config, DeviceNumber, Driver, DriverResult, InterfaceVersion, IoctlCmd, KError,
    NumberingScheme, OpenFlags, RawCode, Session, Stat, TableConfig,
};
pub use error::DriverError;
pub use manager::Manager;
pub use register::{DriverRegister, FnCreate};

static MANAGER: Mutex<Option<Manager>> = Mutex::new(None);

/// Install a fresh global manager. Call once before any other entry point.
pub fn init() {
    MANAGER.lock().replace(Manager::new());
}

pub fn edit<F, T>(f: F) -> T
where
    F: FnOnce(&mut Manager) -> T,
{
    let mut g = MANAGER.lock();
    f(g.as_mut().expect("manager not init"))
}

pub fn inspect<F, T>(f: F) -> T
where
    F: FnOnce(&Manager) -> T,
{
    let g = MANAGER.lock();
    f(g.as_ref().expect("manager not init"))
}

pub fn register_add(register: DriverRegister) {
    edit(|manager| manager.registers.add(register));
}

pub fn register_append(registers: &[DriverRegister]) {
    edit(|manager| manager.registers.append(registers))
}

/// Create an instance of a registered driver type. On success the caller
/// owns the returned context and learns its device number.
pub fn create(
    name: &'static str,
    version: InterfaceVersion,
    config: &dyn Config,
) -> Result<(ContextId, DeviceNumber), DriverError> {
    edit(|manager| manager.create(name, version, config))
}

pub fn free(context: ContextId) -> Result<(), DriverError> {
    edit(|manager| manager.free(context))
}

pub fn open(context: ContextId, flags: OpenFlags) -> Result<HandleId, DriverError> {
    edit(|manager| manager.open(context, flags))
}

pub fn close(context: ContextId, handle: HandleId) -> Result<(), DriverError> {
    edit(|manager| manager.close(context, handle))
}

pub fn read(context: ContextId, handle: HandleId, buf: &mut [u8]) -> Result<usize, DriverError> {
    edit(|manager| manager.read(context, handle, buf))
}

pub fn write(context: ContextId, handle: HandleId, buf: &[u8]) -> Result<usize, DriverError> {
    edit(|manager| manager.write(context, handle, buf))
}

pub fn ioctl(
    context: ContextId,
    handle: HandleId,
    cmd: IoctlCmd,
    arg: usize,
) -> Result<(), DriverError> {
    edit(|manager| manager.ioctl(context, handle, cmd, arg))
}

pub fn flush(context: ContextId, handle: HandleId) -> Result<(), DriverError> {
    edit(|manager| manager.flush(context, handle))
}

pub fn stat(context: ContextId, handle: HandleId) -> Result<Stat, DriverError> {
    edit(|manager| manager.stat(context, handle))
}
