use core::sync::atomic::{AtomicU64, Ordering};

use alloc::{boxed::Box, collections::btree_map::BTreeMap};

use dmif_base::{DeviceNumber, Driver, IoctlCmd, OpenFlags, Session, Stat};

use crate::{custom_id, error::DriverError};

custom_id!(ContextId, u64);
custom_id!(HandleId, u64);

// Ids are never reused, so a stale id after free/close misses the table and
// surfaces as InvalidContext/InvalidHandle instead of touching a stranger's
// slot. 0 is reserved for the Default value.
static CONTEXT_ITER: AtomicU64 = AtomicU64::new(1);
static HANDLE_ITER: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    pub fn new() -> Self {
        Self(CONTEXT_ITER.fetch_add(1, Ordering::SeqCst))
    }
}

impl HandleId {
    pub fn new() -> Self {
        Self(HANDLE_ITER.fetch_add(1, Ordering::SeqCst))
    }
}

/// One live driver instance together with its open sessions.
pub(crate) struct ContextSlot {
    pub driver_type: &'static str,
    pub dev_num: DeviceNumber,
    driver: Box<dyn Driver>,
    handles: BTreeMap<HandleId, HandleSlot>,
}

struct HandleSlot {
    flags: OpenFlags,
    session: Box<dyn Session>,
}

#[derive(Default)]
pub(crate) struct ContextTable {
    contexts: BTreeMap<ContextId, ContextSlot>,
}

impl ContextTable {
    pub fn insert(
        &mut self,
        driver_type: &'static str,
        dev_num: DeviceNumber,
        driver: Box<dyn Driver>,
    ) -> ContextId {
        let id = ContextId::new();
        self.contexts.insert(
            id,
            ContextSlot {
                driver_type,
                dev_num,
                driver,
                handles: BTreeMap::new(),
            },
        );
        id
    }

    /// Remove a context. A context with open handles is rejected; the caller
    /// closes them first.
    pub fn remove(&mut self, context: ContextId) -> Result<ContextSlot, DriverError> {
        let slot = self
            .contexts
            .remove(&context)
            .ok_or(DriverError::InvalidContext(context))?;
        if slot.handles.is_empty() {
            return Ok(slot);
        }
        self.contexts.insert(context, slot);
        Err(DriverError::ContextBusy(context))
    }

    pub fn open(
        &mut self,
        context: ContextId,
        flags: OpenFlags,
    ) -> Result<HandleId, DriverError> {
        let slot = self.slot(context)?;
        let session = slot.driver.open(flags)?;
        let handle = HandleId::new();
        slot.handles.insert(handle, HandleSlot { flags, session });
        Ok(handle)
    }

    pub fn close(&mut self, context: ContextId, handle: HandleId) -> Result<(), DriverError> {
        let slot = self.slot(context)?;
        let mut entry = slot
            .handles
            .remove(&handle)
            .ok_or(DriverError::InvalidHandle(handle))?;
        entry.session.close()?;
        Ok(())
    }

    pub fn read(
        &mut self,
        context: ContextId,
        handle: HandleId,
        buf: &mut [u8],
    ) -> Result<usize, DriverError> {
        let entry = self.handle(context, handle)?;
        if !entry.flags.readable() {
            return Err(DriverError::AccessMode {
                op: "read",
                flags: entry.flags,
            });
        }
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(entry.session.read(buf)?)
    }

    pub fn write(
        &mut self,
        context: ContextId,
        handle: HandleId,
        buf: &[u8],
    ) -> Result<usize, DriverError> {
        let entry = self.handle(context, handle)?;
        if !entry.flags.writable() {
            return Err(DriverError::AccessMode {
                op: "write",
                flags: entry.flags,
            });
        }
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(entry.session.write(buf)?)
    }

    pub fn ioctl(
        &mut self,
        context: ContextId,
        handle: HandleId,
        cmd: IoctlCmd,
        arg: usize,
    ) -> Result<(), DriverError> {
        Ok(self.handle(context, handle)?.session.ioctl(cmd, arg)?)
    }

    pub fn flush(&mut self, context: ContextId, handle: HandleId) -> Result<(), DriverError> {
        Ok(self.handle(context, handle)?.session.flush()?)
    }

    pub fn stat(&mut self, context: ContextId, handle: HandleId) -> Result<Stat, DriverError> {
        Ok(self.handle(context, handle)?.session.stat()?)
    }

    fn slot(&mut self, context: ContextId) -> Result<&mut ContextSlot, DriverError> {
        self.contexts
            .get_mut(&context)
            .ok_or(DriverError::InvalidContext(context))
    }

    fn handle(
        &mut self,
        context: ContextId,
        handle: HandleId,
    ) -> Result<&mut HandleSlot, DriverError> {
        self.slot(context)?
            .handles
            .get_mut(&handle)
            .ok_or(DriverError::InvalidHandle(handle))
    }
}
