use alloc::string::ToString;

use dmif_base::{Config, DeviceNumber, InterfaceVersion, IoctlCmd, OpenFlags, Stat};
use log::debug;

use crate::{
    context::{ContextId, ContextTable, HandleId},
    error::DriverError,
    numbering::NumberingAuthority,
    register::RegisterContainer,
};

/// The framework state: driver registry, numbering authority and the table
/// of live contexts.
///
/// One mutable borrow at a time; behind the global mutex this also gives the
/// numbering authority the serialization it needs.
#[derive(Default)]
pub struct Manager {
    pub registers: RegisterContainer,
    pub numbering: NumberingAuthority,
    contexts: ContextTable,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one configured driver instance.
    ///
    /// Resolves the `(name, version)` register, lets the numbering authority
    /// assign the device number, then runs the driver factory. On any
    /// failure nothing is left behind, including the number allocation.
    pub fn create(
        &mut self,
        name: &'static str,
        version: InterfaceVersion,
        config: &dyn Config,
    ) -> Result<(ContextId, DeviceNumber), DriverError> {
        let register = self
            .registers
            .get(name, version)
            .ok_or_else(|| DriverError::NotRegistered {
                name: name.to_string(),
                version,
            })?
            .clone();

        let dev_num = self.numbering.assign(name, register.numbering, config)?;
        let driver = match (register.create)(config) {
            Ok(driver) => driver,
            Err(e) => {
                self.numbering.release(name, dev_num);
                return Err(e.into());
            }
        };

        let context = self.contexts.insert(name, dev_num, driver);
        debug!("`{name}` {version}: created {context:?}, dev num {dev_num}");
        Ok((context, dev_num))
    }

    /// Destroy a context and return its numbers to the pool.
    ///
    /// A context with open handles is rejected with [`DriverError::ContextBusy`];
    /// handles are never force-closed. A stale id fails with
    /// [`DriverError::InvalidContext`].
    pub fn free(&mut self, context: ContextId) -> Result<(), DriverError> {
        let slot = self.contexts.remove(context)?;
        self.numbering.release(slot.driver_type, slot.dev_num);
        debug!("`{}`: freed {context:?}", slot.driver_type);
        Ok(())
    }

    pub fn open(&mut self, context: ContextId, flags: OpenFlags) -> Result<HandleId, DriverError> {
        self.contexts.open(context, flags)
    }

    pub fn close(&mut self, context: ContextId, handle: HandleId) -> Result<(), DriverError> {
        self.contexts.close(context, handle)
    }

    pub fn read(
        &mut self,
        context: ContextId,
        handle: HandleId,
        buf: &mut [u8],
    ) -> Result<usize, DriverError> {
        self.contexts.read(context, handle, buf)
    }

    pub fn write(
        &mut self,
        context: ContextId,
        handle: HandleId,
        buf: &[u8],
    ) -> Result<usize, DriverError> {
        self.contexts.write(context, handle, buf)
    }

    pub fn ioctl(
        &mut self,
        context: ContextId,
        handle: HandleId,
        cmd: IoctlCmd,
        arg: usize,
    ) -> Result<(), DriverError> {
        self.contexts.ioctl(context, handle, cmd, arg)
    }

    pub fn flush(&mut self, context: ContextId, handle: HandleId) -> Result<(), DriverError> {
        self.contexts.flush(context, handle)
    }

    pub fn stat(&mut self, context: ContextId, handle: HandleId) -> Result<Stat, DriverError> {
        self.contexts.stat(context, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{boxed::Box, sync::Arc, vec::Vec};
    use dmif_base::{
        Driver, DriverResult, KError, NumberingScheme, RawCode, Session, TableConfig,
    };
    use spin::Mutex;

    use crate::register::DriverRegister;

    // Ram-backed device: all sessions of one instance share the store, so a
    // flushed write is visible to a later read from another session.
    struct RamDevice {
        store: Arc<Mutex<Vec<u8>>>,
    }

    struct RamSession {
        store: Arc<Mutex<Vec<u8>>>,
        pos: usize,
        pending: Vec<u8>,
    }

    const SEEK: IoctlCmd = IoctlCmd::new(0x10);

    impl Driver for RamDevice {
        fn open(&mut self, _flags: OpenFlags) -> DriverResult<Box<dyn Session>> {
            Ok(Box::new(RamSession {
                store: self.store.clone(),
                pos: 0,
                pending: Vec::new(),
            }))
        }
    }

    impl Session for RamSession {
        fn read(&mut self, buf: &mut [u8]) -> DriverResult<usize> {
            let store = self.store.lock();
            let n = buf.len().min(store.len().saturating_sub(self.pos));
            buf[..n].copy_from_slice(&store[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }

        fn write(&mut self, buf: &[u8]) -> DriverResult<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn ioctl(&mut self, cmd: IoctlCmd, arg: usize) -> DriverResult {
            if cmd == SEEK {
                self.pos = arg;
                Ok(())
            } else {
                Err(KError::NotSupported)
            }
        }

        fn flush(&mut self) -> DriverResult {
            let mut store = self.store.lock();
            let end = self.pos + self.pending.len();
            if store.len() < end {
                store.resize(end, 0);
            }
            store[self.pos..end].copy_from_slice(&self.pending);
            self.pos = end;
            self.pending.clear();
            Ok(())
        }

        fn stat(&self) -> DriverResult<Stat> {
            Ok(Stat {
                size: self.store.lock().len() as u32,
                mode: 0o666,
            })
        }

        fn close(&mut self) -> DriverResult {
            self.flush()
        }
    }

    fn make_ram(_config: &dyn Config) -> Result<Box<dyn Driver>, KError> {
        Ok(Box::new(RamDevice {
            store: Arc::new(Mutex::new(Vec::new())),
        }))
    }

    fn make_failing(_config: &dyn Config) -> Result<Box<dyn Driver>, KError> {
        Err(KError::Io)
    }

    fn manager() -> Manager {
        let mut m = Manager::new();
        m.registers.append(&[
            DriverRegister {
                name: "ram",
                version: InterfaceVersion::V1_0,
                numbering: NumberingScheme::MajorAndMinor,
                create: make_ram,
            },
            DriverRegister {
                name: "anon",
                version: InterfaceVersion::V1_0,
                numbering: NumberingScheme::None,
                create: make_ram,
            },
            DriverRegister {
                name: "broken",
                version: InterfaceVersion::V1_0,
                numbering: NumberingScheme::MajorAndMinor,
                create: make_failing,
            },
        ]);
        m
    }

    #[test]
    fn test_round_trip() {
        let mut m = manager();
        let config = TableConfig::new().with("major", "10");

        let (ctx, num) = m.create("ram", InterfaceVersion::V1_0, &config).unwrap();
        assert_eq!(num, DeviceNumber::major_minor(10, 0));

        let h = m.open(ctx, OpenFlags::ReadWrite).unwrap();
        assert_eq!(m.write(ctx, h, b"ABCD").unwrap(), 4);
        m.flush(ctx, h).unwrap();

        let st = m.stat(ctx, h).unwrap();
        assert!(st.size >= 4);
        // Snapshot is stable without intervening writes.
        assert_eq!(m.stat(ctx, h).unwrap().size, st.size);

        m.close(ctx, h).unwrap();
        m.free(ctx).unwrap();
    }

    #[test]
    fn test_write_then_read_back() {
        let mut m = manager();
        let config = TableConfig::new().with("major", "10");
        let (ctx, _) = m.create("ram", InterfaceVersion::V1_0, &config).unwrap();

        let w = m.open(ctx, OpenFlags::WriteOnly).unwrap();
        assert_eq!(m.write(ctx, w, b"ABCD").unwrap(), 4);
        m.flush(ctx, w).unwrap();

        let r = m.open(ctx, OpenFlags::ReadOnly).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(m.read(ctx, r, &mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"ABCD");
        // End of data.
        assert_eq!(m.read(ctx, r, &mut buf).unwrap(), 0);

        // Rewind through the driver's escape hatch and read again.
        m.ioctl(ctx, r, SEEK, 0).unwrap();
        assert_eq!(m.read(ctx, r, &mut buf[..2]).unwrap(), 2);
        assert_eq!(&buf[..2], b"AB");

        m.close(ctx, r).unwrap();
        m.close(ctx, w).unwrap();
        m.free(ctx).unwrap();
    }

    #[test]
    fn test_unnumbered_driver() {
        let mut m = manager();
        let (ctx, num) = m
            .create("anon", InterfaceVersion::V1_0, &TableConfig::new())
            .unwrap();
        assert_eq!(num.scheme(), NumberingScheme::None);
        m.free(ctx).unwrap();
    }

    #[test]
    fn test_distinct_instances_distinct_numbers() {
        let mut m = manager();
        let config = TableConfig::new().with("major", "10");

        let (a, num_a) = m.create("ram", InterfaceVersion::V1_0, &config).unwrap();
        let (b, num_b) = m.create("ram", InterfaceVersion::V1_0, &config).unwrap();
        assert_ne!((num_a.major(), num_a.minor()), (num_b.major(), num_b.minor()));

        // Freeing one returns its pair to the pool.
        m.free(a).unwrap();
        let (c, num_c) = m.create("ram", InterfaceVersion::V1_0, &config).unwrap();
        assert_eq!(num_c, num_a);

        m.free(b).unwrap();
        m.free(c).unwrap();
    }

    #[test]
    fn test_unknown_driver_and_version() {
        let mut m = manager();
        let config = TableConfig::new();

        assert!(matches!(
            m.create("missing", InterfaceVersion::V1_0, &config),
            Err(DriverError::NotRegistered { .. })
        ));
        assert!(matches!(
            m.create("ram", InterfaceVersion::new(9, 9), &config),
            Err(DriverError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_failed_create_rolls_numbering_back() {
        let mut m = manager();
        let config = TableConfig::new().with("major", "7").with("minor", "0");

        assert!(matches!(
            m.create("broken", InterfaceVersion::V1_0, &config),
            Err(DriverError::Driver(KError::Io))
        ));

        // 7:0 must still be free for the next instance of the type.
        let num = m
            .numbering
            .assign("broken", NumberingScheme::MajorAndMinor, &config)
            .unwrap();
        assert_eq!(num, DeviceNumber::major_minor(7, 0));
    }

    #[test]
    fn test_free_then_use_is_detected() {
        let mut m = manager();
        let (ctx, _) = m
            .create("anon", InterfaceVersion::V1_0, &TableConfig::new())
            .unwrap();
        m.free(ctx).unwrap();

        assert!(matches!(m.free(ctx), Err(DriverError::InvalidContext(_))));
        assert!(matches!(
            m.open(ctx, OpenFlags::ReadOnly),
            Err(DriverError::InvalidContext(_))
        ));
    }

    #[test]
    fn test_error_codes_at_the_boundary() {
        let mut m = manager();
        let err = m
            .create("missing", InterfaceVersion::V1_0, &TableConfig::new())
            .unwrap_err();
        assert_eq!(err.code(), RawCode::ENODEV);

        let (ctx, _) = m
            .create("anon", InterfaceVersion::V1_0, &TableConfig::new())
            .unwrap();
        let h = m.open(ctx, OpenFlags::WriteOnly).unwrap();
        let mut buf = [0u8; 1];
        assert_eq!(
            m.read(ctx, h, &mut buf).unwrap_err().code(),
            RawCode::EACCES
        );
        assert_eq!(m.free(ctx).unwrap_err().code(), RawCode::EBUSY);
        m.close(ctx, h).unwrap();
        m.free(ctx).unwrap();
    }
}
