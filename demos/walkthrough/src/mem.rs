use std::sync::{Arc, Mutex};

use dmdrv::{
    Config, Driver, DriverRegister, DriverResult, InterfaceVersion, IoctlCmd, KError,
    NumberingScheme, OpenFlags, Session, Stat,
};

/// Rewind a session to the byte offset given in `arg`.
pub const SEEK_SET: IoctlCmd = IoctlCmd::new(0x10);

/// Ram-backed device. Sessions share the instance store; writes are buffered
/// per session until `flush` (close flushes too). Any number of concurrent
/// sessions is allowed.
pub struct MemDevice {
    store: Arc<Mutex<Vec<u8>>>,
}

impl MemDevice {
    fn create(config: &dyn Config) -> Result<Box<dyn Driver>, KError> {
        let store = match config.get("prefill") {
            Some(text) => text.as_bytes().to_vec(),
            None => Vec::new(),
        };
        Ok(Box::new(MemDevice {
            store: Arc::new(Mutex::new(store)),
        }))
    }
}

pub fn register() -> DriverRegister {
    DriverRegister {
        name: "mem",
        version: InterfaceVersion::V1_0,
        numbering: NumberingScheme::MajorAndMinor,
        create: MemDevice::create,
    }
}

impl Driver for MemDevice {
    fn open(&mut self, _flags: OpenFlags) -> DriverResult<Box<dyn Session>> {
        Ok(Box::new(MemSession {
            store: self.store.clone(),
            pos: 0,
            pending: Vec::new(),
        }))
    }
}

struct MemSession {
    store: Arc<Mutex<Vec<u8>>>,
    pos: usize,
    pending: Vec<u8>,
}

impl MemSession {
    fn store(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.store.lock().unwrap()
    }
}

impl Session for MemSession {
    fn read(&mut self, buf: &mut [u8]) -> DriverResult<usize> {
        let store = self.store();
        let n = buf.len().min(store.len().saturating_sub(self.pos));
        buf[..n].copy_from_slice(&store[self.pos..self.pos + n]);
        drop(store);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> DriverResult<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn ioctl(&mut self, cmd: IoctlCmd, arg: usize) -> DriverResult {
        if cmd == SEEK_SET {
            self.pos = arg;
            Ok(())
        } else {
            Err(KError::NotSupported)
        }
    }

    fn flush(&mut self) -> DriverResult {
        let mut store = self.store();
        let end = self.pos + self.pending.len();
        if store.len() < end {
            store.resize(end, 0);
        }
        store[self.pos..end].copy_from_slice(&self.pending);
        drop(store);
        self.pos = end;
        self.pending.clear();
        Ok(())
    }

    fn stat(&self) -> DriverResult<Stat> {
        Ok(Stat {
            size: self.store().len() as u32,
            mode: 0o666,
        })
    }

    fn close(&mut self) -> DriverResult {
        self.flush()
    }
}
