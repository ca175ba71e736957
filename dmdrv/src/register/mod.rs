use alloc::{boxed::Box, collections::btree_map::BTreeMap, vec::Vec};

use dmif_base::{Config, Driver, InterfaceVersion, KError, NumberingScheme};
use log::warn;

/// Factory installed by a concrete driver module. Builds one configured
/// instance or fails with no observable side effect.
pub type FnCreate = fn(&dyn Config) -> Result<Box<dyn Driver>, KError>;

/// One driver type offered to the framework, tagged with the interface
/// version it implements.
#[derive(Clone)]
pub struct DriverRegister {
    pub name: &'static str,
    pub version: InterfaceVersion,
    /// Which numbering scheme instances of this type participate in.
    pub numbering: NumberingScheme,
    pub create: FnCreate,
}

#[derive(Default)]
pub struct RegisterContainer {
    registers: BTreeMap<(&'static str, InterfaceVersion), DriverRegister>,
}

impl RegisterContainer {
    pub const fn new() -> Self {
        Self {
            registers: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, register: DriverRegister) {
        let key = (register.name, register.version);
        if self.registers.insert(key, register).is_some() {
            warn!("driver `{}` {} re-registered, replaced", key.0, key.1);
        }
    }

    pub fn append(&mut self, registers: &[DriverRegister]) {
        for one in registers {
            self.add(one.clone());
        }
    }

    pub fn get(&self, name: &str, version: InterfaceVersion) -> Option<&DriverRegister> {
        self.registers
            .values()
            .find(|r| r.name == name && r.version == version)
    }

    /// Registered driver types, in name order.
    pub fn list(&self) -> Vec<(&'static str, InterfaceVersion)> {
        self.registers.keys().copied().collect()
    }
}
