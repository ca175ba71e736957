use alloc::{
    collections::{btree_map::BTreeMap, btree_set::BTreeSet},
    string::{String, ToString},
};

use dmif_base::{Config, DeviceNumber, NumberingScheme};
use dmif_def::RawCode;
use log::debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberingError {
    #[error("required key `{0}` missing from configuration")]
    MissingKey(&'static str),
    #[error("key `{key}` is not a device number: [{val}]")]
    Malformed { key: &'static str, val: String },
    #[error("major {0} already allocated")]
    MajorTaken(u8),
    #[error("device number {major}:{minor} already allocated")]
    MinorTaken { major: u8, minor: u8 },
    #[error("no free minor under major {0}")]
    MinorsExhausted(u8),
}

impl NumberingError {
    pub fn code(&self) -> RawCode {
        match self {
            NumberingError::MissingKey(_) | NumberingError::Malformed { .. } => RawCode::EINVAL,
            NumberingError::MajorTaken(_) | NumberingError::MinorTaken { .. } => RawCode::EBUSY,
            NumberingError::MinorsExhausted(_) => RawCode::ENOSPC,
        }
    }
}

/// Numbers held by live instances of one driver type.
#[derive(Default)]
struct TypeAlloc {
    majors: BTreeSet<u8>,
    pairs: BTreeMap<u8, BTreeSet<u8>>,
}

/// Decides per driver instance whether it participates in device numbering
/// and which numbers it receives, from its configuration.
///
/// Allocation domains are per driver type: two types may hold the same
/// major. Callers serialize access; inside the manager that is the global
/// mutex.
#[derive(Default)]
pub struct NumberingAuthority {
    allocated: BTreeMap<&'static str, TypeAlloc>,
}

impl NumberingAuthority {
    pub fn assign(
        &mut self,
        driver_type: &'static str,
        scheme: NumberingScheme,
        config: &dyn Config,
    ) -> Result<DeviceNumber, NumberingError> {
        match scheme {
            NumberingScheme::None => Ok(DeviceNumber::unnumbered()),
            NumberingScheme::MajorOnly => {
                let major = require_u8(config, "major")?;
                let alloc = self.allocated.entry(driver_type).or_default();
                if !alloc.majors.insert(major) {
                    return Err(NumberingError::MajorTaken(major));
                }
                debug!("`{driver_type}`: major {major} allocated");
                Ok(DeviceNumber::major_only(major))
            }
            NumberingScheme::MajorAndMinor => {
                let major = require_u8(config, "major")?;
                let minor = lookup_u8(config, "minor")?;
                let minors = self
                    .allocated
                    .entry(driver_type)
                    .or_default()
                    .pairs
                    .entry(major)
                    .or_default();

                let minor = match minor {
                    Some(minor) => {
                        if !minors.insert(minor) {
                            return Err(NumberingError::MinorTaken { major, minor });
                        }
                        minor
                    }
                    None => {
                        let minor = (0..=u8::MAX)
                            .find(|m| !minors.contains(m))
                            .ok_or(NumberingError::MinorsExhausted(major))?;
                        minors.insert(minor);
                        minor
                    }
                };
                debug!("`{driver_type}`: device number {major}:{minor} allocated");
                Ok(DeviceNumber::major_minor(major, minor))
            }
        }
    }

    /// Return an instance's numbers to the pool.
    pub fn release(&mut self, driver_type: &'static str, num: DeviceNumber) {
        let Some(alloc) = self.allocated.get_mut(driver_type) else {
            return;
        };
        match num.scheme() {
            NumberingScheme::None => {}
            NumberingScheme::MajorOnly => {
                alloc.majors.remove(&num.major());
            }
            NumberingScheme::MajorAndMinor => {
                if let Some(minors) = alloc.pairs.get_mut(&num.major()) {
                    minors.remove(&num.minor());
                    if minors.is_empty() {
                        alloc.pairs.remove(&num.major());
                    }
                }
            }
        }
    }
}

fn require_u8(config: &dyn Config, key: &'static str) -> Result<u8, NumberingError> {
    lookup_u8(config, key)?.ok_or(NumberingError::MissingKey(key))
}

fn lookup_u8(config: &dyn Config, key: &'static str) -> Result<Option<u8>, NumberingError> {
    match config.get(key) {
        Some(val) => val
            .parse()
            .map(Some)
            .map_err(|_| NumberingError::Malformed {
                key,
                val: val.to_string(),
            }),
        None => Ok(None),
    }
}
