use core::fmt::{self, Display};
use core::str::FromStr;

/// Interface version a driver register is tagged with.
///
/// The framework dispatches on `(driver-type name, version)`; version
/// negotiation itself is up to the consuming framework.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct InterfaceVersion {
    pub major: u16,
    pub minor: u16,
}

impl InterfaceVersion {
    pub const V1_0: InterfaceVersion = InterfaceVersion::new(1, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl Default for InterfaceVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

impl Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("missing `.` separator")]
    MissingSeparator,
    #[error("not a number")]
    NotANumber,
}

impl FromStr for InterfaceVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or(VersionParseError::MissingSeparator)?;
        Ok(Self {
            major: major
                .parse()
                .map_err(|_| VersionParseError::NotANumber)?,
            minor: minor
                .parse()
                .map_err(|_| VersionParseError::NotANumber)?,
        })
    }
}
