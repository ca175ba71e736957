use core::fmt::{self, Display};

/// Which device-numbering scheme a driver participates in.
///
/// `MajorAndMinor` always implies a major number; there is no way to express
/// a minor without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingScheme {
    #[default]
    None,
    MajorOnly,
    MajorAndMinor,
}

/// Device number assigned at context creation.
///
/// `minor` is meaningful only with [`NumberingScheme::MajorAndMinor`], and
/// `major` only when the scheme is not [`NumberingScheme::None`]. The
/// constructors keep the fields consistent with the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceNumber {
    major: u8,
    minor: u8,
    scheme: NumberingScheme,
}

impl DeviceNumber {
    /// The driver does not use numbering.
    pub const fn unnumbered() -> Self {
        Self {
            major: 0,
            minor: 0,
            scheme: NumberingScheme::None,
        }
    }

    pub const fn major_only(major: u8) -> Self {
        Self {
            major,
            minor: 0,
            scheme: NumberingScheme::MajorOnly,
        }
    }

    pub const fn major_minor(major: u8, minor: u8) -> Self {
        Self {
            major,
            minor,
            scheme: NumberingScheme::MajorAndMinor,
        }
    }

    pub const fn scheme(&self) -> NumberingScheme {
        self.scheme
    }

    pub const fn major(&self) -> u8 {
        self.major
    }

    pub const fn minor(&self) -> u8 {
        self.minor
    }
}

impl Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            NumberingScheme::None => write!(f, "unnumbered"),
            NumberingScheme::MajorOnly => write!(f, "{}", self.major),
            NumberingScheme::MajorAndMinor => write!(f, "{}:{}", self.major, self.minor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_follows_constructor() {
        assert_eq!(DeviceNumber::unnumbered().scheme(), NumberingScheme::None);
        assert_eq!(
            DeviceNumber::major_only(4).scheme(),
            NumberingScheme::MajorOnly
        );

        let n = DeviceNumber::major_minor(10, 3);
        assert_eq!(n.scheme(), NumberingScheme::MajorAndMinor);
        assert_eq!((n.major(), n.minor()), (10, 3));
    }

    #[test]
    fn test_default_is_unnumbered() {
        assert_eq!(DeviceNumber::default(), DeviceNumber::unnumbered());
    }
}
