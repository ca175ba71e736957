#[macro_export]
macro_rules! custom_type {
    ($name:ident, $ty:ty, $fmt:literal) => {
        $crate::custom_type!(, $name, $ty, $fmt);
    };
    ($(#[$meta:meta])*, $name:ident, $ty:ty, $fmt:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        pub struct $name($ty);

        impl $name {
            pub const fn new(value: $ty) -> Self {
                Self(value)
            }

            pub const fn raw(&self) -> $ty {
                self.0
            }
        }

        impl From<$ty> for $name {
            fn from(value: $ty) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $ty {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::write!(f, $fmt, self.0)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::write!(f, $fmt, self.0)
            }
        }
    };
}
