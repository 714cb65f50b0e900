//! Pure value types for clients and orders.
//!
//! Every scalar validates itself at construction and fails with a
//! [`ValidationError`] that carries a human-readable constraint. Nothing here
//! touches the store.

/// Shared plumbing for string-backed value types.
macro_rules! text_value {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::model::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::model::ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

pub mod client;
pub mod error;
pub mod fields;
pub mod order;

pub use client::*;
pub use error::*;
pub use fields::*;
pub use order::*;
