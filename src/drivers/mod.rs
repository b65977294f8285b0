//! Database driver implementations.
//!
//! One module per storage backend. Each driver implements the
//! [`crate::traits::DatabaseDriver`] trait and is registered with the host's
//! [`crate::registry::DriverRegistry`].

pub mod sqlcipher;

pub use sqlcipher::SqlCipherDriver;
