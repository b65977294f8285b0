//! SQLCipher driver implementation.
//!
//! - `discovery`: candidate tidying and 16-byte header sniffing
//! - `connection`: authenticated open with post-open configuration
//! - `dispatch`: keyword routing and typed execution paths
//! - `driver`: the orchestrator implementing `DatabaseDriver`

pub mod connection;
pub mod discovery;
pub mod dispatch;
pub mod driver;
mod types;

pub use connection::{ConnectionProvider, DefaultConnectionProvider};
pub use dispatch::{CollectingHandler, ResultHandler, SelectCursor};
pub use driver::SqlCipherDriver;
