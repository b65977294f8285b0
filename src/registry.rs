//! Driver registration for the host inspection surface.
//!
//! The host composes storage backends by registering driver instances rather
//! than subclassing a common base. Descriptors are aggregated across drivers
//! and tagged with the index of the driver that produced them, so follow-up
//! operations route back to the right backend.

use crate::error::DriverError;
use crate::traits::{DatabaseDescriptor, DatabaseDriver, QueryResult};

/// Registered drivers, in registration order.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Box<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver, returning its index for later routing.
    pub fn register(&mut self, driver: Box<dyn DatabaseDriver>) -> usize {
        self.drivers.push(driver);
        self.drivers.len() - 1
    }

    /// The driver registered at `index`.
    pub fn driver(&self, index: usize) -> Option<&dyn DatabaseDriver> {
        self.drivers.get(index).map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Discover databases across all registered drivers. Each descriptor is
    /// paired with the index of its driver.
    pub fn list_databases(&self) -> Vec<(usize, DatabaseDescriptor)> {
        self.drivers
            .iter()
            .enumerate()
            .flat_map(|(index, driver)| {
                driver
                    .list_databases()
                    .into_iter()
                    .map(move |descriptor| (index, descriptor))
            })
            .collect()
    }

    /// List tables via the driver that produced the descriptor.
    pub fn list_tables(
        &self,
        driver_index: usize,
        descriptor: &DatabaseDescriptor,
    ) -> Result<Vec<String>, DriverError> {
        self.expect_driver(driver_index).list_tables(descriptor)
    }

    /// Run a query via the driver that produced the descriptor.
    pub fn run_query(
        &self,
        driver_index: usize,
        descriptor: &DatabaseDescriptor,
        sql: &str,
    ) -> Result<QueryResult, DriverError> {
        self.expect_driver(driver_index).run_query(descriptor, sql)
    }

    fn expect_driver(&self, index: usize) -> &dyn DatabaseDriver {
        self.driver(index)
            .unwrap_or_else(|| panic!("no driver registered at index {index}"))
    }
}
