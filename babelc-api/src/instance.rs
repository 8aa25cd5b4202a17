//! Process-wide driver instance
//!
//! Host runtimes resolve foreign types from many unrelated call sites;
//! threading a driver through all of them is impractical, so one driver
//! is installed per process. Library users should still prefer
//! constructing and threading an explicit [`Driver`].

use babelc_driver::Driver;
use once_cell::sync::OnceCell;

static GLOBAL_DRIVER: OnceCell<Driver> = OnceCell::new();

/// Install the process-wide driver (must be called once, before any use).
///
/// # Panics
/// If a driver is already installed
pub fn init(driver: Driver) {
    if GLOBAL_DRIVER.set(driver).is_err() {
        panic!("Driver already initialized");
    }
}

/// Get the process-wide driver.
///
/// # Panics
/// If no driver is installed
pub fn instance() -> &'static Driver {
    GLOBAL_DRIVER.get().expect("Driver not initialized")
}

/// The process-wide driver, if one is installed.
pub fn try_instance() -> Option<&'static Driver> {
    GLOBAL_DRIVER.get()
}

/// Check if a process-wide driver is installed.
pub fn is_initialized() -> bool {
    GLOBAL_DRIVER.get().is_some()
}
