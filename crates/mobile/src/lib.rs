//! Kotlin/Swift bindings for the wayline navigation core.

mod error;
mod foreign;
mod logging;
mod navigator;

pub use error::NavigatorError;
pub use foreign::{
    ForeignLocationProvider, ForeignNavigationObserver, ForeignRouteAdapter, ForeignRouteEngine,
    ForeignRouteSession, LocationProviderError, LocationUpdates,
};
pub use navigator::Navigator;

use wayline_core::NavigationControllerConfig;

uniffi::setup_scaffolding!();

/// Route logs to the platform log and panics through the logger.
/// Call this once at startup from Kotlin/Swift; [`Navigator::new`] also does.
#[uniffi::export]
pub fn init_logging() {
    logging::setup_logging();
}

/// The default configuration as JSON, for front-ends to edit and pass back
/// to [`Navigator::new`].
#[uniffi::export]
pub fn default_config_json() -> Result<String, NavigatorError> {
    serde_json::to_string_pretty(&NavigationControllerConfig::default())
        .map_err(|e| NavigatorError::Configuration(e.to_string()))
}
