use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use wayline_route::UserLocation;

use crate::error::LocationError;
use crate::location::{LocationProvider, LocationSink};

#[derive(Debug)]
struct Inner {
    location: Option<UserLocation>,
    enabled: bool,
    sink: Option<LocationSink>,
}

/// Provider whose fixes are set by hand.
///
/// Useful for tests and for front-ends that already own a location stream
/// and only need to forward it.
#[derive(Debug)]
pub struct StaticLocationProvider {
    inner: Mutex<Inner>,
}

impl Default for StaticLocationProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StaticLocationProvider {
    pub fn new(location: Option<UserLocation>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                location,
                enabled: true,
                sink: None,
            }),
        }
    }

    /// A provider that refuses to start, as when location services are off.
    pub fn disabled(location: Option<UserLocation>) -> Self {
        let provider = Self::new(location);
        provider.set_enabled(false);
        provider
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `location` and forward it to the active sink, if any.
    pub fn set_location(&self, location: UserLocation) {
        let sink = {
            let mut inner = self.inner();
            inner.location = Some(location);
            inner.sink.clone()
        };
        if let Some(sink) = sink {
            sink.push(location);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        let mut inner = self.inner();
        inner.enabled = enabled;
        if !enabled {
            inner.sink = None;
        }
    }

    pub fn is_updating(&self) -> bool {
        self.inner().sink.is_some()
    }
}

impl LocationProvider for StaticLocationProvider {
    fn last_location(&self) -> Option<UserLocation> {
        self.inner().location
    }

    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError> {
        let mut inner = self.inner();
        if !inner.enabled {
            return Err(LocationError::ServicesDisabled);
        }
        debug!(generation = sink.generation(), "static location updates started");
        inner.sink = Some(sink);
        Ok(())
    }

    fn stop_updates(&self) {
        self.inner().sink = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix::Actor;
    use wayline_route::GeographicCoordinate;

    use super::*;
    use crate::location::testing::{Collector, Flush};

    #[actix::test]
    async fn test_forwards_only_while_started() {
        let fixes = Arc::new(Mutex::new(Vec::new()));
        let addr = Collector(fixes.clone()).start();
        let provider = StaticLocationProvider::default();

        let first = UserLocation::at(GeographicCoordinate::new(1.0, 1.0));
        let second = UserLocation::at(GeographicCoordinate::new(2.0, 2.0));
        let third = UserLocation::at(GeographicCoordinate::new(3.0, 3.0));

        provider.set_location(first);
        provider
            .start_updates(LocationSink::new(1, addr.clone().recipient()))
            .unwrap();
        assert!(provider.is_updating());
        provider.set_location(second);
        provider.stop_updates();
        provider.stop_updates();
        provider.set_location(third);
        addr.send(Flush).await.unwrap();

        let fixes = fixes.lock().unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].location, second);
        assert_eq!(provider.last_location(), Some(third));
    }

    #[actix::test]
    async fn test_disabled_provider_refuses_to_start() {
        let addr = Collector::default().start();
        let provider = StaticLocationProvider::disabled(None);

        let result = provider.start_updates(LocationSink::new(1, addr.recipient()));

        assert_eq!(result, Err(LocationError::ServicesDisabled));
        assert!(!provider.is_updating());
    }
}
