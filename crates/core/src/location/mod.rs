//! Location sources and the sink fixes travel through into a session.

mod simulated;
mod static_provider;

pub use simulated::SimulatedLocationProvider;
pub use static_provider::StaticLocationProvider;

use actix::{Message, Recipient};
use wayline_route::UserLocation;

use crate::error::LocationError;

/// A fix on its way to the navigation actor.
///
/// `generation` identifies the session the fix was produced for. Fixes
/// pushed by the UI directly carry `None` and always apply to the live
/// session.
#[derive(Message, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
pub struct LocationFix {
    pub generation: Option<u64>,
    pub location: UserLocation,
}

/// Cloneable, thread-safe handle that feeds one session.
///
/// A sink outliving its session is harmless: the actor drops fixes stamped
/// with an older generation.
#[derive(Clone)]
pub struct LocationSink {
    generation: u64,
    recipient: Recipient<LocationFix>,
}

impl LocationSink {
    pub fn new(generation: u64, recipient: Recipient<LocationFix>) -> Self {
        Self {
            generation,
            recipient,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn push(&self, location: UserLocation) {
        self.recipient.do_send(LocationFix {
            generation: Some(self.generation),
            location,
        });
    }
}

impl std::fmt::Debug for LocationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSink")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Anything that can produce fixes: platform hardware, a simulation, a test.
pub trait LocationProvider: Send + Sync {
    /// The most recent fix, if one was ever produced.
    fn last_location(&self) -> Option<UserLocation>;

    /// Begin delivering fixes to `sink`, replacing any previous sink.
    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError>;

    /// Stop delivering fixes. Safe to call when not started.
    fn stop_updates(&self);
}
