//! The navigation session: one actor owns the trip state and everything
//! else talks to it through [`NavigationController`].

mod actor;
mod controller;
pub mod deviation;
mod observer;
mod recalculation;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{NavigationController, NavigationControllerBuilder};
pub use deviation::{DeviationAction, DeviationMonitor};
pub use observer::NavigationObserver;
pub use recalculation::{
    AutoRecalculate, ManualRecalculation, RecalculationFuture, RecalculationRequest,
    RecalculationStrategy, strategy_for,
};
