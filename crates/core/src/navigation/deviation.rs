//! Off-route episode tracking.
//!
//! An episode is a run of consecutive `OffRoute` states. Only its first state
//! asks for a recalculation; a `NoDeviation` state (or leaving `Navigating`)
//! closes it.

use wayline_route::{DeviationStatus, TripState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviationAction {
    None,
    Recalculate {
        episode: u64,
        deviation_from_route_line: f64,
    },
    EpisodeEnded {
        episode: u64,
    },
}

#[derive(Debug, Default)]
pub struct DeviationMonitor {
    episode: u64,
    off_route: bool,
}

impl DeviationMonitor {
    pub fn observe(&mut self, state: &TripState) -> DeviationAction {
        match state.deviation() {
            Some(DeviationStatus::OffRoute {
                deviation_from_route_line,
            }) => {
                if self.off_route {
                    return DeviationAction::None;
                }
                self.off_route = true;
                self.episode += 1;
                DeviationAction::Recalculate {
                    episode: self.episode,
                    deviation_from_route_line,
                }
            }
            Some(DeviationStatus::NoDeviation) | None => self.end_episode(),
        }
    }

    /// Forget any open episode, e.g. when the session ends.
    pub fn reset(&mut self) {
        self.off_route = false;
    }

    /// Whether `episode` is still open.
    pub fn is_current(&self, episode: u64) -> bool {
        self.off_route && self.episode == episode
    }

    fn end_episode(&mut self) -> DeviationAction {
        if !self.off_route {
            return DeviationAction::None;
        }
        self.off_route = false;
        DeviationAction::EpisodeEnded {
            episode: self.episode,
        }
    }
}
