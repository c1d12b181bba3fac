//! Overlay lifecycle: applies cycle results to the map surface.
//!
//! The manager is owned by a single task. It is the only writer to the
//! surface, so the add-then-remove swap is never observed half done by
//! another writer. Readers may briefly see both layers.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use radar_common::OverlayState;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cycle::CycleResult;
use crate::metrics::CycleStats;

/// A rendering surface that overlays can be attached to.
pub trait MapSurface: Send + Sync {
    fn add_overlay(&self, overlay: Arc<OverlayState>);
    fn remove_overlay(&self, sequence: u64);
}

/// In-memory layer stack; the topmost layer is the one on display.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: RwLock<Vec<Arc<OverlayState>>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<OverlayState>> {
        self.layers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.layers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MapSurface for LayerStack {
    fn add_overlay(&self, overlay: Arc<OverlayState>) {
        self.layers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(overlay);
    }

    fn remove_overlay(&self, sequence: u64) {
        self.layers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|layer| layer.sequence != sequence);
    }
}

/// What the manager did with a cycle result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New overlay is on display.
    Swapped { sequence: u64 },
    /// Failed or cancelled cycle; display untouched.
    Unchanged,
    /// Published result older than the overlay on display.
    Stale { sequence: u64, current: u64 },
    /// Owner was torn down; result dropped.
    Discarded,
}

pub struct OverlayManager {
    surface: Arc<dyn MapSurface>,
    current: Option<Arc<OverlayState>>,
    last_updated: Option<DateTime<Utc>>,
    reject_out_of_order: bool,
    stats: Arc<CycleStats>,
}

impl OverlayManager {
    pub fn new(surface: Arc<dyn MapSurface>, reject_out_of_order: bool, stats: Arc<CycleStats>) -> Self {
        Self {
            surface,
            current: None,
            last_updated: None,
            reject_out_of_order,
            stats,
        }
    }

    pub fn current(&self) -> Option<&Arc<OverlayState>> {
        self.current.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn on_cycle_result(&mut self, result: CycleResult, token: &CancellationToken) -> Applied {
        if token.is_cancelled() {
            debug!(outcome = result.outcome(), "Owner torn down, discarding cycle result");
            self.stats.record_outcome("cancelled");
            return Applied::Discarded;
        }

        let outcome = result.outcome();
        let state = match result {
            CycleResult::Published(state) => state,
            CycleResult::Failed(e) => {
                warn!(kind = e.kind(), error = %e, "Keeping current overlay after failed cycle");
                self.stats.record_outcome(outcome);
                return Applied::Unchanged;
            }
            CycleResult::Cancelled => {
                self.stats.record_outcome(outcome);
                return Applied::Unchanged;
            }
        };

        if let Some(current) = &self.current {
            if self.reject_out_of_order && state.sequence < current.sequence {
                warn!(
                    sequence = state.sequence,
                    current = current.sequence,
                    "Rejecting out-of-order cycle result"
                );
                self.stats.record_outcome("stale");
                return Applied::Stale {
                    sequence: state.sequence,
                    current: current.sequence,
                };
            }
        }

        self.stats.record_outcome(outcome);

        let sequence = state.sequence;
        let fetched_at = state.fetched_at;
        let fallback = state.fallback;
        let overlay = Arc::new(state);

        // Add first so the surface is never empty after the first success
        self.surface.add_overlay(overlay.clone());
        if let Some(old) = self.current.replace(overlay) {
            self.surface.remove_overlay(old.sequence);
        }
        self.last_updated = Some(fetched_at);

        info!(sequence, fallback, fetched_at = %fetched_at, "Overlay swapped");
        Applied::Swapped { sequence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_stack_current_is_topmost() {
        let stack = LayerStack::new();
        assert!(stack.current().is_none());
        assert!(stack.is_empty());
    }
}
