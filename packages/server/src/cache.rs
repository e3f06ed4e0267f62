//! The most recent rendered map, shared between handlers.
//!
//! The root handler publishes a complete render; the map handler reads it.
//! Publishing swaps a whole `Arc` under a write lock, so a reader holds
//! either the previous render or the new one, never a partial document.
//! Concurrent publishers race and the last one wins.

use std::sync::{Arc, PoisonError, RwLock};

use drought_map_render::MapArtifact;
use drought_map_source::DateWindow;

/// A published render together with the data week it shows.
#[derive(Debug, Clone)]
pub struct CachedRender {
    pub artifact: MapArtifact,
    pub window: DateWindow,
}

/// Single-slot store for the latest [`CachedRender`].
#[derive(Debug, Default)]
pub struct RenderCache {
    latest: RwLock<Option<Arc<CachedRender>>>,
}

impl RenderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current render.
    pub fn publish(&self, render: CachedRender) {
        let render = Arc::new(render);
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(render);
    }

    /// Returns the current render, if one has been published.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<CachedRender>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
