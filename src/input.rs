//! Pointer input bridging
//!
//! Pointer events arrive whenever the host fires them; the tick reads once
//! per frame. A single slot holds the latest world offset and the newest
//! write always wins, so any number of moves between two frames looks the
//! same as one.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::sim::projection::{map_pointer_to_world_y, surface_coordinate};

/// Single-slot, last-write-wins cell for the pointer's world offset
#[derive(Debug, Default)]
pub struct PointerCell {
    bits: AtomicU32,
}

impl PointerCell {
    pub fn new(offset: f32) -> Self {
        Self {
            bits: AtomicU32::new(offset.to_bits()),
        }
    }

    /// Overwrite the slot; non-finite offsets are dropped
    pub fn store(&self, offset: f32) {
        if offset.is_finite() {
            self.bits.store(offset.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Map a surface-relative client y and store the resulting world offset
    ///
    /// `rect_top`/`rect_height` are the surface's bounding rectangle in
    /// client pixels; the coordinate is normalized to `logical_height` first.
    pub fn record_client_y(
        &self,
        client_y: f32,
        rect_top: f32,
        rect_height: f32,
        logical_height: f32,
        field_limit: f32,
    ) -> f32 {
        let screen_y = surface_coordinate(client_y, rect_top, rect_height, logical_height);
        let offset = map_pointer_to_world_y(screen_y, logical_height, field_limit);
        self.store(offset);
        offset
    }
}
