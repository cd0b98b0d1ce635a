use bevy::math::DVec2;
use bevy::prelude::*;

use crate::sim::Viewport;

/// The falling disc. `position` is the top-left corner of its bounding box in
/// screen space (origin top-left, y down); `velocity` is in pixels per tick.
///
/// Plain data: nothing here keeps the ball inside the viewport, that is the
/// simulator's job.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: DVec2,
    pub diameter: f64,
    pub velocity: DVec2,
}

impl Ball {
    pub fn new(position: DVec2, diameter: f64, velocity: DVec2) -> Self {
        Self {
            position,
            diameter,
            velocity,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.position.x + self.diameter
    }

    pub fn max_y(&self) -> f64 {
        self.position.y + self.diameter
    }

    pub fn center(&self) -> DVec2 {
        self.position + DVec2::splat(self.diameter * 0.5)
    }

    /// True when the whole bounding box lies inside `viewport`.
    pub fn within(&self, viewport: Viewport) -> bool {
        self.position.x >= 0.0
            && self.position.y >= 0.0
            && self.max_x() <= viewport.width
            && self.max_y() <= viewport.height
    }

    pub fn reset(&mut self, position: DVec2, velocity: DVec2) {
        self.position = position;
        self.velocity = velocity;
    }
}
