// SPDX-License-Identifier: MIT OR Apache-2.0
//! Press-move-release tracking for scrubbing.
//!
//! A [`DragTracker`] turns a pointer gesture that started over some origin
//! element into a throttled stream of positions, both local to the origin
//! (as it was when pressed) and global. Once a drag starts, moves and the
//! release are observed anywhere, not just over the origin.

use crate::domain::{validate, NumericDomain};
use crate::throttle::Throttle;
use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Publish rate for drag positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragFps {
    /// 30 frames per second
    #[default]
    Thirty,
    /// 60 frames per second
    Sixty,
}

impl DragFps {
    /// Minimum time between two published positions
    pub fn window(&self) -> Duration {
        match self {
            Self::Thirty => Duration::from_millis(32),
            Self::Sixty => Duration::from_millis(16),
        }
    }
}

/// A published pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Relative to the origin's top-left corner at press time
    pub local: Pos2,
    /// Viewport coordinates
    pub global: Pos2,
}

/// Throttled drag gesture tracker
#[derive(Debug, Clone)]
pub struct DragTracker {
    is_dragging: bool,
    origin: Pos2,
    local_start: Pos2,
    global_start: Pos2,
    local_current: Pos2,
    global_current: Pos2,
    last_pointer: Pos2,
    throttle: Throttle<Pos2>,
}

impl DragTracker {
    /// Create an idle tracker
    pub fn new(fps: DragFps) -> Self {
        Self {
            is_dragging: false,
            origin: Pos2::ZERO,
            local_start: Pos2::ZERO,
            global_start: Pos2::ZERO,
            local_current: Pos2::ZERO,
            global_current: Pos2::ZERO,
            last_pointer: Pos2::ZERO,
            throttle: Throttle::new(fps.window()),
        }
    }

    /// Whether a gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Whether global move/release events should be delivered
    pub fn is_listening(&self) -> bool {
        self.is_dragging
    }

    /// Local press position
    pub fn local_start(&self) -> Pos2 {
        self.local_start
    }

    /// Global press position
    pub fn global_start(&self) -> Pos2 {
        self.global_start
    }

    /// Last published local position
    pub fn local_current(&self) -> Pos2 {
        self.local_current
    }

    /// Last published global position
    pub fn global_current(&self) -> Pos2 {
        self.global_current
    }

    /// Next trailing publish, for scheduling a repaint
    pub fn deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Start a gesture over `origin`; publishes the press position
    pub fn on_press_start(&mut self, origin: Rect, pointer: Pos2, now: Instant) -> DragUpdate {
        self.throttle.cancel();
        self.is_dragging = true;
        self.origin = origin.min;
        self.local_start = self.to_local(pointer);
        self.global_start = pointer;
        self.last_pointer = pointer;
        tracing::trace!(?pointer, ?now, "Drag started");

        // Published directly; the first move still gets the leading edge
        self.publish(pointer)
    }

    /// Pointer moved anywhere; throttled.
    ///
    /// A position equal to the last one seen is ignored, so a held but still
    /// pointer schedules nothing.
    pub fn on_move(&mut self, pointer: Pos2, now: Instant) -> Option<DragUpdate> {
        if !self.is_dragging || pointer == self.last_pointer {
            return None;
        }
        self.last_pointer = pointer;
        let pointer = self.throttle.call(now, pointer)?;
        Some(self.publish(pointer))
    }

    /// Release a trailing position whose window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<DragUpdate> {
        if !self.is_dragging {
            return None;
        }
        let pointer = self.throttle.poll(now)?;
        Some(self.publish(pointer))
    }

    /// End the gesture; publishes the release position unthrottled
    pub fn on_release(&mut self, pointer: Pos2) -> Option<DragUpdate> {
        if !self.is_dragging {
            return None;
        }
        self.is_dragging = false;
        self.throttle.cancel();
        tracing::trace!(?pointer, "Drag stopped");
        Some(self.publish(pointer))
    }

    /// Abort without a final publish
    pub fn cancel(&mut self) {
        self.is_dragging = false;
        self.throttle.cancel();
    }

    fn to_local(&self, pointer: Pos2) -> Pos2 {
        (pointer - self.origin).to_pos2()
    }

    fn publish(&mut self, pointer: Pos2) -> DragUpdate {
        self.local_current = self.to_local(pointer);
        self.global_current = pointer;
        DragUpdate {
            local: self.local_current,
            global: self.global_current,
        }
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(DragFps::default())
    }
}

/// Map a local ruler x (one pixel per time unit) to a legal current time
pub fn scrub_time(local_x: f32, domain: &NumericDomain) -> f64 {
    validate(f64::from(local_x), domain).result
}
