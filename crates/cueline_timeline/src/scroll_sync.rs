// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scroll offset mirroring between panels.
//!
//! A [`ScrollSyncGroup`] lists which surfaces share the X axis and which
//! share the Y axis. Members are plain ids resolved through a
//! [`SurfaceResolver`] on every scroll event, so surfaces mounted or
//! unmounted after the group was built are honoured and missing ones are
//! skipped.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scrollable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    /// Create a new random surface ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Something with a horizontal and vertical scroll offset
pub trait ScrollSurface {
    /// Horizontal offset
    fn scroll_left(&self) -> f32;
    /// Set horizontal offset
    fn set_scroll_left(&mut self, value: f32);
    /// Vertical offset
    fn scroll_top(&self) -> f32;
    /// Set vertical offset
    fn set_scroll_top(&mut self, value: f32);
}

/// Live lookup of mounted surfaces
pub trait SurfaceResolver {
    /// Surface type
    type Surface: ScrollSurface;

    /// The surface for `id`, or `None` if it is not mounted
    fn resolve(&mut self, id: SurfaceId) -> Option<&mut Self::Surface>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn read(self, surface: &impl ScrollSurface) -> f32 {
        match self {
            Self::X => surface.scroll_left(),
            Self::Y => surface.scroll_top(),
        }
    }

    fn write(self, surface: &mut impl ScrollSurface, value: f32) {
        match self {
            Self::X => surface.set_scroll_left(value),
            Self::Y => surface.set_scroll_top(value),
        }
    }
}

/// Surfaces that mirror each other's scroll offsets
#[derive(Debug, Clone, Default)]
pub struct ScrollSyncGroup {
    x_members: Vec<SurfaceId>,
    y_members: Vec<SurfaceId>,
}

impl ScrollSyncGroup {
    /// Create a group from its X-axis and Y-axis members
    pub fn new(x_members: Vec<SurfaceId>, y_members: Vec<SurfaceId>) -> Self {
        Self { x_members, y_members }
    }

    /// X-axis members
    pub fn x_members(&self) -> &[SurfaceId] {
        &self.x_members
    }

    /// Y-axis members
    pub fn y_members(&self) -> &[SurfaceId] {
        &self.y_members
    }

    /// `source` scrolled horizontally; copy its `scroll_left` to X members
    pub fn on_scroll_x(&self, resolver: &mut impl SurfaceResolver, source: SurfaceId) {
        sync_axis(resolver, source, &self.x_members, Axis::X);
    }

    /// `source` scrolled vertically; copy its `scroll_top` to Y members
    pub fn on_scroll_y(&self, resolver: &mut impl SurfaceResolver, source: SurfaceId) {
        sync_axis(resolver, source, &self.y_members, Axis::Y);
    }

    /// X then Y, for surfaces that mirror both axes
    pub fn on_scroll_both(&self, resolver: &mut impl SurfaceResolver, source: SurfaceId) {
        self.on_scroll_x(resolver, source);
        self.on_scroll_y(resolver, source);
    }
}

fn sync_axis(
    resolver: &mut impl SurfaceResolver,
    source: SurfaceId,
    members: &[SurfaceId],
    axis: Axis,
) {
    let Some(next) = resolver.resolve(source).map(|surface| axis.read(&*surface)) else {
        return;
    };

    for &id in members {
        if id == source {
            continue;
        }
        let Some(surface) = resolver.resolve(id) else {
            continue;
        };
        // Equal offsets end the chain
        if axis.read(&*surface) != next {
            axis.write(surface, next);
            tracing::trace!(?axis, offset = next, "Scroll offset mirrored");
        }
    }
}

/// Plain scroll offsets of one surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    /// Horizontal offset
    pub left: f32,
    /// Vertical offset
    pub top: f32,
}

impl ScrollSurface for ScrollOffset {
    fn scroll_left(&self) -> f32 {
        self.left
    }

    fn set_scroll_left(&mut self, value: f32) {
        self.left = value;
    }

    fn scroll_top(&self) -> f32 {
        self.top
    }

    fn set_scroll_top(&mut self, value: f32) {
        self.top = value;
    }
}

/// A registered surface: its offset and whether a sync wrote to it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegisteredSurface {
    offset: ScrollOffset,
    synced: bool,
}

impl RegisteredSurface {
    /// Current offset
    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }
}

impl ScrollSurface for RegisteredSurface {
    fn scroll_left(&self) -> f32 {
        self.offset.left
    }

    fn set_scroll_left(&mut self, value: f32) {
        self.offset.left = value;
        self.synced = true;
    }

    fn scroll_top(&self) -> f32 {
        self.offset.top
    }

    fn set_scroll_top(&mut self, value: f32) {
        self.offset.top = value;
        self.synced = true;
    }
}

/// Mounted surfaces and their offsets, for immediate-mode display surfaces.
///
/// The display surface reports observed offsets with
/// [`SurfaceRegistry::observe`] and applies mirrored ones taken from
/// [`SurfaceRegistry::take_synced`] on its next frame.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: IndexMap<SurfaceId, RegisteredSurface>,
}

impl SurfaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface at offset zero (no-op if already mounted)
    pub fn mount(&mut self, id: SurfaceId) {
        self.surfaces.entry(id).or_default();
    }

    /// Remove a surface
    pub fn unmount(&mut self, id: SurfaceId) {
        self.surfaces.shift_remove(&id);
    }

    /// Whether a surface is registered
    pub fn is_mounted(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    /// Offset of a mounted surface
    pub fn offset(&self, id: SurfaceId) -> Option<ScrollOffset> {
        self.surfaces.get(&id).map(RegisteredSurface::offset)
    }

    /// Record the offset a surface actually shows.
    ///
    /// Returns which axes changed, i.e. which scroll events to dispatch.
    /// Mounts the surface if needed.
    pub fn observe(&mut self, id: SurfaceId, offset: ScrollOffset) -> ScrollChange {
        let entry = self.surfaces.entry(id).or_default();
        let change = ScrollChange {
            x: entry.offset.left != offset.left,
            y: entry.offset.top != offset.top,
        };
        entry.offset = offset;
        change
    }

    /// Take the mirrored offset for a surface, if a sync wrote to it
    pub fn take_synced(&mut self, id: SurfaceId) -> Option<ScrollOffset> {
        let surface = self.surfaces.get_mut(&id)?;
        if !surface.synced {
            return None;
        }
        surface.synced = false;
        Some(surface.offset)
    }

    /// Ids with a pending mirrored offset
    pub fn synced_ids(&self) -> IndexSet<SurfaceId> {
        self.surfaces
            .iter()
            .filter(|(_, surface)| surface.synced)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl SurfaceResolver for SurfaceRegistry {
    type Surface = RegisteredSurface;

    fn resolve(&mut self, id: SurfaceId) -> Option<&mut RegisteredSurface> {
        self.surfaces.get_mut(&id)
    }
}

/// Axes whose offset changed in one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollChange {
    /// Horizontal offset changed
    pub x: bool,
    /// Vertical offset changed
    pub y: bool,
}

impl ScrollChange {
    /// Whether anything changed
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}
