//! Pointer arbitration and reticle hover.
//!
//! Interactive overlays (inventory button, dialog panels) always win
//! over world targets: a `Begin` event inside a registered overlay is
//! consumed there and no world hit is reported for it. World hits cast
//! a perspective ray from the viewer (origin, +Z forward, +Y up, +X
//! screen-right) against per-target pick spheres; nearest ray distance
//! wins and exact ties go to the first-registered target, so results
//! are deterministic and testable.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::EngineConfig;
use crate::events::TargetId;

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The reticle zone: a fixed aim point at screen center.
    #[inline]
    pub fn reticle(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Begin,
    Move,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub phase: PointerPhase,
}

pub type OverlayId = u32;

/// Axis-aligned screen region owned by an interactive overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRegion {
    pub id: OverlayId,
    pub min: Vec2,
    pub max: Vec2,
}

impl OverlayRegion {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Outcome of arbitrating one `Begin` pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerResolution {
    /// Consumed by an overlay; no world hit is reported for this event.
    Overlay(OverlayId),
    WorldTarget(TargetId),
    EmptySpace,
}

/// Compute a world-space ray from screen pixel coordinates. The viewer
/// sits at the origin looking along +Z with +Y up; left-handed view and
/// projection keep +X on screen-right.
#[inline]
pub fn screen_to_world_ray(viewport: Viewport, fov_y_radians: f32, sx: f32, sy: f32) -> (Vec3, Vec3) {
    let ndc_x = (2.0 * sx / viewport.width) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / viewport.height);
    let aspect = viewport.width / viewport.height.max(1.0);
    let proj = Mat4::perspective_lh(fov_y_radians, aspect, 0.1, 500.0);
    let view = Mat4::look_at_lh(Vec3::ZERO, Vec3::Z, Vec3::Y);
    let inv = (proj * view).inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let rd = (p_far.truncate() / p_far.w).normalize();
    (Vec3::ZERO, rd)
}

/// Project a viewer-space point to screen pixels. `None` when the point
/// is behind the viewer.
#[inline]
pub fn world_to_screen(viewport: Viewport, fov_y_radians: f32, world: Vec3) -> Option<Vec2> {
    let aspect = viewport.width / viewport.height.max(1.0);
    let proj = Mat4::perspective_lh(fov_y_radians, aspect, 0.1, 500.0);
    let view = Mat4::look_at_lh(Vec3::ZERO, Vec3::Z, Vec3::Y);
    let clip = (proj * view) * Vec4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc.y) * 0.5 * viewport.height,
    ))
}

/// Ray-sphere intersection; returns the near-hit ray distance.
/// `ray_dir` must be normalized.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Change in the hovered target produced by one reticle pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverChange {
    pub exited: Option<TargetId>,
    pub entered: Option<TargetId>,
}

pub struct HitTestArbiter {
    overlays: Vec<OverlayRegion>,
    hovered: Option<TargetId>,
    pick_radius: f32,
    max_detection: f32,
    fov_y_radians: f32,
}

impl HitTestArbiter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            overlays: Vec::new(),
            hovered: None,
            pick_radius: config.pick_sphere_radius_m,
            max_detection: config.max_detection_distance_m,
            fov_y_radians: config.fov_y_radians,
        }
    }

    pub fn register_overlay(&mut self, region: OverlayRegion) {
        self.overlays.push(region);
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|r| r.id != id);
        self.overlays.len() != before
    }

    pub fn hovered(&self) -> Option<TargetId> {
        self.hovered
    }

    /// Arbitrate one `Begin` event: overlays first (first-registered
    /// wins among overlapping regions), then the nearest world target,
    /// otherwise empty space. `candidates` are `(id, viewer-space
    /// position)` in registration order.
    pub fn resolve_begin(
        &self,
        viewport: Viewport,
        position: Vec2,
        candidates: &[(TargetId, Vec3)],
    ) -> PointerResolution {
        for region in &self.overlays {
            if region.contains(position) {
                return PointerResolution::Overlay(region.id);
            }
        }
        match self.nearest_hit(viewport, position, candidates) {
            Some((id, _t)) => PointerResolution::WorldTarget(id),
            None => PointerResolution::EmptySpace,
        }
    }

    /// Recompute the hovered target from the reticle ray. Returns the
    /// hover transition, if any; removal-driven exits go through
    /// [`HitTestArbiter::notify_removed`].
    pub fn update_hover(
        &mut self,
        viewport: Viewport,
        candidates: &[(TargetId, Vec3)],
    ) -> HoverChange {
        let reticle = viewport.reticle();
        let next = self
            .nearest_hit(viewport, reticle, candidates)
            .map(|(id, _t)| id);
        self.transition_hover(next)
    }

    /// The feed removed a target; a live hover on it exits immediately.
    pub fn notify_removed(&mut self, id: TargetId) -> bool {
        if self.hovered == Some(id) {
            self.hovered = None;
            return true;
        }
        false
    }

    fn transition_hover(&mut self, next: Option<TargetId>) -> HoverChange {
        if next == self.hovered {
            return HoverChange::default();
        }
        let change = HoverChange {
            exited: self.hovered,
            entered: next,
        };
        self.hovered = next;
        change
    }

    fn nearest_hit(
        &self,
        viewport: Viewport,
        position: Vec2,
        candidates: &[(TargetId, Vec3)],
    ) -> Option<(TargetId, f32)> {
        let (ro, rd) = screen_to_world_ray(viewport, self.fov_y_radians, position.x, position.y);
        let mut best: Option<(TargetId, f32)> = None;
        for &(id, center) in candidates {
            if let Some(t) = ray_sphere(ro, rd, center, self.pick_radius) {
                if t <= self.max_detection {
                    // Strict < keeps the first-registered target on ties.
                    match best {
                        Some((_, bt)) if t >= bt => {}
                        _ => best = Some((id, t)),
                    }
                }
            }
        }
        best
    }
}
