//! This module implements the drag math: anchoring a slice plane under the pointer and solving
//! how far the plane must slide along its normal so the grabbed point keeps following the pointer.
//!
//! The solve deliberately runs in screen space. Projecting the anchor and its normal direction
//! onto the screen, doing the 2D work there, and only then unprojecting back into the plane's
//! local frame keeps the math robust under perspective distortion without inverting the
//! projection analytically. A drag is recomputed from the absolute anchor/pointer pair on every
//! event, never accumulated per frame, so dropped events cannot compound error.

use log::trace;

use crate::slice::SlicePlane;
use crate::transform::ScreenTransform;

/// Screen-space normal vectors shorter than this (in pixels) mean the plane normal points at the
/// camera and the drag direction is undefined.
const DEGENERATE_NORMAL_EPSILON: f32 = 1e-4;

/// A ray this close to in-plane cannot be resolved against the anchor.
const DEGENERATE_RAY_EPSILON: f32 = 1e-6;

/// Set the anchor: the in-plane point where the camera ray through `pixel` meets the plane
/// (local z = 0). Returns false without touching the plane when the ray runs parallel to it.
pub fn set_anchor(plane: &mut SlicePlane, tr: &ScreenTransform, pixel: nalgebra_glm::Vec2) -> bool {
    let ray = tr.unproject_ray(pixel);
    let Some(t) = ray.z_plane_param(0.0) else {
        return false;
    };
    let hit = ray.at(t);
    plane.anchor = Some(hit.xy());
    true
}

/// Solve the drag for an anchored plane against a new pointer position.
///
/// The result is clamped into the plane's valid range and stored as its pending offset (in world
/// units along the plane's axis), ready for `commit_drag`. Returns `None`, leaving the pending
/// offset untouched, when the plane has no anchor or the projection is degenerate.
pub fn drag_to(
    plane: &mut SlicePlane,
    tr: &ScreenTransform,
    pointer: nalgebra_glm::Vec2,
) -> Option<f32> {
    let anchor = plane.anchor()?;

    // The anchor at the plane's current position, on screen.
    let anchor_screen = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, 0.0));

    // Screen image of one unit along the plane normal, as a unit drag direction.
    let normal_tip = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, 1.0));
    let normal_screen = normal_tip - anchor_screen;
    let normal_len = normal_screen.norm();
    if normal_len < DEGENERATE_NORMAL_EPSILON {
        return None;
    }
    let normal_screen = normal_screen / normal_len;

    // How far the pointer pulls along that direction. Lateral pointer motion projects away.
    let drag = nalgebra_glm::dot(&(pointer - anchor_screen), &normal_screen);

    // Where the anchor should sit on screen after the drag, shot back into the local frame.
    let new_anchor_screen = anchor_screen + normal_screen * drag;
    let ray = tr.unproject_ray(new_anchor_screen);

    // Pick the point on that ray whose in-plane coordinates come closest to the original anchor
    // (a least-squares solve in the two free axes), and read the constrained coordinate there.
    let denominator = ray.dir.x * ray.dir.x + ray.dir.y * ray.dir.y;
    if denominator < DEGENERATE_RAY_EPSILON {
        return None;
    }
    let numerator =
        (anchor.x - ray.origin.x) * ray.dir.x + (anchor.y - ray.origin.y) * ray.dir.y;
    let shoot = numerator / denominator;
    let local_offset = ray.origin.z + ray.dir.z * shoot;

    // A move along the local normal maps onto the world axis with a per-axis sign; clamp the
    // world offset so the commit lands inside the valid range.
    let offset = plane.axis().orientation() * local_offset;
    let offset = plane.range().clamp_offset(plane.position(), offset);
    plane.pending_offset = offset;
    trace!(
        "drag solve on {:?}: {:.2}px along the screen normal -> offset {:.3}",
        plane.axis(),
        drag,
        offset
    );
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use crate::camera::{Camera, ProjectionKind, ViewContext};
    use crate::slice::{ImageSourceFn, SliceImage, SlicePlane, SliceRange};
    use crate::transform::Viewport;
    use approx::assert_relative_eq;

    fn source() -> ImageSourceFn {
        Box::new(|_| SliceImage::from_fn(100, 100, |_, _| 0.0))
    }

    fn plane_at(axis: Axis, position: i32) -> SlicePlane {
        SlicePlane::new(axis, position, SliceRange::new(0, 99), vec![source()]).unwrap()
    }

    /// Oblique orthographic view of the volume. The screen map is linear, which makes the
    /// solver exact and lets tests assert integer outcomes.
    fn ortho_view() -> ViewContext {
        let camera = Camera::new(
            nalgebra_glm::vec3(200.0, 200.0, 200.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 0.0, 1.0),
            ProjectionKind::Orthographic {
                left: -150.0,
                right: 150.0,
                bottom: -150.0,
                top: 150.0,
                near: 0.1,
                far: 600.0,
            },
        );
        ViewContext::new(camera, Viewport::new(800.0, 600.0))
    }

    fn perspective_view() -> ViewContext {
        let camera = Camera::new(
            nalgebra_glm::vec3(200.0, 200.0, 200.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 0.0, 1.0),
            ProjectionKind::Perspective {
                fov: 0.785,
                aspect: 800.0 / 600.0,
                far: 1000.0,
            },
        );
        ViewContext::new(camera, Viewport::new(800.0, 600.0))
    }

    /// Anchor the plane by clicking the pixel over local (u, v).
    fn grab(plane: &mut SlicePlane, view: &ViewContext, u: f32, v: f32) {
        let tr = view.plane_transform(plane.axis(), plane.position() as f32);
        let pixel = tr.project(nalgebra_glm::vec3(u, v, 0.0));
        assert!(set_anchor(plane, &tr, pixel));
    }

    /// Drag the pointer to the pixel where local (u, v, local_z) currently projects, then commit.
    fn drag_towards(plane: &mut SlicePlane, view: &ViewContext, local_z: f32) -> Option<f32> {
        let anchor = plane.anchor().unwrap();
        let tr = view.plane_transform(plane.axis(), plane.position() as f32);
        let pointer = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, local_z));
        let offset = drag_to(plane, &tr, pointer);
        if offset.is_some() {
            plane.commit_drag();
        }
        offset
    }

    #[test]
    fn anchor_lands_on_the_grabbed_point() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);
        let anchor = plane.anchor().unwrap();
        assert_relative_eq!(anchor.x, 30.0, epsilon = 1e-2);
        assert_relative_eq!(anchor.y, 40.0, epsilon = 1e-2);
    }

    #[test]
    fn anchor_fails_for_an_edge_on_plane() {
        // Looking straight down -y, every camera ray lies inside the z planes.
        let camera = Camera::new(
            nalgebra_glm::vec3(50.0, 250.0, 50.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 0.0, 1.0),
            ProjectionKind::default(),
        );
        let view = ViewContext::new(camera, Viewport::new(800.0, 600.0));
        let mut plane = plane_at(Axis::Z, 50);
        let tr = view.plane_transform(Axis::Z, 50.0);
        assert!(!set_anchor(&mut plane, &tr, nalgebra_glm::vec2(400.0, 300.0)));
        assert!(plane.anchor().is_none());
    }

    #[test]
    fn stationary_pointer_solves_to_zero() {
        let view = perspective_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        let anchor = plane.anchor().unwrap();
        let tr = view.plane_transform(Axis::Z, 50.0);
        let pointer = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, 0.0));
        let offset = drag_to(&mut plane, &tr, pointer).unwrap();
        assert!(offset.abs() < 1e-3, "offset {}", offset);
    }

    #[test]
    fn lateral_pointer_motion_does_not_move_the_plane() {
        let view = perspective_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        let anchor = plane.anchor().unwrap();
        let tr = view.plane_transform(Axis::Z, 50.0);
        let anchor_screen = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, 0.0));
        let normal_tip = tr.project(nalgebra_glm::vec3(anchor.x, anchor.y, 1.0));
        let normal_screen = (normal_tip - anchor_screen).normalize();
        let sideways = nalgebra_glm::vec2(-normal_screen.y, normal_screen.x) * 40.0;

        let offset = drag_to(&mut plane, &tr, anchor_screen + sideways).unwrap();
        assert!(offset.abs() < 1e-3, "offset {}", offset);
    }

    #[test]
    fn screen_projected_drag_of_three_commits_three() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        let offset = drag_towards(&mut plane, &view, 3.0).unwrap();
        assert_relative_eq!(offset, 3.0, epsilon = 1e-3);
        assert_eq!(plane.position(), 53);

        // Release with no further movement.
        plane.clear_anchor();
        assert_eq!(plane.position(), 53);
        assert!(plane.anchor().is_none());
    }

    #[test]
    fn round_trip_returns_on_z() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        drag_towards(&mut plane, &view, 4.0);
        assert_eq!(plane.position(), 54);
        drag_towards(&mut plane, &view, -4.0);
        assert_eq!(plane.position(), 50);
    }

    #[test]
    fn round_trip_returns_on_x() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::X, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        drag_towards(&mut plane, &view, 5.0);
        assert_eq!(plane.position(), 55);
        drag_towards(&mut plane, &view, -5.0);
        assert_eq!(plane.position(), 50);
    }

    #[test]
    fn flipped_axis_round_trip_returns_on_y() {
        // The y slice's local normal points along world -y, so a +3 pull along the local normal
        // commits to 47; the double sign bookkeeping must still cancel over a round trip.
        let view = ortho_view();
        let mut plane = plane_at(Axis::Y, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        drag_towards(&mut plane, &view, 3.0);
        assert_eq!(plane.position(), 47);
        drag_towards(&mut plane, &view, -3.0);
        assert_eq!(plane.position(), 50);
    }

    #[test]
    fn overshooting_drag_clamps_to_the_boundary() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        // Would land on 110; truncated to the upper bound.
        let offset = drag_towards(&mut plane, &view, 60.0).unwrap();
        assert_relative_eq!(offset, 49.0, epsilon = 1e-3);
        assert_eq!(plane.position(), 99);
    }

    #[test]
    fn undershooting_drag_clamps_to_the_lower_boundary() {
        let view = ortho_view();
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        let offset = drag_towards(&mut plane, &view, -55.0).unwrap();
        assert_relative_eq!(offset, -50.0, epsilon = 1e-3);
        assert_eq!(plane.position(), 0);
    }

    #[test]
    fn head_on_normal_is_degenerate() {
        // Orthographic camera staring straight down the plane normal: the projected normal
        // collapses to a point and there is no screen drag direction.
        let camera = Camera::new(
            nalgebra_glm::vec3(50.0, 50.0, 250.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 1.0, 0.0),
            ProjectionKind::Orthographic {
                left: -150.0,
                right: 150.0,
                bottom: -150.0,
                top: 150.0,
                near: 0.1,
                far: 600.0,
            },
        );
        let view = ViewContext::new(camera, Viewport::new(800.0, 600.0));
        let mut plane = plane_at(Axis::Z, 50);
        grab(&mut plane, &view, 30.0, 40.0);

        let tr = view.plane_transform(Axis::Z, 50.0);
        assert!(drag_to(&mut plane, &tr, nalgebra_glm::vec2(420.0, 310.0)).is_none());
        assert_eq!(plane.pending_offset, 0.0);
    }
}
