//! This module implements the scene-level container for slice planes: id-based ownership and the
//! pixel picking query the selection controller relies on.
//!
//! Picking mirrors how a scene graph would answer "what is under this pixel": the enclosing view
//! widget carries a generic interactive mask that shadows everything inside it, so the query only
//! reaches the slices while that mask is dropped. The controller is responsible for dropping and
//! restoring it around each query.

use log::trace;

use crate::camera::ViewContext;
use crate::slice::SlicePlane;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Key of a slice plane within its scene
pub struct SliceId(pub usize);

/// Owns the slice planes of one canvas
pub struct SliceScene {
    planes: Vec<SlicePlane>,
    view_interactive: bool,
}

impl SliceScene {
    pub fn new() -> Self {
        Self {
            planes: Vec::new(),
            view_interactive: true,
        }
    }

    /// Add a plane to the scene, returning its key
    pub fn add_plane(&mut self, plane: SlicePlane) -> SliceId {
        self.planes.push(plane);
        SliceId(self.planes.len() - 1)
    }

    pub fn plane(&self, id: SliceId) -> &SlicePlane {
        &self.planes[id.0]
    }

    pub fn plane_mut(&mut self, id: SliceId) -> &mut SlicePlane {
        &mut self.planes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SliceId, &SlicePlane)> {
        self.planes
            .iter()
            .enumerate()
            .map(|(i, plane)| (SliceId(i), plane))
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// The view widget's generic interactive mask. While set, `pick` is shadowed by the view and
    /// reports no slice.
    pub fn view_interactive(&self) -> bool {
        self.view_interactive
    }

    pub fn set_view_interactive(&mut self, interactive: bool) {
        self.view_interactive = interactive;
    }

    /// The topmost slice under `pixel`, by ray depth. Planes the ray runs parallel to, misses, or
    /// crosses behind the near plane are skipped.
    pub fn pick(&self, view: &ViewContext, pixel: nalgebra_glm::Vec2) -> Option<SliceId> {
        if self.view_interactive {
            // Shadowed by the enclosing view widget.
            return None;
        }

        let mut best: Option<(SliceId, f32)> = None;
        for (id, plane) in self.iter() {
            let tr = view.plane_transform(plane.axis(), plane.position() as f32);
            let ray = tr.unproject_ray(pixel);
            let Some(t) = ray.z_plane_param(0.0) else {
                continue;
            };
            if t < 0.0 {
                continue;
            }
            let hit = ray.at(t);
            if !plane.extent().contains_point(&hit.xy()) {
                continue;
            }
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((id, t));
            }
        }
        if let Some((id, t)) = best {
            trace!("pick at ({:.0}, {:.0}) -> {:?} depth {:.1}", pixel.x, pixel.y, id, t);
        }
        best.map(|(id, _)| id)
    }

    /// Union of the plane extents along each world axis, for ranging a camera around the scene
    pub fn bounds(&self) -> Option<[(f32, f32); 3]> {
        let mut bounds: Option<[(f32, f32); 3]> = None;
        for plane in &self.planes {
            let plane_bounds = [plane.bounds(0), plane.bounds(1), plane.bounds(2)];
            bounds = Some(match bounds {
                None => plane_bounds,
                Some(current) => {
                    let mut merged = current;
                    for i in 0..3 {
                        merged[i].0 = merged[i].0.min(plane_bounds[i].0);
                        merged[i].1 = merged[i].1.max(plane_bounds[i].1);
                    }
                    merged
                }
            });
        }
        bounds
    }
}

impl Default for SliceScene {
    fn default() -> Self {
        Self::new()
    }
}
