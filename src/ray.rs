//! This module defines a ray

/// Rays with a z direction component smaller than this are treated as parallel to a z plane.
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Copy, Clone)]
/// A ray data structure
pub struct Ray {
    pub origin: nalgebra_glm::Vec3,
    pub dir: nalgebra_glm::Vec3,
}

impl Ray {
    /// Evaluate the ray at parameter `t`
    pub fn at(&self, t: f32) -> nalgebra_glm::Vec3 {
        self.origin + self.dir * t
    }

    /// Parameter at which the ray crosses the plane z = `plane_z`, or `None` when the ray runs
    /// (near) parallel to that plane.
    pub fn z_plane_param(&self, plane_z: f32) -> Option<f32> {
        if self.dir.z.abs() < PARALLEL_EPSILON {
            return None;
        }
        Some((plane_z - self.origin.z) / self.dir.z)
    }
}
