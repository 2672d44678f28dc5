//! This module implements the screen side of the slice math: a viewport mapping normalized device
//! coordinates to y-down pixel coordinates, and the transform between a slice plane's local frame
//! and screen pixels for one camera state.
//!
//! Both directions go through the homogeneous divide. Forward, a local point is carried to clip
//! space and divided by w before the viewport mapping; backward, a pixel is unprojected at the
//! near and far depths (dividing by w at each) to recover a local-frame ray.

use crate::ray::Ray;

#[derive(Debug, Copy, Clone)]
/// The pixel region the scene renders into. Pixel coordinates have their origin at the top-left
/// corner with y growing downward, matching what the windowing layer reports for the pointer.
pub struct Viewport {
    pub size: nalgebra_glm::Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: nalgebra_glm::vec2(width, height),
        }
    }

    /// NDC -> pixel
    pub fn ndc_to_pixel(&self, ndc: nalgebra_glm::Vec2) -> nalgebra_glm::Vec2 {
        nalgebra_glm::vec2(
            (ndc.x + 1.0) * 0.5 * self.size.x,
            (1.0 - ndc.y) * 0.5 * self.size.y,
        )
    }

    /// Pixel -> NDC
    pub fn pixel_to_ndc(&self, pixel: nalgebra_glm::Vec2) -> nalgebra_glm::Vec2 {
        nalgebra_glm::vec2(
            pixel.x / self.size.x * 2.0 - 1.0,
            1.0 - pixel.y / self.size.y * 2.0,
        )
    }
}

#[derive(Debug, Copy, Clone)]
/// Transform between a slice plane's local frame and screen pixels, valid for one camera state
pub struct ScreenTransform {
    forward: nalgebra_glm::Mat4,
    inverse: nalgebra_glm::Mat4,
    viewport: Viewport,
}

impl ScreenTransform {
    /// Build from the combined projection * view * model matrix of the plane's local frame
    pub fn new(proj_view_model: nalgebra_glm::Mat4, viewport: Viewport) -> Self {
        Self {
            forward: proj_view_model,
            inverse: nalgebra_glm::inverse(&proj_view_model),
            viewport,
        }
    }

    /// Project a local-frame point to pixel coordinates, with perspective divide
    pub fn project(&self, local: nalgebra_glm::Vec3) -> nalgebra_glm::Vec2 {
        let clip = self.forward * nalgebra_glm::vec4(local.x, local.y, local.z, 1.0);
        let ndc = clip.xyz() / clip.w;
        self.viewport.ndc_to_pixel(ndc.xy())
    }

    /// Unproject a pixel back to a local-frame ray by mapping it at the near (-1) and far (+1)
    /// clip depths. The ray parameter is therefore ordered front to back, which lets picking use
    /// it directly as a depth key.
    pub fn unproject_ray(&self, pixel: nalgebra_glm::Vec2) -> Ray {
        let ndc = self.viewport.pixel_to_ndc(pixel);
        let near_w = self.inverse * nalgebra_glm::vec4(ndc.x, ndc.y, -1.0, 1.0);
        let far_w = self.inverse * nalgebra_glm::vec4(ndc.x, ndc.y, 1.0, 1.0);
        let near = near_w.xyz() / near_w.w;
        let far = far_w.xyz() / far_w.w;
        Ray {
            origin: near,
            dir: (far - near).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn viewport_round_trips_pixels() {
        let viewport = Viewport::new(800.0, 600.0);
        let pixel = nalgebra_glm::vec2(123.0, 456.0);
        let back = viewport.ndc_to_pixel(viewport.pixel_to_ndc(pixel));
        assert_relative_eq!(back.x, pixel.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, pixel.y, epsilon = 1e-3);
    }

    #[test]
    fn viewport_y_points_down() {
        let viewport = Viewport::new(800.0, 600.0);
        // NDC +y is up, pixel +y is down.
        let top = viewport.ndc_to_pixel(nalgebra_glm::vec2(0.0, 1.0));
        let bottom = viewport.ndc_to_pixel(nalgebra_glm::vec2(0.0, -1.0));
        assert_relative_eq!(top.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(bottom.y, 600.0, epsilon = 1e-3);
    }

    #[test]
    fn unprojected_ray_passes_through_the_projected_point() {
        let proj = nalgebra_glm::perspective(800.0 / 600.0, 0.785, 0.1, 1000.0);
        let view = nalgebra_glm::look_at(
            &nalgebra_glm::vec3(200.0, 200.0, 200.0),
            &nalgebra_glm::vec3(50.0, 50.0, 50.0),
            &nalgebra_glm::vec3(0.0, 0.0, 1.0),
        );
        let tr = ScreenTransform::new(proj * view, Viewport::new(800.0, 600.0));

        let point = nalgebra_glm::vec3(30.0, 70.0, 45.0);
        let ray = tr.unproject_ray(tr.project(point));
        // Distance from the point to the ray should vanish.
        let to_point = point - ray.origin;
        let distance = nalgebra_glm::cross(&to_point, &ray.dir).norm();
        assert!(distance < 1e-2, "point-to-ray distance {}", distance);
    }
}
