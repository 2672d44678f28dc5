//! This module implements the Camera structure. Cameras can either be perspective (typical for 3D)
//! or orthographic (useful for measurement-style views), and a `ViewContext` pairs a camera with
//! a viewport to hand out the per-plane screen transforms the drag math runs on.

use crate::axis::Axis;
use crate::transform::{ScreenTransform, Viewport};

#[derive(Debug, Copy, Clone)]
/// Which kind of projection the camera uses.
pub enum ProjectionKind {
    Perspective {
        fov: f32,
        aspect: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for ProjectionKind {
    fn default() -> Self {
        Self::Perspective {
            fov: 0.785,
            aspect: 4.0 / 3.0,
            far: 1000.0,
        }
    }
}

#[derive(Default, Debug, Copy, Clone)]
/// A camera data structure
pub struct Camera {
    position: nalgebra_glm::Vec3,
    lookat: nalgebra_glm::Vec3,
    up: nalgebra_glm::Vec3,
    pub projection_kind: ProjectionKind,

    view_matrix: nalgebra_glm::Mat4,
    proj_matrix: nalgebra_glm::Mat4,
}

impl Camera {
    /// Creates a new camera data structure
    pub fn new(
        position: nalgebra_glm::Vec3,
        lookat: nalgebra_glm::Vec3,
        up: nalgebra_glm::Vec3,
        projection_kind: ProjectionKind,
    ) -> Self {
        let mut retval = Self {
            position,
            lookat,
            up,
            projection_kind,
            view_matrix: nalgebra_glm::identity(),
            proj_matrix: nalgebra_glm::identity(),
        };
        retval.regen_view_proj_matrices();
        retval
    }

    /// Retrieves the camera's view and projection matrices
    pub fn view_proj_matrices(&self) -> (nalgebra_glm::Mat4, nalgebra_glm::Mat4) {
        (self.view_matrix, self.proj_matrix)
    }

    /// Regenerates the camera's view and projection matrices. This is _SLOW_!
    pub fn regen_view_proj_matrices(&mut self) {
        let view_matrix = nalgebra_glm::look_at(&self.position, &self.lookat, &self.up);
        let proj_matrix = match self.projection_kind {
            ProjectionKind::Perspective { fov, aspect, far } => {
                nalgebra_glm::perspective(aspect, fov, 0.1, far)
            }
            ProjectionKind::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => nalgebra_glm::ortho(left, right, bottom, top, near, far),
        };

        self.view_matrix = view_matrix;
        self.proj_matrix = proj_matrix;
    }

    /// Sets the position of the camera. This regenerates the view and projection matrix, so is fairly slow.
    pub fn set_position(&mut self, position: nalgebra_glm::Vec3) {
        self.position = position;
        self.regen_view_proj_matrices()
    }

    /// Sets the lookat of the camera. This regenerates the view and projection matrix, so is fairly slow.
    pub fn set_lookat(&mut self, lookat: nalgebra_glm::Vec3) {
        self.lookat = lookat;
        self.regen_view_proj_matrices()
    }

    /// Retrieves the position of the camera
    pub fn position(&self) -> nalgebra_glm::Vec3 {
        self.position
    }

    /// Retrieves the lookat of the camera
    pub fn lookat(&self) -> nalgebra_glm::Vec3 {
        self.lookat
    }

    /// Retrieves the up direction for the camera
    pub fn up(&self) -> nalgebra_glm::Vec3 {
        self.up
    }
}

#[derive(Debug, Copy, Clone)]
/// A camera paired with the viewport it renders into. This is the piece of camera state the drag
/// math consumes: it can produce, for any slice plane, the local↔screen transform valid for the
/// current frame.
pub struct ViewContext {
    pub camera: Camera,
    pub viewport: Viewport,
}

impl ViewContext {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self { camera, viewport }
    }

    /// The local->screen transform for a slice plane's frame under the current camera state
    pub fn plane_transform(&self, axis: Axis, position: f32) -> ScreenTransform {
        let (view, proj) = self.camera.view_proj_matrices();
        ScreenTransform::new(proj * view * axis.model_matrix(position), self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_transform_projects_plane_points_consistently() {
        let camera = Camera::new(
            nalgebra_glm::vec3(200.0, 200.0, 200.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 0.0, 1.0),
            ProjectionKind::default(),
        );
        let view = ViewContext::new(camera, Viewport::new(800.0, 600.0));

        // The local origin of a z slice at position 40 is the world point (0, 0, 40); the same
        // world point expressed through the world-frame transform must land on the same pixel.
        let plane_tr = view.plane_transform(Axis::Z, 40.0);
        let (view_m, proj_m) = view.camera.view_proj_matrices();
        let world_tr = ScreenTransform::new(proj_m * view_m, view.viewport);

        let from_plane = plane_tr.project(nalgebra_glm::vec3(10.0, 20.0, 0.0));
        let from_world = world_tr.project(nalgebra_glm::vec3(10.0, 20.0, 40.0));
        assert_relative_eq!(from_plane.x, from_world.x, epsilon = 1e-2);
        assert_relative_eq!(from_plane.y, from_world.y, epsilon = 1e-2);
    }

    #[test]
    fn moving_the_camera_regenerates_its_matrices() {
        let mut camera = Camera::new(
            nalgebra_glm::vec3(200.0, 200.0, 200.0),
            nalgebra_glm::vec3(50.0, 50.0, 50.0),
            nalgebra_glm::vec3(0.0, 0.0, 1.0),
            ProjectionKind::default(),
        );
        let (view_before, _) = camera.view_proj_matrices();

        camera.set_position(nalgebra_glm::vec3(89.1, 258.6, 200.0));
        let (view_after, _) = camera.view_proj_matrices();
        assert_ne!(view_before, view_after);
        assert_eq!(camera.position(), nalgebra_glm::vec3(89.1, 258.6, 200.0));

        camera.set_lookat(nalgebra_glm::vec3(60.0, 50.0, 50.0));
        let (view_final, _) = camera.view_proj_matrices();
        assert_ne!(view_after, view_final);
        assert_eq!(camera.lookat(), nalgebra_glm::vec3(60.0, 50.0, 50.0));
    }
}
