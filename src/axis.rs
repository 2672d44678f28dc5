//! This module defines the three principal axes a slice plane can be perpendicular to, along with
//! the placement math that embeds a slice's image plane into the 3D volume.
//!
//! A slice image lives in its own local frame: the image spans the local x-y plane and the plane
//! itself sits at local z = 0. `model_matrix` is the pure function that carries that frame into
//! the volume for a given axis and position; nothing mutable is carried between frames.

use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// The principal axis a slice plane is perpendicular aligned to.
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The component index of this axis in a 3D vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis in world coordinates
    pub fn unit(self) -> nalgebra_glm::Vec3 {
        match self {
            Axis::X => nalgebra_glm::vec3(1.0, 0.0, 0.0),
            Axis::Y => nalgebra_glm::vec3(0.0, 1.0, 0.0),
            Axis::Z => nalgebra_glm::vec3(0.0, 0.0, 1.0),
        }
    }

    /// Model matrix placing the slice's local frame (image in local x-y, plane at local z = 0)
    /// into the volume at `position` along this axis.
    ///
    /// The z slice needs no rotation, only a translate. The y and x slices first stand the image
    /// up with quarter-turn rotations, then translate along their axis.
    pub fn model_matrix(self, position: f32) -> nalgebra_glm::Mat4 {
        let x_unit = nalgebra_glm::vec3(1.0, 0.0, 0.0);
        let z_unit = nalgebra_glm::vec3(0.0, 0.0, 1.0);
        match self {
            Axis::Z => nalgebra_glm::translation(&nalgebra_glm::vec3(0.0, 0.0, position)),
            Axis::Y => {
                nalgebra_glm::translation(&nalgebra_glm::vec3(0.0, position, 0.0))
                    * nalgebra_glm::rotation(FRAC_PI_2, &x_unit)
            }
            Axis::X => {
                nalgebra_glm::translation(&nalgebra_glm::vec3(position, 0.0, 0.0))
                    * nalgebra_glm::rotation(FRAC_PI_2, &z_unit)
                    * nalgebra_glm::rotation(FRAC_PI_2, &x_unit)
            }
        }
    }

    /// Sign relating a displacement along the slice's local normal to a displacement along this
    /// world axis, derived from the rotation part of the model matrix rather than hard-coded.
    ///
    /// The y slice's quarter turn about x maps local +z onto world -y, so its sign is -1; the
    /// x and z slices come out at +1.
    pub fn orientation(self) -> f32 {
        let rotated_normal = self.model_matrix(0.0) * nalgebra_glm::vec4(0.0, 0.0, 1.0, 0.0);
        rotated_normal[self.index()].signum()
    }
}
