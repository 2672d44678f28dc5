//! Interactive axis-aligned slice planes for 3D volume scenes.
//!
//! A slice plane shows a 2D image of a volume, perpendicular to one principal axis at an integer
//! sample position. While a camera orbits the scene freely, a modifier-gated pointer drag slides
//! a plane along its own normal: the point where the plane was grabbed keeps following the
//! pointer as closely as its single degree of freedom allows, across any camera projection.
//!
//! The crate is the interaction core only. Rendering, windowing and volume storage stay outside;
//! they meet this crate at `camera::ViewContext` (camera state per frame), the image-source
//! closures on each `slice::SlicePlane`, and the pointer entry points on
//! `controller::DragController`.

pub mod axis;
pub mod camera;
pub mod controller;
pub mod drag;
pub mod ray;
pub mod rectangle;
pub mod scene;
pub mod slice;
pub mod transform;
