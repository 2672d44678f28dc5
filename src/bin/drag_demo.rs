//! Headless demo of the slice-drag interaction.
//!
//! Builds a synthetic volume, puts one slice plane on each axis, and walks a scripted
//! ctrl-drag session against a perspective camera: hover a plane, grab it, pull it five
//! samples along its normal, release. Run with `RUST_LOG=debug` to watch the controller.
//!
//! To run: `cargo run --bin drag_demo`.

use std::rc::Rc;

use log::info;
use rand::{Rng, SeedableRng};

use sliceview::axis::Axis;
use sliceview::camera::{Camera, ProjectionKind, ViewContext};
use sliceview::controller::{DragController, Modifiers, PointerButton, PointerEvent};
use sliceview::scene::{SliceId, SliceScene};
use sliceview::slice::{ImageSourceFn, NodeHandle, SliceError, SliceImage, SlicePlane, SliceRange};
use sliceview::transform::Viewport;

const VOLUME: usize = 100;

/// A reproducible scalar field standing in for real volume data
struct SyntheticVolume {
    noise: Vec<f32>,
}

impl SyntheticVolume {
    fn new(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let noise = (0..VOLUME * VOLUME * VOLUME)
            .map(|_| rng.gen_range(-0.1..0.1))
            .collect();
        Self { noise }
    }

    fn sample(&self, x: usize, y: usize, z: usize) -> f32 {
        let (fx, fy, fz) = (x as f32, y as f32, z as f32);
        let layers = (0.12 * fz + 0.02 * fx).sin() + (0.07 * fy).cos();
        layers + self.noise[(z * VOLUME + y) * VOLUME + x]
    }
}

/// Image-source closure slicing a shared volume perpendicular to `axis`
fn slice_source(volume: Rc<SyntheticVolume>, axis: Axis) -> ImageSourceFn {
    Box::new(move |position| {
        let p = position.clamp(0, VOLUME as i32 - 1) as usize;
        SliceImage::from_fn(VOLUME, VOLUME, |u, v| match axis {
            Axis::X => volume.sample(p, u, v),
            Axis::Y => volume.sample(u, p, v),
            Axis::Z => volume.sample(u, v, p),
        })
    })
}

fn main() -> Result<(), SliceError> {
    env_logger::init();

    let volume = Rc::new(SyntheticVolume::new(42));
    let range = SliceRange::new(0, VOLUME as i32 - 1);

    let mut scene = SliceScene::new();
    scene.add_plane(SlicePlane::new(
        Axis::X,
        30,
        range,
        vec![slice_source(volume.clone(), Axis::X)],
    )?);
    scene.add_plane(SlicePlane::new(
        Axis::Y,
        50,
        range,
        vec![slice_source(volume.clone(), Axis::Y)],
    )?);
    let z_slice = scene.add_plane(SlicePlane::new(
        Axis::Z,
        70,
        range,
        vec![slice_source(volume.clone(), Axis::Z)],
    )?);

    // A real renderer would hand back node ids for the slices it displays.
    for i in 0..scene.len() {
        scene.plane_mut(SliceId(i)).attach_node(NodeHandle(i as u64));
    }

    // Range the camera around the scene, then orbit to an oblique vantage point.
    let bounds = scene.bounds().expect("scene has planes");
    let center = nalgebra_glm::vec3(
        (bounds[0].0 + bounds[0].1) / 2.0,
        (bounds[1].0 + bounds[1].1) / 2.0,
        (bounds[2].0 + bounds[2].1) / 2.0,
    );
    let camera = Camera::new(
        center + nalgebra_glm::vec3(150.0, 150.0, 150.0),
        center,
        nalgebra_glm::vec3(0.0, 0.0, 1.0),
        ProjectionKind::Perspective {
            fov: 0.785,
            aspect: 800.0 / 600.0,
            far: 1000.0,
        },
    );
    let mut view = ViewContext::new(camera, Viewport::new(800.0, 600.0));

    // Orbit a few azimuth steps around the scene before interacting; every drag below reads the
    // camera state of the frame it happens in, so the math holds from any vantage point.
    let orbit_radius = 150.0 * std::f32::consts::SQRT_2;
    for step in 1..=3 {
        let azimuth = std::f32::consts::FRAC_PI_4 + 0.2 * step as f32;
        view.camera.set_position(
            center
                + nalgebra_glm::vec3(
                    orbit_radius * azimuth.cos(),
                    orbit_radius * azimuth.sin(),
                    150.0,
                ),
        );
        view.camera.set_lookat(center);
        info!("orbit step {}: camera at {:?}", step, view.camera.position());
    }

    let mut controller = DragController::new();
    let ctrl = Modifiers { control: true };

    // Hover the z slice, then grab it.
    let grab_pixel = view
        .plane_transform(Axis::Z, scene.plane(z_slice).position() as f32)
        // A grab point on the camera-facing side of the z slice, clear of the other two planes.
        .project(nalgebra_glm::vec3(90.0, 80.0, 0.0));
    controller.on_pointer_move(
        &mut scene,
        &view,
        &PointerEvent {
            pos: grab_pixel,
            button: None,
            modifiers: ctrl,
        },
    );
    controller.on_pointer_down(
        &mut scene,
        &view,
        &PointerEvent {
            pos: grab_pixel,
            button: Some(PointerButton::Primary),
            modifiers: ctrl,
        },
    );
    info!("grabbed z slice at position {}", scene.plane(z_slice).position());

    // Pull the plane five samples along its normal, one move event per sample.
    for step in 1..=5 {
        let plane = scene.plane(z_slice);
        let anchor = plane.anchor().expect("plane is anchored");
        let pointer = view
            .plane_transform(plane.axis(), plane.position() as f32)
            .project(nalgebra_glm::vec3(anchor.x, anchor.y, 1.0));
        controller.on_pointer_move(
            &mut scene,
            &view,
            &PointerEvent {
                pos: pointer,
                button: Some(PointerButton::Primary),
                modifiers: ctrl,
            },
        );
        info!(
            "drag step {}: z slice now at {}",
            step,
            scene.plane(z_slice).position()
        );
    }

    controller.on_pointer_up(
        &mut scene,
        &PointerEvent {
            pos: grab_pixel,
            button: None,
            modifiers: ctrl,
        },
    );
    controller.on_modifier_release(&mut scene);

    // Parameter dump, the way an interactive canvas would print it on request.
    println!("===== All useful parameters ====");
    println!("Canvas size = {:?}", (view.viewport.size.x, view.viewport.size.y));
    println!("Camera:");
    println!(" - position = {:?}", view.camera.position());
    println!(" - lookat = {:?}", view.camera.lookat());
    println!(" - up = {:?}", view.camera.up());
    println!("Slices:");
    for (id, plane) in scene.iter() {
        println!(" - {:?} {:?}: pos {}", id, plane.axis(), plane.position());
    }
    Ok(())
}
