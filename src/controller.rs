//! This module implements the selection controller: the per-canvas state machine that turns raw
//! pointer and modifier events into hover highlights and normal-constrained slice drags.
//!
//! All interaction is gated on either a held modifier key or an explicit drag-mode toggle, so the
//! camera keeps pointer control the rest of the time. The machine has three states: idle, hovering
//! one plane, or dragging one plane; only one plane can drag at a time.

use log::debug;

use crate::camera::ViewContext;
use crate::drag;
use crate::scene::{SliceId, SliceScene};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// A pointer button
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
/// Modifier keys held during an event
pub struct Modifiers {
    pub control: bool,
}

#[derive(Debug, Copy, Clone)]
/// A pointer event as delivered by the windowing layer. `button` carries the pressed button for
/// press events and the held button, if any, for move events.
pub struct PointerEvent {
    pub pos: nalgebra_glm::Vec2,
    pub button: Option<PointerButton>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// The controller's current interaction state
pub enum ControllerState {
    Idle,
    Hovering(SliceId),
    Dragging(SliceId),
}

#[derive(Debug, Default)]
/// The per-canvas selection/hover/drag state machine
pub struct DragController {
    drag_mode: bool,
    hovered: Option<SliceId>,
    selected: Option<SliceId>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        if let Some(id) = self.selected {
            ControllerState::Dragging(id)
        } else if let Some(id) = self.hovered {
            ControllerState::Hovering(id)
        } else {
            ControllerState::Idle
        }
    }

    pub fn hovered(&self) -> Option<SliceId> {
        self.hovered
    }

    pub fn selected(&self) -> Option<SliceId> {
        self.selected
    }

    pub fn drag_mode(&self) -> bool {
        self.drag_mode
    }

    /// Whether the interaction gate is open for an event with these modifiers
    fn gated(&self, modifiers: Modifiers) -> bool {
        modifiers.control || self.drag_mode
    }

    /// Hit-test with the enclosing view's generic interactive mask dropped for the duration of
    /// the query, so the view widget cannot shadow the slices, and restored afterwards.
    fn pick_unmasked(
        &self,
        scene: &mut SliceScene,
        view: &ViewContext,
        pixel: nalgebra_glm::Vec2,
    ) -> Option<SliceId> {
        scene.set_view_interactive(false);
        let hit = scene.pick(view, pixel);
        scene.set_view_interactive(true);
        hit
    }

    /// Primary press over a plane grabs it: the anchor is set where the click ray meets the
    /// plane and the plane becomes the drag target. A press while a drag is already active, or
    /// whose click ray is degenerate (parallel to the plane), changes nothing.
    pub fn on_pointer_down(
        &mut self,
        scene: &mut SliceScene,
        view: &ViewContext,
        event: &PointerEvent,
    ) {
        if !self.gated(event.modifiers) {
            return;
        }
        let hit = self.pick_unmasked(scene, view, event.pos);

        if event.button == Some(PointerButton::Primary) && self.selected.is_none() {
            if let Some(id) = hit {
                let plane = scene.plane_mut(id);
                let tr = view.plane_transform(plane.axis(), plane.position() as f32);
                if drag::set_anchor(plane, &tr, event.pos) {
                    plane.highlight_visible = true;
                    self.selected = Some(id);
                    debug!("drag start on {:?}", id);
                }
            }
        }
    }

    /// With the primary button held and a drag target selected, solve the drag and commit the
    /// new position. Otherwise maintain the hover highlight, handing it from the previously
    /// hovered plane to whatever is now under the pointer.
    pub fn on_pointer_move(
        &mut self,
        scene: &mut SliceScene,
        view: &ViewContext,
        event: &PointerEvent,
    ) {
        if !self.gated(event.modifiers) {
            return;
        }

        if event.button == Some(PointerButton::Primary) {
            if let Some(id) = self.selected {
                let plane = scene.plane_mut(id);
                let tr = view.plane_transform(plane.axis(), plane.position() as f32);
                if drag::drag_to(plane, &tr, event.pos).is_some() {
                    plane.commit_drag();
                }
            }
        } else {
            let hit = self.pick_unmasked(scene, view, event.pos);
            if hit != self.hovered {
                if let Some(previous) = self.hovered {
                    scene.plane_mut(previous).highlight_visible = false;
                }
                self.hovered = hit;
                if let Some(id) = self.hovered {
                    scene.plane_mut(id).highlight_visible = true;
                }
            }
        }
    }

    /// Releasing the primary button ends the drag: the anchor is dropped and the highlight
    /// returns to its default state.
    pub fn on_pointer_up(&mut self, scene: &mut SliceScene, event: &PointerEvent) {
        if !self.gated(event.modifiers) {
            return;
        }
        if let Some(id) = self.selected.take() {
            let plane = scene.plane_mut(id);
            plane.clear_anchor();
            plane.highlight_visible = false;
            if self.hovered == Some(id) {
                self.hovered = None;
            }
            debug!("drag end on {:?}", id);
        }
    }

    /// Releasing the gating modifier aborts the interaction from any state, even mid-drag
    pub fn on_modifier_release(&mut self, scene: &mut SliceScene) {
        self.exit_drag_interaction(scene);
    }

    /// Latch or release the explicit drag mode (interaction without the held modifier).
    /// Releasing it also aborts any interaction in progress.
    pub fn toggle_drag_mode(&mut self, scene: &mut SliceScene) -> bool {
        self.drag_mode = !self.drag_mode;
        if !self.drag_mode {
            self.exit_drag_interaction(scene);
        }
        debug!("drag mode {}", if self.drag_mode { "on" } else { "off" });
        self.drag_mode
    }

    fn exit_drag_interaction(&mut self, scene: &mut SliceScene) {
        if let Some(id) = self.hovered.take() {
            scene.plane_mut(id).highlight_visible = false;
        }
        if let Some(id) = self.selected.take() {
            let plane = scene.plane_mut(id);
            plane.highlight_visible = false;
            plane.clear_anchor();
        }
    }
}
