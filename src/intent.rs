//! Movement intent component.
//!
//! Intents represent the desired movement from player input or AI. The input
//! phase system reads them once per rendered frame and hands them to the
//! controller.

use bevy::prelude::*;

/// Horizontal movement and jump intent.
///
/// # Example
///
/// ```rust
/// use surface_character_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_horizontal(1.0);
/// assert!(intent.is_moving());
///
/// // A jump fires only on the frame the button goes down
/// intent.set_jump_pressed(true);
/// assert!(intent.take_jump_edge());
/// intent.set_jump_pressed(true);
/// assert!(!intent.take_jump_edge());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Horizontal movement intent (-1.0 = left, 1.0 = right).
    pub horizontal: f32,
    /// Whether the jump action is currently held.
    ///
    /// Set this every frame from your input source. The controller detects the
    /// transition from released to pressed.
    pub jump_pressed: bool,
    /// Previous frame's `jump_pressed` state (for edge detection).
    pub(crate) jump_pressed_prev: bool,
    /// A jump edge reported directly by an input source that already does its
    /// own edge detection.
    pub(crate) jump_requested: bool,
}

impl MovementIntent {
    /// Create a new empty movement intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal direction (-1.0 = left, 1.0 = right).
    pub fn set_horizontal(&mut self, direction: f32) {
        self.horizontal = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Clear horizontal movement.
    pub fn clear(&mut self) {
        self.horizontal = 0.0;
    }

    /// Check if there is active horizontal input.
    pub fn is_moving(&self) -> bool {
        self.horizontal.abs() > 0.001
    }

    /// Set the held state of the jump button.
    ///
    /// ```rust,ignore
    /// intent.set_jump_pressed(keyboard.pressed(KeyCode::Space));
    /// ```
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Check if jump is currently held.
    pub fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Report a jump edge directly, e.g. from `just_pressed`.
    ///
    /// The request is consumed by the next input phase whether or not the
    /// character can jump; it is never buffered.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Consume this frame's jump edge.
    ///
    /// True when the button went from released to pressed since the last call,
    /// or when [`request_jump`](Self::request_jump) was called.
    pub fn take_jump_edge(&mut self) -> bool {
        let edge = (self.jump_pressed && !self.jump_pressed_prev) || self.jump_requested;
        self.jump_pressed_prev = self.jump_pressed;
        self.jump_requested = false;
        edge
    }
}
