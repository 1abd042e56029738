//! Surface controller state and the engine-neutral stepping interface.
//!
//! [`SurfaceController`] owns all mutable controller state. Its methods take
//! plain values and return the force or velocity the host should apply, so the
//! controller can be stepped without a physics engine:
//!
//! - [`on_collision_begin`](SurfaceController::on_collision_begin) /
//!   [`on_collision_end`](SurfaceController::on_collision_end): surface tracking
//! - [`on_input_sample`](SurfaceController::on_input_sample): once per input frame,
//!   may return a jump velocity override
//! - [`on_physics_step`](SurfaceController::on_physics_step): once per fixed step,
//!   returns the horizontal movement force
//!
//! ```rust
//! use bevy::prelude::*;
//! use surface_character_controller::prelude::*;
//!
//! let config = ControllerConfig::default();
//! let mut controller = SurfaceController::new(&config);
//!
//! controller.on_collision_begin(&config, Some(SurfaceKind::Slippery));
//! let jump = controller.on_input_sample(1.0, true, Vec2::new(2.0, -3.0));
//! assert_eq!(jump, Some(Vec2::new(2.0, 12.0)));
//!
//! let force = controller.on_physics_step(&config, Vec2::ZERO);
//! assert_eq!(force, Vec2::new(80.0, 0.0));
//! ```

use bevy::prelude::*;

use crate::config::{ControllerConfig, MovementProfile};
use crate::intent::MovementIntent;
use crate::surface::SurfaceKind;

/// Core surface controller component.
///
/// # Surface tracking
///
/// A contact beginning on a tracked surface grounds the character and makes that
/// surface active (last write wins, overlapping contacts are not counted). A
/// contact ending on a tracked surface un-grounds the character but keeps the
/// active surface, so airborne movement uses the last touched surface.
///
/// The active surface and its [`MovementProfile`] are always assigned together.
///
/// Spawning this component also inserts a default [`ControllerConfig`] and
/// [`MovementIntent`] when they are missing.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
#[require(ControllerConfig, MovementIntent)]
pub struct SurfaceController {
    grounded: bool,
    active_surface: SurfaceKind,
    profile: MovementProfile,
    /// Latest horizontal input in `[-1, 1]`, consumed by the next physics step.
    horizontal_input: f32,
    /// Velocity read from the body during the last physics step.
    velocity: Vec2,

    // === Force accumulation (used by backends) ===
    /// Forces accumulated during the current physics step.
    pub(crate) pending_force: Vec2,
    /// Force written to the body at the end of the previous physics step.
    pub(crate) applied_force: Vec2,

    /// Set once the overshoot warning has been logged for this controller.
    pub(crate) overshoot_reported: bool,
    /// Set once the plugin has validated this controller's configuration and body.
    pub(crate) initialized: bool,
}

impl Default for SurfaceController {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

impl SurfaceController {
    /// Create an airborne controller on [`SurfaceKind::Normal`].
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            grounded: false,
            active_surface: SurfaceKind::Normal,
            profile: config.profile(SurfaceKind::Normal),
            horizontal_input: 0.0,
            velocity: Vec2::ZERO,
            pending_force: Vec2::ZERO,
            applied_force: Vec2::ZERO,
            overshoot_reported: false,
            initialized: false,
        }
    }

    /// Whether the character currently touches tracked ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The last surface touched while grounded.
    #[inline]
    pub fn active_surface(&self) -> SurfaceKind {
        self.active_surface
    }

    /// The movement profile of the active surface.
    #[inline]
    pub fn profile(&self) -> MovementProfile {
        self.profile
    }

    /// Current maximum horizontal speed.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.profile.max_speed
    }

    /// Current jump velocity.
    #[inline]
    pub fn jump_force(&self) -> f32 {
        self.profile.jump_force
    }

    /// Latest sampled horizontal input.
    #[inline]
    pub fn horizontal_input(&self) -> f32 {
        self.horizontal_input
    }

    /// Velocity observed during the last physics step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Horizontal speed the controller is driving toward.
    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.horizontal_input * self.profile.max_speed
    }

    /// Re-derive the profile of the active surface from `config`.
    ///
    /// Called when a controller is attached to an entity, since the component
    /// may have been constructed with a different config.
    pub fn sync_profile(&mut self, config: &ControllerConfig) {
        self.set_surface(config, self.active_surface);
    }

    fn set_surface(&mut self, config: &ControllerConfig, surface: SurfaceKind) {
        self.active_surface = surface;
        self.profile = config.profile(surface);
    }

    /// Handle a contact beginning.
    ///
    /// `None` is an untracked body and leaves the state untouched. Returns the
    /// previously active surface if the active surface changed.
    pub fn on_collision_begin(
        &mut self,
        config: &ControllerConfig,
        surface: Option<SurfaceKind>,
    ) -> Option<SurfaceKind> {
        let surface = surface?;
        let previous = self.active_surface;

        self.grounded = true;
        self.set_surface(config, surface);

        (previous != surface).then_some(previous)
    }

    /// Handle a contact ending.
    ///
    /// Leaving any tracked surface un-grounds the character. The active surface
    /// and its profile are kept until the next contact begins.
    pub fn on_collision_end(&mut self, surface: Option<SurfaceKind>) {
        if surface.is_some() {
            self.grounded = false;
        }
    }

    /// Sample input for this frame.
    ///
    /// Stores `axis` for the next physics step. When `jump_edge` fires while
    /// grounded, returns `velocity` with its vertical component replaced by the
    /// active jump force. Airborne jump requests are dropped.
    pub fn on_input_sample(&mut self, axis: f32, jump_edge: bool, velocity: Vec2) -> Option<Vec2> {
        self.horizontal_input = if axis.is_finite() {
            axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        if jump_edge && self.grounded {
            Some(Vec2::new(velocity.x, self.profile.jump_force))
        } else {
            None
        }
    }

    /// Plan the movement force for one physics step.
    ///
    /// Returns `(error * rate, 0)` where `error` is the gap between the target
    /// speed and the current horizontal velocity. The force is meant to be
    /// applied over the whole step, not as an impulse.
    pub fn on_physics_step(&mut self, config: &ControllerConfig, velocity: Vec2) -> Vec2 {
        self.velocity = velocity;

        let target = self.target_speed();
        let error = target - velocity.x;
        let rate = config.rate_for(target);

        Vec2::new(error * rate, 0.0)
    }

    /// Accumulate a force to be written to the body at the end of the step.
    pub fn add_force(&mut self, force: Vec2) {
        self.pending_force += force;
    }

    /// Start a new physics step.
    ///
    /// Returns the force applied during the previous step, so backends can remove
    /// it from the body before applying the new one.
    pub(crate) fn prepare_new_frame(&mut self) -> Vec2 {
        self.pending_force = Vec2::ZERO;
        std::mem::take(&mut self.applied_force)
    }

    /// Finish the physics step, returning the force to apply.
    pub(crate) fn finalize_frame(&mut self) -> Vec2 {
        self.applied_force = std::mem::take(&mut self.pending_force);
        self.applied_force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_on(config: &ControllerConfig, surface: SurfaceKind) -> SurfaceController {
        let mut controller = SurfaceController::new(config);
        controller.on_collision_begin(config, Some(surface));
        controller
    }

    #[test]
    fn new_controller_is_airborne_on_normal() {
        let config = ControllerConfig::default();
        let controller = SurfaceController::new(&config);
        assert!(!controller.is_grounded());
        assert_eq!(controller.active_surface(), SurfaceKind::Normal);
        assert_eq!(controller.max_speed(), 5.0);
        assert_eq!(controller.jump_force(), 10.0);
    }

    #[test]
    fn begin_grounds_and_selects_profile() {
        let config = ControllerConfig::default();
        let controller = grounded_on(&config, SurfaceKind::Sticky);
        assert!(controller.is_grounded());
        assert_eq!(controller.active_surface(), SurfaceKind::Sticky);
        assert_eq!(controller.profile(), config.profile(SurfaceKind::Sticky));
    }

    #[test]
    fn begin_reports_previous_surface_only_on_change() {
        let config = ControllerConfig::default();
        let mut controller = SurfaceController::new(&config);

        assert_eq!(controller.on_collision_begin(&config, Some(SurfaceKind::Normal)), None);
        assert_eq!(
            controller.on_collision_begin(&config, Some(SurfaceKind::Slippery)),
            Some(SurfaceKind::Normal)
        );
        assert_eq!(controller.on_collision_begin(&config, Some(SurfaceKind::Slippery)), None);
    }

    #[test]
    fn untracked_contacts_are_ignored() {
        let config = ControllerConfig::default();
        let mut controller = grounded_on(&config, SurfaceKind::Slippery);

        assert_eq!(controller.on_collision_begin(&config, None), None);
        controller.on_collision_end(None);

        assert!(controller.is_grounded());
        assert_eq!(controller.active_surface(), SurfaceKind::Slippery);
    }

    #[test]
    fn end_keeps_active_surface() {
        let config = ControllerConfig::default();
        let mut controller = grounded_on(&config, SurfaceKind::Sticky);

        controller.on_collision_end(Some(SurfaceKind::Sticky));

        assert!(!controller.is_grounded());
        assert_eq!(controller.active_surface(), SurfaceKind::Sticky);
        assert_eq!(controller.max_speed(), 3.0);
        assert_eq!(controller.jump_force(), 7.0);
    }

    #[test]
    fn end_of_other_surface_still_ungrounds() {
        // No contact counting: leaving any tracked surface clears grounded
        let config = ControllerConfig::default();
        let mut controller = grounded_on(&config, SurfaceKind::Normal);
        controller.on_collision_begin(&config, Some(SurfaceKind::Slippery));

        controller.on_collision_end(Some(SurfaceKind::Normal));

        assert!(!controller.is_grounded());
        assert_eq!(controller.active_surface(), SurfaceKind::Slippery);
    }

    #[test]
    fn input_is_clamped() {
        let mut controller = SurfaceController::default();
        controller.on_input_sample(3.0, false, Vec2::ZERO);
        assert_eq!(controller.horizontal_input(), 1.0);
        controller.on_input_sample(-2.0, false, Vec2::ZERO);
        assert_eq!(controller.horizontal_input(), -1.0);
        controller.on_input_sample(f32::NAN, false, Vec2::ZERO);
        assert_eq!(controller.horizontal_input(), 0.0);
    }

    #[test]
    fn grounded_jump_overwrites_vertical_velocity() {
        let config = ControllerConfig::default();
        for surface in SurfaceKind::ALL {
            let mut controller = grounded_on(&config, surface);
            for vy in [-20.0, 0.0, 4.5] {
                let jump = controller.on_input_sample(0.0, true, Vec2::new(3.5, vy));
                assert_eq!(jump, Some(Vec2::new(3.5, config.profile(surface).jump_force)));
            }
        }
    }

    #[test]
    fn airborne_jump_is_dropped() {
        let config = ControllerConfig::default();
        let mut controller = grounded_on(&config, SurfaceKind::Slippery);
        controller.on_collision_end(Some(SurfaceKind::Slippery));

        assert_eq!(controller.on_input_sample(1.0, true, Vec2::new(1.0, -2.0)), None);
    }

    #[test]
    fn jump_requires_edge() {
        let config = ControllerConfig::default();
        let mut controller = grounded_on(&config, SurfaceKind::Normal);
        assert_eq!(controller.on_input_sample(0.0, false, Vec2::ZERO), None);
    }

    #[test]
    fn physics_step_uses_acceleration_toward_target() {
        let config = ControllerConfig::default().with_rates(10.0, 4.0);
        let mut controller = grounded_on(&config, SurfaceKind::Normal);
        controller.on_input_sample(1.0, false, Vec2::ZERO);

        let force = controller.on_physics_step(&config, Vec2::new(2.0, -1.0));

        // (5 - 2) * 10
        assert_eq!(force, Vec2::new(30.0, 0.0));
        assert_eq!(controller.velocity(), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn physics_step_uses_deceleration_at_rest() {
        let config = ControllerConfig::default().with_rates(10.0, 4.0);
        let mut controller = grounded_on(&config, SurfaceKind::Normal);
        controller.on_input_sample(0.0, false, Vec2::ZERO);

        let force = controller.on_physics_step(&config, Vec2::new(-3.0, 0.0));

        // (0 - (-3)) * 4
        assert_eq!(force, Vec2::new(12.0, 0.0));
    }

    #[test]
    fn force_is_not_clamped() {
        let config = ControllerConfig::default().with_acceleration(1000.0);
        let mut controller = grounded_on(&config, SurfaceKind::Slippery);
        controller.on_input_sample(-1.0, false, Vec2::ZERO);

        let force = controller.on_physics_step(&config, Vec2::new(50.0, 0.0));
        assert_eq!(force, Vec2::new((-8.0 - 50.0) * 1000.0, 0.0));
    }

    #[test]
    fn sync_profile_follows_config() {
        let custom = ControllerConfig::default()
            .with_profile(SurfaceKind::Normal, MovementProfile::new(9.0, 1.0));
        let mut controller = SurfaceController::default();
        controller.sync_profile(&custom);
        assert_eq!(controller.max_speed(), 9.0);
        assert_eq!(controller.jump_force(), 1.0);
    }

    #[test]
    fn force_accumulation_lifecycle() {
        let mut controller = SurfaceController::default();

        assert_eq!(controller.prepare_new_frame(), Vec2::ZERO);
        controller.add_force(Vec2::new(1.0, 0.0));
        controller.add_force(Vec2::new(2.0, 0.5));
        assert_eq!(controller.finalize_frame(), Vec2::new(3.0, 0.5));

        // Next frame returns what was applied and starts empty
        assert_eq!(controller.prepare_new_frame(), Vec2::new(3.0, 0.5));
        assert_eq!(controller.finalize_frame(), Vec2::ZERO);
    }
}
