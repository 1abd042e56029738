//! Headless physics backend.
//!
//! A minimal point-mass body integrated with explicit Euler, for running the
//! controller without a physics engine (dedicated servers, replays, tests).
//! There is no collision detection: contacts are reported by sending
//! [`SurfaceContact`](crate::collision::SurfaceContact) events directly.

use bevy::prelude::*;

use crate::backend::{fixed_timestep, CharacterPhysicsBackend};
use crate::SurfaceControllerSet;

/// Point-mass body driven by the headless backend.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct HeadlessBody {
    /// World position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Body mass, must be positive.
    pub mass: f32,
    /// Constant acceleration applied every step.
    pub gravity: Vec2,
    /// Force accumulated for the current step.
    force: Vec2,
}

impl Default for HeadlessBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass: 1.0,
            gravity: Vec2::ZERO,
            force: Vec2::ZERO,
        }
    }
}

impl HeadlessBody {
    /// Create a body with the given mass.
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            ..default()
        }
    }

    /// Builder: set initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Whether the body has a positive, finite mass and can be integrated.
    pub fn has_valid_mass(&self) -> bool {
        self.mass > 0.0 && self.mass.is_finite()
    }

    /// Force accumulated so far this step.
    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    /// Add a force for the current step.
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Advance one step and clear the accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        let acceleration = self.force / self.mass + self.gravity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        self.force = Vec2::ZERO;
    }
}

/// Backend driving [`HeadlessBody`] components.
pub struct HeadlessBackend;

impl CharacterPhysicsBackend for HeadlessBackend {
    fn plugin() -> impl Plugin {
        HeadlessBackendPlugin
    }

    fn has_body(world: &World, entity: Entity) -> bool {
        world
            .get::<HeadlessBody>(entity)
            .is_some_and(HeadlessBody::has_valid_mass)
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<HeadlessBody>(entity)
            .map(|b| b.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            body.add_force(force);
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        world
            .get::<HeadlessBody>(entity)
            .map(|b| b.mass)
            .unwrap_or(1.0)
    }
}

/// Plugin that integrates headless bodies after the controller has applied
/// its forces.
pub struct HeadlessBackendPlugin;

impl Plugin for HeadlessBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HeadlessBody>();
        app.add_systems(
            FixedUpdate,
            integrate_headless_bodies.after(SurfaceControllerSet::FinalApplication),
        );
    }
}

/// Integrate every [`HeadlessBody`] by one fixed step.
///
/// Bodies without a valid mass are static: they are not moved and their
/// pending force is dropped.
pub fn integrate_headless_bodies(time: Option<Res<Time<Fixed>>>, mut q: Query<&mut HeadlessBody>) {
    let dt = fixed_timestep(time.as_deref());
    for mut body in &mut q {
        if body.has_valid_mass() {
            body.integrate(dt);
        } else {
            body.force = Vec2::ZERO;
        }
    }
}
