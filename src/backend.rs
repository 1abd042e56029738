//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to work with the surface controller. The controller only decides which
//! force or velocity to request; the backend owns integration and collision
//! detection.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// A backend reads and writes the body velocity, applies step forces, and
/// installs whatever systems are needed to turn its collision notifications
/// into [`SurfaceContact`](crate::collision::SurfaceContact) events.
///
/// See [`Rapier2dBackend`](crate::rapier::Rapier2dBackend) (feature
/// `rapier2d`) and [`HeadlessBackend`](crate::headless::HeadlessBackend).
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Whether `entity` has a body this backend can drive.
    fn has_body(world: &World, entity: Entity) -> bool;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Overwrite the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply a force to an entity.
    ///
    /// Force is applied over the current physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        fixed_timestep(world.get_resource::<Time<Fixed>>())
    }

    /// Get the mass of an entity.
    ///
    /// Only used for diagnostics: the movement force does not depend on mass.
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }
}

/// Fixed timestep delta, with fallback for schedules run outside the fixed
/// main loop (e.g. in tests).
pub fn fixed_timestep(time: Option<&Time<Fixed>>) -> f32 {
    time.map(|t| t.delta_secs())
        .filter(|&d| d > 0.0)
        .unwrap_or(1.0 / 60.0)
}
