//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! Collision begin/end notifications come from Rapier's [`CollisionEvent`]s, so
//! the character's collider needs [`ActiveEvents::COLLISION_EVENTS`] (included in
//! [`Rapier2dSurfaceCharacterBundle`]). Run Rapier in the fixed schedule
//! (`RapierPhysicsPlugin::in_fixed_schedule`) so the controller force is applied
//! for exactly one simulation step.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use crate::backend::CharacterPhysicsBackend;
use crate::collision::{ContactPhase, SurfaceContact};
use crate::controller::SurfaceController;
use crate::surface::Surface;
use crate::SurfaceControllerSet;

/// Rapier2D physics backend for the surface controller.
///
/// Velocity is read from and written to [`Velocity`]. Movement forces are
/// accumulated on the [`SurfaceController`] and written to [`ExternalForce`] at
/// the end of the step, without disturbing forces added by other systems.
pub struct Rapier2dBackend;

impl CharacterPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn has_body(world: &World, entity: Entity) -> bool {
        matches!(world.get::<RigidBody>(entity), Some(RigidBody::Dynamic))
            && world.get::<Velocity>(entity).is_some()
            && world.get::<ExternalForce>(entity).is_some()
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Accumulate into the controller; apply_controller_forces writes it out
        if let Some(mut controller) = world.get_mut::<SurfaceController>(entity) {
            controller.add_force(force);
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        // Mass is zero until Rapier has computed it from the collider
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.mass)
            .filter(|&mass| mass > 0.0 && mass.is_finite())
            .unwrap_or(1.0)
    }
}

/// Plugin that sets up Rapier2D-specific systems for the surface controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // No-op when RapierPhysicsPlugin has already registered it
        app.add_event::<CollisionEvent>();

        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(SurfaceControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            forward_collision_events.in_set(SurfaceControllerSet::Sensors),
        );
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(SurfaceControllerSet::FinalApplication),
        );
    }
}

/// Translate Rapier collision events involving a controlled character into
/// [`SurfaceContact`] events.
///
/// Rapier reports collider entities. A collider that carries neither the
/// controller nor a [`Surface`] is resolved to the body that owns it, through
/// [`ColliderParent`] or else the hierarchy [`Parent`].
///
/// The surface comes from the other body's [`Surface`] component; bodies
/// without one produce untracked contacts. Sensor overlaps are ignored.
pub fn forward_collision_events(
    mut collisions: EventReader<CollisionEvent>,
    q_controllers: Query<(), With<SurfaceController>>,
    q_surfaces: Query<&Surface>,
    q_collider_parents: Query<&ColliderParent>,
    q_parents: Query<&Parent>,
    mut contacts: EventWriter<SurfaceContact>,
) {
    let owner = |collider: Entity| {
        q_collider_parents
            .get(collider)
            .map(ColliderParent::get)
            .or_else(|_| q_parents.get(collider).map(Parent::get))
            .unwrap_or(collider)
    };

    for event in collisions.read() {
        let (a, b, flags, phase) = match *event {
            CollisionEvent::Started(a, b, flags) => (a, b, flags, ContactPhase::Begin),
            CollisionEvent::Stopped(a, b, flags) => (a, b, flags, ContactPhase::End),
        };

        if flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }

        for (collider, other) in [(a, b), (b, a)] {
            let character = if q_controllers.contains(collider) {
                collider
            } else {
                owner(collider)
            };
            if !q_controllers.contains(character) {
                continue;
            }

            let surface = q_surfaces
                .get(other)
                .or_else(|_| q_surfaces.get(owner(other)))
                .ok()
                .map(Surface::kind);

            contacts.send(SurfaceContact {
                entity: character,
                phase,
                surface,
            });
        }
    }
}

/// Remove the force applied by the controller during the previous step.
pub fn clear_controller_forces(mut q: Query<(&mut ExternalForce, &mut SurfaceController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let previous = controller.prepare_new_frame();
        ext_force.force -= previous;
    }
}

/// Write the forces accumulated this step to [`ExternalForce`].
pub fn apply_controller_forces(mut q: Query<(&mut ExternalForce, &mut SurfaceController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let force = controller.finalize_frame();
        ext_force.force += force;
    }
}

/// Bundle for creating a surface-controlled character with Rapier2D physics.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use surface_character_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 100.0, 0.0),
///         SurfaceController::default(),
///         ControllerConfig::default(),
///         Rapier2dSurfaceCharacterBundle::rotation_locked(),
///         Collider::capsule_y(0.5, 0.25),
///     ));
/// }
///
/// fn spawn_ice(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, -1.0, 0.0),
///         RigidBody::Fixed,
///         Collider::cuboid(10.0, 0.5),
///         Surface::slippery(),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `velocity`: Zero velocity
/// - `external_force`: Zero force (controller force is added each step)
/// - `locked_axes`: Empty (no axes locked, rotation enabled)
/// - `active_events`: [`ActiveEvents::COLLISION_EVENTS`]
/// - `mass_properties`: Default (computed by Rapier from collider)
#[derive(Bundle)]
pub struct Rapier2dSurfaceCharacterBundle {
    /// The rigid body type. Must be [`RigidBody::Dynamic`] for the controller to accept it.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Updated by Rapier each physics step.
    pub velocity: Velocity,
    /// Forces applied this step. The controller adds its movement force here.
    pub external_force: ExternalForce,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Enables the collision events used for surface tracking.
    pub active_events: ActiveEvents,
    /// Computed mass properties, used for the overshoot diagnostic.
    pub mass_properties: ReadMassProperties,
}

impl Default for Rapier2dSurfaceCharacterBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier2dSurfaceCharacterBundle {
    /// Create a new character bundle with rotation enabled.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            locked_axes: LockedAxes::empty(),
            active_events: ActiveEvents::COLLISION_EVENTS,
            mass_properties: ReadMassProperties::default(),
        }
    }

    /// Create a character bundle with rotation locked.
    ///
    /// This is the most common configuration for 2D platformers.
    pub fn rotation_locked() -> Self {
        Self {
            locked_axes: LockedAxes::ROTATION_LOCKED,
            ..Self::new()
        }
    }

    /// Set which axes should be locked for the rigid body.
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }
}
