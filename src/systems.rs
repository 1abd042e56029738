//! Core controller systems.
//!
//! These systems drive [`SurfaceController`] from the Bevy schedule. They are
//! generic over the physics backend to allow different physics engines to be
//! used.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::collision::{ContactPhase, SurfaceChanged, SurfaceContact};
use crate::config::ControllerConfig;
use crate::controller::SurfaceController;
use crate::error::ControllerError;
use crate::intent::MovementIntent;
use crate::state::{Airborne, Grounded};

/// Check newly spawned controllers and derive their initial profile.
///
/// A controller without a drivable body or with an invalid configuration is a
/// fatal configuration error: this system logs it and panics instead of letting
/// the controller silently do nothing.
pub fn initialize_controllers<B: CharacterPhysicsBackend>(world: &mut World) {
    let pending: Vec<(Entity, ControllerConfig)> = world
        .query::<(Entity, &SurfaceController, &ControllerConfig)>()
        .iter(world)
        .filter(|(_, controller, _)| !controller.initialized)
        .map(|(e, _, config)| (e, *config))
        .collect();

    for (entity, config) in pending {
        let checked = match config.validate() {
            Ok(()) if !B::has_body(world, entity) => Err(ControllerError::MissingBody { entity }),
            other => other,
        };

        if let Err(err) = checked {
            error!("surface controller configuration error: {err}");
            panic!("{err}");
        }

        if let Some(mut controller) = world.get_mut::<SurfaceController>(entity) {
            controller.sync_profile(&config);
            controller.initialized = true;
        }
    }
}

/// Input phase: sample intent and apply jump overrides.
///
/// Runs once per rendered frame. The horizontal input is stored for the next
/// physics step; a jump edge while grounded overwrites the vertical velocity.
pub fn apply_input<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, (With<SurfaceController>, With<MovementIntent>)>()
        .iter(world)
        .collect();

    for entity in entities {
        let Some((axis, jump_edge)) = world
            .get_mut::<MovementIntent>(entity)
            .map(|mut intent| (intent.horizontal, intent.take_jump_edge()))
        else {
            continue;
        };

        let velocity = B::get_velocity(world, entity);

        let Some((jump, surface)) = world
            .get_mut::<SurfaceController>(entity)
            .map(|mut controller| {
                let jump = controller.on_input_sample(axis, jump_edge, velocity);
                (jump, controller.active_surface())
            })
        else {
            continue;
        };

        match jump {
            Some(new_velocity) => {
                debug!(
                    "{entity}: jump on {surface} surface, vertical velocity {}",
                    new_velocity.y
                );
                B::set_velocity(world, entity, new_velocity);
            }
            None if jump_edge => trace!("{entity}: jump ignored while airborne"),
            None => {}
        }
    }
}

/// Apply contact events to the surface state.
///
/// Runs before movement in the same physics step, so the new surface
/// parameters are used immediately.
pub fn track_surface_contacts(
    mut contacts: EventReader<SurfaceContact>,
    mut q_controllers: Query<(&mut SurfaceController, &ControllerConfig)>,
    mut changed: EventWriter<SurfaceChanged>,
) {
    for contact in contacts.read() {
        let Ok((mut controller, config)) = q_controllers.get_mut(contact.entity) else {
            continue;
        };

        match contact.phase {
            ContactPhase::Begin => {
                let previous = controller.on_collision_begin(config, contact.surface);
                if let Some(surface) = contact.surface {
                    debug!("{}: current surface: {surface}", contact.entity);
                }
                if let Some(previous) = previous {
                    changed.send(SurfaceChanged {
                        entity: contact.entity,
                        previous,
                        current: controller.active_surface(),
                    });
                }
            }
            ContactPhase::End => controller.on_collision_end(contact.surface),
        }
    }
}

/// Physics phase: plan and apply the horizontal movement force.
pub fn apply_surface_movement<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig)> = world
        .query::<(Entity, &SurfaceController, &ControllerConfig)>()
        .iter(world)
        .map(|(e, _, config)| (e, *config))
        .collect();

    let dt = B::get_fixed_timestep(world);

    for (entity, config) in entities {
        let velocity = B::get_velocity(world, entity);
        let mass = B::get_mass(world, entity);

        let Some(force) = world
            .get_mut::<SurfaceController>(entity)
            .map(|mut controller| {
                if !controller.overshoot_reported && !config.converges_without_overshoot(mass, dt)
                {
                    controller.overshoot_reported = true;
                    warn!(
                        "{entity}: movement rates (acceleration {}, deceleration {}) overshoot \
                         for mass {mass} at step {dt}s",
                        config.acceleration, config.deceleration
                    );
                }
                controller.on_physics_step(&config, velocity)
            })
        else {
            continue;
        };

        B::apply_force(world, entity, force);
    }
}

/// Sync [`Grounded`]/[`Airborne`] markers with the controller state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &SurfaceController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        if controller.is_grounded() && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !controller.is_grounded() && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}
