//! # `surface_character_controller`
//!
//! A surface-sensitive 2D rigidbody character controller with physics backend
//! abstraction.
//!
//! This crate provides a small, tuneable platformer controller that:
//! - Tracks which ground surface (normal, slippery, sticky) the character stands on
//! - Drives horizontal velocity toward `input * max_speed` with a proportional force
//! - Uses a separate deceleration rate when coming to rest
//! - Jumps by overwriting vertical velocity with the surface's jump force
//! - Abstracts the physics backend (Rapier2D and a headless point-mass backend included)
//!
//! ## Architecture
//!
//! The controller runs in two phases:
//! 1. **Input phase** (`Update`, once per rendered frame): the horizontal axis of
//!    [`MovementIntent`](intent::MovementIntent) is sampled and a jump edge
//!    overwrites vertical velocity if the character is grounded
//! 2. **Physics phase** (`FixedUpdate`, once per simulation step): contact events
//!    update the active surface, then a force `(target - vx) * rate` is applied
//!
//! The surface logic itself lives in [`SurfaceController`](controller::SurfaceController)
//! and can be stepped without Bevy schedules or a physics engine.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use surface_character_controller::prelude::*;
//!
//! let mut app = App::new();
//! app.add_plugins(SurfaceControllerPlugin::<HeadlessBackend>::default());
//!
//! app.world_mut().spawn((
//!     SurfaceController::default(),
//!     ControllerConfig::default(),
//!     HeadlessBody::new(1.0),
//! ));
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod headless;
pub mod intent;
pub mod state;
pub mod surface;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::collision::{ContactPhase, SurfaceChanged, SurfaceContact};
    pub use crate::config::{ControllerConfig, MovementProfile, SurfaceProfiles};
    pub use crate::controller::SurfaceController;
    pub use crate::error::ControllerError;
    pub use crate::headless::{HeadlessBackend, HeadlessBody};
    pub use crate::intent::MovementIntent;
    pub use crate::state::{Airborne, Grounded};
    pub use crate::surface::{Surface, SurfaceKind};
    pub use crate::{SurfaceControllerPlugin, SurfaceControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dSurfaceCharacterBundle};
}

/// System sets for the controller.
///
/// `Input` runs in `Update`. The remaining sets run chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceControllerSet {
    /// Sample intent and apply jumps, once per rendered frame.
    Input,
    /// Validate new controllers and reset per-step backend state.
    Preparation,
    /// Backend collision notifications are turned into contact events.
    Sensors,
    /// Contact events update the active surface.
    Contacts,
    /// The movement force is planned and accumulated.
    Movement,
    /// Accumulated forces are written to the physics engine.
    FinalApplication,
}

/// Main plugin for the surface controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (velocity access, force application, contact reporting).
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use surface_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
///     .add_plugins(SurfaceControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct SurfaceControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for SurfaceControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for SurfaceControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::SurfaceProfiles>();
        app.register_type::<config::MovementProfile>();
        app.register_type::<controller::SurfaceController>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<surface::Surface>();
        app.register_type::<surface::SurfaceKind>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<collision::SurfaceContact>();
        app.add_event::<collision::SurfaceChanged>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                SurfaceControllerSet::Preparation,
                SurfaceControllerSet::Sensors,
                SurfaceControllerSet::Contacts,
                SurfaceControllerSet::Movement,
                SurfaceControllerSet::FinalApplication,
            )
                .chain(),
        );

        // Input phase, once per rendered frame
        app.add_systems(
            Update,
            (
                systems::initialize_controllers::<B>,
                systems::apply_input::<B>,
            )
                .chain()
                .in_set(SurfaceControllerSet::Input),
        );

        // Physics phase in FixedUpdate for consistent physics behavior
        app.add_systems(
            FixedUpdate,
            (
                systems::initialize_controllers::<B>.in_set(SurfaceControllerSet::Preparation),
                systems::track_surface_contacts.in_set(SurfaceControllerSet::Contacts),
                systems::apply_surface_movement::<B>.in_set(SurfaceControllerSet::Movement),
                systems::sync_state_markers.in_set(SurfaceControllerSet::FinalApplication),
            ),
        );
    }
}
