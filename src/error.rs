//! Controller configuration errors.
//!
//! Runtime operations never fail: unknown surfaces are ignored and every
//! physics step recomputes its output from scratch. The only errors are
//! configuration errors, detected when a controller is spawned.

use bevy::prelude::Entity;
use thiserror::Error;

use crate::surface::SurfaceKind;

/// Fatal configuration error for a character controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// The controlled entity has no physics body the backend can drive.
    #[error("entity {entity} has a surface controller but no physics body")]
    MissingBody {
        /// The controller entity.
        entity: Entity,
    },

    /// A surface profile value is negative or not finite.
    #[error("{surface} profile has invalid {field}: {value}")]
    InvalidProfile {
        /// Surface whose profile is invalid.
        surface: SurfaceKind,
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A global rate constant is negative or not finite.
    #[error("invalid {name} rate: {value}")]
    InvalidRate {
        /// Name of the rate (`acceleration` or `deceleration`).
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}
