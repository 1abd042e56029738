//! State marker components.
//!
//! These components mirror the grounded flag of a
//! [`SurfaceController`](crate::controller::SurfaceController). They are added
//! and removed automatically after each physics step so other systems can use
//! them as query filters.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use surface_character_controller::prelude::*;
///
/// fn count_grounded(q: Query<(), With<Grounded>>) -> usize {
///     q.iter().count()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
