//! Contact events exchanged with the physics collaborator.
//!
//! Backends translate their own collision notifications into
//! [`SurfaceContact`] events. The controller emits [`SurfaceChanged`] when a
//! contact switches the active surface.

use bevy::prelude::*;

use crate::surface::SurfaceKind;

/// Whether a contact started or stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The bodies started touching.
    Begin,
    /// The bodies stopped touching.
    End,
}

/// A contact between a controlled character and another body.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceContact {
    /// The controlled character.
    pub entity: Entity,
    /// Begin or end of the contact.
    pub phase: ContactPhase,
    /// Surface of the other body, `None` for untracked bodies.
    pub surface: Option<SurfaceKind>,
}

impl SurfaceContact {
    /// A contact beginning.
    pub fn begin(entity: Entity, surface: Option<SurfaceKind>) -> Self {
        Self {
            entity,
            phase: ContactPhase::Begin,
            surface,
        }
    }

    /// A contact ending.
    pub fn end(entity: Entity, surface: Option<SurfaceKind>) -> Self {
        Self {
            entity,
            phase: ContactPhase::End,
            surface,
        }
    }
}

/// Emitted when a character's active surface changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceChanged {
    /// The controlled character.
    pub entity: Entity,
    /// Surface active before the contact.
    pub previous: SurfaceKind,
    /// Surface active now.
    pub current: SurfaceKind,
}
