//! Surface classification.
//!
//! Level bodies carry a [`Surface`] component naming the kind of ground they
//! represent. Contacts with bodies that have no [`Surface`] are untracked and
//! never change controller state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The kind of ground a character can stand on.
///
/// Each kind selects one [`MovementProfile`](crate::config::MovementProfile)
/// from the controller configuration.
#[derive(
    Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum SurfaceKind {
    /// Regular ground.
    #[default]
    Normal,
    /// Low-friction ground: faster movement, higher jumps.
    Slippery,
    /// High-friction ground: slower movement, lower jumps.
    Sticky,
}

impl SurfaceKind {
    /// All surface kinds, in profile order.
    pub const ALL: [SurfaceKind; 3] = [Self::Normal, Self::Slippery, Self::Sticky];

    /// Map a level tag name to a surface kind.
    ///
    /// `"Ground"` maps to [`SurfaceKind::Normal`]. Any other unknown tag is
    /// untracked and returns `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Ground" | "Normal" => Some(Self::Normal),
            "Slippery" => Some(Self::Slippery),
            "Sticky" => Some(Self::Sticky),
            _ => None,
        }
    }

    /// Human readable name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Slippery => "Slippery",
            Self::Sticky => "Sticky",
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Marks a body as tracked ground of the given kind.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use surface_character_controller::prelude::*;
///
/// fn spawn_ice(mut commands: Commands) {
///     commands.spawn((Transform::default(), Surface::slippery()));
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct Surface(pub SurfaceKind);

impl Surface {
    /// Regular ground.
    pub fn normal() -> Self {
        Self(SurfaceKind::Normal)
    }

    /// Slippery ground.
    pub fn slippery() -> Self {
        Self(SurfaceKind::Slippery)
    }

    /// Sticky ground.
    pub fn sticky() -> Self {
        Self(SurfaceKind::Sticky)
    }

    /// The kind of this surface.
    #[inline]
    pub fn kind(&self) -> SurfaceKind {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_tag_maps_to_normal() {
        assert_eq!(SurfaceKind::from_tag("Ground"), Some(SurfaceKind::Normal));
        assert_eq!(SurfaceKind::from_tag("Slippery"), Some(SurfaceKind::Slippery));
        assert_eq!(SurfaceKind::from_tag("Sticky"), Some(SurfaceKind::Sticky));
    }

    #[test]
    fn unknown_tag_is_untracked() {
        assert_eq!(SurfaceKind::from_tag("Wall"), None);
        assert_eq!(SurfaceKind::from_tag("ground"), None);
        assert_eq!(SurfaceKind::from_tag(""), None);
    }

    #[test]
    fn default_surface_is_normal() {
        assert_eq!(SurfaceKind::default(), SurfaceKind::Normal);
        assert_eq!(Surface::default().kind(), SurfaceKind::Normal);
    }

    #[test]
    fn surface_constructors() {
        assert_eq!(Surface::normal().kind(), SurfaceKind::Normal);
        assert_eq!(Surface::slippery().kind(), SurfaceKind::Slippery);
        assert_eq!(Surface::sticky().kind(), SurfaceKind::Sticky);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(SurfaceKind::Sticky.to_string(), "Sticky");
    }
}
