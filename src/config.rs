//! Controller configuration components.
//!
//! This module defines the per-surface movement profiles and the global
//! acceleration/deceleration rates. Configuration is authored once and is not
//! mutated by the controller at runtime.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;
use crate::surface::SurfaceKind;

/// Speed and jump parameters for one surface kind.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    /// Maximum horizontal speed (units/second).
    pub max_speed: f32,
    /// Vertical velocity set when jumping (units/second).
    pub jump_force: f32,
}

impl MovementProfile {
    /// Create a new profile.
    pub const fn new(max_speed: f32, jump_force: f32) -> Self {
        Self {
            max_speed,
            jump_force,
        }
    }

    fn validate(&self, surface: SurfaceKind) -> Result<(), ControllerError> {
        for (field, value) in [("max_speed", self.max_speed), ("jump_force", self.jump_force)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ControllerError::InvalidProfile {
                    surface,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One [`MovementProfile`] per [`SurfaceKind`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceProfiles {
    /// Profile used on regular ground.
    pub normal: MovementProfile,
    /// Profile used on slippery ground.
    pub slippery: MovementProfile,
    /// Profile used on sticky ground.
    pub sticky: MovementProfile,
}

impl Default for SurfaceProfiles {
    fn default() -> Self {
        Self {
            normal: MovementProfile::new(5.0, 10.0),
            slippery: MovementProfile::new(8.0, 12.0),
            sticky: MovementProfile::new(3.0, 7.0),
        }
    }
}

impl SurfaceProfiles {
    /// Select the profile for a surface kind.
    #[inline]
    pub fn get(&self, surface: SurfaceKind) -> MovementProfile {
        match surface {
            SurfaceKind::Normal => self.normal,
            SurfaceKind::Slippery => self.slippery,
            SurfaceKind::Sticky => self.sticky,
        }
    }

    /// Replace the profile for a surface kind.
    pub fn set(&mut self, surface: SurfaceKind, profile: MovementProfile) {
        match surface {
            SurfaceKind::Normal => self.normal = profile,
            SurfaceKind::Slippery => self.slippery = profile,
            SurfaceKind::Sticky => self.sticky = profile,
        }
    }
}

/// Configuration parameters for the surface controller.
///
/// The movement force is a proportional controller on horizontal velocity:
/// `force = (target - current) * rate`, where `rate` is [`acceleration`] while
/// the target speed is non-zero and [`deceleration`] while coming to rest.
///
/// [`acceleration`]: ControllerConfig::acceleration
/// [`deceleration`]: ControllerConfig::deceleration
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct ControllerConfig {
    /// Per-surface speed and jump force.
    pub profiles: SurfaceProfiles,

    /// Rate used when moving toward a non-zero target speed.
    pub acceleration: f32,

    /// Rate used when slowing toward rest.
    pub deceleration: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            profiles: SurfaceProfiles::default(),
            acceleration: 10.0,
            deceleration: 10.0,
        }
    }
}

impl ControllerConfig {
    /// Target speeds below this magnitude count as "at rest" for rate selection.
    pub const REST_THRESHOLD: f32 = 0.01;

    /// Create a config optimized for snappy player control.
    pub fn responsive() -> Self {
        Self {
            acceleration: 20.0,
            deceleration: 30.0,
            ..default()
        }
    }

    /// Profile for a surface kind.
    #[inline]
    pub fn profile(&self, surface: SurfaceKind) -> MovementProfile {
        self.profiles.get(surface)
    }

    /// Rate for a given target speed.
    #[inline]
    pub fn rate_for(&self, target_speed: f32) -> f32 {
        if target_speed.abs() > Self::REST_THRESHOLD {
            self.acceleration
        } else {
            self.deceleration
        }
    }

    /// Check that every profile value and rate is finite and non-negative.
    pub fn validate(&self) -> Result<(), ControllerError> {
        for surface in SurfaceKind::ALL {
            self.profile(surface).validate(surface)?;
        }
        for (name, value) in [
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ControllerError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    /// Whether both rates approach the target without overshooting on a body
    /// of `mass` integrated with step `dt` (`rate * dt < mass`).
    pub fn converges_without_overshoot(&self, mass: f32, dt: f32) -> bool {
        self.acceleration * dt < mass && self.deceleration * dt < mass
    }

    /// Builder: set the profile for one surface.
    pub fn with_profile(mut self, surface: SurfaceKind, profile: MovementProfile) -> Self {
        self.profiles.set(surface, profile);
        self
    }

    /// Builder: set both rates.
    pub fn with_rates(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Builder: set acceleration rate.
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Builder: set deceleration rate.
    pub fn with_deceleration(mut self, deceleration: f32) -> Self {
        self.deceleration = deceleration;
        self
    }
}

/// Number of explicit-Euler steps for the velocity error to shrink from
/// `initial_error` to within `tolerance`.
///
/// Each step multiplies the error by `1 - rate * dt / mass`. Returns `None`
/// when the error never converges (non-positive rate or factor magnitude >= 1).
pub fn steps_to_converge(
    rate: f32,
    mass: f32,
    dt: f32,
    initial_error: f32,
    tolerance: f32,
) -> Option<u32> {
    let initial = initial_error.abs();
    if initial <= tolerance {
        return Some(0);
    }
    if mass <= 0.0 || tolerance <= 0.0 {
        return None;
    }

    let gain = rate * dt / mass;
    let factor = (1.0 - gain).abs();
    if gain <= 0.0 || factor >= 1.0 {
        return None;
    }
    if factor == 0.0 {
        return Some(1);
    }

    let steps = (tolerance / initial).ln() / factor.ln();
    Some(steps.ceil() as u32)
}
