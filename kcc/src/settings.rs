/*!
Controller tuning.

`ControllerSettings` gathers every tunable the per-tick update reads. The
defaults come from the documented constants below and can be overridden from
a TOML document (missing keys keep their default).

Notes
- Distances are in meters, time in seconds, speeds in meters per second.
- One logical tick is `1 / TICK_RATE` seconds, scaled by the caller's frame scale.
*/

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

/// Logical ticks per second.
pub const TICK_RATE: f32 = 60.0;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.8;

/// Downward speed is clamped to this magnitude.
pub const TERMINAL_FALL_SPEED_MPS: f32 = 54.0;

/// Speed cap while grounded.
pub const GROUND_MAX_SPEED_MPS: f32 = 5.0;

/// Speed cap while airborne. Much lower than the ground cap, which is what
/// makes air control sluggish.
pub const AIR_MAX_SPEED_MPS: f32 = 1.0;

/// Acceleration toward the desired direction (m/s^2).
pub const ACCELERATION_MPS2: f32 = 50.0;

/// Horizontal deceleration applied while grounded (m/s^2).
pub const FRICTION_MPS2: f32 = 30.0;

/// Horizontal speeds below this snap to exactly zero.
pub const STOP_SPEED_MPS: f32 = 0.05;

/// Upward velocity added by a jump.
pub const JUMP_SPEED_MPS: f32 = 5.0;

/// Steepest walkable surface, in degrees from up.
pub const MAX_SLOPE_DEG: f32 = 60.0;

/// Ticks an actor stays grounded after its last ground contact.
pub const GROUND_GRACE_TICKS: u32 = 6;

/// Rest distance between the feet and the ground (meters).
/// Prevents exact contact, which reduces jitter and depenetration needs.
pub const GROUND_HOVER: f32 = 0.02;

/// Largest gap under the feet the ground probe latches onto (meters).
/// Small values keep the controller from snapping through gaps.
pub const GROUND_PROBE_DISTANCE: f32 = 0.30;

/// Gap error tolerated before a snap moves the actor (meters).
pub const SNAP_TOLERANCE: f32 = 0.001;

/// Separation kept from a surface when a sweep is shortened (meters).
pub const CONTACT_MARGIN: f32 = 0.01;

/// Radius of the `ActorSize::SMALL` footprint (meters).
pub const ACTOR_SMALL_RADIUS: f32 = 0.25;

/// Half height of the `ActorSize::SMALL` box (meters).
pub const ACTOR_SMALL_HALF_HEIGHT: f32 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for `step_actor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub gravity: f32,
    pub terminal_fall_speed: f32,
    pub ground_max_speed: f32,
    pub air_max_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub stop_speed: f32,
    pub jump_speed: f32,
    pub max_slope_deg: f32,
    pub ground_grace_ticks: u32,
    pub ground_hover: f32,
    pub ground_probe_distance: f32,
    pub snap_tolerance: f32,
    pub contact_margin: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_MPS2,
            terminal_fall_speed: TERMINAL_FALL_SPEED_MPS,
            ground_max_speed: GROUND_MAX_SPEED_MPS,
            air_max_speed: AIR_MAX_SPEED_MPS,
            acceleration: ACCELERATION_MPS2,
            friction: FRICTION_MPS2,
            stop_speed: STOP_SPEED_MPS,
            jump_speed: JUMP_SPEED_MPS,
            max_slope_deg: MAX_SLOPE_DEG,
            ground_grace_ticks: GROUND_GRACE_TICKS,
            ground_hover: GROUND_HOVER,
            ground_probe_distance: GROUND_PROBE_DISTANCE,
            snap_tolerance: SNAP_TOLERANCE,
            contact_margin: CONTACT_MARGIN,
        }
    }
}

impl ControllerSettings {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&source)?;
        log::info!("loaded controller settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let non_negative = [
            ("gravity", self.gravity),
            ("terminal_fall_speed", self.terminal_fall_speed),
            ("ground_max_speed", self.ground_max_speed),
            ("air_max_speed", self.air_max_speed),
            ("acceleration", self.acceleration),
            ("friction", self.friction),
            ("stop_speed", self.stop_speed),
            ("jump_speed", self.jump_speed),
            ("ground_hover", self.ground_hover),
            ("ground_probe_distance", self.ground_probe_distance),
            ("snap_tolerance", self.snap_tolerance),
            ("contact_margin", self.contact_margin),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative value, got {value}"),
                });
            }
        }

        if !(self.max_slope_deg > 0.0 && self.max_slope_deg <= 90.0) {
            return Err(SettingsError::Invalid {
                field: "max_slope_deg",
                reason: format!("expected a value in (0, 90], got {}", self.max_slope_deg),
            });
        }

        if self.ground_grace_ticks == 0 {
            return Err(SettingsError::Invalid {
                field: "ground_grace_ticks",
                reason: "the grace window needs at least one tick".to_string(),
            });
        }

        if self.ground_probe_distance < self.ground_hover {
            return Err(SettingsError::Invalid {
                field: "ground_probe_distance",
                reason: format!(
                    "must be at least ground_hover ({}), got {}",
                    self.ground_hover, self.ground_probe_distance
                ),
            });
        }

        Ok(())
    }

    /// Seconds covered by one tick at the given frame scale.
    #[inline]
    pub fn tick_seconds(&self, frame_scale: f32) -> f32 {
        frame_scale.max(0.0) / TICK_RATE
    }

    /// Cosine of the slope limit; normals with `n.z >= this` are walkable.
    #[inline]
    pub fn min_walkable_up(&self) -> f32 {
        self.max_slope_deg.to_radians().cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = ControllerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, ControllerSettings::default());
    }

    #[test]
    fn partial_document_overrides_only_named_keys() {
        let settings = ControllerSettings::from_toml_str(
            r#"
            gravity = 20.0
            ground_grace_ticks = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.gravity, 20.0);
        assert_eq!(settings.ground_grace_ticks, 3);
        assert_eq!(settings.friction, FRICTION_MPS2);
    }

    #[test]
    fn settings_survive_a_toml_round_trip() {
        let mut settings = ControllerSettings::default();
        settings.jump_speed = 7.5;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(ControllerSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = ControllerSettings::from_toml_str("max_slope_deg = 120.0").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "max_slope_deg",
                ..
            }
        ));

        let err = ControllerSettings::from_toml_str("friction = -1.0").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "friction", .. }));

        let err = ControllerSettings::from_toml_str("ground_grace_ticks = 0").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "ground_grace_ticks",
                ..
            }
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = ControllerSettings::from_toml_str("gravity = \"down\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ControllerSettings::load("/definitely/not/here/kcc.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn walkable_threshold_matches_slope_limit() {
        let settings = ControllerSettings::default();
        assert!((settings.min_walkable_up() - 0.5).abs() < 1.0e-6);
        assert!((settings.tick_seconds(1.0) - 1.0 / 60.0).abs() < 1.0e-9);
    }
}
