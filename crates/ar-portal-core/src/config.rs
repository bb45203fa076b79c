//! Configuration for a portal session.
//!
//! The placement rates, the step order and the room offsets around the portal
//! are tuning values rather than derived geometry, so they all live here. The
//! [`DemoVariant`] presets reproduce the different step orders the demo was
//! shipped with.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryKind;
use crate::error::{PortalError, Result};
use crate::occlusion::SideTest;
use crate::placement::PlacementPhase;

/// Settings for the placement state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Adjustment phases visited in order between `Idle` and `Committed`.
    pub steps: Vec<PlacementPhase>,
    /// Yaw change per frame at full axis deflection during `AdjustRotation` (radians).
    pub rotation_rate: f32,
    /// Yaw change per frame at full axis deflection during `AdjustFinalRotation` (radians).
    pub final_rotation_rate: f32,
    /// Vertical movement per frame at full axis deflection.
    pub height_rate: f32,
    /// Scale change per frame at full axis deflection.
    pub scale_rate: f32,
    /// Lower bound for the reticle's horizontal and vertical scale.
    pub min_scale: f32,
    /// Axis values with magnitude at or below this are ignored.
    pub axis_deadzone: f32,
    /// World height the reticle starts at, regardless of the hit-test height.
    pub start_height: f32,
    /// Unscaled width and height of the reticle rectangle.
    pub reticle_size: Vec2,
    /// Start the reticle at the anchor's yaw turned by half a revolution so
    /// it faces the viewer. Otherwise it starts unrotated.
    pub face_viewer: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                PlacementPhase::AdjustRotation,
                PlacementPhase::AdjustHeight,
                PlacementPhase::AdjustScaleY,
                PlacementPhase::AdjustScaleX,
            ],
            rotation_rate: 0.01,
            final_rotation_rate: 0.005,
            height_rate: 0.01,
            scale_rate: 0.01,
            min_scale: 0.1,
            axis_deadzone: 0.0,
            start_height: 1.0,
            reticle_size: Vec2::new(1.0, 0.5),
            face_viewer: false,
        }
    }
}

impl PlacementConfig {
    /// Creates a placement configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the adjustment step order.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<PlacementPhase>) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the coarse rotation rate.
    #[must_use]
    pub fn with_rotation_rate(mut self, rate: f32) -> Self {
        self.rotation_rate = rate;
        self
    }

    /// Sets the fine rotation rate.
    #[must_use]
    pub fn with_final_rotation_rate(mut self, rate: f32) -> Self {
        self.final_rotation_rate = rate;
        self
    }

    /// Sets the height rate.
    #[must_use]
    pub fn with_height_rate(mut self, rate: f32) -> Self {
        self.height_rate = rate;
        self
    }

    /// Sets the scale rate.
    #[must_use]
    pub fn with_scale_rate(mut self, rate: f32) -> Self {
        self.scale_rate = rate;
        self
    }

    /// Sets the axis deadzone.
    #[must_use]
    pub fn with_axis_deadzone(mut self, deadzone: f32) -> Self {
        self.axis_deadzone = deadzone;
        self
    }

    /// Sets the unscaled reticle size.
    #[must_use]
    pub fn with_reticle_size(mut self, size: Vec2) -> Self {
        self.reticle_size = size;
        self
    }

    /// Checks the invariants the state machine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(PortalError::EmptyStepSequence);
        }
        if let Some(phase) = self.steps.iter().find(|p| !p.is_adjustment()) {
            return Err(PortalError::NotAnAdjustmentPhase(phase.to_string()));
        }
        for (name, rate) in [
            ("rotation_rate", self.rotation_rate),
            ("final_rotation_rate", self.final_rotation_rate),
            ("height_rate", self.height_rate),
            ("scale_rate", self.scale_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(PortalError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {rate}"
                )));
            }
        }
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(PortalError::InvalidConfig(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !(0.0..1.0).contains(&self.axis_deadzone) {
            return Err(PortalError::InvalidConfig(format!(
                "axis_deadzone must be in [0, 1), got {}",
                self.axis_deadzone
            )));
        }
        if !self.start_height.is_finite() {
            return Err(PortalError::InvalidConfig("start_height must be finite".to_string()));
        }
        if !(self.reticle_size.x > 0.0 && self.reticle_size.y > 0.0) {
            return Err(PortalError::InvalidConfig(format!(
                "reticle_size must be positive, got {}",
                self.reticle_size
            )));
        }
        Ok(())
    }
}

/// Placement of one boundary surface relative to the occluder root.
///
/// The rotation is applied first; the translation then runs along the
/// surface's own rotated axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOffset {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Default for SurfaceOffset {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

impl SurfaceOffset {
    #[must_use]
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }
}

/// Offset table for the five room walls around the portal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryOffsets {
    pub floor: SurfaceOffset,
    pub ceiling: SurfaceOffset,
    pub back: SurfaceOffset,
    pub right: SurfaceOffset,
    pub left: SurfaceOffset,
}

impl Default for BoundaryOffsets {
    fn default() -> Self {
        let lay_flat = Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2);
        let stand_up = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        Self {
            floor: SurfaceOffset::new(lay_flat, Vec3::new(0.0, 1.0, 3.5)),
            ceiling: SurfaceOffset::new(lay_flat, Vec3::new(0.0, -2.0, 3.5)),
            back: SurfaceOffset::new(Quat::IDENTITY, Vec3::new(0.0, 7.0, 2.0)),
            right: SurfaceOffset::new(stand_up, Vec3::new(3.5, -3.4, 0.0)),
            left: SurfaceOffset::new(stand_up, Vec3::new(3.5, 3.4, 0.0)),
        }
    }
}

impl BoundaryOffsets {
    /// Returns the offset for a surface. The cutout pair sits at the root.
    #[must_use]
    pub fn get(&self, kind: BoundaryKind) -> SurfaceOffset {
        match kind {
            BoundaryKind::Cutout | BoundaryKind::ReverseCutout => SurfaceOffset::default(),
            BoundaryKind::Floor => self.floor,
            BoundaryKind::Ceiling => self.ceiling,
            BoundaryKind::Back => self.back,
            BoundaryKind::Right => self.right,
            BoundaryKind::Left => self.left,
        }
    }
}

/// How the room offsets relate to the committed portal size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum OffsetMode {
    /// Use the offset table as-is.
    #[default]
    Fixed,
    /// Scale offsets and wall sizes by the portal's larger extent divided by
    /// `reference`, so larger portals get a larger room.
    ScaledByExtent { reference: f32 },
}

/// Settings for the geometry built at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub offsets: BoundaryOffsets,
    pub offset_mode: OffsetMode,
    /// Box size of each wall occluder (width, thickness, depth).
    pub wall_size: Vec3,
    /// Size of the plane the portal hole is cut out of.
    pub cutout_outer: Vec2,
    /// Material alpha of the occluders; they only need to write depth.
    pub occluder_alpha: f32,
    /// Cross-section of the frame bars drawn around the portal.
    pub frame_thickness: f32,
    /// Vertical drop applied to the virtual scene root.
    pub scene_floor_offset: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            offsets: BoundaryOffsets::default(),
            offset_mode: OffsetMode::Fixed,
            wall_size: Vec3::new(7.0, 0.001, 7.0),
            cutout_outer: Vec2::new(500.0, 500.0),
            occluder_alpha: 0.001,
            frame_thickness: 0.01,
            scene_floor_offset: -1.6,
        }
    }
}

impl BoundaryConfig {
    pub fn validate(&self) -> Result<()> {
        if let OffsetMode::ScaledByExtent { reference } = self.offset_mode {
            if !reference.is_finite() || reference <= 0.0 {
                return Err(PortalError::InvalidConfig(format!(
                    "offset reference extent must be positive, got {reference}"
                )));
            }
        }
        if self.wall_size.min_element() <= 0.0 || self.cutout_outer.min_element() <= 0.0 {
            return Err(PortalError::InvalidConfig("occluder sizes must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.occluder_alpha) {
            return Err(PortalError::InvalidConfig(format!(
                "occluder_alpha must be in [0, 1], got {}",
                self.occluder_alpha
            )));
        }
        if self.frame_thickness < 0.0 {
            return Err(PortalError::InvalidConfig(
                "frame_thickness must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the per-frame occlusion mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OcclusionConfig {
    pub side_test: SideTest,
}

/// Complete configuration for a portal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    pub placement: PlacementConfig,
    pub boundary: BoundaryConfig,
    pub occlusion: OcclusionConfig,
    /// Return to `Idle` automatically when the XR session ends.
    pub reset_on_session_end: bool,
}

impl PortalConfig {
    /// Returns the preset for a demo variant.
    #[must_use]
    pub fn variant(variant: DemoVariant) -> Self {
        let placement = match variant {
            DemoVariant::Canonical => PlacementConfig::default(),
            DemoVariant::TwoPassHeight => PlacementConfig {
                steps: vec![
                    PlacementPhase::AdjustHeight,
                    PlacementPhase::AdjustScaleY,
                    PlacementPhase::AdjustHeight,
                    PlacementPhase::AdjustScaleX,
                    PlacementPhase::AdjustFinalRotation,
                ],
                ..PlacementConfig::default()
            },
            DemoVariant::FlippedCompact => PlacementConfig {
                steps: vec![
                    PlacementPhase::AdjustHeight,
                    PlacementPhase::AdjustScaleY,
                    PlacementPhase::AdjustHeight,
                    PlacementPhase::AdjustScaleX,
                    PlacementPhase::AdjustRotation,
                ],
                rotation_rate: 0.005,
                face_viewer: true,
                ..PlacementConfig::default()
            },
        };
        Self {
            placement,
            ..Self::default()
        }
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.placement.validate()?;
        self.boundary.validate()
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The step orders the demo has been run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DemoVariant {
    /// Rotate, raise, scale height, scale width.
    #[default]
    Canonical,
    /// Raise, scale height, raise again, scale width, fine rotation.
    ///
    /// The fine rotation pass starts from the reticle's current yaw; there is
    /// no snap towards a half turn on entering it.
    TwoPassHeight,
    /// Like `TwoPassHeight` but the reticle starts turned towards the viewer
    /// and ends with a slow rotation pass.
    FlippedCompact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PortalConfig::default().validate().is_ok());
        for variant in [
            DemoVariant::Canonical,
            DemoVariant::TwoPassHeight,
            DemoVariant::FlippedCompact,
        ] {
            assert!(PortalConfig::variant(variant).validate().is_ok());
        }
    }

    #[test]
    fn test_empty_steps_rejected() {
        let config = PlacementConfig::new().with_steps(Vec::new());
        assert!(matches!(config.validate(), Err(PortalError::EmptyStepSequence)));
    }

    #[test]
    fn test_terminal_phase_in_steps_rejected() {
        let config = PlacementConfig::new()
            .with_steps(vec![PlacementPhase::AdjustHeight, PlacementPhase::Committed]);
        assert!(matches!(config.validate(), Err(PortalError::NotAnAdjustmentPhase(_))));
    }

    #[test]
    fn test_non_positive_min_scale_rejected() {
        let config = PlacementConfig {
            min_scale: 0.0,
            ..PlacementConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let config = PlacementConfig::new().with_height_rate(-0.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scaled_offsets_need_positive_reference() {
        let config = BoundaryConfig {
            offset_mode: OffsetMode::ScaledByExtent { reference: 0.0 },
            ..BoundaryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_variant() {
        let config = PortalConfig::variant(DemoVariant::FlippedCompact);
        let json = config.to_json_string().unwrap();
        let back = PortalConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            PortalConfig::from_json_str(r#"{ "placement": { "height_rate": 0.05 } }"#).unwrap();
        assert_eq!(config.placement.height_rate, 0.05);
        assert_eq!(config.placement.min_scale, 0.1);
        assert_eq!(config.boundary, BoundaryConfig::default());
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let result = PortalConfig::from_json_str(r#"{ "placement": { "steps": [] } }"#);
        assert!(matches!(result, Err(PortalError::EmptyStepSequence)));
    }

    #[test]
    fn test_default_floor_offset() {
        let offsets = BoundaryOffsets::default();
        assert_eq!(offsets.floor.translation, Vec3::new(0.0, 1.0, 3.5));
        assert_eq!(offsets.get(BoundaryKind::Cutout), SurfaceOffset::default());
    }
}
