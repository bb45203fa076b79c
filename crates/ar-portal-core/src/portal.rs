//! Portal commit: the immutable layout derived from the final reticle.
//!
//! Besides the portal pose and size this module builds the two pieces of
//! decoration that only depend on the layout: the frame drawn around the
//! opening and the anchor of the virtual scene behind it.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::placement::Reticle;
use crate::render_group::RenderGroup;
use crate::transform::{Pose, Transform};

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing all `points`. An empty slice gives a
    /// degenerate box at the origin.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        };
        rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, p| Self {
                min: acc.min.min(*p),
                max: acc.max.max(*p),
            },
        )
    }

    /// Computes the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each world axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The committed portal: where it is, which way it faces and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalLayout {
    /// Centre of the reticle's bounding box and the reticle's orientation.
    pub pose: Pose,
    /// In-plane width and height of the opening.
    pub extent: Vec2,
    /// World bounding box of the reticle at commit time.
    pub bounds: Aabb,
}

impl PortalLayout {
    /// Reads the reticle once and freezes it as the portal layout.
    #[must_use]
    pub fn from_reticle(reticle: &Reticle) -> Self {
        let bounds = reticle.bounds();
        Self {
            pose: Pose::new(bounds.center(), reticle.transform().rotation),
            extent: reticle.scaled_size(),
            bounds,
        }
    }

    /// World-space spans of the bounding box on X and Y.
    ///
    /// Matches `extent` while the portal faces along Z; for a turned portal
    /// the X span shrinks with the cosine of the yaw.
    #[must_use]
    pub fn world_span(&self) -> Vec2 {
        self.bounds.size().truncate()
    }

    /// Normal of the portal plane (local +Z in world space).
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.pose.forward()
    }
}

/// Which side of the opening a frame bar runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// One bar of the portal frame, as a box in frame-root space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBar {
    pub side: FrameSide,
    /// Box width, height and depth before the local transform.
    pub size: Vec3,
    pub local: Transform,
}

/// The thin frame drawn around the portal opening.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalFrame {
    /// Frame root placed at the portal pose.
    pub root: Transform,
    pub bars: [FrameBar; 4],
    pub render_group: RenderGroup,
}

impl PortalFrame {
    /// Builds the frame for a layout with bars of the given cross-section.
    #[must_use]
    pub fn new(layout: &PortalLayout, thickness: f32) -> Self {
        let Vec2 { x: w, y: h } = layout.extent;
        let upright = Vec3::new(thickness, h + thickness, thickness);
        let lying = Vec3::new(thickness, w, thickness);
        let turn = Quat::from_rotation_z(FRAC_PI_2);
        let bar = |side, size, rotation, translation| FrameBar {
            side,
            size,
            local: Transform {
                translation,
                rotation,
                scale: Vec3::ONE,
            },
        };
        Self {
            root: layout.pose.to_transform(),
            bars: [
                bar(FrameSide::Left, upright, Quat::IDENTITY, Vec3::new(-w * 0.5, 0.0, 0.0)),
                bar(FrameSide::Right, upright, Quat::IDENTITY, Vec3::new(w * 0.5, 0.0, 0.0)),
                bar(FrameSide::Top, lying, turn, Vec3::new(0.0, h * 0.5, 0.0)),
                bar(FrameSide::Bottom, lying, turn, Vec3::new(0.0, -h * 0.5, 0.0)),
            ],
            render_group: RenderGroup::OVERLAY,
        }
    }

    /// World transform of a bar.
    #[must_use]
    pub fn world_transform(&self, bar: &FrameBar) -> Transform {
        self.root.compose(&bar.local)
    }
}

/// Where the virtual scene root goes once the portal exists.
///
/// The scene is moved under the portal horizontally and dropped by a fixed
/// amount so its authored floor lines up with the real one.
#[must_use]
pub fn scene_anchor(layout: &PortalLayout, floor_offset: f32) -> Transform {
    Transform::from_translation(Vec3::new(
        layout.pose.position.x,
        floor_offset,
        layout.pose.position.z,
    ))
}
