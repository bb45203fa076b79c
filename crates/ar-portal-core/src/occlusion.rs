//! Per-frame occlusion masking.
//!
//! Once the portal is committed, every frame decides which side of the portal
//! the viewer is on and shows the matching occluders. From the real-world
//! side the cutout and the room walls hide the virtual scene everywhere but
//! through the opening; from inside, only the reverse panel is shown so the
//! real world is hidden behind the opening instead.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryKind, BoundarySet};
use crate::config::OcclusionConfig;
use crate::transform::{Axis, Pose};

/// How the viewer's side of the portal is decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SideTest {
    /// Compare one world coordinate of viewer and portal. Only reliable
    /// while the portal faces roughly along that axis.
    WorldAxis(Axis),
    /// Signed distance to the portal plane along the portal's local +Z.
    /// Correct for any portal orientation.
    PlaneDistance,
}

impl Default for SideTest {
    fn default() -> Self {
        SideTest::WorldAxis(Axis::Z)
    }
}

impl SideTest {
    /// Signed offset of the viewer from the portal as measured by this test.
    #[must_use]
    pub fn offset(self, viewer: Vec3, portal: &Pose) -> f32 {
        match self {
            SideTest::WorldAxis(axis) => axis.component(viewer) - axis.component(portal.position),
            SideTest::PlaneDistance => (viewer - portal.position).dot(portal.forward()),
        }
    }

    /// Classifies the viewer. A viewer exactly on the portal is in front.
    #[must_use]
    pub fn classify(self, viewer: Vec3, portal: &Pose) -> ViewerSide {
        if self.offset(viewer, portal) > 0.0 {
            ViewerSide::Beyond
        } else {
            ViewerSide::Front
        }
    }
}

/// Which side of the portal the viewer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewerSide {
    /// In the real world, looking into the portal.
    #[default]
    Front,
    /// Through the portal, inside the virtual scene.
    Beyond,
}

/// Flips occluder visibility from the viewer position each frame.
#[derive(Debug, Clone)]
pub struct OcclusionMask {
    portal: Pose,
    test: SideTest,
    last_side: Option<ViewerSide>,
}

impl OcclusionMask {
    /// Creates a mask for a committed portal pose.
    #[must_use]
    pub fn new(portal: Pose, config: &OcclusionConfig) -> Self {
        Self {
            portal,
            test: config.side_test,
            last_side: None,
        }
    }

    /// Returns the portal pose the mask compares against.
    #[must_use]
    pub fn portal(&self) -> &Pose {
        &self.portal
    }

    /// Returns the side test in use.
    #[must_use]
    pub fn side_test(&self) -> SideTest {
        self.test
    }

    /// Side decided by the most recent update, if any.
    #[must_use]
    pub fn last_side(&self) -> Option<ViewerSide> {
        self.last_side
    }

    /// Classifies the viewer and applies the visibility for that side.
    pub fn update(&mut self, viewer: Vec3, boundaries: &mut BoundarySet) -> ViewerSide {
        let side = self.test.classify(viewer, &self.portal);
        self.apply(side, boundaries);
        side
    }

    /// Applies the visibility for `side` without looking at the viewer.
    pub fn apply(&mut self, side: ViewerSide, boundaries: &mut BoundarySet) {
        if self.last_side != Some(side) {
            log::debug!("viewer side changed to {side:?}");
            self.last_side = Some(side);
        }
        let beyond = side == ViewerSide::Beyond;
        for kind in BoundaryKind::ALL {
            let visible = match kind {
                BoundaryKind::ReverseCutout => beyond,
                _ => !beyond,
            };
            boundaries.set_visible(kind, visible);
        }
    }
}
