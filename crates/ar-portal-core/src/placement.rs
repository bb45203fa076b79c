//! Placement state machine for the portal reticle.
//!
//! A select input steps through the configured adjustment phases; while a
//! phase is active the controller axis edits exactly one property of the
//! reticle. Leaving the last phase commits the reticle as the portal.

use std::f32::consts::PI;
use std::fmt;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::portal::{Aabb, PortalLayout};
use crate::transform::{Pose, Transform};

/// The phases a placement passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlacementPhase {
    /// Waiting for the first select with a valid hit-test anchor.
    #[default]
    Idle,
    /// Coarse turn about the vertical axis.
    AdjustRotation,
    /// Raise or lower the reticle.
    AdjustHeight,
    /// Stretch the reticle vertically.
    AdjustScaleY,
    /// Stretch the reticle horizontally.
    AdjustScaleX,
    /// Fine turn about the vertical axis.
    AdjustFinalRotation,
    /// The portal has been placed; nothing changes any more.
    Committed,
}

impl PlacementPhase {
    /// Returns true for phases in which `tick` edits the reticle.
    #[must_use]
    pub fn is_adjustment(self) -> bool {
        !matches!(self, PlacementPhase::Idle | PlacementPhase::Committed)
    }

    /// Short title for the helper overlay.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PlacementPhase::Idle => "Place window",
            PlacementPhase::AdjustRotation => "Rotation (coarse)",
            PlacementPhase::AdjustHeight => "Height",
            PlacementPhase::AdjustScaleY => "Window height",
            PlacementPhase::AdjustScaleX => "Window width",
            PlacementPhase::AdjustFinalRotation => "Rotation (fine)",
            PlacementPhase::Committed => "Window placed",
        }
    }

    /// Instruction lines for the helper overlay.
    #[must_use]
    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            PlacementPhase::Idle => &["Point at a surface", "and press select to start."],
            PlacementPhase::AdjustRotation | PlacementPhase::AdjustFinalRotation => &[
                "Push the thumbstick up or down",
                "to turn the window.",
            ],
            PlacementPhase::AdjustHeight => &[
                "Push the thumbstick up or down",
                "to move the window up or down.",
            ],
            PlacementPhase::AdjustScaleY => &[
                "Push the thumbstick up or down",
                "to change the window's height.",
            ],
            PlacementPhase::AdjustScaleX => &[
                "Push the thumbstick up or down",
                "to change the window's width.",
            ],
            PlacementPhase::Committed => &["Walk through the window."],
        }
    }
}

impl fmt::Display for PlacementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The adjustable rectangle previewing the portal.
///
/// The rectangle lies in the local XY plane, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reticle {
    transform: Transform,
    size: Vec2,
    visible: bool,
}

impl Reticle {
    /// Creates a visible reticle with the given transform and unscaled size.
    #[must_use]
    pub fn new(transform: Transform, size: Vec2) -> Self {
        Self {
            transform,
            size,
            visible: true,
        }
    }

    /// Spawns a reticle above a hit-test anchor.
    ///
    /// Only the anchor's horizontal position is used; the height comes from
    /// the configuration so the reticle starts at a usable level. The reticle
    /// starts unrotated unless `face_viewer` is set, in which case it takes
    /// the anchor's yaw turned by half a revolution.
    #[must_use]
    pub fn at_anchor(anchor: &Pose, config: &PlacementConfig) -> Self {
        let rotation = if config.face_viewer {
            Quat::from_rotation_y(anchor.yaw() + PI)
        } else {
            Quat::IDENTITY
        };
        let transform = Transform {
            translation: Vec3::new(anchor.position.x, config.start_height, anchor.position.z),
            rotation,
            scale: Vec3::ONE,
        };
        Self::new(transform, config.reticle_size)
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the unscaled rectangle size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Returns the rectangle size after scaling.
    #[must_use]
    pub fn scaled_size(&self) -> Vec2 {
        self.size * self.transform.scale.truncate()
    }

    /// Returns whether the reticle should be drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// World-space corners, counter-clockwise from bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 4] {
        let h = self.size * 0.5;
        [
            Vec3::new(-h.x, -h.y, 0.0),
            Vec3::new(h.x, -h.y, 0.0),
            Vec3::new(h.x, h.y, 0.0),
            Vec3::new(-h.x, h.y, 0.0),
        ]
        .map(|c| self.transform.transform_point(c))
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.corners())
    }
}

/// What a call to [`PlacementMachine::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// No anchor was available; still `Idle`.
    Ignored,
    /// The reticle was spawned and the first adjustment phase entered.
    Started(PlacementPhase),
    /// Moved from one adjustment phase to the next.
    Stepped {
        from: PlacementPhase,
        to: PlacementPhase,
    },
    /// The reticle was committed. Emitted once per placement.
    Committed(PortalLayout),
    /// Already committed; nothing changed.
    AlreadyCommitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Idle,
    Step(usize),
    Committed,
}

/// Drives the reticle from select events and a per-frame axis value.
#[derive(Debug, Clone)]
pub struct PlacementMachine {
    config: PlacementConfig,
    cursor: Cursor,
    anchor: Option<Pose>,
    reticle: Option<Reticle>,
}

impl PlacementMachine {
    /// Creates an idle machine. The configuration should already be validated.
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            cursor: Cursor::Idle,
            anchor: None,
            reticle: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> PlacementPhase {
        match self.cursor {
            Cursor::Idle => PlacementPhase::Idle,
            Cursor::Step(i) => self.config.steps[i],
            Cursor::Committed => PlacementPhase::Committed,
        }
    }

    /// Index of the current step within the configured sequence.
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::Step(i) => Some(i),
            _ => None,
        }
    }

    /// Returns true once the portal has been committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.cursor == Cursor::Committed
    }

    /// Returns the reticle, if placement has started.
    #[must_use]
    pub fn reticle(&self) -> Option<&Reticle> {
        self.reticle.as_ref()
    }

    /// Returns the latest anchor reported by the hit-test service.
    #[must_use]
    pub fn anchor(&self) -> Option<Pose> {
        self.anchor
    }

    /// Records the latest hit-test result. `None` means no surface is found.
    pub fn set_anchor(&mut self, anchor: Option<Pose>) {
        self.anchor = anchor;
    }

    /// Moves to the next phase.
    pub fn advance(&mut self) -> Transition {
        match self.cursor {
            Cursor::Idle => {
                let Some(anchor) = self.anchor else {
                    log::debug!("select ignored: no hit-test anchor");
                    return Transition::Ignored;
                };
                self.reticle = Some(Reticle::at_anchor(&anchor, &self.config));
                if self.config.steps.is_empty() {
                    return self.commit();
                }
                self.cursor = Cursor::Step(0);
                let phase = self.phase();
                log::info!("placement started at {}, entering {phase}", anchor.position);
                Transition::Started(phase)
            }
            Cursor::Step(i) if i + 1 < self.config.steps.len() => {
                let from = self.phase();
                self.cursor = Cursor::Step(i + 1);
                let to = self.phase();
                log::debug!("placement {from} -> {to}");
                Transition::Stepped { from, to }
            }
            Cursor::Step(_) => self.commit(),
            Cursor::Committed => Transition::AlreadyCommitted,
        }
    }

    fn commit(&mut self) -> Transition {
        let Some(reticle) = self.reticle.as_mut() else {
            debug_assert!(false, "commit reached without a reticle");
            log::error!("commit reached without a reticle");
            return Transition::Ignored;
        };
        reticle.visible = false;
        let layout = PortalLayout::from_reticle(reticle);
        self.cursor = Cursor::Committed;
        log::info!(
            "portal committed at {} with extent {}",
            layout.pose.position,
            layout.extent
        );
        Transition::Committed(layout)
    }

    /// Applies one frame of controller input to the reticle.
    ///
    /// `axis` is clamped to [-1, 1]. Values inside the deadzone, non-finite
    /// values and calls outside an adjustment phase leave everything as is.
    pub fn tick(&mut self, axis: f32) {
        let phase = self.phase();
        if !phase.is_adjustment() || !axis.is_finite() {
            return;
        }
        let axis = axis.clamp(-1.0, 1.0);
        if axis.abs() <= self.config.axis_deadzone || axis == 0.0 {
            return;
        }
        let Some(reticle) = self.reticle.as_mut() else {
            return;
        };
        let c = &self.config;
        let t = &mut reticle.transform;
        match phase {
            PlacementPhase::AdjustRotation => t.rotate_yaw(axis * c.rotation_rate),
            PlacementPhase::AdjustFinalRotation => t.rotate_yaw(axis * c.final_rotation_rate),
            PlacementPhase::AdjustHeight => t.translation.y += axis * c.height_rate,
            PlacementPhase::AdjustScaleY => {
                t.scale.y = (t.scale.y + axis * c.scale_rate).max(c.min_scale);
            }
            PlacementPhase::AdjustScaleX => {
                t.scale.x = (t.scale.x + axis * c.scale_rate).max(c.min_scale);
            }
            PlacementPhase::Idle | PlacementPhase::Committed => {}
        }
    }

    /// Returns to `Idle`, dropping the reticle and the last anchor.
    pub fn reset(&mut self) {
        self.cursor = Cursor::Idle;
        self.anchor = None;
        self.reticle = None;
    }
}
