//! The portal session: the single owner of all placement and masking state.
//!
//! The host feeds it hit-test results, select events and one [`FrameInput`]
//! per rendered frame, and reads back what to draw.

use glam::Vec3;

use crate::boundary::BoundarySet;
use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::occlusion::{OcclusionMask, ViewerSide};
use crate::placement::{PlacementMachine, PlacementPhase, Reticle, Transition};
use crate::portal::{scene_anchor, PortalFrame, PortalLayout};
use crate::transform::{Pose, Transform};

/// Per-frame input gathered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Controller axis in [-1, 1].
    pub axis: f32,
    /// Viewer (camera) position in world space.
    pub viewer_position: Vec3,
    /// Whether an immersive session is running.
    pub in_session: bool,
}

/// What the host should show after a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub phase: PlacementPhase,
    pub reticle: Option<Reticle>,
    /// Whether the hit-test marker should be drawn.
    pub marker_visible: bool,
    /// Side decided by the occlusion mask; `None` before commit.
    pub viewer_side: Option<ViewerSide>,
}

/// State committed together with the portal.
#[derive(Debug, Clone)]
struct Placed {
    layout: PortalLayout,
    boundaries: BoundarySet,
    mask: OcclusionMask,
    frame: PortalFrame,
    scene_anchor: Transform,
}

/// Placement and occlusion state for one AR session.
#[derive(Debug, Clone)]
pub struct PortalSession {
    config: PortalConfig,
    placement: PlacementMachine,
    placed: Option<Placed>,
}

impl PortalSession {
    /// Creates a session after validating the configuration.
    pub fn new(config: PortalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            placement: PlacementMachine::new(config.placement.clone()),
            config,
            placed: None,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Returns the placement state machine.
    #[must_use]
    pub fn placement(&self) -> &PlacementMachine {
        &self.placement
    }

    /// Returns the current placement phase.
    #[must_use]
    pub fn phase(&self) -> PlacementPhase {
        self.placement.phase()
    }

    /// Returns the reticle, if placement has started.
    #[must_use]
    pub fn reticle(&self) -> Option<&Reticle> {
        self.placement.reticle()
    }

    /// Records this frame's hit-test result and returns whether the marker
    /// should be drawn.
    pub fn observe_hit_test(&mut self, hit: Option<Pose>) -> bool {
        self.placement.set_anchor(hit);
        self.marker_visible()
    }

    /// The marker follows hit-test results only until placement starts.
    #[must_use]
    pub fn marker_visible(&self) -> bool {
        self.placement.anchor().is_some() && self.phase() == PlacementPhase::Idle
    }

    /// Handles a discrete select input.
    pub fn select(&mut self) -> Transition {
        let transition = self.placement.advance();
        if let Transition::Committed(layout) = transition {
            if let Err(e) = self.install(layout) {
                log::error!("failed to install portal: {e}");
            }
        }
        transition
    }

    fn install(&mut self, layout: PortalLayout) -> Result<()> {
        if self.placed.is_some() {
            return Err(PortalError::AlreadyCommitted);
        }
        let boundary = &self.config.boundary;
        self.placed = Some(Placed {
            layout,
            boundaries: BoundarySet::build(&layout, boundary),
            mask: OcclusionMask::new(layout.pose, &self.config.occlusion),
            frame: PortalFrame::new(&layout, boundary.frame_thickness),
            scene_anchor: scene_anchor(&layout, boundary.scene_floor_offset),
        });
        log::info!("portal installed, virtual world enabled");
        Ok(())
    }

    /// Runs one frame: adjusts the reticle during placement, updates the
    /// occlusion mask afterwards. Controller input only counts while an XR
    /// session is running.
    pub fn frame(&mut self, input: FrameInput) -> FrameReport {
        let viewer_side = match self.placed.as_mut() {
            None => {
                if input.in_session {
                    self.placement.tick(input.axis);
                }
                None
            }
            Some(placed) => {
                let side = if input.in_session {
                    placed.mask.update(input.viewer_position, &mut placed.boundaries)
                } else {
                    placed.mask.apply(ViewerSide::Front, &mut placed.boundaries);
                    ViewerSide::Front
                };
                Some(side)
            }
        };
        FrameReport {
            phase: self.phase(),
            reticle: self.placement.reticle().copied(),
            marker_visible: self.marker_visible(),
            viewer_side,
        }
    }

    /// Notifies the session that the XR session ended.
    ///
    /// Resets only when configured to; otherwise the portal stays for the
    /// next session.
    pub fn session_ended(&mut self) {
        if self.config.reset_on_session_end {
            self.reset();
        } else {
            log::debug!("session ended, keeping portal state");
        }
    }

    /// Drops the portal and returns to `Idle`.
    pub fn reset(&mut self) {
        self.placement.reset();
        self.placed = None;
        log::info!("portal session reset");
    }

    /// Returns true once the portal has been committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.placed.is_some()
    }

    /// Whether the virtual world root should be enabled.
    #[must_use]
    pub fn virtual_world_enabled(&self) -> bool {
        self.placed.is_some()
    }

    /// Whether the occluder root should be enabled. False before commit.
    #[must_use]
    pub fn occluders_enabled(&self) -> bool {
        self.placed.as_ref().is_some_and(|p| p.boundaries.is_enabled())
    }

    /// The committed portal layout.
    #[must_use]
    pub fn layout(&self) -> Option<&PortalLayout> {
        self.placed.as_ref().map(|p| &p.layout)
    }

    /// The occluders built at commit.
    #[must_use]
    pub fn boundaries(&self) -> Option<&BoundarySet> {
        self.placed.as_ref().map(|p| &p.boundaries)
    }

    /// The occlusion mask created at commit.
    #[must_use]
    pub fn mask(&self) -> Option<&OcclusionMask> {
        self.placed.as_ref().map(|p| &p.mask)
    }

    /// The frame drawn around the portal.
    #[must_use]
    pub fn portal_frame(&self) -> Option<&PortalFrame> {
        self.placed.as_ref().map(|p| &p.frame)
    }

    /// Where the virtual scene root should be placed.
    #[must_use]
    pub fn scene_anchor(&self) -> Option<&Transform> {
        self.placed.as_ref().map(|p| &p.scene_anchor)
    }
}
