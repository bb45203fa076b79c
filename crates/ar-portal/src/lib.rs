//! ar-portal: place a walk-through portal in an AR session.
//!
//! The viewer points at a real-world surface, selects to spawn a reticle,
//! adjusts it through a sequence of single-axis phases and commits it as a
//! portal. From then on, occluders around the portal hide a virtual scene
//! everywhere except through the opening, and flip when the viewer walks
//! through.
//!
//! # Quick Start
//!
//! ```no_run
//! use ar_portal::*;
//!
//! struct Runtime;
//!
//! impl HitTestSource for Runtime {
//!     fn latest_hit(&mut self) -> Option<Pose> {
//!         Some(Pose::from_position(Vec3::new(0.0, 0.0, -2.0)))
//!     }
//! }
//!
//! impl ControllerInput for Runtime {
//!     fn axis(&mut self) -> f32 {
//!         0.0
//!     }
//!     fn take_select(&mut self) -> bool {
//!         true
//!     }
//! }
//!
//! impl ViewerTracker for Runtime {
//!     fn viewer_position(&mut self) -> Vec3 {
//!         Vec3::new(0.0, 1.6, 0.0)
//!     }
//!     fn in_session(&mut self) -> bool {
//!         true
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!     let mut app = PortalApp::new(PortalConfig::default(), Runtime, Runtime, Runtime)?;
//!     loop {
//!         let report = app.frame_tick();
//!         if let Some(boundaries) = app.session().boundaries() {
//!             let _uniforms = boundaries.uniforms();
//!         }
//!         if report.phase == PlacementPhase::Committed {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
mod config_file;
mod host;
mod init;

pub use app::PortalApp;
pub use config_file::{load_config, save_config};
pub use host::{ControllerInput, HitTestSource, ViewerTracker};
pub use init::init_logging;

// Re-export core types
pub use ar_portal_core::{
    boundary::{BoundaryKind, BoundarySet, BoundarySurface, CutoutDescriptor, OccluderUniforms},
    config::{
        BoundaryConfig, BoundaryOffsets, DemoVariant, OcclusionConfig, OffsetMode, PlacementConfig,
        PortalConfig, SurfaceOffset,
    },
    error::{PortalError, Result},
    occlusion::{OcclusionMask, SideTest, ViewerSide},
    placement::{PlacementMachine, PlacementPhase, Reticle, Transition},
    portal::{scene_anchor, Aabb, FrameBar, FrameSide, PortalFrame, PortalLayout},
    render_group::RenderGroup,
    session::{FrameInput, FrameReport, PortalSession},
    transform::{Axis, Pose, Transform},
    Mat4, Quat, Vec2, Vec3,
};
