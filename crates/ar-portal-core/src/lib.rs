//! Core state and algorithms for ar-portal.
//!
//! This crate has no renderer or XR runtime dependency. It provides:
//! - [`PlacementMachine`] stepping a reticle through configurable adjustment phases
//! - [`PortalLayout`] frozen from the reticle at commit, with its frame and scene anchor
//! - [`BoundarySet`] occluders built around the committed portal
//! - [`OcclusionMask`] choosing occluder visibility from the viewer position
//! - [`PortalSession`] tying them together behind a select/frame interface

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod boundary;
pub mod config;
pub mod error;
pub mod occlusion;
pub mod placement;
pub mod portal;
pub mod render_group;
pub mod session;
pub mod transform;

pub use boundary::{
    BoundaryKind, BoundarySet, BoundarySurface, CutoutDescriptor, OccluderUniforms,
    CUTOUT_HOLE_THICKNESS, CUTOUT_PLANE_THICKNESS,
};
pub use config::{
    BoundaryConfig, BoundaryOffsets, DemoVariant, OcclusionConfig, OffsetMode, PlacementConfig,
    PortalConfig, SurfaceOffset,
};
pub use error::{PortalError, Result};
pub use occlusion::{OcclusionMask, SideTest, ViewerSide};
pub use placement::{PlacementMachine, PlacementPhase, Reticle, Transition};
pub use portal::{scene_anchor, Aabb, FrameBar, FrameSide, PortalFrame, PortalLayout};
pub use render_group::RenderGroup;
pub use session::{FrameInput, FrameReport, PortalSession};
pub use transform::{Axis, Pose, Transform};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
