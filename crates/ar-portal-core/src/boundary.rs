//! Boundary surfaces built around the committed portal.
//!
//! The occluders are depth-only geometry: a large plane with the portal-shaped
//! hole cut out of it, the matching reverse panel that fills the hole, and five
//! walls enclosing the room around the portal. The host performs the CSG
//! subtraction and draws them in [`RenderGroup::OCCLUDERS`] with forced depth
//! writes; this module decides where they go and whether they are shown.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{BoundaryConfig, OffsetMode};
use crate::portal::PortalLayout;
use crate::render_group::RenderGroup;
use crate::transform::Transform;

/// Thickness of the plane the hole is cut out of.
pub const CUTOUT_PLANE_THICKNESS: f32 = 0.001;
/// Thickness of the hole box; thicker than the plane so the cut goes through.
pub const CUTOUT_HOLE_THICKNESS: f32 = 0.01;

/// The surfaces making up the occlusion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// Plane with the portal opening cut out; hides the virtual world from
    /// the real-world side except through the opening.
    Cutout,
    /// Panel filling the opening; hides the real world from inside.
    ReverseCutout,
    Floor,
    Ceiling,
    Left,
    Right,
    Back,
}

impl BoundaryKind {
    /// All surfaces, in the order they are stored.
    pub const ALL: [BoundaryKind; 7] = [
        BoundaryKind::Cutout,
        BoundaryKind::ReverseCutout,
        BoundaryKind::Floor,
        BoundaryKind::Ceiling,
        BoundaryKind::Left,
        BoundaryKind::Right,
        BoundaryKind::Back,
    ];

    /// Returns true for the five room walls.
    #[must_use]
    pub fn is_wall(self) -> bool {
        !matches!(self, BoundaryKind::Cutout | BoundaryKind::ReverseCutout)
    }

    fn index(self) -> usize {
        match self {
            BoundaryKind::Cutout => 0,
            BoundaryKind::ReverseCutout => 1,
            BoundaryKind::Floor => 2,
            BoundaryKind::Ceiling => 3,
            BoundaryKind::Left => 4,
            BoundaryKind::Right => 5,
            BoundaryKind::Back => 6,
        }
    }
}

/// Box sizes for the host's CSG subtraction of the cutout pair.
///
/// `Cutout` is `plane - hole`, `ReverseCutout` is `hole - plane`. Both boxes
/// are flat in their local XZ plane, centred on the occluder root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoutDescriptor {
    pub plane: Vec3,
    pub hole: Vec3,
}

impl CutoutDescriptor {
    #[must_use]
    pub fn new(outer: Vec2, hole: Vec2) -> Self {
        Self {
            plane: Vec3::new(outer.x, CUTOUT_PLANE_THICKNESS, outer.y),
            hole: Vec3::new(hole.x, CUTOUT_HOLE_THICKNESS, hole.y),
        }
    }
}

/// One occluder with its placement relative to the occluder root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySurface {
    pub kind: BoundaryKind,
    pub local: Transform,
    /// Box width, thickness and depth. For the cutout pair this is the plane
    /// and hole size respectively; see [`CutoutDescriptor`].
    pub size: Vec3,
    pub visible: bool,
}

/// GPU-compatible per-occluder uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OccluderUniforms {
    /// World matrix of the occluder.
    pub model: [[f32; 4]; 4],
    /// Material alpha.
    pub alpha: f32,
    /// 1.0 when drawn, 0.0 when hidden.
    pub visible: f32,
    pub render_group: u32,
    /// Padding for alignment.
    pub _padding: u32,
}

/// The full set of occluders for one committed portal.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySet {
    root: Transform,
    surfaces: [BoundarySurface; 7],
    cutout: CutoutDescriptor,
    alpha: f32,
    enabled: bool,
}

impl BoundarySet {
    /// Builds the occluders for a committed layout.
    ///
    /// The root sits at the portal centre, turned so the flat boxes stand
    /// upright in the portal plane. The set starts enabled with the cutout
    /// and the walls shown, the reverse panel and the floor hidden.
    #[must_use]
    pub fn build(layout: &PortalLayout, config: &BoundaryConfig) -> Self {
        let root = Transform {
            translation: layout.pose.position,
            rotation: layout.pose.orientation * Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2),
            scale: Vec3::ONE,
        };
        let factor = match config.offset_mode {
            OffsetMode::Fixed => 1.0,
            OffsetMode::ScaledByExtent { reference } => layout.extent.max_element() / reference,
        };
        let wall_size = Vec3::new(
            config.wall_size.x * factor,
            config.wall_size.y,
            config.wall_size.z * factor,
        );
        let cutout = CutoutDescriptor::new(config.cutout_outer, layout.extent);

        let surfaces = BoundaryKind::ALL.map(|kind| {
            let offset = config.offsets.get(kind);
            let local = Transform {
                translation: offset.rotation * (offset.translation * factor),
                rotation: offset.rotation,
                scale: Vec3::ONE,
            };
            let size = match kind {
                BoundaryKind::Cutout => cutout.plane,
                BoundaryKind::ReverseCutout => cutout.hole,
                _ => wall_size,
            };
            BoundarySurface {
                kind,
                local,
                size,
                visible: !matches!(kind, BoundaryKind::ReverseCutout | BoundaryKind::Floor),
            }
        });

        log::debug!(
            "built {} occluders around {} (offset factor {factor})",
            surfaces.len(),
            root.translation
        );

        Self {
            root,
            surfaces,
            cutout,
            alpha: config.occluder_alpha,
            enabled: true,
        }
    }

    /// Transform of the occluder root.
    #[must_use]
    pub fn root(&self) -> &Transform {
        &self.root
    }

    /// Returns all surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &[BoundarySurface] {
        &self.surfaces
    }

    /// Returns one surface.
    #[must_use]
    pub fn surface(&self, kind: BoundaryKind) -> &BoundarySurface {
        &self.surfaces[kind.index()]
    }

    /// Returns the CSG box sizes for the cutout pair.
    #[must_use]
    pub fn cutout(&self) -> &CutoutDescriptor {
        &self.cutout
    }

    /// Material alpha shared by all occluders.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns whether the set is enabled at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the set is enabled, independent of per-surface visibility.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether a surface is drawn, taking the enabled flag into account.
    #[must_use]
    pub fn is_drawn(&self, kind: BoundaryKind) -> bool {
        self.enabled && self.surface(kind).visible
    }

    /// Sets the visibility flag of one surface.
    pub fn set_visible(&mut self, kind: BoundaryKind, visible: bool) {
        self.surfaces[kind.index()].visible = visible;
    }

    /// World transform of a surface.
    #[must_use]
    pub fn world_transform(&self, kind: BoundaryKind) -> Transform {
        self.root.compose(&self.surface(kind).local)
    }

    /// Per-occluder uniforms, in [`BoundaryKind::ALL`] order.
    #[must_use]
    pub fn uniforms(&self) -> [OccluderUniforms; 7] {
        BoundaryKind::ALL.map(|kind| OccluderUniforms {
            model: self.world_transform(kind).to_matrix().to_cols_array_2d(),
            alpha: self.alpha,
            visible: if self.is_drawn(kind) { 1.0 } else { 0.0 },
            render_group: u32::from(RenderGroup::OCCLUDERS.0),
            _padding: 0,
        })
    }
}
