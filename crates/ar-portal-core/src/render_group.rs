//! Render groups and their depth-buffer policy.
//!
//! The masking only works with a fixed draw order: occluders write depth
//! first, the virtual world is drawn against that depth without clearing it,
//! and overlays (reticle, frame) come last.

use serde::{Deserialize, Serialize};

/// Draw-order tag understood by the host renderer. Lower groups draw first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RenderGroup(pub u8);

impl RenderGroup {
    /// Depth-only occluders around the portal.
    pub const OCCLUDERS: Self = Self(0);
    /// The virtual scene seen through the portal.
    pub const VIRTUAL_WORLD: Self = Self(1);
    /// Reticle, marker and portal frame.
    pub const OVERLAY: Self = Self(2);

    /// Returns whether depth and stencil are cleared before this group draws.
    #[must_use]
    pub fn clears_depth_stencil(self) -> bool {
        self != Self::VIRTUAL_WORLD
    }

    /// Clear policy for the three groups, in draw order.
    #[must_use]
    pub fn policies() -> [(RenderGroup, bool); 3] {
        [Self::OCCLUDERS, Self::VIRTUAL_WORLD, Self::OVERLAY].map(|g| (g, g.clears_depth_stencil()))
    }
}

impl Default for RenderGroup {
    fn default() -> Self {
        Self::OCCLUDERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_world_keeps_occluder_depth() {
        assert!(RenderGroup::OCCLUDERS.clears_depth_stencil());
        assert!(!RenderGroup::VIRTUAL_WORLD.clears_depth_stencil());
    }

    #[test]
    fn test_policies_in_draw_order() {
        let groups: Vec<_> = RenderGroup::policies().iter().map(|(g, _)| *g).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
    }
}
