//! Collaborators supplied by the host application.
//!
//! Each trait covers one external service the portal session reads from once
//! per frame. Implementations usually wrap an XR runtime; tests use scripted
//! fakes.

use ar_portal_core::{Pose, Vec3};

/// Surface hit-testing against the real world.
pub trait HitTestSource {
    /// Latest hit pose, or `None` when no surface is found this frame.
    fn latest_hit(&mut self) -> Option<Pose>;
}

/// Controller buttons and thumbstick.
pub trait ControllerInput {
    /// Vertical thumbstick value in [-1, 1].
    fn axis(&mut self) -> f32;

    /// Returns true once per select press, consuming it.
    fn take_select(&mut self) -> bool;
}

/// Viewer (headset camera) tracking.
pub trait ViewerTracker {
    /// Viewer position in world space.
    fn viewer_position(&mut self) -> Vec3;

    /// Whether an immersive session is currently running.
    fn in_session(&mut self) -> bool;
}

impl<T: HitTestSource + ?Sized> HitTestSource for &mut T {
    fn latest_hit(&mut self) -> Option<Pose> {
        (**self).latest_hit()
    }
}

impl<T: ControllerInput + ?Sized> ControllerInput for &mut T {
    fn axis(&mut self) -> f32 {
        (**self).axis()
    }

    fn take_select(&mut self) -> bool {
        (**self).take_select()
    }
}

impl<T: ViewerTracker + ?Sized> ViewerTracker for &mut T {
    fn viewer_position(&mut self) -> Vec3 {
        (**self).viewer_position()
    }

    fn in_session(&mut self) -> bool {
        (**self).in_session()
    }
}
