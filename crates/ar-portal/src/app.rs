//! The per-frame driver connecting a [`PortalSession`] to the host.

use ar_portal_core::{FrameInput, FrameReport, PortalConfig, PortalSession, Result};

use crate::host::{ControllerInput, HitTestSource, ViewerTracker};

/// Owns a portal session and its three collaborators.
///
/// Call [`PortalApp::frame_tick`] once per rendered frame.
pub struct PortalApp<H, C, V> {
    session: PortalSession,
    hit_test: H,
    controller: C,
    viewer: V,
    was_in_session: bool,
}

impl<H, C, V> PortalApp<H, C, V>
where
    H: HitTestSource,
    C: ControllerInput,
    V: ViewerTracker,
{
    /// Creates the app with a validated configuration.
    pub fn new(config: PortalConfig, hit_test: H, controller: C, viewer: V) -> Result<Self> {
        let session = PortalSession::new(config)?;
        log::info!("ar-portal app created");
        Ok(Self {
            session,
            hit_test,
            controller,
            viewer,
            was_in_session: false,
        })
    }

    /// Returns the session.
    pub fn session(&self) -> &PortalSession {
        &self.session
    }

    /// Returns the session mutably, e.g. to call `reset`.
    pub fn session_mut(&mut self) -> &mut PortalSession {
        &mut self.session
    }

    pub fn hit_test_mut(&mut self) -> &mut H {
        &mut self.hit_test
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Runs one frame.
    ///
    /// Order: session-end detection, hit test, select, then the session
    /// frame with the current axis and viewer position. Selects outside an
    /// XR session are consumed and dropped.
    pub fn frame_tick(&mut self) -> FrameReport {
        let in_session = self.viewer.in_session();
        if self.was_in_session && !in_session {
            self.session_ended();
        }
        self.was_in_session = in_session;

        self.session.observe_hit_test(self.hit_test.latest_hit());
        if self.controller.take_select() {
            if in_session {
                self.session.select();
            } else {
                log::debug!("select ignored outside an XR session");
            }
        }

        let input = FrameInput {
            axis: self.controller.axis(),
            viewer_position: self.viewer.viewer_position(),
            in_session,
        };
        self.session.frame(input)
    }

    /// Forwards a session-ended notification to the session.
    pub fn session_ended(&mut self) {
        log::info!("XR session ended");
        self.session.session_ended();
    }

    /// Consumes the app, returning the session.
    pub fn into_session(self) -> PortalSession {
        self.session
    }
}
