//! End-to-end tests driving `PortalApp` with scripted collaborators.

use std::collections::VecDeque;

use ar_portal::*;
use proptest::prelude::*;

/// Returns hits from a script, repeating the last one when it runs out.
#[derive(Default)]
struct ScriptedHits {
    script: VecDeque<Option<Pose>>,
    last: Option<Pose>,
}

impl ScriptedHits {
    fn always(pose: Pose) -> Self {
        Self {
            script: VecDeque::new(),
            last: Some(pose),
        }
    }
}

impl HitTestSource for ScriptedHits {
    fn latest_hit(&mut self) -> Option<Pose> {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[derive(Default)]
struct ScriptedController {
    axis: f32,
    pending_select: bool,
}

impl ScriptedController {
    fn press(&mut self) {
        self.pending_select = true;
    }
}

impl ControllerInput for ScriptedController {
    fn axis(&mut self) -> f32 {
        self.axis
    }

    fn take_select(&mut self) -> bool {
        std::mem::take(&mut self.pending_select)
    }
}

struct ScriptedViewer {
    position: Vec3,
    in_session: bool,
}

impl Default for ScriptedViewer {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, -4.0),
            in_session: true,
        }
    }
}

impl ViewerTracker for ScriptedViewer {
    fn viewer_position(&mut self) -> Vec3 {
        self.position
    }

    fn in_session(&mut self) -> bool {
        self.in_session
    }
}

type App = PortalApp<ScriptedHits, ScriptedController, ScriptedViewer>;

fn app(config: PortalConfig, hit: Pose) -> App {
    init_logging();
    PortalApp::new(
        config,
        ScriptedHits::always(hit),
        ScriptedController::default(),
        ScriptedViewer::default(),
    )
    .expect("default config is valid")
}

fn select(app: &mut App) -> FrameReport {
    app.controller_mut().press();
    app.frame_tick()
}

#[test]
fn test_full_placement_and_walk_through() {
    // Hit poses carry arbitrary rotation; the reticle must not inherit it.
    let p0 = Pose::new(Vec3::new(0.0, 0.0, -2.0), Quat::from_rotation_y(0.7));
    let mut app = app(
        PortalConfig {
            placement: PlacementConfig::new().with_rotation_rate(0.01),
            ..PortalConfig::default()
        },
        p0,
    );

    let report = app.frame_tick();
    assert_eq!(report.phase, PlacementPhase::Idle);
    assert!(report.marker_visible);

    let report = select(&mut app);
    assert_eq!(report.phase, PlacementPhase::AdjustRotation);
    assert!(!report.marker_visible);
    assert!(report.reticle.is_some_and(|r| r.is_visible()));

    // The select frame already ticked with axis 0.
    app.controller_mut().axis = 1.0;
    for _ in 0..10 {
        app.frame_tick();
    }
    app.controller_mut().axis = 0.0;
    let yaw = app.session().reticle().unwrap().transform().yaw();
    assert!((yaw - 0.1).abs() < 1e-4, "yaw was {yaw}");

    for expected in [
        PlacementPhase::AdjustHeight,
        PlacementPhase::AdjustScaleY,
        PlacementPhase::AdjustScaleX,
    ] {
        assert_eq!(select(&mut app).phase, expected);
        assert!(app.session().boundaries().is_none());
    }

    let report = select(&mut app);
    assert_eq!(report.phase, PlacementPhase::Committed);
    assert_eq!(report.viewer_side, Some(ViewerSide::Front));
    let layout = *app.session().layout().unwrap();
    assert!((layout.pose.position - Vec3::new(0.0, 1.0, -2.0)).length() < 1e-5);
    assert!((layout.pose.yaw() - 0.1).abs() < 1e-4);
    assert!(app.session().occluders_enabled());

    let anchor = app.session().scene_anchor().unwrap();
    assert!((anchor.translation - Vec3::new(0.0, -1.6, -2.0)).length() < 1e-5);

    // Walk through the portal.
    app.viewer_mut().position = Vec3::new(0.0, 1.6, -1.0);
    let report = app.frame_tick();
    assert_eq!(report.viewer_side, Some(ViewerSide::Beyond));
    let boundaries = app.session().boundaries().unwrap();
    assert!(boundaries.is_drawn(BoundaryKind::ReverseCutout));
    assert!(!boundaries.is_drawn(BoundaryKind::Cutout));
    assert!(!boundaries.is_drawn(BoundaryKind::Back));

    // And back again.
    app.viewer_mut().position = Vec3::new(0.0, 1.6, -3.0);
    assert_eq!(app.frame_tick().viewer_side, Some(ViewerSide::Front));

    // Selecting again does not rebuild anything.
    let before = app.session().boundaries().cloned();
    select(&mut app);
    assert_eq!(app.session().boundaries().cloned(), before);
    assert_eq!(app.session().layout(), Some(&layout));
}

#[test]
fn test_select_without_hit_is_ignored() {
    let mut app = app(PortalConfig::default(), Pose::default());
    app.hit_test_mut().last = None;
    let report = select(&mut app);
    assert_eq!(report.phase, PlacementPhase::Idle);
    assert!(!report.marker_visible);

    app.hit_test_mut().script.push_back(Some(Pose::default()));
    assert_eq!(select(&mut app).phase, PlacementPhase::AdjustRotation);
}

#[test]
fn test_input_ignored_outside_session() {
    let mut app = app(PortalConfig::default(), Pose::default());
    app.viewer_mut().in_session = false;
    assert_eq!(select(&mut app).phase, PlacementPhase::Idle);

    app.viewer_mut().in_session = true;
    assert_eq!(select(&mut app).phase, PlacementPhase::AdjustRotation);

    app.viewer_mut().in_session = false;
    app.controller_mut().axis = 1.0;
    app.frame_tick();
    assert_eq!(app.session().reticle().unwrap().transform().yaw(), 0.0);
}

#[test]
fn test_session_end_keeps_portal_by_default() {
    let mut app = app(PortalConfig::default(), Pose::default());
    while !app.session().is_committed() {
        select(&mut app);
    }
    app.viewer_mut().in_session = false;
    let report = app.frame_tick();
    assert_eq!(report.phase, PlacementPhase::Committed);
    assert_eq!(report.viewer_side, Some(ViewerSide::Front));
}

#[test]
fn test_session_end_resets_when_configured() {
    let config = PortalConfig {
        reset_on_session_end: true,
        ..PortalConfig::default()
    };
    let mut app = app(config, Pose::default());
    while !app.session().is_committed() {
        select(&mut app);
    }
    app.viewer_mut().in_session = false;
    let report = app.frame_tick();
    assert_eq!(report.phase, PlacementPhase::Idle);
    assert!(app.session().boundaries().is_none());

    // A new session places a fresh portal.
    app.viewer_mut().in_session = true;
    assert_eq!(select(&mut app).phase, PlacementPhase::AdjustRotation);
}

#[test]
fn test_variant_sequence() {
    let mut app = app(PortalConfig::variant(DemoVariant::TwoPassHeight), Pose::default());
    let phases: Vec<_> = (0..6).map(|_| select(&mut app).phase).collect();
    assert_eq!(
        phases,
        vec![
            PlacementPhase::AdjustHeight,
            PlacementPhase::AdjustScaleY,
            PlacementPhase::AdjustHeight,
            PlacementPhase::AdjustScaleX,
            PlacementPhase::AdjustFinalRotation,
            PlacementPhase::Committed,
        ]
    );
}

#[derive(Debug, Clone)]
enum Event {
    Select,
    Axis(f32),
    Move(Vec3),
    LoseHit,
}

fn any_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Select),
        (-1.5f32..1.5).prop_map(Event::Axis),
        (-5.0f32..5.0, -5.0f32..5.0).prop_map(|(x, z)| Event::Move(Vec3::new(x, 1.6, z))),
        Just(Event::LoseHit),
    ]
}

proptest! {
    #[test]
    fn prop_commit_happens_once_and_is_frozen(
        events in prop::collection::vec(any_event(), 0..120),
    ) {
        let hit = Pose::from_position(Vec3::new(0.0, 0.0, -2.0));
        let mut app = app(PortalConfig::default(), hit);
        let mut committed: Option<PortalLayout> = None;
        for event in events {
            match event {
                Event::Select => app.controller_mut().press(),
                Event::Axis(a) => app.controller_mut().axis = a,
                Event::Move(p) => app.viewer_mut().position = p,
                Event::LoseHit => app.hit_test_mut().script.push_back(None),
            }
            let report = app.frame_tick();
            if let Some(reticle) = report.reticle {
                let scale = reticle.transform().scale;
                prop_assert!(scale.x >= 0.1 && scale.y >= 0.1);
            }
            match (committed, app.session().layout()) {
                (Some(before), Some(now)) => prop_assert_eq!(&before, now),
                (Some(_), None) => prop_assert!(false, "portal disappeared"),
                (None, Some(now)) => committed = Some(*now),
                (None, None) => prop_assert!(report.viewer_side.is_none()),
            }
        }
    }
}
