//! End-to-end session flows over the fully simulated device stack

use std::sync::Arc;
use std::time::Duration;

use wayfinder_agent::{NavigationSession, SessionConfig, SessionEvent, SessionState};
use wayfinder_core::{CameraError, Facing, IntentConfidence, RouteKey};
use wayfinder_media::{
    AcquisitionError, CameraConfig, CameraSessionManager, MemorySynthesizer, SimulatedCamera,
    SimulatedSink,
};
use wayfinder_routing::plan_route;

async fn drive_to_arrival(
    events: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    loop {
        let event = events.recv().await.expect("event stream closed");
        let arrived = matches!(event, SessionEvent::Arrived { .. });
        seen.push(event);
        if arrived {
            return seen;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn pharmacy_command_runs_the_whole_flow() {
    let (session, speech) = NavigationSession::simple(SessionConfig::default());
    let mut events = session.subscribe();

    // No route key is registered for "pharmacy", so the generic route is used
    assert_eq!(plan_route("the pharmacy").key, RouteKey::Generic);

    let intent = session.submit_text("take me to the pharmacy").unwrap();
    assert_eq!(intent.destination, "the pharmacy");
    assert_eq!(intent.confidence, IntentConfidence::Matched);

    let seen = drive_to_arrival(&mut events).await;

    // Camera came up before any step advanced
    let camera_pos = seen
        .iter()
        .position(|e| matches!(e, SessionEvent::CameraActive { .. }))
        .expect("camera never became active");
    let first_step = seen
        .iter()
        .position(|e| matches!(e, SessionEvent::StepAdvanced { .. }))
        .expect("no step advanced");
    assert!(camera_pos < first_step);

    // Generic route has three nodes, so two advancement events
    let steps = seen
        .iter()
        .filter(|e| matches!(e, SessionEvent::StepAdvanced { .. }))
        .count();
    assert_eq!(steps, 2);

    assert_eq!(session.state(), SessionState::Arrived);
    assert!(session.camera().is_active());

    let spoken = speech.spoken_texts();
    assert_eq!(spoken[0], "Navigating to the pharmacy. Follow me!");
    assert_eq!(
        spoken[1],
        "Starting navigation to the pharmacy. Look for the green arrow to guide you."
    );
    assert_eq!(
        spoken.last().unwrap(),
        "You have arrived at the pharmacy!"
    );
    // Every spoken utterance carries the configured prosody
    for utterance in speech.spoken() {
        assert!((utterance.rate - 0.9).abs() < f32::EPSILON);
        assert!((utterance.pitch - 1.0).abs() < f32::EPSILON);
    }
}

#[tokio::test(start_paused = true)]
async fn overconstrained_camera_still_reaches_any_camera_level() {
    let backend = Arc::new(SimulatedCamera::with_script(vec![
        Err(AcquisitionError::Overconstrained),
        Err(AcquisitionError::Overconstrained),
    ]));
    let camera = Arc::new(CameraSessionManager::new(
        backend.clone(),
        Arc::new(SimulatedSink::ready()),
        CameraConfig::default(),
    ));
    let session = NavigationSession::new(
        SessionConfig::default(),
        camera,
        Arc::new(MemorySynthesizer::new()),
    );
    let mut events = session.subscribe();

    session.submit_text("navigate to conference room").unwrap();
    drive_to_arrival(&mut events).await;

    // The third, unconstrained attempt is what succeeded
    let log = backend.open_log();
    assert_eq!(log.len(), 3);
    assert!(log[2].facing.is_none());
    assert_eq!(session.state(), SessionState::Arrived);
}

#[tokio::test(start_paused = true)]
async fn consecutive_navigations_never_hold_two_streams() {
    let backend = Arc::new(SimulatedCamera::granting());
    let camera = Arc::new(CameraSessionManager::new(
        backend.clone(),
        Arc::new(SimulatedSink::ready()),
        CameraConfig::default(),
    ));
    let session = NavigationSession::new(
        SessionConfig::default(),
        camera,
        Arc::new(MemorySynthesizer::new()),
    );
    let mut events = session.subscribe();

    session.submit_text("navigate to cafeteria").unwrap();
    drive_to_arrival(&mut events).await;

    let tracks_before = backend.issued_track_count();
    session.submit_text("navigate to conference room").unwrap();
    drive_to_arrival(&mut events).await;

    // Every track from the first run was stopped before the second attached
    assert_eq!(backend.stopped_track_count(), tracks_before);
    assert!(session.camera().is_active());
}

#[tokio::test(start_paused = true)]
async fn denied_camera_surfaces_message_and_session_fails() {
    let camera = Arc::new(CameraSessionManager::new(
        Arc::new(SimulatedCamera::with_script(vec![
            Err(AcquisitionError::NotAllowed),
            Err(AcquisitionError::NotAllowed),
            Err(AcquisitionError::NotAllowed),
        ])),
        Arc::new(SimulatedSink::ready()),
        CameraConfig::default(),
    ));
    let speech = Arc::new(MemorySynthesizer::new());
    let session = NavigationSession::new(SessionConfig::default(), camera, speech);
    let mut events = session.subscribe();

    session.submit_text("take me to the lab").unwrap();

    loop {
        if let SessionEvent::CameraFailed {
            error,
            message,
            retriable,
        } = events.recv().await.unwrap()
        {
            assert_eq!(error, CameraError::PermissionDenied);
            assert_eq!(message, CameraError::PermissionDenied.user_message());
            assert!(!retriable);
            break;
        }
    }

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.last_error(), Some(CameraError::PermissionDenied));
    assert!(!session.retry());
}

#[tokio::test(start_paused = true)]
async fn cancel_during_handoff_delay_never_touches_the_camera() {
    let backend = Arc::new(SimulatedCamera::granting());
    let camera = Arc::new(CameraSessionManager::new(
        backend.clone(),
        Arc::new(SimulatedSink::ready()),
        CameraConfig::default(),
    ));
    let session = NavigationSession::new(
        SessionConfig::default(),
        camera,
        Arc::new(MemorySynthesizer::new()),
    );

    session.submit_text("navigate to cafeteria").unwrap();
    // Still inside the 2 s handoff delay
    tokio::time::sleep(Duration::from_millis(500)).await;
    session.cancel();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.state(), SessionState::Idle);
    assert!(backend.open_log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn preferred_facing_follows_configuration() {
    let config = SessionConfig {
        camera: CameraConfig {
            preferred_facing: Facing::User,
            ..CameraConfig::default()
        },
        ..SessionConfig::default()
    };
    let (session, _speech) = NavigationSession::simple(config);
    let mut events = session.subscribe();

    session.submit_text("navigate to conference room").unwrap();
    loop {
        if let SessionEvent::CameraActive { facing } = events.recv().await.unwrap() {
            assert_eq!(facing, Facing::User);
            break;
        }
    }
    assert!(session.camera().is_mirrored());
}
