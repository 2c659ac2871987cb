//! Text-only console walkthrough of the navigation engine
//!
//! Runs a fully simulated session: type a destination request, watch the
//! confirmation, camera handoff, step progression and arrival play out as
//! printed events. This is also the degraded path for platforms without
//! camera support.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use wayfinder_agent::{NavigationSession, SessionConfig, SessionEvent};
use wayfinder_config::{load_settings, Settings};
use wayfinder_media::TextSubmission;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = std::env::var("WAYFINDER_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}. Using defaults.");
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::info!("Starting wayfinder v{}", env!("CARGO_PKG_VERSION"));

    if !settings.features.voice_navigation {
        println!("Voice navigation is disabled by configuration.");
        return Ok(());
    }

    let (session, _speech) = NavigationSession::simple(SessionConfig::from_settings(&settings));

    // Print session events as they happen
    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            print_event(&event);
        }
    });

    println!("Where would you like to go? (try: \"take me to the conference room\")");
    println!("Commands: cancel, retry, flip, quit");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                match input {
                    "" => continue,
                    "quit" | "exit" => break,
                    "cancel" => session.cancel(),
                    "retry" => {
                        if !session.retry() {
                            println!("Nothing to retry.");
                        }
                    }
                    "flip" => {
                        let camera = session.camera();
                        let next = camera.facing().flipped();
                        match camera.switch_facing(next).await {
                            Ok(()) => println!("Camera facing {next}."),
                            Err(err) => println!("Could not switch camera: {err}"),
                        }
                    }
                    text => {
                        session.submit(&TextSubmission::Typed(text.to_string()));
                    }
                }
            }
            _ = shutdown_signal() => break,
        }
    }

    session.cancel();
    printer.abort();
    tracing::info!("Session ended");
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged { from, to } => println!("  [{from:?} -> {to:?}]"),
        SessionEvent::IntentRecognized(intent) => {
            println!("  Understood: {} ({:?})", intent.destination, intent.confidence)
        }
        SessionEvent::NoIntent { .. } => println!("  (no navigation intent)"),
        SessionEvent::Speaking { text } => println!("  says: {text}"),
        SessionEvent::CameraActive { facing } => println!("  Camera active ({facing})"),
        SessionEvent::CameraFailed { message, retriable, .. } => {
            if *retriable {
                println!("  Camera failed: {message} (type \"retry\" to try again)");
            } else {
                println!("  Camera failed: {message}");
            }
        }
        SessionEvent::StepAdvanced { index, instruction } => match instruction {
            Some(instruction) => println!("  Step {index}: {instruction}"),
            None => println!("  Step {index}"),
        },
        SessionEvent::Arrived { destination } => println!("  Arrived at {destination}."),
        SessionEvent::Cancelled => println!("  Navigation cancelled."),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("wayfinder={level}").into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
