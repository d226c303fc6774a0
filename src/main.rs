use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use voxcursor::buffer::AudioFrameBuffer;
use voxcursor::config::Config;
use voxcursor::monitor::{self, POLL_INTERVAL, SILENCE_THRESHOLD};
use voxcursor::state::RuntimeState;
use voxcursor::typing::{DebugSink, InputMethod, TextSink, TypingEngine, TypingInput};
use voxcursor::{capture, session};

#[derive(Parser)]
#[command(name = "voxcursor", about = "Dictate into whatever has keyboard focus")]
struct Cli {
    /// Path to config file (default: voxcursor.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log committed text instead of typing it
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref());
    if cli.debug {
        config.session.debug = true;
    }
    let debug = config.session.debug;

    let state = RuntimeState::new();
    let r = Arc::clone(&state);
    ctrlc::set_handler(move || r.request_shutdown())?;

    let frame_buffer = AudioFrameBuffer::new(Arc::clone(&state));

    // cpal streams are !Send, so the capture stream lives here on the main
    // thread for the whole session. A device failure is fatal before any
    // session begins.
    let _stream = capture::start_capture(frame_buffer.writer())?;

    let frames = frame_buffer.reader();
    let backend = config.backend.clone();
    let session_state = Arc::clone(&state);
    let session_handle = thread::spawn(move || {
        // Enigo and the clipboard are tied to this thread, so the sink and
        // engine are built here rather than in main.
        let sink: Box<dyn TextSink> = if debug {
            Box::new(DebugSink)
        } else {
            match TypingInput::new(InputMethod::from_str(&config.typing.method)) {
                Ok(input) => Box::new(input),
                Err(e) => {
                    eprintln!("Typing init error: {}", e);
                    session_state.request_shutdown();
                    return;
                }
            }
        };
        let mut engine = TypingEngine::new(sink, Arc::clone(&session_state), debug);

        let result = session::run_session(
            &backend,
            frames,
            &mut engine,
            Arc::clone(&session_state),
            debug,
        );
        if let Err(e) = result {
            eprintln!("Streaming error: {}", e);
        }
        // A finished stream ends the session either way; no reconnects.
        session_state.request_shutdown();
    });

    let monitor_state = Arc::clone(&state);
    let monitor_handle = thread::spawn(move || {
        monitor::run_monitor(monitor_state, SILENCE_THRESHOLD, POLL_INTERVAL, debug);
    });

    println!(
        "Listening... speak to type at the cursor. Ctrl+C or {}s of silence to stop.",
        SILENCE_THRESHOLD.as_secs()
    );

    let _ = session_handle.join();
    let _ = monitor_handle.join();
    frame_buffer.close();

    Ok(())
}
