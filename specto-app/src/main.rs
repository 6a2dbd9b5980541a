//! Specto - real-time audio spectrum analyzer
//!
//! Captures an input device, runs each window through the spectral
//! pipeline and draws the result in the terminal.

mod cli;
mod config;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use specto_analysis::{Pipeline, PipelineConfig, SpectrumReader};
use specto_audio::{list_input_devices, CaptureEngine, CaptureSettings};
use specto_input::{Command, InputHandler, Mode};
use specto_tui::{AppState, HelpWidget, SpectrumWidget, StatusBarWidget, Theme};

use crate::cli::Args;
use crate::config::Config;

/// Frame rate for UI updates
const FPS: u64 = 30;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    if args.list_devices {
        return print_devices();
    }

    let mut config = Config::load(args.config.as_deref()).context("failed to read config file")?;
    config.apply_args(&args);

    if args.save_config {
        let path = args.config.clone().unwrap_or_else(Config::config_path);
        config.save_to(&path).context("failed to write config file")?;
        println!("Saved settings to {}", path.display());
        return Ok(());
    }

    // Reject bad settings before the terminal is taken over
    let pipeline_config = PipelineConfig::new(config.window_size, config.sample_rate, config.scale_factor)
        .context("invalid pipeline settings")?;
    let theme = Theme::by_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });

    let pipeline = Pipeline::new(pipeline_config);
    let reader = pipeline.reader();
    let mut app = AppState::new(
        pipeline_config.window_size(),
        pipeline_config.scale_factor(),
        config.ceiling,
        theme,
    );

    let settings = CaptureSettings {
        device_index: config.device_index,
        sample_rate: config.sample_rate,
    };
    let mut engine = CaptureEngine::spawn(settings, pipeline);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run main event loop
    let result = run_app(&mut terminal, &engine, &reader, &mut app);

    // Cleanup
    engine.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(
        frames = app.frame_count,
        fresh = app.fresh_frames,
        skipped_reads = reader.skipped_reads(),
        "exiting"
    );
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("specto");
    let file = fs::create_dir_all(&dir).and_then(|_| File::create(dir.join("specto.log")));

    // Best effort, run without logs rather than fail
    if let Ok(file) = file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}

fn print_devices() -> anyhow::Result<()> {
    let devices = list_input_devices().context("failed to enumerate input devices")?;
    if devices.is_empty() {
        println!("No input devices found");
    }
    for device in devices {
        println!("{}", device);
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &CaptureEngine,
    reader: &SpectrumReader,
    app: &mut AppState,
) -> anyhow::Result<()> {
    let mut input_handler = InputHandler::new();
    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    app.set_message("Specto | Press ? for help, : for commands");

    loop {
        // Process capture events
        while let Some(event) = engine.try_event() {
            app.handle_capture_event(event);
        }

        // Busy producer: keep showing the previous frame. The `Arc` is
        // released right away so the producer can recycle it.
        app.update_spectrum(reader.current_spectrum().as_deref());

        // Render
        terminal.draw(|frame| render_ui(frame, app))?;

        // Handle input
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = input_handler.handle_key(key) {
                    if !handle_command(app, cmd) {
                        break;
                    }
                }

                // Help can also be toggled from a `:` command
                if app.show_help != (input_handler.mode() == Mode::Help) {
                    input_handler.set_mode(if app.show_help { Mode::Help } else { Mode::Normal });
                }
                app.mode = input_handler.mode();
                app.command_buffer = input_handler.command_buffer().to_string();
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    Ok(())
}

/// Apply a command to the UI state; `false` means quit
fn handle_command(app: &mut AppState, cmd: Command) -> bool {
    match cmd {
        Command::ZoomIn => app.zoom_in(),
        Command::ZoomOut => app.zoom_out(),
        Command::ResetZoom => app.reset_zoom(),
        Command::SetCeiling(value) => app.set_ceiling(value),

        Command::ToggleFreeze => app.toggle_freeze(),
        Command::TogglePeaks => app.toggle_peaks(),
        Command::CycleTheme => app.cycle_theme(),
        Command::SetTheme(name) => app.set_theme(&name),
        Command::ToggleHelp => app.toggle_help(),

        Command::EnterCommandMode | Command::EnterNormalMode => app.clear_message(),
        Command::ExecuteCommand(input) => app.set_error(format!("Unknown command: {}", input)),

        Command::Quit => return false,
    }
    true
}

fn render_ui(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Min(3),    // Spectrum
        Constraint::Length(2), // Status bar
    ])
    .split(frame.area());

    if app.show_help {
        frame.render_widget(HelpWidget::new(&app.theme), chunks[0]);
    } else {
        let spectrum = SpectrumWidget::new(&app.spectrum, app.ceiling, &app.theme)
            .peaks(app.peaks())
            .frozen(app.frozen);
        frame.render_widget(spectrum, chunks[0]);
    }

    frame.render_widget(StatusBarWidget::new(app), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(512, 100.0, 2000.0, Theme::default())
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut app = state();
        assert!(!handle_command(&mut app, Command::Quit));
        assert!(handle_command(&mut app, Command::ZoomIn));
    }

    #[test]
    fn test_commands_reach_state() {
        let mut app = state();
        handle_command(&mut app, Command::SetTheme("cyber".into()));
        assert_eq!(app.theme.name, "cyberpunk");

        handle_command(&mut app, Command::ToggleFreeze);
        assert!(app.frozen);

        handle_command(&mut app, Command::SetCeiling(500.0));
        assert_eq!(app.ceiling, 500.0);

        handle_command(&mut app, Command::ExecuteCommand("bogus".into()));
        assert_eq!(app.message.as_deref(), Some("Unknown command: bogus"));
    }
}
