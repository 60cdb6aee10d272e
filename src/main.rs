#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fallingboxes::app::{App, AppResult};
use fallingboxes::components::Surface;
use fallingboxes::config::{self, Config};
use fallingboxes::sound::AudioState;
use fallingboxes::ui;
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "fallingboxes.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .expect("Failed to create log file");

    let stderr_handle = std::io::stderr();
    let stderr_fd = stderr_handle.as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Falling Boxes");

    let config = match config::loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            Config::default()
        }
    };

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // The surface is measured once; its edges become the physics boundary
    let size = terminal.size()?;
    let inner = ui::surface_area(Rect::new(0, 0, size.width, size.height));
    let surface = Surface::from_cells(
        inner.width,
        inner.height,
        config.display.cell_width,
        config.display.cell_height,
    );

    let tick_rate = Duration::from_millis(16); // ~60 FPS
    let app = App::with_rapier(&config, surface);
    let res = run_app(&mut terminal, app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App, tick_rate: Duration) -> AppResult<()> {
    let mut last_tick = Instant::now();
    let mut audio_error_logged = false;

    // Flush anything typed before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if last_tick.elapsed() >= tick_rate {
            let delta_seconds = last_tick.elapsed().as_secs_f32();
            last_tick = Instant::now();

            app.on_tick(delta_seconds);
            terminal.draw(|f| ui::render(f, &mut app))?;

            let audio_unavailable = !app.world.resource::<AudioState>().is_audio_available();
            if audio_unavailable && !audio_error_logged {
                error!("Audio device is unavailable. Continuing without sound.");
                audio_error_logged = true;
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(5))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                debug!("Key event: {key:?}");

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                    KeyCode::Enter | KeyCode::Char(' ' | 'o') => {
                        app.acknowledge();
                    }
                    KeyCode::Char('m') => app.toggle_sound(),
                    KeyCode::Char('+' | '=') => app.change_volume(0.1),
                    KeyCode::Char('-' | '_') => app.change_volume(-0.1),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                debug!("Terminal resized to {width}x{height}");
                let inner = ui::surface_area(Rect::new(0, 0, width, height));
                app.resize(inner.width, inner.height);
            }
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    continue;
                }

                let area = terminal.get_frame().area();
                if app.is_game_over_pending() {
                    if ui::rect_contains(ui::dialog_area(area), mouse.column, mouse.row) {
                        app.acknowledge();
                    }
                    continue;
                }

                let inner = ui::surface_area(area);
                if ui::rect_contains(inner, mouse.column, mouse.row) {
                    let point = app
                        .surface()
                        .cell_to_point(mouse.column - inner.x, mouse.row - inner.y);
                    app.tap(point);
                }
            }
            _ => {}
        }
    }
}
