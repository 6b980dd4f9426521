//! capdeck showcase
//!
//! The home screen's eight capability buttons and the video screen, run in
//! a terminal:
//! 1. Key press -> Shell components -> ShellActions
//! 2. Shell::update reduces them and returns Effects
//! 3. Trigger effects run on the Dispatcher in their own tasks
//! 4. Providers answer through the UiBridge and the Shell applies it
//! 5. Redraw when something changed
//!
//! # Usage
//!
//! ```sh
//! cargo run -p capdeck-showcase -- --assets ./sounds --pick-dir ~/Downloads
//! RUST_LOG=capdeck=debug cargo run -p capdeck-showcase -- --config demos/showcase/showcase.toml
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use capdeck::{
    standard_actions, DispatchError, DispatchResult, Dispatcher, LoggingMiddleware, Navigator,
    ShowcaseConfig, VideoScreen,
};
use capdeck_tui::{
    process_raw_event, spawn_event_poller, terminal_capabilities, Effect, EventKind, Shell,
    ShellContent, UiBridge,
};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_TICK: Duration = Duration::from_millis(50);

/// Terminal showcase for capdeck capability actions
#[derive(Parser, Debug)]
#[command(name = "capdeck-showcase")]
#[command(about = "Home and video screens driven by capdeck actions")]
struct Args {
    /// TOML config file; flags below override it
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory bundled audio assets are resolved against
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Directory the file picker lists
    #[arg(long)]
    pick_dir: Option<PathBuf>,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<ShowcaseConfig, capdeck::ConfigError> {
    let mut config = match &args.config {
        Some(path) => ShowcaseConfig::load(path)?,
        None => ShowcaseConfig::default(),
    };
    if let Some(assets) = &args.assets {
        config.assets_dir = assets.clone();
    }
    if let Some(dir) = &args.pick_dir {
        config.picker.directory = Some(dir.clone());
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    config.validate()?;
    Ok(config)
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("capdeck")
        .join("showcase.log")
}

fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(source) = std::error::Error::source(&e) {
                eprintln!("Details: {source}");
            }
            std::process::exit(1);
        }
    };

    let log_file = config.log_file.clone().unwrap_or_else(default_log_file);
    if let Err(e) = init_logging(&log_file) {
        eprintln!("Error: could not open log file {}: {e}", log_file.display());
        std::process::exit(1);
    }
    info!(log_file = %log_file.display(), "Starting showcase");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "Showcase exited with an error");
    }
    result
}

type Finished = (String, Result<DispatchResult, DispatchError>);

struct Session {
    dispatcher: Arc<Dispatcher>,
    navigator: Arc<dyn Navigator>,
    video: VideoScreen,
    finished_tx: mpsc::UnboundedSender<Finished>,
}

impl Session {
    /// Perform one effect. Returns `false` when the app should quit.
    fn perform(&self, effect: Effect) -> bool {
        match effect {
            Effect::Trigger(name) => {
                let dispatcher = self.dispatcher.clone();
                let tx = self.finished_tx.clone();
                tokio::spawn(async move {
                    let result = dispatcher.trigger(&name).await;
                    let _ = tx.send((name, result));
                });
            }
            Effect::GoBack => self.video.go_back(),
            Effect::Navigate(screen) => self.navigator.navigate_to(screen),
            Effect::Quit => return false,
        }
        true
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: ShowcaseConfig,
) -> io::Result<()> {
    let (bridge, mut ui_rx) = UiBridge::channel();
    let caps = terminal_capabilities(&bridge, &config);
    let navigator = caps.navigator.clone();
    let video = VideoScreen::new(config.video.video_id.clone(), caps.navigator.clone());

    let dispatcher = Dispatcher::with_actions(caps, standard_actions(&config))
        .map_err(io::Error::other)?
        .with_middleware(LoggingMiddleware::new());
    let dispatcher = Arc::new(dispatcher);

    let content = ShellContent::from_actions(dispatcher.actions())
        .with_video(video.video_id(), video.watch_url())
        .with_filter(config.picker.filter.as_str());
    let mut shell = Shell::new(content);

    let (finished_tx, mut finished_rx) = mpsc::unbounded_channel::<Finished>();
    let session = Session {
        dispatcher: dispatcher.clone(),
        navigator,
        video,
        finished_tx,
    };

    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let poller = spawn_event_poller(raw_tx, Duration::from_millis(16), cancel.clone());
    let mut ticker = tokio::time::interval(FRAME_TICK);

    let mut dirty = true;
    'main: loop {
        if dirty {
            terminal.draw(|frame| shell.render(frame, Instant::now()))?;
            dirty = false;
        }

        tokio::select! {
            Some(raw) = raw_rx.recv() => {
                let Some(event) = process_raw_event(raw) else {
                    continue;
                };
                if let EventKind::Resize(..) = event {
                    dirty = true;
                    continue;
                }
                for action in shell.handle_event(&event) {
                    let update = shell.update(action);
                    dirty |= update.changed;
                    for effect in update.effects {
                        if !session.perform(effect) {
                            break 'main;
                        }
                    }
                }
            }
            Some(request) = ui_rx.recv() => {
                shell.apply(request, Instant::now());
                dirty = true;
            }
            Some((name, result)) = finished_rx.recv() => {
                match result {
                    Ok(result) => {
                        if let Some(failure) = result.failure() {
                            warn!(action = %name, %failure, "Action failed");
                        }
                        shell.record(&result);
                    }
                    Err(e) => error!(action = %name, error = %e, "Trigger rejected"),
                }
                dirty = true;
            }
            _ = ticker.tick() => {
                dirty |= shell.tick(Instant::now());
            }
        }
    }

    info!("Shutting down");
    cancel.cancel();
    dispatcher.teardown();
    let _ = poller.await;
    Ok(())
}
