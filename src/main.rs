//! petfetch — fetch animal data, browse it in the terminal, save favorites.
//!
//! ## Architecture overview
//!
//! ```text
//!  RequestSource ─► Transfer ─► PayloadDecoder      (request / transfer / decode)
//!         └────────────┴──────────────┘
//!                   Fetcher::fetch<T>                (fetcher)
//!                          │
//!                   AnimalService ───► Persister     (animal / persist)
//!                          │ AnimalViewData
//!                          ▼
//!      events (channel) ─► app.rs ─► ui.rs           (terminal consumer)
//!                            ▲
//!                        input.rs
//! ```
//!
//! * **`request`** — where the bytes live (`RemoteRequest`, `FileRequest`).
//! * **`transfer`** — doing the I/O for a request (`Transport`).
//! * **`decode`** — bytes to typed values (`JsonDecoder`).
//! * **`fetcher`** — the generic `fetch<T>` contract composing the three.
//! * **`persist`** — key/value saves, separate from fetching.
//! * **`animal`** — wire records, view data, and the service between them.
//! * **`events`**, **`app`**, **`ui`**, **`input`** — the terminal consumer.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop (or print once with `--print`).

mod animal;
mod app;
mod config;
mod decode;
mod error;
mod events;
mod fetcher;
mod input;
mod persist;
mod request;
mod transfer;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use animal::{AnimalLoader, AnimalService};
use app::App;
use config::{Config, SourceConfig};
use decode::JsonDecoder;
use fetcher::Fetcher;
use persist::PreferenceStore;
use request::{FileRequest, RemoteRequest, RequestSource};
use transfer::Transport;

// ---------------------------------------------------------------------------
// Terminal lifetime
// ---------------------------------------------------------------------------

/// Holds the terminal in raw mode on the alternate screen until dropped.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Leave raw mode before the default hook prints a panic, so the message is
/// readable.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Route logs to `--log-file`, to stderr in print mode, or nowhere while the
/// TUI owns the terminal.
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (&config.log_file, config.print) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        (None, false) => {}
    }
    Ok(())
}

/// Build the loader for the configured source. Only the request source
/// differs between the arms.
fn build_loader(
    config: &Config,
    store: Arc<PreferenceStore>,
    on_saved: Option<mpsc::Sender<events::AppMsg>>,
) -> Result<Box<dyn AnimalLoader>> {
    let client = reqwest::blocking::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let transport = Transport::new(client);

    match &config.source {
        SourceConfig::Remote { host, resource } => {
            let source = RemoteRequest::new(host, resource)?;
            Ok(service(source, transport, store, &config.category, on_saved))
        }
        SourceConfig::File { path } => {
            let source = FileRequest::new(path);
            Ok(service(source, transport, store, &config.category, on_saved))
        }
    }
}

fn service<S: RequestSource + 'static>(
    source: S,
    transport: Transport,
    store: Arc<PreferenceStore>,
    category: &str,
    on_saved: Option<mpsc::Sender<events::AppMsg>>,
) -> Box<dyn AnimalLoader> {
    let fetcher = Fetcher::new(source, transport, JsonDecoder);
    let service = AnimalService::new(fetcher, store, category);
    match on_saved {
        Some(tx) => Box::new(service.on_saved(events::save_notifier(tx))),
        None => Box::new(service),
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Fetch once and write one line per item to `out`.
///
/// A failed load is returned as an error, which `main` turns into a
/// message on stderr and a non-zero exit status.
fn print_once(loader: &dyn AnimalLoader, out: &mut impl Write) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    events::spawn_load(loader, tx);

    match rx.recv().context("load finished without reporting")? {
        events::AppMsg::Loaded(items) => {
            for item in &items {
                let marker = if item.is_favorite() { "★" } else { " " };
                match &item.subtitle {
                    Some(subtitle) => writeln!(out, "{marker} {} ({subtitle})", item.title)?,
                    None => writeln!(out, "{marker} {}", item.title)?,
                }
            }
            info!(count = items.len(), "printed");
            Ok(())
        }
        events::AppMsg::LoadFailed(e) => Err(e).context("failed to load animals"),
        events::AppMsg::Saved(_) | events::AppMsg::SaveFailed(_) => {
            anyhow::bail!("unexpected save message during load")
        }
    }
}

fn run_tui(
    loader: Box<dyn AnimalLoader>,
    tx: mpsc::Sender<events::AppMsg>,
    rx: mpsc::Receiver<events::AppMsg>,
) -> Result<()> {
    install_panic_hook();

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(loader, tx);
    app.reload();

    // ~10 fps: drain messages, render, poll input.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_args()?;
    init_logging(&config)?;

    let store = Arc::new(
        PreferenceStore::open(&config.store_path).context("failed to open favorites store")?,
    );
    info!(
        source = ?config.source,
        category = %config.category,
        favorites = store.count(),
        "starting"
    );

    if config.print {
        let loader = build_loader(&config, store, None)?;
        return print_once(loader.as_ref(), &mut io::stdout().lock());
    }

    let (tx, rx) = mpsc::channel();
    let loader = build_loader(&config, store, Some(tx.clone()))?;
    run_tui(loader, tx, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use crate::animal::{AnimalViewData, FavoriteAction, LoadCompletion};
    use crate::error::FetchError;

    /// Completes every load with a fixed outcome on a background thread.
    struct Fixed(Result<Vec<(&'static str, Option<&'static str>, bool)>, FetchError>);

    impl AnimalLoader for Fixed {
        fn category(&self) -> &str {
            "dogs"
        }

        fn load(&self, completion: LoadCompletion) {
            let result = self.0.clone().map(|rows| {
                rows.into_iter()
                    .map(|(title, subtitle, favorite)| {
                        AnimalViewData::new(
                            title,
                            subtitle.map(String::from),
                            Arc::new(AtomicBool::new(favorite)),
                            FavoriteAction::noop(),
                        )
                    })
                    .collect()
            });
            std::thread::spawn(move || completion(result));
        }
    }

    #[test]
    fn print_once_writes_a_line_per_item() {
        let loader = Fixed(Ok(vec![
            ("Husky", None, false),
            ("Kabosu", Some("Shiba Inu · Japan"), true),
        ]));
        let mut out = Vec::new();

        print_once(&loader, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  Husky\n★ Kabosu (Shiba Inu · Japan)\n"
        );
    }

    #[test]
    fn print_once_returns_load_failure() {
        let loader = Fixed(Err(FetchError::DataNotFound));
        let mut out = Vec::new();

        let err = print_once(&loader, &mut out).unwrap_err();
        assert_eq!(err.downcast_ref::<FetchError>(), Some(&FetchError::DataNotFound));
        assert!(err.to_string().contains("failed to load animals"));
        assert!(out.is_empty());
    }

    #[test]
    fn schemeless_host_fails_before_any_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            source: SourceConfig::Remote {
                host: "localhost:8080".into(),
                resource: "dogs".into(),
            },
            category: "dogs".into(),
            store_path: dir.path().join("favorites.json"),
            log_file: None,
            print: true,
        };
        let store = Arc::new(PreferenceStore::open(&config.store_path).unwrap());

        let err = build_loader(&config, store, None).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::InvalidRequest(_))
        ));
    }
}
