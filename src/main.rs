//! Entry point for the **wsbar** daemon.
//!
//! Spawns the configured [`PayloadSource`](wsbar::traits::PayloadSource)s on
//! background threads and rebuilds and renders the workspace model on the
//! main thread for every payload they deliver.
//!
//! # Flags
//!
//! * `--config <path>`: load configuration from `path`.
//! * `--stdin`: also read payloads from standard input.

use wsbar::config::Config;
use wsbar::ipc::listener::UnixSocketListener;
use wsbar::ipc::reader::ReaderSource;
use wsbar::rebuild::Rebuilder;
use wsbar::render::TextRenderer;
use wsbar::shaping::CellShaper;
use wsbar::traits::{PayloadSource, Renderer};
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;

/// Resolve the default config path (`$XDG_CONFIG_HOME/wsbar/config.json`).
fn default_config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("wsbar").join("config.json")
}

/// The value following `flag` on the command line, if any.
fn flag_value(flag: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}

/// Load the config, falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = flag_value("--config")
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut config = load_config();
    if std::env::args().any(|a| a == "--stdin") {
        config.ipc.read_stdin = true;
    }

    let (tx, rx) = mpsc::channel::<String>();
    spawn_payload_sources(&config, tx);

    let mut rebuilder = Rebuilder::new(CellShaper::new(config.shaping.cell_width));
    let mut renderer = TextRenderer::stdout();

    info!("wsbar running");
    for payload in rx {
        if let Err(e) = rebuilder.rebuild(&payload) {
            if e.is_fatal() {
                error!("cannot continue: {}", e);
                std::process::exit(1);
            }
            // The model is empty now; render it so the bar clears.
            error!("update failed: {}", e);
        }
        if let Err(e) = renderer.render(rebuilder.model()) {
            error!("render error: {}", e);
        }
    }
    info!("all payload sources closed, exiting");
}

//  Helpers

fn spawn_payload_sources(config: &Config, tx: mpsc::Sender<String>) {
    {
        let tx = tx.clone();
        let path = config.ipc.socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    if config.ipc.read_stdin {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = ReaderSource::stdin();
            if let Err(e) = source.run(tx) {
                error!("stdin reader error: {}", e);
            }
        });
    }

    drop(tx);
}
