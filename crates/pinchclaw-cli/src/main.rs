//! `pinchclaw` – the PinchClaw command line.
//!
//! 1. Initialises logging (see `pinchclaw_runtime::telemetry`).
//! 2. Loads `~/.pinchclaw/config.toml`, writing defaults on first run.
//! 3. Installs a Ctrl-C handler that ends the running game and the shell.
//! 4. Drops the user into an interactive REPL.

mod config;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

fn main() {
    let _telemetry = pinchclaw_runtime::init_tracing("pinchclaw");

    print_banner();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; Ctrl-C will not stop a running game");
    }

    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => first_run(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    println!(
        "  Leaderboard: {}   Realtime: {}   Invert: {}",
        cfg.leaderboard_path.dimmed(),
        cfg.realtime.to_string().bold(),
        cfg.tuning.invert_horizontal.to_string().bold()
    );
    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    repl::run(cfg, shutdown);
}

/// Write the default config so the user has a file to edit.
fn first_run() -> config::Config {
    let mut cfg = config::Config::default();
    config::apply_env_overrides(&mut cfg);
    match config::save(&cfg) {
        Ok(()) => println!(
            "  {} Default config written to {}",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    cfg
}

fn print_banner() {
    println!();
    println!("{}", r#"   ___  _         _      ___ _              "#.bold().magenta());
    println!("{}", r#"  / _ \(_)_ _  __| |_   / __| |__ ___ __ __ "#.bold().magenta());
    println!("{}", r#" |  _/| | ' \/ _| ' \ | (__| / _` \ V  V / "#.bold().magenta());
    println!("{}", r#" |_|  |_|_||_\__|_||_| \___|_\__,_|\_/\_/  "#.bold().magenta());
    println!();
    println!(
        "  {} {}",
        "PinchClaw".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Pinch to grab. Let go over the chute.");
    println!();
}
