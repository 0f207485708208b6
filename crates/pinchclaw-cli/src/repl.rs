//! REPL – the interactive PinchClaw shell.
//!
//! Supported slash-commands:
//!   /help                          – show this list
//!   /play [name] [replay.jsonl]    – play one session
//!   /invert                        – toggle horizontal inversion
//!   /settings                      – interactively edit `~/.pinchclaw/config.toml`
//!   /leaderboard                   – show the top ten scores
//!   /quit | /exit                  – exit the shell

use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pinchclaw_kernel::GameSession;
use pinchclaw_memory::Leaderboard;
use pinchclaw_perception::sim::SweepSource;
use pinchclaw_perception::{HandSource, ReplaySource};
use pinchclaw_runtime::{FrameLoop, FrameLoopReport, StopReason};
use pinchclaw_types::GameStatus;
use tracing::warn;

use crate::config::{self, Config};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Play {
        name: Option<String>,
        replay: Option<PathBuf>,
    },
    Invert,
    Settings,
    Leaderboard,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line.  Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let cmd = match head {
            "/help" => Command::Help,
            "/play" => {
                let name = words.next().map(str::to_string);
                let replay = words.next().map(PathBuf::from);
                Command::Play { name, replay }
            }
            "/invert" => Command::Invert,
            "/settings" => Command::Settings,
            "/leaderboard" => Command::Leaderboard,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(cmd)
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration and by the frame loop; when set the
/// REPL exits cleanly.  One [`GameSession`] lives for the whole shell and is
/// restarted by every `/play`.
pub fn run(mut cfg: Config, shutdown: Arc<AtomicBool>) {
    let mut session = match GameSession::new(cfg.session_config()) {
        Ok(session) => session,
        Err(e) => {
            println!("{}: {}", "Cannot create game session".red(), e);
            return;
        }
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "pinchclaw>".bold().magenta());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let Some(cmd) = Command::parse(&line) else {
            continue;
        };

        match cmd {
            Command::Help => cmd_help(),
            Command::Play { name, replay } => {
                cmd_play(&cfg, &mut session, name, replay.as_deref(), &shutdown);
            }
            Command::Invert => cmd_invert(&mut cfg, &mut session),
            Command::Settings => cmd_settings(&mut cfg, &mut session),
            Command::Leaderboard => cmd_leaderboard(&cfg),
            Command::Quit => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            Command::Unknown(other) => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "PinchClaw Commands".bold().underline());
    let commands = [
        (
            "/play [name] [replay.jsonl]",
            "play a session (synthetic hand unless a replay file is given)",
        ),
        ("/invert", "toggle left/right inversion"),
        ("/settings", "edit ~/.pinchclaw/config.toml"),
        ("/leaderboard", "show the top ten scores"),
        ("/quit  /exit", "exit"),
    ];
    for (usage, what) in commands {
        println!("  {:<27}  – {}", usage.bold().cyan(), what);
    }
    println!();
}

fn cmd_play(
    cfg: &Config,
    session: &mut GameSession,
    name: Option<String>,
    replay: Option<&Path>,
    shutdown: &Arc<AtomicBool>,
) {
    let player = name.unwrap_or_else(|| cfg.player_name.clone());
    if player.trim().is_empty() {
        println!(
            "{} pass a name ({}) or set one in {}.",
            "No player name:".red(),
            "/play ada".bold(),
            "/settings".bold()
        );
        return;
    }

    let pace = cfg
        .realtime
        .then(|| Duration::from_secs_f64(1.0 / f64::from(cfg.frames_per_second.max(1))));

    let outcome = match replay {
        Some(path) => match open_replay(path) {
            Ok(source) => {
                let source = match pace {
                    Some(interval) => source.with_interval(interval),
                    None => source,
                };
                play_session(session, cfg, &player, source, shutdown)
            }
            Err(e) => {
                println!("{}: {}", "Cannot load replay".red(), e);
                return;
            }
        },
        None => {
            let source = match pace {
                Some(interval) => SweepSource::new().with_interval(interval),
                None => SweepSource::new(),
            };
            play_session(session, cfg, &player, source, shutdown)
        }
    };

    match outcome {
        Ok(report) => {
            print_report(&report);
            record_score(cfg, &player, &report);
        }
        Err(e) => println!("{}: {}", "Game error".red(), e),
    }
}

fn open_replay(path: &Path) -> Result<ReplaySource, String> {
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "replay".to_string());
    ReplaySource::from_jsonl(id, BufReader::new(file)).map_err(|e| e.to_string())
}

fn play_session<S: HandSource>(
    session: &mut GameSession,
    cfg: &Config,
    player: &str,
    source: S,
    shutdown: &Arc<AtomicBool>,
) -> Result<FrameLoopReport, String> {
    session.start(player);

    println!(
        "  {} {} – {} collectibles, {} s on the clock. {} to stop.",
        "▶".green().bold(),
        player.bold(),
        session.registry().len(),
        session.time_left(),
        "Ctrl-C".bold()
    );

    let frame_loop = FrameLoop::new(cfg.frame_loop_config()).with_shutdown(Arc::clone(shutdown));
    let mut report = frame_loop
        .play(session, source)
        .map_err(|e| format!("failed to start hand tracker: {}", e))?;

    if report.stop == StopReason::Shutdown {
        report.status = session.end();
    }
    Ok(report)
}

fn print_report(report: &FrameLoopReport) {
    let verdict = match report.status {
        GameStatus::Won => "YOU WIN".green().bold(),
        GameStatus::Lost => "GAME OVER".red().bold(),
        GameStatus::Start | GameStatus::Playing => "STOPPED".yellow().bold(),
    };
    println!();
    println!("  {}", verdict);
    println!("  Score     : {}", report.final_score.to_string().bold());
    println!("  Deposits  : {}", report.deposits);
    println!("  Grabs     : {} ({} dropped)", report.grabs, report.drops);
    println!("  Frames    : {}", report.frames.to_string().dimmed());
    println!();
}

fn record_score(cfg: &Config, player: &str, report: &FrameLoopReport) {
    if !report.status.is_finished() {
        return;
    }
    match open_leaderboard(cfg).and_then(|board| {
        board
            .record(player, report.final_score)
            .map_err(|e| e.to_string())
    }) {
        Ok(Some(rank)) => println!(
            "  {} {} on the leaderboard!\n",
            "★".yellow().bold(),
            format!("#{}", rank).bold()
        ),
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "failed to record leaderboard entry");
            println!("{}: {}", "Leaderboard error".red(), e);
        }
    }
}

fn open_leaderboard(cfg: &Config) -> Result<Leaderboard, String> {
    let path = PathBuf::from(&cfg.leaderboard_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    Leaderboard::open(&path).map_err(|e| e.to_string())
}

fn cmd_leaderboard(cfg: &Config) {
    let entries = match open_leaderboard(cfg).and_then(|b| b.top().map_err(|e| e.to_string())) {
        Ok(entries) => entries,
        Err(e) => {
            println!("{}: {}", "Leaderboard error".red(), e);
            return;
        }
    };

    println!("{}", "Leaderboard".bold().underline());
    if entries.is_empty() {
        println!("  {}", "No scores yet. Type /play to set one.".dimmed());
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let date = entry.recorded_at.get(..10).unwrap_or(&entry.recorded_at);
        println!(
            "  {:>2}. {:<16} {:>6}  {}",
            i + 1,
            entry.name.bold(),
            entry.score.to_string().yellow(),
            date.dimmed()
        );
    }
}

fn cmd_invert(cfg: &mut Config, session: &mut GameSession) {
    let state = if toggle_invert(cfg, session) {
        "ON".yellow()
    } else {
        "OFF".green()
    };
    println!("  Horizontal inversion: {}", state.bold());
    if let Err(e) = config::save(cfg) {
        println!("{}: {}", "Error saving config".red(), e);
    }
}

/// Flip inversion on the live session and mirror it into `cfg`.
fn toggle_invert(cfg: &mut Config, session: &mut GameSession) -> bool {
    let invert = session.toggle_invert();
    cfg.tuning.invert_horizontal = invert;
    invert
}

fn cmd_settings(cfg: &mut Config, session: &mut GameSession) {
    println!("{}", "Settings Editor".bold().underline());
    println!("  (press Enter to keep the current value)");

    let mut edited = cfg.clone();
    edited.player_name = prompt_str(
        &format!("  Player name       [{}]: ", edited.player_name),
        &edited.player_name,
    );
    edited.frames_per_second = prompt_parse(
        &format!("  Frames per second [{}]: ", edited.frames_per_second),
        edited.frames_per_second,
    );
    edited.realtime = prompt_parse(
        &format!("  Realtime          [{}]: ", edited.realtime),
        edited.realtime,
    );
    edited.session_seconds = prompt_parse(
        &format!("  Session seconds   [{}]: ", edited.session_seconds),
        edited.session_seconds,
    );
    edited.win_score = prompt_parse(
        &format!("  Win score         [{}]: ", edited.win_score),
        edited.win_score,
    );
    edited.tuning.smoothing_factor = prompt_parse(
        &format!("  Smoothing factor  [{}]: ", edited.tuning.smoothing_factor),
        edited.tuning.smoothing_factor,
    );
    edited.tuning.pinch_threshold = prompt_parse(
        &format!("  Pinch threshold   [{}]: ", edited.tuning.pinch_threshold),
        edited.tuning.pinch_threshold,
    );

    if let Err(e) = edited.validate() {
        println!("{}: {} – settings unchanged", "Invalid settings".red(), e);
        return;
    }
    match GameSession::new(edited.session_config()) {
        Ok(fresh) => *session = fresh,
        Err(e) => {
            println!("{}: {} – settings unchanged", "Invalid settings".red(), e);
            return;
        }
    }
    *cfg = edited;

    match config::save(cfg) {
        Ok(()) => println!(
            "{} {}",
            "✓ Settings saved to".green(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt for a parseable value.  Returns `default` on Enter or bad input.
fn prompt_parse<T>(msg: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    let raw = prompt_str(msg, &default.to_string());
    match raw.parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            println!(
                "  {} '{}' is not valid, keeping {}",
                "Warning:".yellow(),
                raw,
                default
            );
            default
        }
    }
}

/// Prompt for a string value.  Returns `default` when the user presses Enter.
fn prompt_str(msg: &str, default: &str) -> String {
    print!("{}", msg);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed
            }
        }
        Err(_) => default.to_string(),
    }
}
