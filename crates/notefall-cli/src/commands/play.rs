//! Play command implementation

use std::io::{self, Stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use notefall_core::{Action, Driver, GameConfig, GameState, schedule_notes};
use tracing::warn;

use crate::cli_utils::load_notes;
use crate::display::{format_status, format_summary};
use crate::input::{LANE_KEYS, spawn_keyboard};

/// Redraw the status line every this many ticks when nothing else changes
const STATUS_REFRESH_TICKS: u64 = 5;

pub fn run(config: GameConfig, notes_path: &Path) -> Result<()> {
    let notes = load_notes(notes_path)?;
    let driver = Driver::new(config, schedule_notes(&notes))
        .context("starting driver")?;
    let pause = driver.pause_gate();
    let shutdown = driver.shutdown_signal();

    let mut stdout = io::stdout();
    let has_key_release = enter_terminal(&mut stdout)?;
    print_banner(&mut stdout, has_key_release);

    let keyboard = spawn_keyboard(
        driver.input(),
        driver.pause_gate(),
        driver.shutdown_signal(),
        has_key_release,
    );

    let result = driver.run(&mut |action: &Action, state: &GameState| {
        let refresh =
            !matches!(action, Action::Tick) || state.tick_count % STATUS_REFRESH_TICKS == 0;
        if refresh {
            draw_status(&mut stdout, state, pause.is_paused());
        }
    });

    shutdown.trigger();
    if keyboard.join().is_err() {
        warn!("Keyboard thread panicked");
    }
    leave_terminal(&mut stdout, has_key_release);

    let state = result.context("running song")?;
    println!("{}", format_summary(&state, None));
    Ok(())
}

/// Switch to raw mode; returns whether key releases will be reported
fn enter_terminal(stdout: &mut Stdout) -> Result<bool> {
    terminal::enable_raw_mode().context("enabling raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;

    // macOS terminals may accept the flag without ever sending releases
    let has_key_release = if cfg!(target_os = "macos") {
        false
    } else {
        queue!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok()
            && stdout.flush().is_ok()
    };
    if !has_key_release {
        warn!("Key release events unavailable; holds cannot be broken early");
    }
    Ok(has_key_release)
}

fn leave_terminal(stdout: &mut Stdout, has_key_release: bool) {
    if has_key_release {
        let _ = queue!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn print_banner(stdout: &mut Stdout, has_key_release: bool) {
    let lanes: Vec<String> = LANE_KEYS.iter().map(|k| k.to_string()).collect();
    let _ = write!(
        stdout,
        "notefall - live play\r\n\r\n  Lanes:  {}\r\n  Pause:  p\r\n  Quit:   Esc or q\r\n",
        lanes.join(" ")
    );
    if !has_key_release {
        let _ = write!(stdout, "  (key releases not reported by this terminal)\r\n");
    }
    let _ = write!(stdout, "\r\n");
    let _ = stdout.flush();
}

fn draw_status(stdout: &mut Stdout, state: &GameState, paused: bool) {
    let _ = queue!(
        stdout,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format_status(state, paused))
    );
    let _ = stdout.flush();
}
