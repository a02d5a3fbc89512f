//! Console output formatting with colored display

use std::fmt::Write as _;

use notefall_core::{GameState, ReplayReport, ScheduledGroup};
use owo_colors::OwoColorize;

const BORDER_WIDTH: usize = 44;

/// Format a schedule as one line per group
pub fn format_schedule(schedule: &[ScheduledGroup]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:>6}  {:>8}  {:>8}  {}",
        "group".dimmed(),
        "delay".dimmed(),
        "at".dimmed(),
        "notes".dimmed()
    );

    for (index, group) in schedule.iter().enumerate() {
        let playable = group.notes.iter().filter(|n| n.visible).count();
        let _ = writeln!(
            output,
            "{:>6}  {:>6}ms  {:>6}ms  {} ({} playable)",
            index,
            group.delay_ms,
            group.start_time,
            group.notes.len(),
            playable
        );
    }
    output
}

/// Boxed end-of-game summary
pub fn format_summary(state: &GameState, report: Option<&ReplayReport>) -> String {
    let mut output = String::new();
    let border = "━".repeat(BORDER_WIDTH);

    let _ = writeln!(output, "{}", border.dimmed());
    let status = if state.is_game_over {
        "CLEAR".green().bold().to_string()
    } else {
        "STOPPED".yellow().bold().to_string()
    };
    let _ = writeln!(output, "  {}", status);
    let _ = writeln!(output, "  Score       {}", state.points.bold());
    let _ = writeln!(output, "  Notes hit   {}", state.notes_played);
    let _ = writeln!(output, "  Multiplier  {}", state.multiplier().cyan());
    let _ = writeln!(output, "  Misses      {}", format_count(state.misses));
    let _ = writeln!(output, "  Penalties   {}", format_count(state.penalties));

    if let Some(report) = report {
        let _ = writeln!(output, "  Peak score  {}", report.peak_points);
        let _ = writeln!(
            output,
            "  Duration    {:.1}s ({} transitions)",
            report.elapsed_ms as f64 / 1000.0,
            report.transitions
        );
    }
    let _ = write!(output, "{}", border.dimmed());
    output
}

/// One-line live status
pub fn format_status(state: &GameState, paused: bool) -> String {
    let pause_label = if paused { " [PAUSED]" } else { "" };
    format!(
        "Score {:>6}  {}  hits {:>4}  misses {:>4}{}",
        state.points,
        state.multiplier(),
        state.notes_played,
        state.misses,
        pause_label.yellow()
    )
}

fn format_count(count: u32) -> String {
    if count == 0 {
        count.green().to_string()
    } else {
        count.red().to_string()
    }
}
