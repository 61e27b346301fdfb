// Rust guideline compliant 2026-10-12

//! Terminal helpers for the Slotwise CLI: color detection, width and
//! status lines on stderr.

use std::env;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Determines if colored output should be used.
///
/// Respects the `NO_COLOR` environment variable and whether stdout is a TTY.
pub fn should_use_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Gets the terminal width in columns, or 80 if it cannot be determined.
pub fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Shortens a single line to the terminal width, marking the cut with `…`.
pub fn fit_to_width(line: &str, width: usize) -> String {
    if width < 2 || line.chars().count() <= width {
        return line.to_string();
    }
    let mut shortened: String = line.chars().take(width - 1).collect();
    shortened.push('…');
    shortened
}

fn print_status(prefix: &str, color: Color, message: &str, use_color: bool) {
    let choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stderr, "{}", prefix);
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {}", message);
}

/// Prints an error line to stderr.
pub fn print_error(message: &str, use_color: bool) {
    print_status("✗", Color::Red, message, use_color);
}
