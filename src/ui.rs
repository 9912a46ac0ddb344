/// User interface and status output utilities
///
/// This module handles:
/// - Colored terminal text
/// - Status, warning and error message formatting
///
/// Everything goes to stdout, next to the report itself.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static USE_COLORS: AtomicBool = AtomicBool::new(true);

/// Turn colored prefixes on or off (--no-color)
pub fn set_colors(enabled: bool) {
    USE_COLORS.store(enabled, Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    USE_COLORS.load(Ordering::Relaxed)
}

/// Print the "olap: " prefix for status messages
fn print_status_header() {
    print!("olap: ");
}

/// Print colored text to terminal, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !colors_enabled() || !really_print_color(s, fg) {
        print!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        if let Some(ref mut t) = term::stdout() {
            if t.fg(fg).is_err() {
                return false;
            }
            let _ = t.attr(term::Attr::Bold);
            if write!(t, "{}", s).is_err() {
                return false;
            }
            let _ = t.reset();
            return true;
        }

        false
    }
}

/// Print a status message with "olap: " prefix
pub fn status(s: &str) {
    print_status_header();
    println!("{}", s);
}

/// Print a warning with colored "warning" prefix
pub fn print_warning(msg: &str) {
    print_color("warning", term::color::BRIGHT_YELLOW);
    println!(": {}", msg);
}

/// Print an error message with colored "error" prefix
pub fn print_error(msg: &str) {
    println!();
    print_color("error", term::color::BRIGHT_RED);
    println!(": {}", msg);
    println!();
}
