use console::style;

/// Print a user-facing success message to stdout, the way the CLI reports
/// a completed generation run.
pub fn print_success(message: &str) {
    println!("{} {message}", style("✓").green().bold());
}

/// Print a user-facing warning to stderr, e.g. an unmet requirement that
/// merely disables an extension rather than aborting the run.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", style("!").yellow().bold());
}

/// Print a user-facing error to stderr, for anything surfaced via
/// `UserFacingError` rather than an internal failure.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", style("✗").red().bold());
}
