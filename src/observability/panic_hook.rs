//! Custom panic hook for structured crash reports.
//!
//! A crash report names the scan phase and the file that was being scanned
//! on the panicking thread, so the offending input can be reproduced.

use super::context::{get_current_context, ScanContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the custom panic hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();

    eprintln!();
    print_header();
    print_panic_details(info);
    print_context_section(&context);
    print_backtrace_section();
    print_footer(&context);
}

fn rule(left: char, right: char) {
    eprintln!("{left}{}{right}", "═".repeat(WIDTH));
}

fn row(text: &str) {
    eprintln!("║  {:<width$} ║", truncate(text, WIDTH - 3), width = WIDTH - 3);
}

fn print_header() {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    rule('╔', '╗');
    row("SQLSCAN CRASH REPORT");
    rule('╠', '╣');
    row(&format!("Version: {VERSION}"));
    row(&format!("Platform: {}", std::env::consts::OS));
    row(&format!("Time: {timestamp}"));
    rule('╠', '╣');
}

fn print_panic_details(info: &PanicHookInfo<'_>) {
    row(&format!("PANIC: {}", extract_panic_message(info)));

    if let Some(location) = info.location() {
        row(&format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }
}

fn print_context_section(context: &ScanContext) {
    rule('╠', '╣');
    row("SCAN CONTEXT:");

    match &context.phase {
        Some(phase) => row(&format!("  Phase: {phase}")),
        None => row("  Phase: (not set - crash occurred before scanning started)"),
    }

    if let Some(metadata) = Span::current().metadata() {
        row(&format!("  Span: {}", metadata.name()));
    }

    if let Some(file) = &context.current_file {
        row(&format!("  File: {}", file.display()));
    }
}

fn print_backtrace_section() {
    rule('╠', '╣');
    if std::env::var("RUST_BACKTRACE").is_ok() {
        row("STACK TRACE:");
        rule('╚', '╝');
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        row("Run with RUST_BACKTRACE=1 for stack trace");
        rule('╚', '╝');
    }
}

fn print_footer(context: &ScanContext) {
    if let Some(file) = &context.current_file {
        eprintln!();
        eprintln!("Include this crash report and the file: {}", file.display());
    }
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Cut `s` to at most `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
