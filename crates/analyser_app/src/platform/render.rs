use std::fmt::Write;

use analyser_core::{AnalysisResult, AppViewModel, PhaseLabel};

const BAR_WIDTH: usize = 30;

/// Text to print when moving from `prev` to `view`. Only what changed is emitted;
/// the progress bar is redrawn in place with a carriage return.
pub fn render(prev: Option<&AppViewModel>, view: &AppViewModel) -> String {
    let mut out = String::new();
    let prev_phase = prev.map(|p| p.phase);
    let was_uploading = prev_phase == Some(PhaseLabel::Uploading);
    let is_uploading = view.phase == PhaseLabel::Uploading;

    if was_uploading && !is_uploading {
        out.push('\n');
    }

    let prev_file = prev.and_then(|p| p.selected_file.as_ref());
    if prev_file != view.selected_file.as_ref() {
        match &view.selected_file {
            Some(file) => {
                let _ = writeln!(out, "Selected {} ({})", file.name, format_size(file.size));
            }
            None if prev_file.is_some() => out.push_str("No file selected.\n"),
            None => {}
        }
    }

    if is_uploading {
        if !was_uploading {
            out.push_str("Analysing...\n");
        }
        let percent = view.progress.unwrap_or(0);
        let _ = write!(out, "\r{}", progress_bar(percent));
    }

    if view.error.is_some() && view.error != prev.and_then(|p| p.error.clone()) {
        if let Some(error) = &view.error {
            let _ = writeln!(out, "{error}");
        }
    }

    if let Some(analysis) = &view.analysis {
        if view.analysis != prev.and_then(|p| p.analysis.clone()) {
            out.push_str(&render_analysis(analysis));
        }
    }

    out
}

/// Full snapshot of the current view, for the `status` command.
pub fn render_status(view: &AppViewModel) -> String {
    let mut out = String::new();
    let phase = match view.phase {
        PhaseLabel::Idle => "Idle",
        PhaseLabel::Uploading => "Uploading",
        PhaseLabel::Succeeded => "Succeeded",
        PhaseLabel::Failed => "Failed",
    };
    let _ = writeln!(out, "Status: {phase}");
    match &view.selected_file {
        Some(file) => {
            let _ = writeln!(out, "File: {} ({})", file.name, format_size(file.size));
        }
        None => out.push_str("File: none\n"),
    }
    if let Some(percent) = view.progress {
        let _ = writeln!(out, "{}", progress_bar(percent));
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
    }
    let submit = if view.submit_enabled {
        "Analyse Bill"
    } else {
        "Analyse Bill (disabled)"
    };
    let _ = writeln!(out, "[{submit}]");
    out
}

fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut out = String::from("\nAnalysis Results\n\nSummary\n");
    let _ = writeln!(out, "{}", analysis.summary);
    for (title, items) in [
        ("Key Points", &analysis.key_points),
        ("Arguments For", &analysis.arguments_for),
        ("Arguments Against", &analysis.arguments_against),
    ] {
        let _ = writeln!(out, "\n{title}");
        for item in items {
            let _ = writeln!(out, "  • {item}");
        }
    }
    out
}

fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
