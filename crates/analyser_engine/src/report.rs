use std::fmt::Write;

use analyser_core::AnalysisResult;

/// Plain-text report of an analysis, one bulleted section per list.
pub fn render_report(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("Summary:\n");
    out.push_str(&analysis.summary);
    out.push('\n');
    push_section(&mut out, "Key Points", &analysis.key_points);
    push_section(&mut out, "Arguments For", &analysis.arguments_for);
    push_section(&mut out, "Arguments Against", &analysis.arguments_against);
    out
}

fn push_section(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "\n{title}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
