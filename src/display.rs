use owo_colors::{OwoColorize, Stream, Style};

use crate::report::{CategoryReport, Report, ReportRow};

const RULE_WIDTH: usize = 96;
const NUM_WIDTH: usize = 10;

/// Format seconds with enough precision for sub-millisecond averaging phases.
pub fn format_seconds(secs: f64) -> String {
    format!("{:.6}", secs)
}

/// Format a ratio like "2.00x", or "n/a" when undefined.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}x", r),
        None => "n/a".to_string(),
    }
}

// Style constants
fn style_heading() -> Style {
    Style::new().cyan().bold()
}

fn style_baseline() -> Style {
    Style::new().yellow().bold()
}

fn style_dim_italic() -> Style {
    Style::new().dimmed().italic()
}

fn name_width(report: &Report) -> usize {
    report
        .variants
        .iter()
        .map(|v| v.variant.chars().count())
        .max()
        .unwrap_or(0)
        .max("Variant".len())
}

fn format_row(row: &ReportRow, width: usize) -> String {
    let name = format!("{:<width$}", row.variant, width = width);
    let name_colored = if row.is_baseline {
        name.if_supports_color(Stream::Stdout, |s| s.style(style_baseline()))
            .to_string()
    } else {
        name.if_supports_color(Stream::Stdout, |s| s.green())
            .to_string()
    };

    let s = &row.stats;
    let speedup = format!("{:>9}", format_ratio(row.speedup));
    let speedup_colored = match row.speedup {
        Some(r) if r > 1.0 => speedup
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string(),
        Some(r) if r < 1.0 => speedup
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        _ => speedup,
    };
    let marker = if row.is_baseline { "  (baseline)" } else { "" };

    format!(
        "  {}  {:>3}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>9}  {}{}\n",
        name_colored,
        s.count,
        format_seconds(s.min),
        format_seconds(s.max),
        format_seconds(s.mean),
        format_seconds(s.median),
        format_seconds(s.std_dev),
        format_ratio(row.relative),
        speedup_colored,
        marker,
        w = NUM_WIDTH
    )
}

fn format_category(out: &mut String, category: &CategoryReport, width: usize) {
    let title = category.category.label().to_string();
    out.push_str(
        &title
            .if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
            .to_string(),
    );
    out.push('\n');
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    if !category.has_data() {
        out.push_str(
            &"  (no data: no variant reported this metric)"
                .if_supports_color(Stream::Stdout, |s| s.style(style_dim_italic()))
                .to_string(),
        );
        out.push_str("\n\n");
        return;
    }

    out.push_str(&format!(
        "  {:<width$}  {:>3}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>9}  {:>9}\n",
        "Variant",
        "N",
        "Min (s)",
        "Max (s)",
        "Mean (s)",
        "Median (s)",
        "StdDev",
        "Relative",
        "Speedup",
        width = width,
        w = NUM_WIDTH
    ));
    for row in &category.rows {
        out.push_str(&format_row(row, width));
    }
    out.push('\n');
}

/// Full report: one table per metric category, then per-variant run accounting.
pub fn format_table(report: &Report) -> String {
    let mut out = String::new();
    let width = name_width(report);

    let header = format!(
        "Benchmark summary ({} runs per variant, {})",
        report.runs_per_variant,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(
        &header
            .if_supports_color(Stream::Stdout, |s| s.bold())
            .to_string(),
    );
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for category in &report.categories {
        format_category(&mut out, category, width);
    }

    out.push_str(
        &"Runs"
            .if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
            .to_string(),
    );
    out.push('\n');
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "  {:<width$}  {:>9}  {:>8}  {:>12}  {:>14}\n",
        "Variant",
        "Attempted",
        "Accepted",
        "Run failures",
        "Parse failures",
        width = width
    ));
    for v in &report.variants {
        let line = format!(
            "  {:<width$}  {:>9}  {:>8}  {:>12}  {:>14}",
            v.variant,
            v.attempted,
            v.accepted,
            v.run_failures,
            v.parse_failures,
            width = width
        );
        if v.accepted == 0 {
            out.push_str(
                &line
                    .if_supports_color(Stream::Stdout, |s| s.red())
                    .to_string(),
            );
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

/// Compact output: one line per (category, variant), no per-run accounting.
pub fn format_compact(report: &Report) -> String {
    let mut out = String::new();
    let width = name_width(report);

    for category in &report.categories {
        let label = category.category.label();
        if !category.has_data() {
            out.push_str(&format!("{}: no data\n", label));
            continue;
        }
        for row in &category.rows {
            out.push_str(&format!(
                "{}: {:<width$}  {}s  {}{}\n",
                label,
                row.variant,
                format_seconds(row.stats.mean),
                format_ratio(row.speedup),
                if row.is_baseline { " (baseline)" } else { "" },
                width = width
            ));
        }
    }

    out
}

pub fn format_json(report: &Report) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
