use crossterm::terminal;
use unicode_width::UnicodeWidthStr;

use versus_core::session::Phase;
use versus_core::table::TableProjection;
use versus_core::ComparisonResult;

const TROPHY: &str = "🏆";
const MIN_TEXT_WIDTH: usize = 24;
const FALLBACK_WIDTH: usize = 80;

/// Width to wrap the report at: `COLUMNS` if set, else the attached terminal.
pub fn terminal_width() -> usize {
    let columns = std::env::var("COLUMNS").ok();
    let tty = terminal::size().ok().map(|(w, _)| w);
    resolve_width(columns.as_deref(), tty)
}

fn resolve_width(columns: Option<&str>, tty: Option<u16>) -> usize {
    columns
        .and_then(|c| c.trim().parse().ok())
        .or(tty.map(usize::from))
        .filter(|&w| w > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Print the in-flight status line to stderr.
pub fn status(phase: Phase) {
    if let Some(line) = phase.status() {
        eprintln!("{line}");
    }
}

/// Render verdict, summary and the per-criterion breakdown as plain text.
pub fn render(result: &ComparisonResult, width: usize) -> String {
    let mut out = String::with_capacity(1024);

    section(&mut out, "VERDICT", &result.verdict, width);
    out.push('\n');
    section(&mut out, "SUMMARY", &result.summary, width);

    if result.criteria.is_empty() {
        out.push_str("\nNo criteria returned.\n");
        return out;
    }

    let table = TableProjection::new(result);
    let name_width = table
        .headers()
        .iter()
        .map(|h| h.width())
        .max()
        .unwrap_or(0);

    for (i, (name, cells)) in table.rows().into_iter().enumerate() {
        out.push('\n');
        out.push_str(name);
        match result.winner_name(i) {
            Some(winner) => out.push_str(&format!("  (winner: {winner})")),
            None => out.push_str("  (tie)"),
        }
        out.push('\n');

        for cell in cells {
            let item = table.headers()[cell.item].as_str();
            let marker = if cell.winning { TROPHY } else { "  " };
            let prefix = format!(
                "  {item}{pad}  {score:>4}/10  {tier:<6} {marker}  ",
                pad = " ".repeat(name_width - item.width()),
                score = format_score(cell.score),
                tier = cell.tier.as_str(),
            );

            if cell.description.is_empty() {
                out.push_str(prefix.trim_end());
                out.push('\n');
                continue;
            }

            let indent = " ".repeat(prefix.width());
            let opts = textwrap::Options::new(width.max(prefix.width() + MIN_TEXT_WIDTH))
                .initial_indent(&prefix)
                .subsequent_indent(&indent);
            out.push_str(&textwrap::fill(cell.description, opts));
            out.push('\n');
        }
    }

    out
}

fn section(out: &mut String, title: &str, body: &str, width: usize) {
    out.push_str(title);
    out.push('\n');
    let opts = textwrap::Options::new(width.max(MIN_TEXT_WIDTH))
        .initial_indent("  ")
        .subsequent_indent("  ");
    out.push_str(&textwrap::fill(body, opts));
    out.push('\n');
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
