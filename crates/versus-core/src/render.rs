use crate::radar::{Point, RadarPlot};
use crate::ComparisonResult;

/// Series colors, cycled by item index.
pub const COLORS: [&str; 4] = ["#38bdf8", "#f472b6", "#a78bfa", "#34d399"];

const GRID_STROKE: &str = "#475569";
const LABEL_FILL: &str = "#94a3b8";
const LEGEND_FILL: &str = "#cbd5e1";
/// Room around the canvas so labels anchored past the outer ring stay visible.
const MARGIN: f64 = 60.0;
const LEGEND_ROW: f64 = 22.0;

pub fn color_for(item: usize) -> &'static str {
    COLORS[item % COLORS.len()]
}

/// Render a projected radar plot as a standalone SVG document.
///
/// An empty plot (no criteria) renders only the legend.
pub fn radar_svg(plot: &RadarPlot, result: &ComparisonResult) -> String {
    let legend_height = LEGEND_ROW * result.items.len() as f64;
    let width = plot.size + 2.0 * MARGIN;
    let height = plot.size + 2.0 * MARGIN + legend_height;

    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"{x:.0} {y:.0} {w:.0} {h:.0}\" font-family=\"sans-serif\">\n",
        x = -MARGIN,
        y = -MARGIN,
        w = width,
        h = height,
    ));

    if !plot.is_empty() {
        out.push_str("  <g class=\"grid\">\n");
        for ring in &plot.grid {
            let dash = if ring.is_outer() { "0" } else { "4 4" };
            out.push_str(&format!(
                "    <polygon points=\"{}\" fill=\"none\" stroke=\"{GRID_STROKE}\" stroke-width=\"1\" stroke-dasharray=\"{dash}\" opacity=\"0.5\"/>\n",
                points_attr(&ring.points),
            ));
        }
        for spoke in &plot.spokes {
            out.push_str(&format!(
                "    <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{GRID_STROKE}\" stroke-width=\"1\" opacity=\"0.5\"/>\n",
                spoke.from.x, spoke.from.y, spoke.to.x, spoke.to.y,
            ));
        }
        out.push_str("  </g>\n");

        for shape in &plot.shapes {
            let color = color_for(shape.item);
            let name = result.items.get(shape.item).map(String::as_str).unwrap_or("");
            out.push_str(&format!("  <g class=\"item\" data-name=\"{}\">\n", escape(name)));
            out.push_str(&format!(
                "    <polygon points=\"{}\" fill=\"{color}\" fill-opacity=\"0.2\" stroke=\"{color}\" stroke-width=\"2\"/>\n",
                points_attr(&shape.vertices),
            ));
            for v in &shape.vertices {
                out.push_str(&format!(
                    "    <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"{color}\"/>\n",
                    v.x, v.y
                ));
            }
            out.push_str("  </g>\n");
        }

        for label in &plot.labels {
            let text = result
                .criteria
                .get(label.criterion)
                .map(|c| c.name.as_str())
                .unwrap_or("");
            out.push_str(&format!(
                "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{LABEL_FILL}\" font-size=\"11\">{}</text>\n",
                label.at.x,
                label.at.y,
                escape(text),
            ));
        }
    }

    let legend_top = plot.size + MARGIN / 2.0;
    for (i, item) in result.items.iter().enumerate() {
        let y = legend_top + LEGEND_ROW * i as f64;
        out.push_str(&format!(
            "  <circle cx=\"0\" cy=\"{y:.2}\" r=\"6\" fill=\"{}\"/>\n",
            color_for(i)
        ));
        out.push_str(&format!(
            "  <text x=\"14\" y=\"{y:.2}\" dominant-baseline=\"middle\" fill=\"{LEGEND_FILL}\" font-size=\"13\">{}</text>\n",
            escape(item)
        ));
    }

    out.push_str("</svg>\n");
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
