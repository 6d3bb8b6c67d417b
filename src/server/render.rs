//! Server-side HTML rendering: the form, the result panel and the
//! evaluation panel with inline SVG charts.

use std::fmt::Write;

use crate::data::{CategoricalColumn, FeatureRecord, NumericColumn};
use crate::evaluation::{DiagnosticsError, EvaluationReport, HistogramBin, ScatterData};
use crate::service::{format_currency_whole, FormOptions, Prediction};

const CHART_WIDTH: f64 = 480.0;
const CHART_HEIGHT: f64 = 320.0;
const CHART_MARGIN: f64 = 44.0;

/// Result panel content.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Prediction(&'a Prediction),
    Error(&'a str),
}

/// Everything needed to render the page.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub options: &'a FormOptions,
    /// Values to pre-fill; form defaults when `None`.
    pub input: Option<&'a FeatureRecord>,
    pub outcome: Option<Outcome<'a>>,
    pub evaluation: Result<&'a EvaluationReport, &'a DiagnosticsError>,
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_page(page: &Page<'_>) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Salary Prediction</title>\n</head>\n<body>\n",
        "<h1>Salary Prediction</h1>\n"
    ));
    html.push_str(&render_form(page.options, page.input));
    if let Some(outcome) = page.outcome {
        html.push_str(&render_outcome(outcome));
    }
    html.push_str(&match page.evaluation {
        Ok(report) => render_evaluation(report),
        Err(e) => render_warning(&format!("Model evaluation is unavailable: {e}")),
    });
    html.push_str("</body>\n</html>\n");
    html
}

// =============================================================================
// Form
// =============================================================================

fn render_form(options: &FormOptions, input: Option<&FeatureRecord>) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/predict\">\n");
    let fields: [(&str, Field); 6] = [
        ("Education", Field::Select(CategoricalColumn::Education)),
        ("Experience", Field::Number(NumericColumn::Experience)),
        ("Location", Field::Select(CategoricalColumn::Location)),
        ("Job_Title", Field::Select(CategoricalColumn::JobTitle)),
        ("Age", Field::Number(NumericColumn::Age)),
        ("Gender", Field::Select(CategoricalColumn::Gender)),
    ];
    for (name, field) in fields {
        let _ = write!(html, "<p><label for=\"{name}\">{}</label> ", name.replace('_', " "));
        match field {
            Field::Select(column) => {
                let selected = input.map(|r| r.category(column));
                let _ = write!(html, "<select id=\"{name}\" name=\"{name}\">");
                for choice in options.choices(column) {
                    let mark = if selected == Some(choice.as_str()) { " selected" } else { "" };
                    let value = escape(choice);
                    let _ = write!(html, "<option value=\"{value}\"{mark}>{value}</option>");
                }
                html.push_str("</select></p>\n");
            }
            Field::Number(column) => {
                let spec = options.numeric(column);
                let value = input.map_or(spec.default, |r| r.numeric(column));
                let _ = writeln!(
                    html,
                    "<input id=\"{name}\" name=\"{name}\" type=\"number\" step=\"1\" min=\"{}\" max=\"{}\" value=\"{}\"></p>",
                    spec.min, spec.max, value
                );
            }
        }
    }
    html.push_str("<p><button type=\"submit\">Predict Salary</button></p>\n</form>\n");
    html
}

enum Field {
    Select(CategoricalColumn),
    Number(NumericColumn),
}

fn render_outcome(outcome: Outcome<'_>) -> String {
    match outcome {
        Outcome::Prediction(p) => format!(
            "<section id=\"prediction\"><h2>Predicted Salary</h2><p><strong>{}</strong></p></section>\n",
            escape(&p.formatted)
        ),
        Outcome::Error(msg) => format!(
            "<section id=\"prediction-error\" role=\"alert\"><p>Prediction failed: {}</p></section>\n",
            escape(msg)
        ),
    }
}

fn render_warning(msg: &str) -> String {
    format!(
        "<section id=\"evaluation-warning\" role=\"alert\"><p>{}</p></section>\n",
        escape(msg)
    )
}

// =============================================================================
// Evaluation panel
// =============================================================================

fn render_evaluation(report: &EvaluationReport) -> String {
    let s = &report.summary;
    let mut html = String::from("<section id=\"evaluation\">\n<h2>Model Evaluation</h2>\n");
    let _ = writeln!(
        html,
        "<p>{} test rows. RMSE {} | MAE {} | MAPE {:.2}% | R² {:.4}</p>",
        s.n_rows,
        format_currency_whole(s.rmse),
        format_currency_whole(s.mae),
        s.mape,
        s.r2
    );

    html.push_str("<h3>Predicted vs Actual</h3>\n");
    html.push_str(&scatter_svg(&report.scatter));
    html.push_str("<h3>Prediction Error Distribution</h3>\n");
    html.push_str(&histogram_svg(&report.histogram));

    html.push_str(concat!(
        "<table>\n<thead><tr><th>Education</th><th>Experience</th><th>Location</th>",
        "<th>Job Title</th><th>Age</th><th>Gender</th><th>Actual</th><th>Predicted</th>",
        "<th>Error</th><th>Error %</th></tr></thead>\n<tbody>\n"
    ));
    for row in &report.rows {
        let r = &row.record;
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td></tr>",
            escape(&r.education),
            r.experience,
            escape(&r.location),
            escape(&r.job_title),
            r.age,
            escape(&r.gender),
            format_currency_whole(row.actual),
            format_currency_whole(row.predicted),
            format_currency_whole(row.error),
            row.error_pct
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

/// Linear map from a data range onto a pixel range.
#[derive(Debug, Clone, Copy)]
struct Axis {
    lo: f64,
    span: f64,
    px_lo: f64,
    px_span: f64,
}

impl Axis {
    fn new(lo: f64, hi: f64, px_lo: f64, px_hi: f64) -> Self {
        let span = if hi > lo { hi - lo } else { 1.0 };
        Self {
            lo,
            span,
            px_lo,
            px_span: px_hi - px_lo,
        }
    }

    fn map(self, v: f64) -> f64 {
        self.px_lo + (v - self.lo) / self.span * self.px_span
    }
}

fn svg_open(label: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" role=\"img\" aria-label=\"{}\">\n",
        escape(label)
    )
}

pub fn scatter_svg(scatter: &ScatterData) -> String {
    let [lo, hi] = scatter.identity;
    let (min_p, max_p) = scatter
        .points
        .iter()
        .fold((lo.actual, hi.actual), |(a, b), p| (a.min(p.predicted), b.max(p.predicted)));
    let x = Axis::new(lo.actual, hi.actual, CHART_MARGIN, CHART_WIDTH - CHART_MARGIN);
    let y = Axis::new(min_p, max_p, CHART_HEIGHT - CHART_MARGIN, CHART_MARGIN);

    let mut svg = svg_open("Predicted vs actual salary");
    for p in &scatter.points {
        let _ = writeln!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"steelblue\" fill-opacity=\"0.6\"/>",
            x.map(p.actual),
            y.map(p.predicted)
        );
    }
    let _ = writeln!(
        svg,
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"red\" stroke-dasharray=\"4 3\"/>",
        x.map(lo.actual),
        y.map(lo.predicted),
        x.map(hi.actual),
        y.map(hi.predicted)
    );
    let _ = writeln!(
        svg,
        "<text x=\"{:.0}\" y=\"{:.0}\" text-anchor=\"middle\">Actual</text>",
        CHART_WIDTH / 2.0,
        CHART_HEIGHT - 8.0
    );
    let _ = writeln!(
        svg,
        "<text x=\"12\" y=\"{:.0}\" transform=\"rotate(-90 12 {:.0})\" text-anchor=\"middle\">Predicted</text>",
        CHART_HEIGHT / 2.0,
        CHART_HEIGHT / 2.0
    );
    svg.push_str("</svg>\n");
    svg
}

pub fn histogram_svg(bins: &[HistogramBin]) -> String {
    let mut svg = svg_open("Prediction error histogram");
    if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let x = Axis::new(first.lower, last.upper, CHART_MARGIN, CHART_WIDTH - CHART_MARGIN);
        let y = Axis::new(0.0, max_count as f64, CHART_HEIGHT - CHART_MARGIN, CHART_MARGIN);
        for bin in bins {
            let (x0, x1) = (x.map(bin.lower), x.map(bin.upper));
            let top = y.map(bin.count as f64);
            let _ = writeln!(
                svg,
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"steelblue\" stroke=\"white\"><title>{}</title></rect>",
                x0,
                top,
                (x1 - x0).max(0.0),
                (CHART_HEIGHT - CHART_MARGIN - top).max(0.0),
                bin.count
            );
        }
    }
    let _ = writeln!(
        svg,
        "<text x=\"{:.0}\" y=\"{:.0}\" text-anchor=\"middle\">Prediction error</text>",
        CHART_WIDTH / 2.0,
        CHART_HEIGHT - 8.0
    );
    svg.push_str("</svg>\n");
    svg
}
