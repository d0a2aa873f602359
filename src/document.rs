use svg::node::{
    element::{Group, Line, Path, Rectangle, Text, Title, SVG},
    Node,
};

use crate::intermediate_representation::{Scene, Trace};

const FONT_SIZE: f64 = 14.0;
const TICK_FONT_SIZE: f64 = 10.0;
/// Approximate advance of one character, relative to the font size.
const CHAR_WIDTH: f64 = 0.6;
const ANNOTATION_PADDING: f64 = 4.0;
const LEGEND_ROW: f64 = 18.0;
const LEGEND_SWATCH: f64 = 24.0;
const GRID_COLOR: &str = "lightgray";
const ZERO_LINE_COLOR: &str = "#444";

#[derive(Debug)]
pub struct Document {
    view_box: (f64, f64, f64, f64),
    title: Title,
    grid: Group,
    traces: Group,
    legend: Group,
    annotation: Group,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn from_scene(scene: &Scene) -> Document {
        let (left, right) = scene.x_range;
        let (bottom, top) = scene.y_range;
        let mut document = Document::new();
        document.set_title("Scattering geometry");
        // screen coordinates have y pointing down
        document.set_view_box((-top, left, -bottom, right));
        document.add_grid(scene.x_range, scene.y_range);
        for trace in &scene.traces {
            document.add_trace(trace);
        }
        if scene.show_legend {
            document.set_legend(&scene.traces);
        }
        document.set_annotation(scene.annotation_anchor.screen(), &scene.annotation.lines);
        document
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Title::new(title);
    }

    pub fn set_view_box(&mut self, (top, left, bottom, right): (f64, f64, f64, f64)) {
        self.view_box = (left, top, right - left, bottom - top)
    }

    /// Adds grid lines, zero lines and axis titles for the given ranges, in model coordinates.
    pub fn add_grid(&mut self, (x_min, x_max): (f64, f64), (y_min, y_max): (f64, f64)) {
        for x in grid_ticks(x_min, x_max) {
            let color = if x == 0.0 { ZERO_LINE_COLOR } else { GRID_COLOR };
            self.grid.append(grid_line((x, -y_max), (x, -y_min), color));
            self.grid.append(
                Text::new(format!("{x}"))
                    .set("x", x)
                    .set("y", -y_min - 2.0)
                    .set("font-size", TICK_FONT_SIZE)
                    .set("text-anchor", "middle"),
            );
        }
        for y in grid_ticks(y_min, y_max) {
            let color = if y == 0.0 { ZERO_LINE_COLOR } else { GRID_COLOR };
            self.grid.append(grid_line((x_min, -y), (x_max, -y), color));
            self.grid.append(
                Text::new(format!("{y}"))
                    .set("x", x_min + 2.0)
                    .set("y", -y - 2.0)
                    .set("font-size", TICK_FONT_SIZE),
            );
        }
        self.grid.append(
            Text::new("X (mm)")
                .set("x", (x_min + x_max) / 2.0)
                .set("y", -y_min - TICK_FONT_SIZE - 4.0)
                .set("font-size", FONT_SIZE)
                .set("text-anchor", "middle"),
        );
        let (label_x, label_y) = (x_min + TICK_FONT_SIZE + 14.0, -(y_min + y_max) / 2.0);
        self.grid.append(
            Text::new("Y (mm)")
                .set("x", label_x)
                .set("y", label_y)
                .set("font-size", FONT_SIZE)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 {label_x} {label_y})")),
        );
    }

    pub fn add_trace(&mut self, trace: &Trace) {
        let style = &trace.style;
        let mut path = Path::new()
            .set("class", "trace")
            .set("d", trace.to_svg())
            .set("stroke", style.stroke)
            .set("stroke-width", style.stroke_width)
            .set("fill", style.fill.unwrap_or("none"))
            .add(Title::new(trace.name.as_str()));
        if style.dotted {
            path = path.set("stroke-dasharray", "2,2");
        }
        self.traces.append(path);
    }

    /// Lists the traces in the upper right corner.
    pub fn set_legend(&mut self, traces: &[Trace]) {
        let (left, top, width, _) = self.view_box;
        let label_width = traces
            .iter()
            .map(|trace| trace.name.chars().count())
            .max()
            .unwrap_or(0) as f64
            * FONT_SIZE
            * CHAR_WIDTH;
        let x = left + width - label_width - LEGEND_SWATCH - 3.0 * ANNOTATION_PADDING;
        let mut legend = Group::new()
            .set("id", "legend")
            .set("transform", format!("translate({x} {top})"));
        for (i, trace) in traces.iter().enumerate() {
            let y = LEGEND_ROW * (i as f64 + 1.0);
            let mut swatch = Line::new()
                .set("x1", ANNOTATION_PADDING)
                .set("y1", y - FONT_SIZE / 3.0)
                .set("x2", ANNOTATION_PADDING + LEGEND_SWATCH)
                .set("y2", y - FONT_SIZE / 3.0)
                .set("stroke", trace.style.stroke)
                .set("stroke-width", trace.style.stroke_width);
            if trace.style.dotted {
                swatch = swatch.set("stroke-dasharray", "2,2");
            }
            legend.append(swatch);
            legend.append(
                Text::new(trace.name.as_str())
                    .set("x", 2.0 * ANNOTATION_PADDING + LEGEND_SWATCH)
                    .set("y", y)
                    .set("font-size", FONT_SIZE),
            );
        }
        self.legend = legend;
    }

    /// Places a bordered text box with its top left corner at `(x, y)` in screen coordinates.
    pub fn set_annotation(&mut self, (x, y): (f64, f64), lines: &[String]) {
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let line_height = FONT_SIZE * 1.2;
        let mut annotation = Group::new().set("id", "annotation").add(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set(
                    "width",
                    longest as f64 * FONT_SIZE * CHAR_WIDTH + 2.0 * ANNOTATION_PADDING,
                )
                .set("height", lines.len() as f64 * line_height + 2.0 * ANNOTATION_PADDING)
                .set("fill", "rgba(255, 255, 255, 0.95)")
                .set("stroke", "black")
                .set("stroke-width", 1),
        );
        for (i, line) in lines.iter().enumerate() {
            annotation.append(
                Text::new(line.as_str())
                    .set("x", x + ANNOTATION_PADDING)
                    .set("y", y + ANNOTATION_PADDING + line_height * (i as f64 + 1.0) - 3.0)
                    .set("font-size", FONT_SIZE)
                    .set("fill", "black"),
            );
        }
        self.annotation = annotation;
    }

    /// Compiles the document to an SVG element
    pub fn compile(self) -> SVG {
        let (left, top, width, height) = self.view_box;
        SVG::new()
            .set("viewBox", self.view_box)
            .set("height", height)
            .set("width", width)
            .set("font-family", "sans-serif")
            .add(self.title)
            .add(
                Rectangle::new()
                    .set("x", left)
                    .set("y", top)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "white"),
            )
            .add(self.grid)
            .add(self.traces)
            .add(self.legend)
            .add(self.annotation)
    }
}

impl Default for Document {
    fn default() -> Document {
        Document {
            view_box: Default::default(),
            title: Title::new(""),
            grid: Group::new().set("id", "grid"),
            traces: Group::new().set("id", "traces"),
            legend: Group::new().set("id", "legend"),
            annotation: Group::new().set("id", "annotation"),
        }
    }
}

fn grid_line((x1, y1): (f64, f64), (x2, y2): (f64, f64), color: &str) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", color)
        .set("stroke-width", 0.5)
}

/// Multiples of a round step (1, 2 or 5 times a power of ten) within `[min, max]`, about ten of
/// them.
fn grid_ticks(min: f64, max: f64) -> impl Iterator<Item = f64> {
    let step = grid_step(max - min);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    let count = if step.is_finite() && step > 0.0 {
        (last - first + 1).max(0)
    } else {
        0
    };
    (0..count).map(move |i| (first + i) as f64 * step)
}

fn grid_step(span: f64) -> f64 {
    let raw = span / 10.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}
