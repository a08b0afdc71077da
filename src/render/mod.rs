//! render
//!
//! Turns an encoded path into an SVG drawing.
//!
//! # Pipeline
//!
//! For every event:
//! 1. Transform the normalized point through the [`Orientation`]
//!    (mirror, then vertical flip, then rotation about the centre)
//! 2. Map into the viewport with padding and a Y-axis flip
//! 3. Emit `M` for moves, `L` for lines, and `L` to the notch endpoint for
//!    ticks
//!
//! An end cap is appended at the final point, perpendicular to the last
//! rendered segment. Grid lines, anchor nodes, and labels are optional.
//!
//! # Determinism
//!
//! Coordinates are written with two decimals, and anchors are visited in
//! sorted order, so identical inputs render to identical bytes. The identity
//! orientation skips the transform entirely.
//!
//! # Modules
//!
//! - [`raster`] - Async PNG export of rendered markup

pub mod raster;

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::core::config::{DEFAULT_RENDER_PADDING, DEFAULT_RENDER_SIZE};
use crate::core::decode::{EMBED_PREFIX, EMBED_SUFFIX};
use crate::core::lattice::Style;
use crate::core::package::{GlyphPackage, Orientation, PackageError};
use crate::core::path::{EncodedPath, PathEvent};
use crate::core::types::{AnchorMap, Point};

/// Default viewport edge length.
pub const DEFAULT_SIZE: f64 = DEFAULT_RENDER_SIZE;

/// Default viewport padding.
pub const DEFAULT_PADDING: f64 = DEFAULT_RENDER_PADDING;

/// Placeholder label drawn for the space anchor.
pub const SPACE_LABEL: &str = "\u{2423}";

/// Viewport and overlay settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Viewport edge length (the viewport is square)
    pub size: f64,
    /// Padding on every side of the lattice area
    pub padding: f64,
    pub show_grid: bool,
    /// Grid cells per axis
    pub grid_lines: u32,
    pub show_nodes: bool,
    pub show_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            padding: DEFAULT_PADDING,
            show_grid: false,
            grid_lines: 10,
            show_nodes: true,
            show_labels: false,
        }
    }
}

/// Apply an orientation to a normalized point.
///
/// Mirror maps `x` to `1 - x`, flip maps `y` to `1 - y`, then the point is
/// rotated counter-clockwise about `(0.5, 0.5)`. Whole turns are skipped so
/// the identity orientation returns the input unchanged.
pub fn transform(point: Point, orientation: &Orientation) -> Point {
    if orientation.is_identity() {
        return point;
    }

    let mut p = point;
    if orientation.mirror {
        p.x = 1.0 - p.x;
    }
    if orientation.flip_vertical {
        p.y = 1.0 - p.y;
    }

    let degrees = orientation.turn_degrees();
    if degrees == 0.0 {
        return p;
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - 0.5;
    let dy = p.y - 0.5;
    Point::raw(0.5 + dx * cos - dy * sin, 0.5 + dx * sin + dy * cos)
}

/// Map a normalized point into viewport coordinates.
///
/// Viewport Y grows downward, lattice Y grows upward.
pub fn to_viewport(point: Point, options: &RenderOptions) -> Point {
    let inner = options.size - 2.0 * options.padding;
    Point::raw(
        options.padding + point.x * inner,
        options.padding + (1.0 - point.y) * inner,
    )
}

/// Transform then map a normalized point.
pub fn viewport_point(point: Point, orientation: &Orientation, options: &RenderOptions) -> Point {
    to_viewport(transform(point, orientation), options)
}

/// Render with default options.
pub fn render(
    path: &EncodedPath,
    anchors: &AnchorMap,
    style: &Style,
    orientation: &Orientation,
) -> String {
    render_with(path, anchors, style, orientation, &RenderOptions::default())
}

/// Render a path as SVG markup.
pub fn render_with(
    path: &EncodedPath,
    anchors: &AnchorMap,
    style: &Style,
    orientation: &Orientation,
    options: &RenderOptions,
) -> String {
    let size = num(options.size);
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{size}" height="{size}" fill="{}"/>"#,
        escape(&style.background)
    );

    if options.show_grid {
        write_grid(&mut svg, style, options);
    }

    let d = path_data(path, style, orientation, options);
    if !d.is_empty() {
        let _ = writeln!(
            svg,
            r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            escape(&style.stroke_color),
            num(style.stroke_width)
        );
    }

    let start = path.events.first().map(PathEvent::ch);

    if options.show_nodes {
        svg.push_str("<g>\n");
        for (&ch, &anchor) in anchors {
            let p = viewport_point(anchor, orientation, options);
            let fill = if Some(ch) == start {
                &style.start_node_color
            } else {
                &style.node_color
            };
            let _ = writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                num(p.x),
                num(p.y),
                num(style.node_radius),
                escape(fill)
            );
        }
        svg.push_str("</g>\n");
    }

    if options.show_labels {
        let offset = style.node_radius + 3.0;
        let _ = writeln!(
            svg,
            r#"<g font-family="monospace" font-size="12" fill="{}">"#,
            escape(&style.label_color)
        );
        for (&ch, &anchor) in anchors {
            let p = viewport_point(anchor, orientation, options);
            let label = if ch == ' ' {
                SPACE_LABEL.to_string()
            } else {
                escape(&ch.to_string())
            };
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}">{label}</text>"#,
                num(p.x + offset),
                num(p.y - offset)
            );
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Compose the `d` attribute for a path, end cap included.
pub fn path_data(
    path: &EncodedPath,
    style: &Style,
    orientation: &Orientation,
    options: &RenderOptions,
) -> String {
    let mut d = String::new();
    let mut points: Vec<Point> = Vec::with_capacity(path.events.len());

    for event in &path.events {
        let (cmd, p) = match *event {
            PathEvent::Move { x, y, .. } => ('M', Point::raw(x, y)),
            PathEvent::Line { x, y, .. } => ('L', Point::raw(x, y)),
            PathEvent::Tick {
                tick_end_x,
                tick_end_y,
                ..
            } => ('L', Point::raw(tick_end_x, tick_end_y)),
        };
        let v = viewport_point(p, orientation, options);
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = write!(d, "{cmd} {} {}", num(v.x), num(v.y));
        points.push(v);
    }

    if let [.., prev, last] = points.as_slice() {
        let dx = last.x - prev.x;
        let dy = last.y - prev.y;
        let len = dx.hypot(dy);
        if len > f64::EPSILON {
            let half = style.end_cap_length / 2.0;
            let (px, py) = (-dy / len * half, dx / len * half);
            let _ = write!(
                d,
                " M {} {} L {} {}",
                num(last.x - px),
                num(last.y - py),
                num(last.x + px),
                num(last.y + py)
            );
        }
    }

    d
}

fn write_grid(svg: &mut String, style: &Style, options: &RenderOptions) {
    let n = options.grid_lines.max(1);
    let lo = options.padding;
    let hi = options.size - options.padding;

    let _ = writeln!(
        svg,
        r#"<g stroke="{}" stroke-width="1">"#,
        escape(&style.grid_color)
    );
    for k in 0..=n {
        let t = f64::from(k) / f64::from(n);
        let v = to_viewport(Point::raw(t, t), options);
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" y1="{lo}" x2="{x}" y2="{hi}"/>"#,
            x = num(v.x),
            lo = num(lo),
            hi = num(hi)
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{lo}" y1="{y}" x2="{hi}" y2="{y}"/>"#,
            y = num(v.y),
            lo = num(lo),
            hi = num(hi)
        );
    }
    svg.push_str("</g>\n");
}

/// Insert a package comment into rendered markup.
///
/// The comment goes right after the opening `<svg ...>` tag, or at the end if
/// there is none. The embedded copy drops its own cached `svg` and stores its
/// orientation normalized, so the comment always parses back.
pub fn embed_package(markup: &str, pkg: &GlyphPackage) -> Result<String, PackageError> {
    let mut bare = pkg.clone();
    bare.svg = None;
    bare.metadata.orientation = bare.metadata.orientation.normalized();
    let comment = format!(
        "{EMBED_PREFIX}{}{EMBED_SUFFIX}",
        STANDARD.encode(bare.to_compact_json()?)
    );

    let insert_at = markup
        .find("<svg")
        .and_then(|start| markup[start..].find('>').map(|end| start + end + 1));

    Ok(match insert_at {
        Some(at) => {
            let mut out = String::with_capacity(markup.len() + comment.len() + 1);
            out.push_str(&markup[..at]);
            out.push('\n');
            out.push_str(&comment);
            out.push_str(&markup[at..]);
            out
        }
        None => format!("{markup}{comment}"),
    })
}

/// Render a package's path and embed the package in the result.
pub fn render_package(
    pkg: &GlyphPackage,
    anchors: &AnchorMap,
    options: &RenderOptions,
) -> Result<String, PackageError> {
    let markup = render_with(
        &pkg.path,
        anchors,
        &pkg.metadata.style,
        &pkg.metadata.orientation,
        options,
    );
    embed_package(&markup, pkg)
}

/// Format a coordinate with two decimals, without negative zero.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// Escape text for use in attributes and element content.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
