//! Minimal SVG document writer.

use std::fmt::Write;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub size: u32,
    pub fill: &'a str,
    pub anchor: Anchor,
    pub bold: bool,
}

impl<'a> TextStyle<'a> {
    pub fn new(size: u32, fill: &'a str) -> Self {
        Self {
            size,
            fill,
            anchor: Anchor::Middle,
            bold: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// An SVG document under construction.
///
/// Writing to a `String` cannot fail, so the `write!` results are ignored.
pub struct Svg {
    width: u32,
    height: u32,
    body: String,
}

impl Svg {
    /// A canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: &str) -> Self {
        let mut svg = Self {
            width,
            height,
            body: String::new(),
        };
        svg.rect(0.0, 0.0, f64::from(width), f64::from(height), background);
        svg
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.height)
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            w.max(0.0),
            h.max(0.0),
            escape(fill)
        );
        self
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &str, width: f64) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{width}"/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            escape(stroke)
        );
        self
    }

    /// Open line through `points`; `dashed` draws a 6/4 dash pattern.
    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64, dashed: bool) -> &mut Self {
        let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
        let _ = writeln!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{width}"{dash}/>"#,
            points_attr(points),
            escape(stroke)
        );
        self
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str, opacity: f64) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<polygon points="{}" fill="{}" fill-opacity="{opacity}"/>"#,
            points_attr(points),
            escape(fill)
        );
        self
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{}"/>"#,
            escape(fill)
        );
        self
    }

    /// Raw path data. Callers build `d` from numbers only.
    pub fn path(&mut self, d: &str, fill: &str) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="{}"/>"#,
            escape(d),
            escape(fill)
        );
        self
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle<'_>) -> &mut Self {
        let weight = if style.bold { r#" font-weight="bold""# } else { "" };
        let _ = writeln!(
            self.body,
            r#"<text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="{}" fill="{}" text-anchor="{}"{weight}>{}</text>"#,
            style.size,
            escape(style.fill),
            style.anchor.as_str(),
            escape(content)
        );
        self
    }

    pub fn finish(self) -> Vec<u8> {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{}</svg>\n",
            self.body,
            w = self.width,
            h = self.height,
        )
        .into_bytes()
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;");
    }

    #[test]
    fn document_wraps_body() {
        let mut svg = Svg::new(100, 50, "#000");
        svg.text(50.0, 25.0, "a<b", TextStyle::new(12, "white"));
        let out = String::from_utf8(svg.finish()).unwrap();
        assert!(out.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\""));
        assert!(out.contains(">a&lt;b</text>"));
        assert!(out.trim_end().ends_with("</svg>"));
    }
}
