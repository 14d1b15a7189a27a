use crate::error::Error;
use crate::fonts::FontPair;

use super::{Direction, Justify, Node, Overflow, Role, Style, TextStyle, Width};

/// A node with its resolved box. `y` is the top edge measured down from the top of the page.
pub(crate) struct LayoutBox<'a> {
    pub(crate) node: &'a Node,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    /// Wrapped lines, for text leaves.
    pub(crate) lines: Vec<String>,
    pub(crate) children: Vec<LayoutBox<'a>>,
}

impl LayoutBox<'_> {
    pub(crate) fn section_headings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_sections(&mut out);
        out
    }

    fn collect_sections(&self, out: &mut Vec<String>) {
        if let Node::View {
            role: Some(Role::Section(heading)),
            ..
        } = self.node
        {
            out.push(heading.clone());
            return;
        }
        for child in &self.children {
            child.collect_sections(out);
        }
    }
}

fn width_of(node: &Node) -> Width {
    match node {
        Node::View { style, .. } => style.width,
        Node::Text { style, .. } => style.width,
    }
}

struct Flex<'f> {
    fonts: &'f FontPair,
}

impl Flex<'_> {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self.fonts.get(style.bold).text_width(text, style.size)
    }

    /// Greedy wrap on measured glyph widths. A word wider than the box sits on its own line.
    fn wrap(&self, text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        for word in text.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if self.measure(&candidate, style) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn intrinsic_width(&self, node: &Node) -> f32 {
        match node {
            Node::Text { content, style } => self.measure(content, style),
            Node::View {
                style, children, ..
            } => {
                let widths = children.iter().map(|c| self.intrinsic_width(c));
                let inner = match style.direction {
                    Direction::Row => {
                        widths.sum::<f32>()
                            + style.gap * children.len().saturating_sub(1) as f32
                    }
                    Direction::Column => widths.fold(0.0, f32::max),
                };
                inner + style.padding[1] + style.padding[3]
            }
        }
    }

    fn place<'a>(&self, node: &'a Node, x: f32, y: f32, width: f32) -> Result<LayoutBox<'a>, Error> {
        if !(width.is_finite() && width >= 0.0) {
            return Err(Error::Backend(format!(
                "no room for node at ({x:.1}, {y:.1}): width {width}"
            )));
        }
        match node {
            Node::Text { content, style } => {
                let lines = self.wrap(content, style, width);
                let height = lines.len().max(1) as f32 * style.line_height;
                Ok(LayoutBox {
                    node,
                    x,
                    y,
                    width,
                    height,
                    lines,
                    children: Vec::new(),
                })
            }
            Node::View {
                style, children, ..
            } => {
                let [pt, pr, pb, pl] = style.padding;
                let inner_w = width - pl - pr;
                let limit = match (style.overflow, style.height) {
                    (Overflow::DropChildren, Some(h)) => Some(y + h - pb),
                    _ => None,
                };
                let (children, content_h) = match style.direction {
                    Direction::Column => self.column(style, children, x + pl, y + pt, inner_w, limit)?,
                    Direction::Row => self.row(style, children, x + pl, y + pt, inner_w)?,
                };
                let height = style.height.unwrap_or(content_h + pt + pb);
                if !height.is_finite() || height < 0.0 {
                    return Err(Error::Backend(format!("view at y={y:.1} has height {height}")));
                }
                Ok(LayoutBox {
                    node,
                    x,
                    y,
                    width,
                    height,
                    lines: Vec::new(),
                    children,
                })
            }
        }
    }

    fn column<'a>(
        &self,
        style: &Style,
        children: &'a [Node],
        x: f32,
        y: f32,
        width: f32,
        limit: Option<f32>,
    ) -> Result<(Vec<LayoutBox<'a>>, f32), Error> {
        let mut cursor = y;
        let mut placed = Vec::with_capacity(children.len());
        for (i, child) in children.iter().enumerate() {
            let w = match width_of(child) {
                Width::Fraction(f) => width * f,
                Width::Auto | Width::Fill => width,
            };
            let laid = self.place(child, x, cursor, w)?;
            if let Some(limit) = limit {
                if cursor + laid.height > limit {
                    log::debug!(
                        "leaving out child {i}: needs {:.1}pt, {:.1}pt left",
                        laid.height,
                        limit - cursor
                    );
                    continue;
                }
            }
            cursor += laid.height + style.gap;
            placed.push(laid);
        }
        let used = if placed.is_empty() {
            0.0
        } else {
            cursor - style.gap - y
        };
        Ok((placed, used))
    }

    fn row<'a>(
        &self,
        style: &Style,
        children: &'a [Node],
        x: f32,
        y: f32,
        width: f32,
    ) -> Result<(Vec<LayoutBox<'a>>, f32), Error> {
        let n = children.len();
        let gaps = style.gap * n.saturating_sub(1) as f32;
        let avail = width - gaps;
        let fixed: Vec<Option<f32>> = children
            .iter()
            .map(|c| match width_of(c) {
                Width::Fraction(f) => Some(avail * f),
                Width::Auto => Some(self.intrinsic_width(c).min(avail)),
                Width::Fill => None,
            })
            .collect();
        let taken: f32 = fixed.iter().flatten().sum();
        let fills = fixed.iter().filter(|w| w.is_none()).count();
        let share = if fills > 0 {
            (avail - taken) / fills as f32
        } else {
            0.0
        };
        let widths: Vec<f32> = fixed.into_iter().map(|w| w.unwrap_or(share)).collect();

        let spacing = match style.justify {
            Justify::SpaceBetween if n > 1 => {
                let used: f32 = widths.iter().sum::<f32>() + gaps;
                style.gap + (width - used).max(0.0) / (n - 1) as f32
            }
            _ => style.gap,
        };

        let mut cursor = x;
        let mut height: f32 = 0.0;
        let mut placed = Vec::with_capacity(n);
        for (child, w) in children.iter().zip(widths) {
            let laid = self.place(child, cursor, y, w)?;
            cursor += w + spacing;
            height = height.max(laid.height);
            placed.push(laid);
        }
        Ok((placed, height))
    }
}

/// Resolve every box in the tree for a page `page_width` points wide.
pub(crate) fn layout<'a>(
    root: &'a Node,
    page_width: f32,
    fonts: &FontPair,
) -> Result<LayoutBox<'a>, Error> {
    let t0 = std::time::Instant::now();
    let laid = Flex { fonts }.place(root, 0.0, 0.0, page_width)?;
    log::debug!("Flex layout: {:.1}ms", t0.elapsed().as_secs_f64() * 1000.0);
    Ok(laid)
}
