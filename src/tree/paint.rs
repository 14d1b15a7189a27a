use pdf_writer::Content;

use crate::fonts::FontPair;
use crate::pdf::Canvas;

use super::flex::LayoutBox;
use super::{Align, Node};

pub(crate) fn paint(root: &LayoutBox<'_>, page_height: f32, fonts: &FontPair) -> Content {
    let mut canvas = Canvas::new(fonts);
    paint_box(&mut canvas, root, page_height);
    canvas.into_content()
}

fn paint_box(canvas: &mut Canvas<'_>, b: &LayoutBox<'_>, page_height: f32) {
    // Layout measures down from the page top; PDF user space measures up from the bottom.
    let bottom = page_height - b.y - b.height;
    match b.node {
        Node::View { style, .. } => {
            if let Some(fill) = style.background {
                canvas.fill_rect(b.x, bottom, b.width, b.height, fill);
            }
            for child in &b.children {
                paint_box(canvas, child, page_height);
            }
            if let Some(border) = style.border {
                canvas.stroke_rect(b.x, bottom, b.width, b.height, border.color, border.width);
            }
        }
        Node::Text { style, .. } => {
            for (i, line) in b.lines.iter().enumerate() {
                let top = page_height - b.y - i as f32 * style.line_height;
                let baseline = canvas.baseline(top, style.line_height, style.size, style.bold);
                match style.align {
                    Align::Left => {
                        canvas.text(b.x, baseline, line, style.size, style.bold, style.color)
                    }
                    Align::Right => canvas.text_right(
                        b.x + b.width,
                        baseline,
                        line,
                        style.size,
                        style.bold,
                        style.color,
                    ),
                }
            }
        }
    }
}
