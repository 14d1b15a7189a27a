use crate::compose::Placement;
use crate::config::{Metrics, PageGeometry, Theme};
use crate::model::{DocumentPlan, PrettyValue, Section};
use crate::wrap::{row_units, wrap};

use super::canvas::Canvas;

pub(super) fn draw_header(
    canvas: &mut Canvas<'_>,
    plan: &DocumentPlan,
    page: &PageGeometry,
    metrics: &Metrics,
    theme: &Theme,
) {
    let top = page.top();
    let left = page.margin;
    let right = page.margin + page.content_width();

    let title_baseline = top - metrics.title_font_size;
    canvas.text(
        left,
        title_baseline,
        &plan.title,
        metrics.title_font_size,
        true,
        theme.accent,
    );
    canvas.text(
        left,
        title_baseline - metrics.title_font_size,
        plan.variant.subtitle(),
        metrics.body_font_size,
        false,
        theme.muted,
    );

    if let Some(badge) = &plan.status_badge {
        let size = metrics.small_font_size;
        let pad = size * 0.8;
        let w = canvas.text_width(badge, size, true) + 2.0 * pad;
        let h = size + pad;
        let y = title_baseline - size * 0.3;
        canvas.fill_rect(right - w, y, w, h, theme.heading_fill);
        canvas.stroke_rect(right - w, y, w, h, theme.accent, 0.75);
        canvas.text_right(right - pad, y + pad * 0.6 + size * 0.15, badge, size, true, theme.accent);
    }

    let rule_y = top - page.header_height + metrics.section_gap / 2.0;
    canvas.hline(left, right, rule_y, theme.accent, 1.2);
}

pub(super) fn draw_footer(
    canvas: &mut Canvas<'_>,
    plan: &DocumentPlan,
    page: &PageGeometry,
    metrics: &Metrics,
    theme: &Theme,
) {
    let left = page.margin;
    let right = page.margin + page.content_width();
    let band_top = page.bottom_limit();
    canvas.hline(left, right, band_top - 4.0, theme.border, 0.5);

    let baseline = page.margin + (page.footer_height - metrics.small_font_size) / 2.0;
    let size = metrics.small_font_size;
    canvas.text(left, baseline, &plan.generated_on(), size, false, theme.muted);
    canvas.text_right(right, baseline, &plan.document_id, size, false, theme.muted);
}

/// Draw one section card at its composed position. Row heights follow `row_units`, so the card
/// fills exactly the height the composer reserved for it.
pub(super) fn draw_section(
    canvas: &mut Canvas<'_>,
    section: &Section,
    placement: &Placement,
    page: &PageGeometry,
    metrics: &Metrics,
    theme: &Theme,
) {
    let x = page.margin;
    let w = page.content_width();
    let top = placement.top();

    canvas.fill_rect(x, top - metrics.heading_height, w, metrics.heading_height, theme.heading_fill);
    canvas.stroke_rect(x, placement.y, w, placement.height, theme.border, 0.75);
    canvas.text(
        x + metrics.card_padding_x,
        canvas.baseline(top, metrics.heading_height, metrics.heading_font_size, true),
        section.heading,
        metrics.heading_font_size,
        true,
        theme.accent,
    );

    let inner_left = x + metrics.card_padding_x;
    let inner_right = x + w - metrics.card_padding_x;
    let value_left = inner_left + (inner_right - inner_left) * metrics.label_column_ratio;
    let size = metrics.body_font_size;
    let lh = metrics.line_height;

    let mut row_top = top - metrics.heading_height - metrics.card_padding_top;
    for (i, row) in section.rows.iter().enumerate() {
        let units = row_units(row, metrics.max_chars_per_line);
        let row_h = units as f32 * lh;
        let label_baseline = canvas.baseline(row_top, lh, size, true);
        let first_baseline = canvas.baseline(row_top, lh, size, false);

        canvas.text(inner_left, label_baseline, row.label, size, true, theme.muted);
        match &row.value {
            PrettyValue::Inline(value) => {
                canvas.text_fit_right(
                    inner_right,
                    inner_right - value_left,
                    first_baseline,
                    value,
                    size,
                    false,
                    theme.text,
                );
            }
            PrettyValue::Block(value) => {
                canvas.stroke_rect(
                    value_left - 4.0,
                    row_top - row_h + 1.0,
                    inner_right - value_left + 4.0,
                    row_h - 2.0,
                    theme.border,
                    0.5,
                );
                for (n, line) in wrap(value, metrics.max_chars_per_line).iter().enumerate() {
                    let baseline = first_baseline - n as f32 * lh;
                    canvas.text(value_left, baseline, line, size, false, theme.text);
                }
            }
        }

        row_top -= row_h;
        if i + 1 < section.rows.len() {
            canvas.hline(inner_left, inner_right, row_top, theme.border, 0.25);
        }
    }
}
