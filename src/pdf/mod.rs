mod canvas;
mod layout;

use std::collections::HashSet;

use crate::compose::{Composition, compose};
use crate::config::RenderOptions;
use crate::error::Error;
use crate::model::DocumentPlan;

pub(crate) use canvas::{Canvas, DocumentInfo, SinglePage};
use layout::{draw_footer, draw_header, draw_section};

/// Every character the document will draw, for font subsetting.
pub(crate) fn used_chars(plan: &DocumentPlan) -> HashSet<char> {
    let mut chars: HashSet<char> = HashSet::new();
    chars.insert(' ');
    chars.extend(plan.title.chars());
    chars.extend(plan.variant.subtitle().chars());
    if let Some(badge) = &plan.status_badge {
        chars.extend(badge.chars());
    }
    chars.extend(plan.generated_on().chars());
    chars.extend(plan.document_id.chars());
    for section in &plan.sections {
        chars.extend(section.heading.chars());
        for row in &section.rows {
            chars.extend(row.label.chars());
            chars.extend(row.value.text().chars());
        }
    }
    chars
}

/// Where each section goes on the page, and which ones are left out.
pub fn composition(plan: &DocumentPlan, options: &RenderOptions) -> Composition {
    compose(&plan.sections, &options.page, &options.metrics)
}

/// Draw `plan` onto a single page with explicit coordinates.
pub fn render(plan: &DocumentPlan, options: &RenderOptions) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let placed = composition(plan, options);
    let t_compose = t0.elapsed();

    let page = SinglePage::new(options, &used_chars(plan))?;
    let t_fonts = t0.elapsed();

    let mut canvas = Canvas::new(&page.fonts);
    draw_header(&mut canvas, plan, &options.page, &options.metrics, &options.theme);
    for placement in &placed.placed {
        draw_section(
            &mut canvas,
            &plan.sections[placement.section],
            placement,
            &options.page,
            &options.metrics,
            &options.theme,
        );
    }
    draw_footer(&mut canvas, plan, &options.page, &options.metrics, &options.theme);
    let content = canvas.into_content();
    let t_draw = t0.elapsed();

    let info = DocumentInfo {
        title: &plan.title,
        created: plan.generated_at,
    };
    let bytes = page.finish(content, &options.page, &info)?;
    let t_total = t0.elapsed();

    log::info!(
        "Draw render: compose={:.1}ms, fonts={:.1}ms, draw={:.1}ms, assembly={:.1}ms ({} placed, {} dropped, {} bytes)",
        t_compose.as_secs_f64() * 1000.0,
        (t_fonts - t_compose).as_secs_f64() * 1000.0,
        (t_draw - t_fonts).as_secs_f64() * 1000.0,
        (t_total - t_draw).as_secs_f64() * 1000.0,
        placed.placed.len(),
        placed.dropped.len(),
        bytes.len(),
    );
    Ok(bytes)
}
