//! Single-page placement of section cards.
//!
//! Sections are stacked top-down from a running cursor. A card that would cross the bottom
//! limit is dropped whole and the cursor stays where it was, so a later, shorter card may still
//! fit. Nothing is ever moved to a second page.

use crate::config::{Metrics, PageGeometry};
use crate::model::Section;
use crate::wrap::section_height;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Index into the planned section list.
    pub section: usize,
    /// Bottom edge of the card in PDF user space (origin bottom-left).
    pub y: f32,
    pub height: f32,
}

impl Placement {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composition {
    pub placed: Vec<Placement>,
    /// Sections that did not fit, in planned order.
    pub dropped: Vec<usize>,
}

pub fn compose(sections: &[Section], page: &PageGeometry, metrics: &Metrics) -> Composition {
    let mut cursor = page.top() - page.header_height;
    let bottom = page.bottom_limit();
    let mut out = Composition::default();

    for (idx, section) in sections.iter().enumerate() {
        let height = section_height(section, metrics);
        if cursor - height < bottom {
            log::debug!(
                "section {:?} ({height:.1}pt) does not fit above {bottom:.1}pt (cursor {cursor:.1}pt), dropped",
                section.heading
            );
            out.dropped.push(idx);
            continue;
        }
        out.placed.push(Placement {
            section: idx,
            y: cursor - height,
            height,
        });
        cursor -= height + metrics.section_gap;
    }
    out
}
