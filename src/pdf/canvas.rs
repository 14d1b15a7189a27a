use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::{PageGeometry, RenderOptions};
use crate::error::Error;
use crate::fonts::{FontEntry, FontPair, register_fonts};

pub(crate) struct DocumentInfo<'a> {
    pub(crate) title: &'a str,
    pub(crate) created: NaiveDateTime,
}

/// A one-page PDF under construction: object ids, fonts, and the final assembly.
pub(crate) struct SinglePage {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    pub(crate) fonts: FontPair,
}

impl SinglePage {
    pub(crate) fn new(options: &RenderOptions, used_chars: &HashSet<char>) -> Result<Self, Error> {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };
        let catalog_id = alloc();
        let pages_id = alloc();
        let fonts = register_fonts(
            &mut pdf,
            &mut alloc,
            options.font_family.as_deref(),
            &options.font_dirs,
            used_chars,
        )?;
        Ok(Self {
            pdf,
            next_id,
            catalog_id,
            pages_id,
            fonts,
        })
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    pub(crate) fn finish(
        mut self,
        content: Content,
        page: &PageGeometry,
        info: &DocumentInfo<'_>,
    ) -> Result<Vec<u8>, Error> {
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(Error::Backend(format!(
                "invalid page size {}x{}",
                page.width, page.height
            )));
        }
        let page_id = self.alloc();
        let content_id = self.alloc();
        let info_id = self.alloc();

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        self.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids([page_id])
            .count(1);

        {
            let mut pg = self.pdf.page(page_id);
            pg.media_box(Rect::new(0.0, 0.0, page.width, page.height))
                .parent(self.pages_id)
                .contents(content_id);
            let mut resources = pg.resources();
            let mut fonts = resources.fonts();
            for (name, font_ref) in self.fonts.resources() {
                fonts.pair(Name(name.as_bytes()), font_ref);
            }
        }

        let created = pdf_date(info.created);
        self.pdf
            .document_info(info_id)
            .title(TextStr(info.title))
            .creator(TextStr("biodata-pdf"))
            .producer(TextStr(concat!("biodata-pdf ", env!("CARGO_PKG_VERSION"))))
            .creation_date(created);

        Ok(self.pdf.finish())
    }
}

fn pdf_date(at: NaiveDateTime) -> Date {
    // Years outside 0..=9999 cannot be expressed in a PDF date string.
    let year = u16::try_from(at.year().clamp(0, 9999)).unwrap_or(0);
    Date::new(year)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
}

fn rgb(color: [u8; 3]) -> (f32, f32, f32) {
    (
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    )
}

/// Drawing primitives over one content stream. Coordinates are PDF user space.
pub(crate) struct Canvas<'a> {
    content: Content,
    fonts: &'a FontPair,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(fonts: &'a FontPair) -> Self {
        Self {
            content: Content::new(),
            fonts,
        }
    }

    pub(crate) fn font(&self, bold: bool) -> &'a FontEntry {
        self.fonts.get(bold)
    }

    pub(crate) fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.font(bold).text_width(text, size)
    }

    /// Baseline that centres a line of `size` text in a line box whose top edge is `top`.
    pub(crate) fn baseline(&self, top: f32, line_height: f32, size: f32, bold: bool) -> f32 {
        top - (line_height + size * self.font(bold).ascender_ratio) / 2.0
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        let (r, g, b) = rgb(color);
        self.content.save_state();
        self.content.set_fill_rgb(r, g, b);
        self.content.rect(x, y, w, h);
        self.content.fill_nonzero();
        self.content.restore_state();
    }

    pub(crate) fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3], width: f32) {
        let (r, g, b) = rgb(color);
        self.content.save_state();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(width);
        self.content.rect(x, y, w, h);
        self.content.stroke();
        self.content.restore_state();
    }

    pub(crate) fn hline(&mut self, x1: f32, x2: f32, y: f32, color: [u8; 3], width: f32) {
        let (r, g, b) = rgb(color);
        self.content.save_state();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(width);
        self.content.move_to(x1, y);
        self.content.line_to(x2, y);
        self.content.stroke();
        self.content.restore_state();
    }

    pub(crate) fn text(
        &mut self,
        x: f32,
        baseline: f32,
        text: &str,
        size: f32,
        bold: bool,
        color: [u8; 3],
    ) {
        if text.is_empty() {
            return;
        }
        let font = self.font(bold);
        let (r, g, b) = rgb(color);
        let bytes = font.encode(text);
        self.content.begin_text();
        self.content.set_fill_rgb(r, g, b);
        self.content.set_font(Name(font.pdf_name.as_bytes()), size);
        self.content.next_line(x, baseline);
        self.content.show(Str(&bytes));
        self.content.end_text();
    }

    /// Text whose right edge sits at `right`.
    pub(crate) fn text_right(
        &mut self,
        right: f32,
        baseline: f32,
        text: &str,
        size: f32,
        bold: bool,
        color: [u8; 3],
    ) {
        let w = self.text_width(text, size, bold);
        self.text(right - w, baseline, text, size, bold, color);
    }

    /// Right-aligned single-line text kept within `max_width`; too-wide text is set smaller
    /// instead of crossing into the column to its left.
    pub(crate) fn text_fit_right(
        &mut self,
        right: f32,
        max_width: f32,
        baseline: f32,
        text: &str,
        size: f32,
        bold: bool,
        color: [u8; 3],
    ) {
        let w = self.text_width(text, size, bold);
        let size = if w > max_width && w > 0.0 {
            let fitted = size * max_width.max(0.0) / w;
            log::debug!("{text:?} is {w:.1}pt wide, {max_width:.1}pt available: set at {fitted:.2}pt");
            fitted
        } else {
            size
        };
        self.text_right(right, baseline, text, size, bold, color);
    }

    pub(crate) fn into_content(self) -> Content {
        self.content
    }
}
