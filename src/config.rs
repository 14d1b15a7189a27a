use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Fixed page geometry in PDF points. Defaults to ISO A4.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub header_height: f32,
    pub footer_height: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 36.0,
            header_height: 84.0,
            footer_height: 32.0,
        }
    }
}

impl PageGeometry {
    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Lowest y a section card may reach; the footer band sits below it.
    pub fn bottom_limit(&self) -> f32 {
        self.margin + self.footer_height
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

/// Measurements shared by height computation and drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metrics {
    pub line_height: f32,
    pub heading_height: f32,
    pub card_padding_top: f32,
    pub card_padding_bottom: f32,
    pub card_padding_x: f32,
    pub section_gap: f32,
    /// Character budget per wrapped line of a free-text block.
    pub max_chars_per_line: usize,
    /// Share of the card's inner width given to row labels.
    pub label_column_ratio: f32,
    pub body_font_size: f32,
    pub heading_font_size: f32,
    pub title_font_size: f32,
    pub small_font_size: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            line_height: 14.0,
            heading_height: 22.0,
            card_padding_top: 8.0,
            card_padding_bottom: 8.0,
            card_padding_x: 10.0,
            section_gap: 10.0,
            max_chars_per_line: 64,
            label_column_ratio: 0.36,
            body_font_size: 9.5,
            heading_font_size: 11.0,
            title_font_size: 20.0,
            small_font_size: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub accent: [u8; 3],
    pub text: [u8; 3],
    pub muted: [u8; 3],
    pub border: [u8; 3],
    pub heading_fill: [u8; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: [0x0f, 0x5c, 0x4a],
            text: [0x1f, 0x29, 0x37],
            muted: [0x6b, 0x72, 0x80],
            border: [0xd1, 0xd5, 0xdb],
            heading_fill: [0xec, 0xf6, 0xf3],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub page: PageGeometry,
    pub metrics: Metrics,
    pub theme: Theme,
    /// TrueType/OpenType family to embed; built-in Helvetica when unset or not found.
    pub font_family: Option<String>,
    /// Searched before the platform font directories.
    pub font_dirs: Vec<PathBuf>,
}

pub fn load_options(path: Option<&Path>) -> Result<RenderOptions, Error> {
    let Some(path) = path else {
        return Ok(RenderOptions::default());
    };
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// The reference instant of a render: "today" for ages, "now" for the footer timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub generated_at: NaiveDateTime,
}

impl RenderContext {
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }

    pub fn now() -> Self {
        Self::at(chrono::Local::now().naive_local())
    }

    pub fn today(&self) -> NaiveDate {
        self.generated_at.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_keep_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"page": {"margin": 40}, "fontFamily": "Noto Sans"}"#).unwrap();
        assert_eq!(options.page.margin, 40.0);
        assert_eq!(options.page.width, 595.0);
        assert_eq!(options.metrics.max_chars_per_line, 64);
        assert_eq!(options.font_family.as_deref(), Some("Noto Sans"));
        assert!(options.font_dirs.is_empty());
    }

    #[test]
    fn body_area_of_a4() {
        let page = PageGeometry::default();
        assert_eq!(page.top(), 806.0);
        assert_eq!(page.bottom_limit(), 68.0);
        assert_eq!(page.content_width(), 523.0);
    }

    #[test]
    fn today_is_the_date_of_the_instant() {
        let ctx = RenderContext::at(
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        );
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
