mod compose;
mod config;
mod content;
mod error;
mod fonts;
mod model;
mod pdf;
mod plan;
mod render;
pub mod tree;
mod wrap;

pub use compose::{Composition, Placement, compose};
pub use config::{Metrics, PageGeometry, RenderContext, RenderOptions, Theme, load_options};
pub use content::{Content, Presence, age_on, prettify};
pub use error::Error;
pub use model::{BiodataRecord, DocumentPlan, PrettyValue, Row, Section, Variant};
pub use pdf::composition;
pub use plan::{SECTION_HEADINGS, plan, plan_sections};
pub use render::{
    DrawRenderer, Renderer, TreeRenderer, export_filename, render_chain, render_document,
    render_with_fallback,
};
pub use wrap::{row_units, section_height, wrap};
