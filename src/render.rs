use crate::config::{RenderContext, RenderOptions};
use crate::content::Content;
use crate::error::Error;
use crate::model::{BiodataRecord, DocumentPlan, Variant};
use crate::plan::plan;

/// Turns a planned document into PDF bytes. Implementations hold no per-call state.
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, plan: &DocumentPlan, options: &RenderOptions) -> Result<Vec<u8>, Error>;
}

/// Explicit-coordinate drawing with character-budget wrapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawRenderer;

impl Renderer for DrawRenderer {
    fn name(&self) -> &'static str {
        "draw"
    }

    fn render(&self, plan: &DocumentPlan, options: &RenderOptions) -> Result<Vec<u8>, Error> {
        crate::pdf::render(plan, options)
    }
}

/// Node tree, flex layout, then rasterization.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn render(&self, plan: &DocumentPlan, options: &RenderOptions) -> Result<Vec<u8>, Error> {
        crate::tree::render(plan, options)
    }
}

/// Plan `record` for `variant` as of `ctx` and render it with `renderer`.
pub fn render_document(
    record: &BiodataRecord,
    variant: Variant,
    ctx: &RenderContext,
    options: &RenderOptions,
    renderer: &dyn Renderer,
) -> Result<Vec<u8>, Error> {
    let content = Content::new(record, ctx.today());
    let plan = plan(&content, variant, ctx.generated_at)?;
    renderer.render(&plan, options)
}

/// Try each renderer in turn on one plan. Only backend and font failures move on to the next;
/// the last failure is returned when every renderer fails.
pub fn render_chain(
    plan: &DocumentPlan,
    options: &RenderOptions,
    renderers: &[&dyn Renderer],
) -> Result<Vec<u8>, Error> {
    let mut last = Error::Backend("no renderer configured".to_string());
    for renderer in renderers {
        match renderer.render(plan, options) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_backend_failure() => {
                log::warn!("{} renderer failed: {e}", renderer.name());
                last = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last)
}

/// The tree renderer, falling back to the draw renderer when its backend fails.
pub fn render_with_fallback(
    record: &BiodataRecord,
    variant: Variant,
    ctx: &RenderContext,
    options: &RenderOptions,
) -> Result<Vec<u8>, Error> {
    let content = Content::new(record, ctx.today());
    let plan = plan(&content, variant, ctx.generated_at)?;
    render_chain(&plan, options, &[&TreeRenderer, &DrawRenderer])
}

/// Suggested file name for a rendered document, e.g. `Amina_K._minimal.pdf`.
pub fn export_filename(full_name: &str, variant: Variant) -> String {
    let stem: String = full_name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let stem = if stem.is_empty() { "biodata".to_string() } else { stem };
    format!("{stem}_{}.pdf", variant.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(fn() -> Error);

    impl Renderer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn render(&self, _: &DocumentPlan, _: &RenderOptions) -> Result<Vec<u8>, Error> {
            Err((self.0)())
        }
    }

    struct Fixed;

    impl Renderer for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn render(&self, _: &DocumentPlan, _: &RenderOptions) -> Result<Vec<u8>, Error> {
            Ok(b"%PDF-fixed".to_vec())
        }
    }

    fn sample_plan() -> DocumentPlan {
        let record = BiodataRecord {
            full_name: Some("Amina K.".into()),
            gender: Some("female".into()),
            ..Default::default()
        };
        let ctx = RenderContext::at(
            chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        );
        plan(
            &Content::new(&record, ctx.today()),
            Variant::Minimal,
            ctx.generated_at,
        )
        .unwrap()
    }

    #[test]
    fn backend_failure_falls_through() {
        let failing = Failing(|| Error::Backend("boom".into()));
        let bytes = render_chain(&sample_plan(), &RenderOptions::default(), &[&failing, &Fixed])
            .unwrap();
        assert_eq!(bytes, b"%PDF-fixed");
    }

    #[test]
    fn font_error_is_not_retried() {
        let failing = Failing(|| Error::Font("bad cmap".into()));
        let err = render_chain(&sample_plan(), &RenderOptions::default(), &[&failing, &Fixed])
            .unwrap_err();
        assert!(matches!(err, Error::Font(_)));
        assert!(!err.is_backend_failure());
    }

    #[test]
    fn record_error_is_not_retried() {
        let failing = Failing(|| Error::InvalidRecord("gender is required".into()));
        let err = render_chain(&sample_plan(), &RenderOptions::default(), &[&failing, &Fixed])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRecord(_)));
    }

    #[test]
    fn last_failure_is_reported() {
        let a = Failing(|| Error::Backend("first".into()));
        let b = Failing(|| Error::Backend("second".into()));
        let err = render_chain(&sample_plan(), &RenderOptions::default(), &[&a, &b]).unwrap_err();
        assert_eq!(err.to_string(), "render backend failure: second");
    }

    #[test]
    fn filename_keeps_case_and_dots() {
        assert_eq!(export_filename("Amina K.", Variant::Minimal), "Amina_K._minimal.pdf");
        assert_eq!(
            export_filename("  Rahim  Uddin ", Variant::Comprehensive),
            "Rahim__Uddin_comprehensive.pdf"
        );
    }

    #[test]
    fn filename_strips_path_characters() {
        assert_eq!(export_filename("a/b\\c:d?", Variant::Minimal), "abcd_minimal.pdf");
        assert_eq!(export_filename("///", Variant::Minimal), "biodata_minimal.pdf");
    }
}
