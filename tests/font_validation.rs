mod common;

use std::path::PathBuf;

use biodata_pdf::{DrawRenderer, RenderOptions, Renderer, TreeRenderer, Variant, render_document};

const FAMILY: &str = "DejaVu Sans";

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts")
}

fn dejavu_options() -> RenderOptions {
    RenderOptions {
        font_family: Some(FAMILY.into()),
        font_dirs: vec![fixture_dir()],
        ..RenderOptions::default()
    }
}

fn render(options: &RenderOptions, renderer: &dyn Renderer) -> Vec<u8> {
    render_document(
        &common::bare(),
        Variant::Minimal,
        &common::context(),
        options,
        renderer,
    )
    .unwrap()
}

/// Advance width of `text` in the fixture's regular face, in points.
fn regular_width(text: &str, size: f32) -> f32 {
    let data = std::fs::read(fixture_dir().join("DejaVuSans.ttf")).unwrap();
    let face = ttf_parser::Face::parse(&data, 0).unwrap();
    let units = face.units_per_em() as f32;
    text.chars()
        .map(|ch| {
            let gid = face.glyph_index(ch).unwrap();
            let advance = face.glyph_hor_advance(gid).unwrap() as f32;
            advance / units * 1000.0 * size / 1000.0
        })
        .sum()
}

#[test]
fn found_family_is_embedded_as_cid_truetype() {
    let _ = env_logger::try_init();
    let options = dejavu_options();
    for renderer in [&DrawRenderer as &dyn Renderer, &TreeRenderer] {
        let bytes = render(&options, renderer);
        assert!(common::is_pdf(&bytes));
        let markers: [&[u8]; 5] = [
            b"/FontFile2",
            b"/Identity-H",
            b"/ToUnicode",
            b"/CIDFontType2",
            b"/BaseFont /DejaVuSans",
        ];
        for marker in markers {
            assert!(
                common::find(&bytes, marker).is_some(),
                "{}: missing {}",
                renderer.name(),
                String::from_utf8_lossy(marker)
            );
        }
        assert!(common::find(&bytes, b"/Helvetica").is_none(), "{}", renderer.name());
    }
}

#[test]
fn right_aligned_values_use_embedded_advances() {
    let options = dejavu_options();
    let metrics = &options.metrics;
    let right = options.page.margin + options.page.content_width() - metrics.card_padding_x;
    // Gender is the only inline value of the bare record that sits at the right edge.
    let expected = right - regular_width("Female", metrics.body_font_size);

    for renderer in [&DrawRenderer as &dyn Renderer, &TreeRenderer] {
        let positions = common::text_positions(&common::page_content(&render(&options, renderer)));
        assert!(
            positions.iter().any(|(x, _)| (x - expected).abs() < 0.05),
            "{}: no text starts at {expected:.3}, got {positions:?}",
            renderer.name()
        );

        // Helvetica metrics put the same value elsewhere.
        let helvetica = common::text_positions(&common::page_content(&render(
            &RenderOptions::default(),
            renderer,
        )));
        assert!(!helvetica.iter().any(|(x, _)| (x - expected).abs() < 0.05));
    }
}

#[test]
fn embedded_output_is_deterministic() {
    let options = dejavu_options();
    for renderer in [&DrawRenderer as &dyn Renderer, &TreeRenderer] {
        assert_eq!(render(&options, renderer), render(&options, renderer));
    }
}
