//! Declarative renderer: the document as a tree of view boxes and text leaves.
//!
//! The tree only says *what* goes where relative to its parent. Positions and line breaks come
//! from the flex pass in [`flex`], which measures real glyph widths, so its wrapping can differ
//! from the character-budget wrap of the draw renderer. The content does not: the tree is built
//! straight from a [`DocumentPlan`].

mod flex;
mod paint;

use serde::Serialize;

use crate::config::RenderOptions;
use crate::error::Error;
use crate::model::{DocumentPlan, PrettyValue, Row, Section};
use crate::pdf::{DocumentInfo, SinglePage, used_chars};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    Column,
    Row,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Justify {
    #[default]
    Start,
    SpaceBetween,
}

/// Width a node takes along its parent's main axis (rows) or cross axis (columns).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Width {
    /// Columns stretch; rows shrink-wrap to the intrinsic width.
    #[default]
    Auto,
    Fill,
    Fraction(f32),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Overflow {
    #[default]
    Visible,
    /// Children that would cross the bottom edge are left out whole.
    DropChildren,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Border {
    pub color: [u8; 3],
    pub width: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub direction: Direction,
    pub justify: Justify,
    pub width: Width,
    pub height: Option<f32>,
    /// top, right, bottom, left
    pub padding: [f32; 4],
    pub gap: f32,
    pub background: Option<[u8; 3]>,
    pub border: Option<Border>,
    pub overflow: Overflow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    #[default]
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: [u8; 3],
    pub line_height: f32,
    pub align: Align,
    pub width: Width,
}

/// What a view stands for in the document, for inspection and content checks.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum Role {
    Page,
    Header,
    Body,
    Footer,
    Section(String),
    Row(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Node {
    View {
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
        style: Style,
        children: Vec<Node>,
    },
    Text {
        content: String,
        style: TextStyle,
    },
}

impl Node {
    fn view(role: Option<Role>, style: Style, children: Vec<Node>) -> Self {
        Node::View {
            role,
            style,
            children,
        }
    }

    fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Node::Text {
            content: content.into(),
            style,
        }
    }

    /// Ordered `(section heading, row label)` pairs found in the tree.
    pub fn selection(&self) -> Vec<(String, String)> {
        fn walk(node: &Node, section: Option<&str>, out: &mut Vec<(String, String)>) {
            let Node::View { role, children, .. } = node else {
                return;
            };
            let section = match role {
                Some(Role::Section(heading)) => Some(heading.as_str()),
                Some(Role::Row(label)) => {
                    if let Some(heading) = section {
                        out.push((heading.to_string(), label.clone()));
                    }
                    return;
                }
                _ => section,
            };
            for child in children {
                walk(child, section, out);
            }
        }
        let mut out = Vec::new();
        walk(self, None, &mut out);
        out
    }

    /// Headings of the section views in the tree, in order.
    pub fn section_headings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.visit_roles(&mut |role| {
            if let Role::Section(h) = role {
                out.push(h.clone());
            }
        });
        out
    }

    fn visit_roles(&self, f: &mut impl FnMut(&Role)) {
        if let Node::View { role, children, .. } = self {
            if let Some(role) = role {
                f(role);
            }
            for child in children {
                child.visit_roles(f);
            }
        }
    }
}

fn body_text(options: &RenderOptions, bold: bool, color: [u8; 3]) -> TextStyle {
    TextStyle {
        size: options.metrics.body_font_size,
        bold,
        color,
        line_height: options.metrics.line_height,
        align: Align::Left,
        width: Width::Auto,
    }
}

fn build_header(plan: &DocumentPlan, options: &RenderOptions) -> Node {
    let m = &options.metrics;
    let theme = &options.theme;

    let title = Node::text(
        &plan.title,
        TextStyle {
            size: m.title_font_size,
            bold: true,
            color: theme.accent,
            line_height: m.title_font_size * 1.25,
            align: Align::Left,
            width: Width::Fill,
        },
    );
    let mut title_row = vec![title];
    if let Some(badge) = &plan.status_badge {
        let pad = m.small_font_size * 0.8;
        title_row.push(Node::view(
            None,
            Style {
                padding: [pad / 2.0, pad, pad / 2.0, pad],
                background: Some(theme.heading_fill),
                border: Some(Border {
                    color: theme.accent,
                    width: 0.75,
                }),
                ..Style::default()
            },
            vec![Node::text(
                badge,
                TextStyle {
                    size: m.small_font_size,
                    bold: true,
                    color: theme.accent,
                    line_height: m.small_font_size * 1.3,
                    align: Align::Left,
                    width: Width::Auto,
                },
            )],
        ));
    }

    let rule = Node::view(
        None,
        Style {
            height: Some(1.2),
            background: Some(theme.accent),
            ..Style::default()
        },
        Vec::new(),
    );

    Node::view(
        Some(Role::Header),
        Style {
            height: Some(options.page.header_height),
            gap: 4.0,
            ..Style::default()
        },
        vec![
            Node::view(
                None,
                Style {
                    direction: Direction::Row,
                    justify: Justify::SpaceBetween,
                    ..Style::default()
                },
                title_row,
            ),
            Node::text(plan.variant.subtitle(), body_text(options, false, theme.muted)),
            rule,
        ],
    )
}

fn build_row(row: &Row, options: &RenderOptions) -> Node {
    let m = &options.metrics;
    let theme = &options.theme;
    let label = Node::text(
        row.label,
        TextStyle {
            width: Width::Fraction(m.label_column_ratio),
            ..body_text(options, true, theme.muted)
        },
    );
    let value = match &row.value {
        PrettyValue::Inline(v) => Node::text(
            v,
            TextStyle {
                align: Align::Right,
                width: Width::Fill,
                ..body_text(options, false, theme.text)
            },
        ),
        PrettyValue::Block(v) => Node::view(
            None,
            Style {
                width: Width::Fill,
                padding: [1.0, 4.0, 1.0, 4.0],
                border: Some(Border {
                    color: theme.border,
                    width: 0.5,
                }),
                ..Style::default()
            },
            vec![Node::text(
                v,
                TextStyle {
                    width: Width::Fill,
                    ..body_text(options, false, theme.text)
                },
            )],
        ),
    };
    Node::view(
        Some(Role::Row(row.label.to_string())),
        Style {
            direction: Direction::Row,
            justify: Justify::SpaceBetween,
            ..Style::default()
        },
        vec![label, value],
    )
}

fn build_section(section: &Section, options: &RenderOptions) -> Node {
    let m = &options.metrics;
    let theme = &options.theme;
    let heading = Node::view(
        None,
        Style {
            height: Some(m.heading_height),
            padding: [(m.heading_height - m.heading_font_size * 1.2) / 2.0, m.card_padding_x, 0.0, m.card_padding_x],
            background: Some(theme.heading_fill),
            ..Style::default()
        },
        vec![Node::text(
            section.heading,
            TextStyle {
                size: m.heading_font_size,
                bold: true,
                color: theme.accent,
                line_height: m.heading_font_size * 1.2,
                align: Align::Left,
                width: Width::Fill,
            },
        )],
    );
    let rows = Node::view(
        None,
        Style {
            padding: [
                m.card_padding_top,
                m.card_padding_x,
                m.card_padding_bottom,
                m.card_padding_x,
            ],
            ..Style::default()
        },
        section.rows.iter().map(|r| build_row(r, options)).collect(),
    );
    Node::view(
        Some(Role::Section(section.heading.to_string())),
        Style {
            border: Some(Border {
                color: theme.border,
                width: 0.75,
            }),
            ..Style::default()
        },
        vec![heading, rows],
    )
}

fn build_footer(plan: &DocumentPlan, options: &RenderOptions) -> Node {
    let m = &options.metrics;
    let small = TextStyle {
        size: m.small_font_size,
        bold: false,
        color: options.theme.muted,
        line_height: m.small_font_size * 1.3,
        align: Align::Left,
        width: Width::Auto,
    };
    Node::view(
        Some(Role::Footer),
        Style {
            direction: Direction::Row,
            justify: Justify::SpaceBetween,
            height: Some(options.page.footer_height),
            padding: [(options.page.footer_height - small.line_height) / 2.0, 0.0, 0.0, 0.0],
            ..Style::default()
        },
        vec![
            Node::text(plan.generated_on(), small.clone()),
            Node::text(&plan.document_id, TextStyle { align: Align::Right, ..small }),
        ],
    )
}

/// The whole page as a node tree.
pub fn build_tree(plan: &DocumentPlan, options: &RenderOptions) -> Node {
    let page = &options.page;
    let body_height =
        page.height - 2.0 * page.margin - page.header_height - page.footer_height;
    let body = Node::view(
        Some(Role::Body),
        Style {
            height: Some(body_height),
            gap: options.metrics.section_gap,
            overflow: Overflow::DropChildren,
            ..Style::default()
        },
        plan.sections
            .iter()
            .map(|s| build_section(s, options))
            .collect(),
    );
    Node::view(
        Some(Role::Page),
        Style {
            height: Some(page.height),
            padding: [page.margin; 4],
            ..Style::default()
        },
        vec![build_header(plan, options), body, build_footer(plan, options)],
    )
}

/// Lay out the tree with the document's fonts and return the headings of the sections that made
/// it onto the page.
pub fn placed_sections(
    plan: &DocumentPlan,
    options: &RenderOptions,
) -> Result<Vec<String>, Error> {
    let page = SinglePage::new(options, &used_chars(plan))?;
    let tree = build_tree(plan, options);
    let root = flex::layout(&tree, options.page.width, &page.fonts)?;
    Ok(root.section_headings())
}

/// Build, lay out and rasterize the tree into PDF bytes.
pub fn render(plan: &DocumentPlan, options: &RenderOptions) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let tree = build_tree(plan, options);
    let t_build = t0.elapsed();

    let page = SinglePage::new(options, &used_chars(plan))?;
    let t_fonts = t0.elapsed();

    let root = flex::layout(&tree, options.page.width, &page.fonts)?;
    let t_layout = t0.elapsed();

    let content = paint::paint(&root, options.page.height, &page.fonts);
    let info = DocumentInfo {
        title: &plan.title,
        created: plan.generated_at,
    };
    let bytes = page.finish(content, &options.page, &info)?;
    let t_total = t0.elapsed();

    log::info!(
        "Tree render: build={:.1}ms, fonts={:.1}ms, layout={:.1}ms, paint+assembly={:.1}ms ({} bytes)",
        t_build.as_secs_f64() * 1000.0,
        (t_fonts - t_build).as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}
