//! Section planning: which sections exist, which rows they hold, in which order.

use chrono::NaiveDateTime;

use crate::content::Content;
use crate::error::Error;
use crate::model::{DocumentPlan, PrettyValue, Row, Section, Variant};

enum Kind {
    Inline,
    Block,
}

struct Candidate {
    label: &'static str,
    kind: Kind,
    value: Option<String>,
}

fn inline(label: &'static str, value: Option<String>) -> Candidate {
    Candidate {
        label,
        kind: Kind::Inline,
        value,
    }
}

fn block(label: &'static str, value: Option<String>) -> Candidate {
    Candidate {
        label,
        kind: Kind::Block,
        value,
    }
}

pub const SECTION_HEADINGS: [&str; 8] = [
    "Basic Information",
    "Contact & Location",
    "Education",
    "Career & Income",
    "Family Information",
    "Religious Practice",
    "About",
    "Marriage Preferences",
];

fn candidates(c: &Content<'_>) -> [(&'static str, Vec<Candidate>); 8] {
    let r = c.record();
    // Full Address already contains city and country, so it replaces Location
    // whenever a street address was given.
    let (location, full_address) = if c.text(&r.address).is_some() {
        (None, c.full_address())
    } else {
        (c.location(), None)
    };
    [
        (
            SECTION_HEADINGS[0],
            vec![
                inline("Gender", c.label(&r.gender)),
                inline("Age", c.age_label()),
                inline("Date of Birth", c.date_of_birth_label()),
                inline("Marital Status", c.label(&r.marital_status)),
                inline("Height", c.text(&r.height)),
                inline("Weight", c.text(&r.weight)),
                inline("Complexion", c.label(&r.complexion)),
                inline("Blood Group", c.text(&r.blood_group)),
                inline("Nationality", c.text(&r.nationality)),
            ],
        ),
        (
            SECTION_HEADINGS[1],
            vec![
                inline("Phone", c.text(&r.phone)),
                inline("Email", c.text(&r.email)),
                inline("Location", location),
                inline("Full Address", full_address),
            ],
        ),
        (
            SECTION_HEADINGS[2],
            vec![
                inline("Highest Education", c.label(&r.education_level)),
                inline("Field of Study", c.text(&r.field_of_study)),
                inline("Institution", c.text(&r.institution)),
                block("Education Details", c.text(&r.education_details)),
            ],
        ),
        (
            SECTION_HEADINGS[3],
            vec![
                inline("Occupation", c.text(&r.occupation)),
                inline("Employer", c.text(&r.employer)),
                inline("Annual Income", c.text(&r.annual_income)),
                block("Occupation Details", c.text(&r.occupation_details)),
            ],
        ),
        (
            SECTION_HEADINGS[4],
            vec![
                inline("Father's Occupation", c.text(&r.father_occupation)),
                inline("Mother's Occupation", c.text(&r.mother_occupation)),
                inline("Family Type", c.label(&r.family_type)),
                inline("Siblings", c.siblings()),
                block("Siblings Details", c.text(&r.siblings_details)),
            ],
        ),
        (
            SECTION_HEADINGS[5],
            vec![
                inline("Religion", c.label(&r.religion)),
                inline("Sect", c.label(&r.sect)),
                inline("Prayer", c.label(&r.prayer_frequency)),
                inline("Fasting", c.label(&r.fasting_frequency)),
                inline("Quran Reading", c.label(&r.quran_reading)),
            ],
        ),
        (
            SECTION_HEADINGS[6],
            vec![
                block("About Me", c.text(&r.about_me)),
                block("Hobbies", c.text(&r.hobbies)),
                inline("Languages", c.text(&r.languages)),
            ],
        ),
        (
            SECTION_HEADINGS[7],
            vec![
                inline("Preferred Age", c.preferred_age_range()),
                inline("Preferred Education", c.text(&r.preferred_education)),
                inline("Preferred Profession", c.text(&r.preferred_profession)),
                inline("Preferred Location", c.text(&r.preferred_location)),
                inline("Willing to Relocate", c.willing_to_relocate()),
                block("Expectations", c.text(&r.expectations)),
                block("Other Preferences", c.text(&r.other_preferences)),
            ],
        ),
    ]
}

/// Ordered sections for `variant`. Pure; never fails on absent fields.
pub fn plan_sections(content: &Content<'_>, variant: Variant) -> Vec<Section> {
    let mut sections = Vec::with_capacity(SECTION_HEADINGS.len());
    for (heading, rows) in candidates(content) {
        let rows: Vec<Row> = rows
            .into_iter()
            .filter_map(|cand| {
                let value = match (cand.kind, variant) {
                    (Kind::Block, Variant::Minimal) => return None,
                    (Kind::Block, Variant::Comprehensive) => PrettyValue::Block(cand.value?),
                    (Kind::Inline, _) => PrettyValue::Inline(cand.value?),
                };
                Some(Row {
                    label: cand.label,
                    value,
                })
            })
            .collect();
        if rows.is_empty() && variant == Variant::Minimal {
            log::debug!("omitting empty section {heading:?} from minimal document");
            continue;
        }
        sections.push(Section { heading, rows });
    }
    sections
}

/// Validates the record and builds everything the renderers draw, header and footer included.
pub fn plan(
    content: &Content<'_>,
    variant: Variant,
    generated_at: NaiveDateTime,
) -> Result<DocumentPlan, Error> {
    content.validate()?;
    let document_id = content
        .text(&content.record().id)
        .unwrap_or_else(|| format!("BD-{}", generated_at.format("%Y%m%d%H%M%S")));
    Ok(DocumentPlan {
        title: content.full_name(),
        status_badge: content.status_badge(),
        variant,
        sections: plan_sections(content, variant),
        generated_at,
        document_id,
    })
}
