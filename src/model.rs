use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// A finalized biodata record as handed over by the data layer.
///
/// Every field is optional here; `full_name` and `gender` are required upstream and checked once
/// at the render entry point.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiodataRecord {
    pub id: Option<String>,

    // identity
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub date_of_birth: Option<String>,
    pub marital_status: Option<String>,
    pub nationality: Option<String>,

    // physical
    pub height: Option<String>,
    pub weight: Option<String>,
    pub complexion: Option<String>,
    pub blood_group: Option<String>,

    // contact & location
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    // education
    pub education_level: Option<String>,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub education_details: Option<String>,

    // career & income
    pub occupation: Option<String>,
    pub employer: Option<String>,
    pub annual_income: Option<String>,
    pub occupation_details: Option<String>,

    // family
    pub father_occupation: Option<String>,
    pub mother_occupation: Option<String>,
    pub family_type: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub siblings_count: Option<u32>,
    pub siblings_details: Option<String>,

    // religious practice
    pub religion: Option<String>,
    pub sect: Option<String>,
    pub prayer_frequency: Option<String>,
    pub fasting_frequency: Option<String>,
    pub quran_reading: Option<String>,

    // free text
    pub about_me: Option<String>,
    pub hobbies: Option<String>,
    pub languages: Option<String>,

    // marriage preferences
    #[serde(deserialize_with = "lenient_count")]
    pub preferred_age_min: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    pub preferred_age_max: Option<u32>,
    pub preferred_education: Option<String>,
    pub preferred_profession: Option<String>,
    pub preferred_location: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub willing_to_relocate: Option<bool>,
    pub expectations: Option<String>,
    pub other_preferences: Option<String>,
}

impl BiodataRecord {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Form layers send counts as numbers, numeric strings or `""`; anything unusable is absent.
fn lenient_count<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    let count = match Option::<NumberOrText>::deserialize(de)? {
        Some(NumberOrText::Number(n)) if n.is_finite() && n >= 0.0 && n <= u32::MAX as f64 => {
            Some(n.trunc() as u32)
        }
        Some(NumberOrText::Number(_)) | None => None,
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
    };
    Ok(count)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

fn lenient_flag<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    let flag = match Option::<FlagOrText>::deserialize(de)? {
        Some(FlagOrText::Flag(b)) => Some(b),
        Some(FlagOrText::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        None => None,
    };
    Ok(flag)
}

/// Detail level of a rendered document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Variant {
    Minimal,
    #[default]
    Comprehensive,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Minimal => "minimal",
            Variant::Comprehensive => "comprehensive",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Variant::Minimal => "Minimal Biodata",
            Variant::Comprehensive => "Comprehensive Biodata",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PrettyValue {
    /// Short value drawn right-aligned on the row baseline.
    Inline(String),
    /// Free text drawn as a wrapped paragraph in its own bordered sub-block.
    Block(String),
}

impl PrettyValue {
    pub fn text(&self) -> &str {
        match self {
            PrettyValue::Inline(s) | PrettyValue::Block(s) => s,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: PrettyValue,
}

impl Row {
    pub fn is_wrapped(&self) -> bool {
        matches!(self.value, PrettyValue::Block(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub heading: &'static str,
    pub rows: Vec<Row>,
}

/// Everything a renderer needs to draw one biodata document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentPlan {
    pub title: String,
    pub status_badge: Option<String>,
    pub variant: Variant,
    pub sections: Vec<Section>,
    pub generated_at: NaiveDateTime,
    pub document_id: String,
}

impl DocumentPlan {
    pub fn generated_on(&self) -> String {
        format!("Generated on {}", self.generated_at.format("%Y-%m-%d %H:%M"))
    }

    /// Ordered `(heading, label)` pairs, the content a renderer is expected to show.
    pub fn selection(&self) -> Vec<(&'static str, &'static str)> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter().map(move |r| (s.heading, r.label)))
            .collect()
    }
}
