#![allow(dead_code)]

use biodata_pdf::{BiodataRecord, RenderContext};
use chrono::NaiveDate;

/// Fixed reference instant so ages and footers do not drift with the wall clock.
pub fn context() -> RenderContext {
    RenderContext::at(
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 45, 0)
            .unwrap(),
    )
}

pub fn amina() -> BiodataRecord {
    BiodataRecord::from_json(
        r#"{
            "fullName": "Amina K.",
            "gender": "female",
            "maritalStatus": "never_married",
            "height": "5'4\"",
            "city": "Dhaka",
            "country": "Bangladesh",
            "aboutMe": ""
        }"#,
    )
    .expect("amina fixture parses")
}

const PARAGRAPH: &str = "Grew up in a close family and moved to the capital for university. \
    Enjoys long walks, cooking for friends and volunteering at the local library on weekends. \
    Values honesty, patience and a sense of humour, and hopes to build a calm and caring home \
    together with a partner who shares the same outlook on faith and family life.";

/// Every field present, with long free text, so the page cannot hold all of it.
pub fn dense() -> BiodataRecord {
    let mut json = serde_json::json!({
        "id": "BD-TEST-0001",
        "fullName": "Rahim Uddin Chowdhury",
        "gender": "male",
        "status": "pending_review",
        "dateOfBirth": "1992-06-15",
        "maritalStatus": "never_married",
        "nationality": "Bangladeshi",
        "height": "5'9\"",
        "weight": "72 kg",
        "complexion": "wheatish",
        "bloodGroup": "B+",
        "phone": "+880 1711 000000",
        "email": "rahim@example.com",
        "address": "House 12, Road 5, Dhanmondi",
        "city": "Dhaka",
        "state": "Dhaka Division",
        "country": "Bangladesh",
        "educationLevel": "masters",
        "fieldOfStudy": "Computer Science",
        "institution": "University of Dhaka",
        "occupation": "Software Engineer",
        "employer": "Example Labs",
        "annualIncome": "BDT 2,400,000",
        "fatherOccupation": "Retired teacher",
        "motherOccupation": "Homemaker",
        "familyType": "nuclear",
        "siblingsCount": 2,
        "religion": "islam",
        "sect": "sunni",
        "prayerFrequency": "five_times_daily",
        "fastingFrequency": "always",
        "quranReading": "fluent",
        "languages": "Bengali, English",
        "preferredAgeMin": 24,
        "preferredAgeMax": 30,
        "preferredEducation": "Graduate",
        "preferredProfession": "Any",
        "preferredLocation": "Dhaka",
        "willingToRelocate": "yes"
    });
    for key in [
        "educationDetails",
        "occupationDetails",
        "siblingsDetails",
        "aboutMe",
        "hobbies",
        "expectations",
        "otherPreferences",
    ] {
        json[key] = serde_json::Value::String(PARAGRAPH.repeat(2));
    }
    serde_json::from_value(json).expect("dense fixture parses")
}

/// Required fields only.
pub fn bare() -> BiodataRecord {
    BiodataRecord {
        full_name: Some("Nadia".into()),
        gender: Some("female".into()),
        ..Default::default()
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-") && bytes.windows(5).any(|w| w == b"%%EOF")
}

/// Number of `/Type /Page` objects (excluding `/Pages`).
pub fn page_count(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Inflated content of every Flate stream in the file, concatenated.
pub fn page_content(pdf: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut rest = pdf;
    while let Some(start) = find(rest, b"stream\n") {
        let body = &rest[start + b"stream\n".len()..];
        let Some(end) = find(body, b"\nendstream") else {
            break;
        };
        if let Ok(inflated) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            out.extend_from_slice(&inflated);
        }
        rest = &body[end + b"\nendstream".len()..];
    }
    out
}

/// Every `x y Td` text position in a content stream.
pub fn text_positions(content: &[u8]) -> Vec<(f32, f32)> {
    String::from_utf8_lossy(content)
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            (parts.next()? == "Td" && parts.next().is_none()).then_some((x, y))
        })
        .collect()
}
