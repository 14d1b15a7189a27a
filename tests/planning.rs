mod common;

use biodata_pdf::{
    BiodataRecord, Content, DocumentPlan, Error, PrettyValue, SECTION_HEADINGS, Section, Variant,
    plan,
};

fn plan_for(record: &BiodataRecord, variant: Variant) -> Result<DocumentPlan, Error> {
    let ctx = common::context();
    plan(&Content::new(record, ctx.today()), variant, ctx.generated_at)
}

fn section<'a>(plan: &'a DocumentPlan, heading: &str) -> Option<&'a Section> {
    plan.sections.iter().find(|s| s.heading == heading)
}

fn rows(section: &Section) -> Vec<(&'static str, &str)> {
    section
        .rows
        .iter()
        .map(|r| (r.label, r.value.text()))
        .collect()
}

#[test]
fn minimal_scenario() {
    let plan = plan_for(&common::amina(), Variant::Minimal).unwrap();

    let headings: Vec<_> = plan.sections.iter().map(|s| s.heading).collect();
    assert_eq!(headings, ["Basic Information", "Contact & Location"]);

    let basic = section(&plan, "Basic Information").unwrap();
    assert_eq!(
        rows(basic),
        [
            ("Gender", "Female"),
            ("Marital Status", "Never Married"),
            ("Height", "5'4\""),
        ]
    );
    let contact = section(&plan, "Contact & Location").unwrap();
    assert_eq!(rows(contact), [("Location", "Dhaka, Bangladesh")]);
    assert!(section(&plan, "About").is_none());

    assert_eq!(plan.title, "Amina K.");
    assert_eq!(plan.variant.subtitle(), "Minimal Biodata");
    assert_eq!(plan.status_badge, None);
}

#[test]
fn comprehensive_scenario() {
    let minimal = plan_for(&common::amina(), Variant::Minimal).unwrap();
    let plan = plan_for(&common::amina(), Variant::Comprehensive).unwrap();

    let headings: Vec<_> = plan.sections.iter().map(|s| s.heading).collect();
    assert_eq!(headings, SECTION_HEADINGS);

    assert_eq!(
        section(&plan, "Basic Information"),
        section(&minimal, "Basic Information")
    );
    let about = section(&plan, "About").unwrap();
    assert!(about.rows.is_empty());
}

#[test]
fn absent_fields_never_produce_rows() {
    let mut record = common::dense();
    record.weight = Some("   ".into());
    record.email = Some(String::new());
    record.siblings_count = None;
    record.hobbies = Some("\n\t".into());

    let plan = plan_for(&record, Variant::Comprehensive).unwrap();
    let labels: Vec<_> = plan.selection().into_iter().map(|(_, l)| l).collect();
    for absent in ["Weight", "Email", "Siblings", "Hobbies"] {
        assert!(!labels.contains(&absent), "{absent} should be omitted");
    }
    for row in plan.sections.iter().flat_map(|s| &s.rows) {
        assert!(!row.value.text().trim().is_empty(), "{} is blank", row.label);
    }
}

#[test]
fn zero_and_false_are_present() {
    let mut record = common::bare();
    record.siblings_count = Some(0);
    record.willing_to_relocate = Some(false);

    let plan = plan_for(&record, Variant::Minimal).unwrap();
    let family = section(&plan, "Family Information").unwrap();
    assert_eq!(rows(family), [("Siblings", "0")]);
    let prefs = section(&plan, "Marriage Preferences").unwrap();
    assert_eq!(rows(prefs), [("Willing to Relocate", "No")]);
}

#[test]
fn minimal_is_a_subset_of_comprehensive() {
    for record in [common::amina(), common::dense(), common::bare()] {
        let minimal = plan_for(&record, Variant::Minimal).unwrap();
        let full = plan_for(&record, Variant::Comprehensive).unwrap();

        let full_rows: Vec<_> = full
            .sections
            .iter()
            .flat_map(|s| s.rows.iter().map(move |r| (s.heading, r)))
            .collect();
        for s in &minimal.sections {
            for r in &s.rows {
                assert!(!r.is_wrapped(), "minimal carries free text {}", r.label);
                assert!(full_rows.contains(&(s.heading, r)));
            }
        }
        // Same relative order.
        let minimal_pairs = minimal.selection();
        let ordered: Vec<_> = full
            .selection()
            .into_iter()
            .filter(|p| minimal_pairs.contains(p))
            .collect();
        assert_eq!(ordered, minimal_pairs);
    }
}

#[test]
fn free_text_is_block_only_in_comprehensive() {
    let plan = plan_for(&common::dense(), Variant::Comprehensive).unwrap();
    let about = section(&plan, "About").unwrap();
    assert!(matches!(about.rows[0].value, PrettyValue::Block(_)));
    assert_eq!(about.rows[0].label, "About Me");
    assert!(matches!(about.rows[2].value, PrettyValue::Inline(_)));

    let minimal = plan_for(&common::dense(), Variant::Minimal).unwrap();
    let about = section(&minimal, "About").unwrap();
    assert_eq!(rows(about), [("Languages", "Bengali, English")]);
}

#[test]
fn derived_and_composite_values() {
    let plan = plan_for(&common::dense(), Variant::Comprehensive).unwrap();
    let basic = section(&plan, "Basic Information").unwrap();
    let basic = rows(basic);
    assert!(basic.contains(&("Age", "32 years")));
    assert!(basic.contains(&("Date of Birth", "15 June 1992")));
    assert!(basic.contains(&("Complexion", "Wheatish")));

    let contact = section(&plan, "Contact & Location").unwrap();
    assert_eq!(
        rows(contact),
        [
            ("Phone", "+880 1711 000000"),
            ("Email", "rahim@example.com"),
            (
                "Full Address",
                "House 12, Road 5, Dhanmondi, Dhaka, Dhaka Division, Bangladesh"
            ),
        ]
    );

    let prefs = rows(section(&plan, "Marriage Preferences").unwrap());
    assert!(prefs.contains(&("Preferred Age", "24 - 30 years")));
    assert!(prefs.contains(&("Willing to Relocate", "Yes")));

    let religion = rows(section(&plan, "Religious Practice").unwrap());
    assert!(religion.contains(&("Prayer", "Five Times Daily")));

    assert_eq!(plan.status_badge.as_deref(), Some("Pending Review"));
    assert_eq!(plan.document_id, "BD-TEST-0001");
}

#[test]
fn age_turns_over_on_the_birthday() {
    let mut record = common::bare();
    record.date_of_birth = Some("2000-06-15".into());
    let plan = plan_for(&record, Variant::Minimal).unwrap();
    let basic = rows(section(&plan, "Basic Information").unwrap());
    assert!(basic.contains(&("Age", "24 years")));

    record.date_of_birth = Some("2000-06-16".into());
    let plan = plan_for(&record, Variant::Minimal).unwrap();
    let basic = rows(section(&plan, "Basic Information").unwrap());
    assert!(basic.contains(&("Age", "23 years")));
}

#[test]
fn malformed_birth_date_is_absent() {
    let mut record = common::bare();
    record.date_of_birth = Some("sometime in spring".into());
    let plan = plan_for(&record, Variant::Comprehensive).unwrap();
    let basic = rows(section(&plan, "Basic Information").unwrap());
    assert_eq!(basic, [("Gender", "Female")]);
}

#[test]
fn enumerated_labels_keep_entered_capitals() {
    let mut record = common::bare();
    record.education_level = Some("MBA".into());
    record.marital_status = Some("never_married".into());
    let plan = plan_for(&record, Variant::Minimal).unwrap();
    let education = rows(section(&plan, SECTION_HEADINGS[2]).unwrap());
    assert_eq!(education, [("Highest Education", "MBA")]);
    let basic = rows(section(&plan, "Basic Information").unwrap());
    assert!(basic.contains(&("Marital Status", "Never Married")));
}

#[test]
fn generated_identifier_and_timestamp() {
    let plan = plan_for(&common::bare(), Variant::Minimal).unwrap();
    assert_eq!(plan.document_id, "BD-20240615104500");
    assert_eq!(plan.generated_on(), "Generated on 2024-06-15 10:45");
}

#[test]
fn missing_required_fields_are_rejected() {
    let mut record = common::amina();
    record.gender = None;
    let err = plan_for(&record, Variant::Minimal).unwrap_err();
    assert!(matches!(err, Error::InvalidRecord(_)));
    assert!(!err.is_backend_failure());

    let mut record = common::amina();
    record.full_name = Some("  ".into());
    assert!(matches!(
        plan_for(&record, Variant::Comprehensive),
        Err(Error::InvalidRecord(_))
    ));
}

#[test]
fn lenient_record_fields() {
    let record = BiodataRecord::from_json(
        r#"{
            "fullName": "Amina K.",
            "gender": "female",
            "siblingsCount": "3",
            "preferredAgeMin": 25.0,
            "preferredAgeMax": "",
            "willingToRelocate": "No",
            "unknownField": 1
        }"#,
    )
    .unwrap();
    assert_eq!(record.siblings_count, Some(3));
    assert_eq!(record.preferred_age_min, Some(25));
    assert_eq!(record.preferred_age_max, None);
    assert_eq!(record.willing_to_relocate, Some(false));

    let record = BiodataRecord::from_json(r#"{"siblingsCount": null, "willingToRelocate": true}"#)
        .unwrap();
    assert_eq!(record.siblings_count, None);
    assert_eq!(record.willing_to_relocate, Some(true));
}
