mod common;

use acrofill::{FieldKind, PageInfo, Value};
use common::{FormFixture, TestResult, sample_form, service};

#[test]
fn test_lists_every_field_kind() -> TestResult {
    let listing = service().read_fields(&sample_form())?;
    assert_eq!(listing.fields_count, 7);

    let kinds: Vec<(&str, FieldKind)> = listing
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Name", FieldKind::Text),
            ("Locked", FieldKind::Text),
            ("Country", FieldKind::ComboBox),
            ("City", FieldKind::ComboBox),
            ("Colors", FieldKind::ListBox),
            ("Agree", FieldKind::CheckBox),
            ("Size", FieldKind::RadioButtonGroup),
        ]
    );
    Ok(())
}

#[test]
fn test_field_details() -> TestResult {
    let listing = service().read_fields(&sample_form())?;

    let locked = listing.field("locked").ok_or("Locked missing")?;
    assert_eq!(locked.value, Some(Value::from("fixed")));
    assert_eq!(locked.is_read_only, Some(true));
    assert_eq!(locked.page, Some(1));

    let name = listing.field("Name").ok_or("Name missing")?;
    assert_eq!(name.value, None);
    assert_eq!(name.is_read_only, None);
    assert_eq!(name.value_options, None);

    let country = listing.field("Country").ok_or("Country missing")?;
    assert_eq!(
        country.value_options,
        Some(vec!["Norway".to_string(), "Sweden".to_string()])
    );

    let agree = listing.field("Agree").ok_or("Agree missing")?;
    assert_eq!(agree.value, Some(Value::from("Off")));
    assert_eq!(agree.value_options, Some(vec!["Yes".to_string(), "Off".to_string()]));
    assert_eq!(agree.child_fields, None);

    let size = listing.field("Size").ok_or("Size missing")?;
    let members = size.child_fields.as_ref().ok_or("Size has no members")?;
    assert_eq!(members.len(), 3);
    assert!(members.iter().all(|m| m.kind == FieldKind::Undefined));
    assert_eq!(members[1].value_options, Some(vec!["M".to_string(), "Off".to_string()]));
    assert_eq!(members[1].value, Some(Value::from("Off")));
    Ok(())
}

#[test]
fn test_pages_and_field_pages() -> TestResult {
    let pdf = FormFixture::new()
        .page(612, 792)
        .page(300, 400)
        .text("First", None, 0)
        .text_on(2, "Second")
        .build();
    let listing = service().read_fields(&pdf)?;

    assert_eq!(
        listing.pages,
        vec![PageInfo::new(1, 612.0, 792.0), PageInfo::new(2, 300.0, 400.0)]
    );
    assert_eq!(listing.field("First").and_then(|f| f.page), Some(1));
    assert_eq!(listing.field("Second").and_then(|f| f.page), Some(2));
    Ok(())
}

#[test]
fn test_fonts_merge_standard_and_document_fonts() -> TestResult {
    let listing = service().read_fields(&sample_form())?;
    assert!(listing.fonts.contains(&"helvetica".to_string()));
    assert!(listing.fonts.contains(&"times-roman".to_string()));
    assert!(listing.fonts.contains(&"zapfdingbats".to_string()));
    // The page's own Helvetica is the same name as the standard one.
    assert_eq!(listing.fonts.len(), 14);
    Ok(())
}

#[test]
fn test_document_without_form() -> TestResult {
    let pdf = FormFixture::new().without_form().page(612, 792).build();
    let listing = service().read_fields(&pdf)?;
    assert_eq!(listing.fields_count, 0);
    assert!(listing.fields.is_empty());
    assert_eq!(listing.pages.len(), 1);
    Ok(())
}

#[test]
fn test_listing_serialises_camel_case_without_nulls() -> TestResult {
    let listing = service().read_fields(&sample_form())?;
    let json = serde_json::to_value(&listing)?;

    assert_eq!(json["fieldsCount"], 7);
    assert_eq!(json["pages"][0]["width"], 612.0);
    let name = &json["fields"][0];
    assert_eq!(name["name"], "Name");
    assert_eq!(name["type"], "text");
    assert!(name.get("value").is_none());
    assert!(name.get("valueOptions").is_none());
    assert_eq!(json["fields"][1]["isReadOnly"], true);
    assert_eq!(json["fields"][6]["type"], "radiobuttongroup");
    assert_eq!(json["fields"][6]["childFields"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn test_garbage_input_is_not_a_validation_error() {
    let err = service().read_fields(b"not a pdf").unwrap_err();
    assert!(!err.is_validation());
}
