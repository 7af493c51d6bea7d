use super::base::unsupported;
use super::child::ButtonChildField;
use super::Field;
use crate::error::{Result, ValidationError};
use acrofill_traits::{FormDocument, NativeField};
use acrofill_types::{FieldKind, Value};

/// A checkbox, radio button group or push button. Its value is the name of
/// the appearance state it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonField {
    pub(crate) native: NativeField,
}

impl ButtonField {
    pub fn new(native: NativeField) -> Self {
        Self { native }
    }

    pub fn kind<D: FormDocument + ?Sized>(&self, doc: &D) -> FieldKind {
        if self.native.is_push_button() || doc.appearance_states(&self.native).is_empty() {
            FieldKind::PushButton
        } else if self.native.kids.len() > 1 {
            FieldKind::RadioButtonGroup
        } else {
            FieldKind::CheckBox
        }
    }

    pub fn states<D: FormDocument + ?Sized>(&self, doc: &D) -> Vec<String> {
        doc.appearance_states(&self.native)
    }

    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        doc.field_value(&self.native)
            .map(|v| v.to_text())
            .or_else(|| doc.appearance_state(&self.native))
            .filter(|v| !v.is_empty())
            .map(Value::String)
    }

    pub fn set_value<D: FormDocument + ?Sized>(&self, doc: &mut D, value: Option<&Value>) -> Result<()> {
        match value {
            None if self.kind(doc) == FieldKind::CheckBox => Err(ValidationError::NullCheckbox {
                field: self.native.name.clone(),
            }
            .into()),
            None => {
                doc.set_appearance_state(&self.native, None)?;
                Ok(())
            }
            Some(Value::String(requested)) => {
                let state = self
                    .states(doc)
                    .into_iter()
                    .find(|s| s.to_lowercase() == requested.to_lowercase())
                    .ok_or_else(|| ValidationError::ValueNotAllowed {
                        field: self.native.name.clone(),
                        value: requested.clone(),
                    })?;
                log::debug!("Switching button '{}' to state '{}'", self.native.name, state);
                doc.set_appearance_state(&self.native, Some(&state))?;
                Ok(())
            }
            Some(other) => Err(unsupported(&self.native, other)),
        }
    }

    /// Every kid as a group member, widgets included.
    pub fn child_fields<D: FormDocument + ?Sized>(&self, doc: &D) -> Vec<Field> {
        doc.child_fields(&self.native)
            .into_iter()
            .map(|kid| Field::ButtonChild(ButtonChildField::new(kid)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FillError;
    use crate::fields::test_support::{checkbox, form_with, push_button, radio_group};
    use acrofill_lopdf::LopdfFormDocument;

    fn setup() -> (LopdfFormDocument, Vec<ButtonField>) {
        let mut doc = form_with(&[
            &checkbox("Agree", "Yes"),
            &radio_group("Size", &["S", "M", "L"]),
            &push_button("Submit"),
        ]);
        let fields = doc
            .form_fields(false)
            .unwrap()
            .into_iter()
            .map(ButtonField::new)
            .collect();
        (doc, fields)
    }

    #[test]
    fn test_kind_classification() {
        let (doc, fields) = setup();
        assert_eq!(fields[0].kind(&doc), FieldKind::CheckBox);
        assert_eq!(fields[1].kind(&doc), FieldKind::RadioButtonGroup);
        assert_eq!(fields[2].kind(&doc), FieldKind::PushButton);
    }

    #[test]
    fn test_checkbox_matches_state_case_insensitively() {
        let (mut doc, fields) = setup();
        let agree = &fields[0];
        assert_eq!(agree.value(&doc), Some(Value::from("Off")));
        agree.set_value(&mut doc, Some(&Value::from("yes"))).unwrap();
        assert_eq!(agree.value(&doc), Some(Value::from("Yes")));
        assert_eq!(doc.appearance_state(&agree.native).as_deref(), Some("Yes"));
    }

    #[test]
    fn test_checkbox_rejects_null_and_unknown_state() {
        let (mut doc, fields) = setup();
        let agree = &fields[0];
        assert!(matches!(
            agree.set_value(&mut doc, None),
            Err(FillError::Validation(ValidationError::NullCheckbox { .. }))
        ));
        let err = agree.set_value(&mut doc, Some(&Value::from("Maybe"))).unwrap_err();
        assert!(err.to_string().contains("value cannot be set for field"));
        let err = agree.set_value(&mut doc, Some(&Value::from(true))).unwrap_err();
        assert!(err.to_string().contains("unsupported value type"));
    }

    #[test]
    fn test_radio_group_selects_one_member() {
        let (mut doc, fields) = setup();
        let size = &fields[1];
        assert_eq!(size.states(&doc), vec!["S", "Off", "M", "L"]);
        size.set_value(&mut doc, Some(&Value::from("M"))).unwrap();
        assert_eq!(size.value(&doc), Some(Value::from("M")));

        let members: Vec<_> = size
            .child_fields(&doc)
            .iter()
            .map(|c| c.value(&doc))
            .collect();
        assert_eq!(
            members,
            vec![Some(Value::from("Off")), Some(Value::from("M")), Some(Value::from("Off"))]
        );
    }

    #[test]
    fn test_radio_group_can_be_cleared() {
        let (mut doc, fields) = setup();
        let size = &fields[1];
        size.set_value(&mut doc, Some(&Value::from("L"))).unwrap();
        size.set_value(&mut doc, None).unwrap();
        assert!(doc.field_value(&size.native).is_none());
    }
}
