use super::base::unsupported;
use crate::error::{Result, ValidationError};
use acrofill_traits::{FormDocument, NativeField, RawFieldValue};
use acrofill_types::{FieldKind, Value};

/// A list box or combo box.
///
/// Options are addressed by index or by label; labels match case-insensitively.
/// Editable combo boxes additionally accept text that matches no option.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceField {
    pub(crate) native: NativeField,
}

impl ChoiceField {
    pub fn new(native: NativeField) -> Self {
        Self { native }
    }

    pub fn kind(&self) -> FieldKind {
        if self.native.is_combo() {
            FieldKind::ComboBox
        } else {
            FieldKind::ListBox
        }
    }

    fn is_editable_combo(&self) -> bool {
        self.native.is_combo() && self.native.is_edit()
    }

    fn is_fixed_combo(&self) -> bool {
        self.native.is_combo() && !self.native.is_edit()
    }

    /// Option labels in order; options without a label are skipped.
    pub fn labels<D: FormDocument + ?Sized>(&self, doc: &D) -> Vec<String> {
        doc.choice_options(&self.native).into_iter().flatten().collect()
    }

    /// The stored value with each export mapped to its label. Falls back to
    /// the indexed selection when no value is stored.
    pub fn value<D: FormDocument + ?Sized>(&self, doc: &D) -> Option<Value> {
        let labels = doc.choice_options(&self.native);
        let exports = doc.choice_exports(&self.native);
        let label_of = |stored: String| -> String {
            exports
                .iter()
                .position(|e| *e == stored)
                .and_then(|i| labels.get(i).cloned().flatten())
                .unwrap_or(stored)
        };
        match doc.field_value(&self.native) {
            Some(RawFieldValue::Text(s) | RawFieldValue::Name(s)) if !s.is_empty() => {
                Some(Value::String(label_of(s)))
            }
            Some(RawFieldValue::List(items)) if !items.is_empty() => {
                Some(Value::StringList(items.into_iter().map(&label_of).collect()))
            }
            _ => {
                let mut selected: Vec<String> = doc
                    .selected_indices(&self.native)
                    .into_iter()
                    .filter_map(|i| labels.get(i).cloned().flatten())
                    .collect();
                match selected.len() {
                    0 => None,
                    1 => selected.pop().map(Value::String),
                    _ => Some(Value::StringList(selected)),
                }
            }
        }
    }

    pub fn set_value<D: FormDocument + ?Sized>(&self, doc: &mut D, value: Option<&Value>) -> Result<()> {
        match value {
            None => self.clear(doc),
            Some(Value::Number(n)) => {
                let index = self.index(doc, *n)?;
                doc.select_indices(&self.native, &[index])?;
                Ok(())
            }
            Some(Value::NumberList(numbers)) => self.select_numbers(doc, numbers),
            Some(Value::String(label)) => self.select_labels(doc, std::slice::from_ref(label)),
            Some(Value::StringList(labels)) => self.select_labels(doc, labels),
            Some(other) => Err(unsupported(&self.native, other)),
        }
    }

    fn clear<D: FormDocument + ?Sized>(&self, doc: &mut D) -> Result<()> {
        if self.is_fixed_combo() {
            return Err(self.empty());
        }
        doc.select_indices(&self.native, &[])?;
        Ok(())
    }

    fn empty(&self) -> crate::error::FillError {
        ValidationError::EmptyValue {
            field: self.native.name.clone(),
        }
        .into()
    }

    fn index<D: FormDocument + ?Sized>(&self, doc: &D, n: f64) -> Result<usize> {
        let count = doc.choice_options(&self.native).len();
        acrofill_types::value::integral(n)
            .filter(|i| *i >= 0 && (*i as usize) < count)
            .map(|i| i as usize)
            .ok_or_else(|| {
                ValidationError::IndexOutOfRange {
                    field: self.native.name.clone(),
                    index: n,
                }
                .into()
            })
    }

    fn check_single(&self, count: usize) -> Result<()> {
        if count > 1 && !self.native.is_multi_select() {
            return Err(ValidationError::MultipleValues {
                field: self.native.name.clone(),
            }
            .into());
        }
        Ok(())
    }

    fn select_numbers<D: FormDocument + ?Sized>(&self, doc: &mut D, numbers: &[f64]) -> Result<()> {
        if numbers.is_empty() {
            return self.clear(doc);
        }
        let mut sorted = numbers.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        self.check_single(sorted.len())?;
        let indices = sorted
            .into_iter()
            .map(|n| self.index(doc, n))
            .collect::<Result<Vec<_>>>()?;
        doc.select_indices(&self.native, &indices)?;
        Ok(())
    }

    fn select_labels<D: FormDocument + ?Sized>(&self, doc: &mut D, labels: &[String]) -> Result<()> {
        let mut unique: Vec<&String> = Vec::with_capacity(labels.len());
        for label in labels {
            if !unique.iter().any(|u| u.to_lowercase() == label.to_lowercase()) {
                unique.push(label);
            }
        }
        if unique.is_empty() {
            if self.is_editable_combo() {
                doc.select_values(&self.native, &[String::new()])?;
                return Ok(());
            }
            return self.clear(doc);
        }
        self.check_single(unique.len())?;

        let options = doc.choice_options(&self.native);
        let mut indices = Vec::with_capacity(unique.len());
        let mut resolved = Vec::with_capacity(unique.len());
        let mut has_free_text = false;
        for label in &unique {
            let key = label.to_lowercase();
            let found = options
                .iter()
                .enumerate()
                .find_map(|(i, o)| o.as_ref().filter(|o| o.to_lowercase() == key).map(|o| (i, o)));
            match found {
                Some((i, option)) => {
                    indices.push(i);
                    resolved.push(option.clone());
                }
                None if self.is_editable_combo() => {
                    log::debug!("Storing free text '{}' in combo box '{}'", label, self.native.name);
                    has_free_text = true;
                    resolved.push(label.to_string());
                }
                None => {
                    return Err(ValidationError::ValueNotAllowed {
                        field: self.native.name.clone(),
                        value: label.to_string(),
                    }
                    .into());
                }
            }
        }
        if has_free_text {
            doc.select_values(&self.native, &resolved)?;
        } else {
            doc.select_indices(&self.native, &indices)?;
        }
        Ok(())
    }
}
