use super::{BaseField, ButtonField, ChoiceField, Field, TextField};
use acrofill_traits::{NativeField, NativeFieldType};

type Constructor = fn(NativeField) -> Field;

const CONSTRUCTORS: &[(NativeFieldType, Constructor)] = &[
    (NativeFieldType::Text, |n| Field::Text(TextField::new(n))),
    (NativeFieldType::Choice, |n| Field::Choice(ChoiceField::new(n))),
    (NativeFieldType::Button, |n| Field::Button(ButtonField::new(n))),
];

impl Field {
    /// Wraps a native field in the variant for its type. Types without a
    /// dedicated variant become a [`BaseField`].
    pub fn from_native(native: NativeField) -> Field {
        match CONSTRUCTORS.iter().find(|(t, _)| *t == native.field_type) {
            Some((_, construct)) => construct(native),
            None => Field::Base(BaseField::new(native)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(field_type: NativeFieldType) -> NativeField {
        NativeField {
            id: (1, 0),
            name: "f".into(),
            field_type,
            flags: 0,
            kids: vec![],
        }
    }

    #[test]
    fn test_maps_each_native_type() {
        assert!(matches!(Field::from_native(native(NativeFieldType::Text)), Field::Text(_)));
        assert!(matches!(Field::from_native(native(NativeFieldType::Choice)), Field::Choice(_)));
        assert!(matches!(Field::from_native(native(NativeFieldType::Button)), Field::Button(_)));
        assert!(matches!(Field::from_native(native(NativeFieldType::Signature)), Field::Base(_)));
        assert!(matches!(Field::from_native(native(NativeFieldType::Unknown)), Field::Base(_)));
    }
}
