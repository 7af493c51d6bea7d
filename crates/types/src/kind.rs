use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The kind tag reported for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    ComboBox,
    ListBox,
    RadioButtonGroup,
    CheckBox,
    PushButton,
    Undefined,
}

/// Wire names, one row per kind.
const KIND_NAMES: &[(FieldKind, &str)] = &[
    (FieldKind::Text, "text"),
    (FieldKind::ComboBox, "combobox"),
    (FieldKind::ListBox, "listbox"),
    (FieldKind::RadioButtonGroup, "radiobuttongroup"),
    (FieldKind::CheckBox, "checkbox"),
    (FieldKind::PushButton, "pushbutton"),
    (FieldKind::Undefined, "undefined"),
];

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("undefined")
    }

    pub fn is_button(self) -> bool {
        matches!(
            self,
            FieldKind::RadioButtonGroup | FieldKind::CheckBox | FieldKind::PushButton
        )
    }

    pub fn is_choice(self) -> bool {
        matches!(self, FieldKind::ComboBox | FieldKind::ListBox)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldKind(pub String);

impl fmt::Display for UnknownFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undefined field kind: {}", self.0)
    }
}

impl std::error::Error for UnknownFieldKind {}

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KIND_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(kind, _)| *kind)
            .ok_or_else(|| UnknownFieldKind(s.to_string()))
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
