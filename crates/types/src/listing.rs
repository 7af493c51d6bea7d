//! Read-side payloads: the field listing returned for a document.

use crate::kind::FieldKind;
use crate::page::PageInfo;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Snapshot of one form field. Absent members are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_fields: Option<Vec<FieldInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsResponse {
    pub fields_count: usize,
    pub fields: Vec<FieldInfo>,
    pub pages: Vec<PageInfo>,
    pub fonts: Vec<String>,
}

impl FieldsResponse {
    pub fn new(fields: Vec<FieldInfo>, pages: Vec<PageInfo>, fonts: Vec<String>) -> Self {
        Self {
            fields_count: fields.len(),
            fields,
            pages,
            fonts,
        }
    }

    /// Case-insensitive lookup by field name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}
