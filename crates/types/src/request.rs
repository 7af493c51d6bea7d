//! Fill instructions as supplied by a caller.
//!
//! Property names are camelCase on the wire; PascalCase aliases are accepted
//! as well since form data is frequently produced by case-insensitive tooling.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The `data` part of a fill request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsData {
    #[serde(default, alias = "Fields")]
    pub fields: Option<Vec<FillInstruction>>,
}

/// A single fill instruction. With a `name` it targets a form field; without
/// one it places free content (text or an image) on a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInstruction {
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "Value")]
    pub value: Option<Value>,
    #[serde(default, alias = "X", skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, alias = "Y", skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, alias = "Width", skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, alias = "Height", skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, alias = "Scale", skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, alias = "Page", skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, alias = "TextStyle", skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl FillInstruction {
    /// An instruction that sets the named field.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// An instruction that places free content at `(x, y)` on page 1.
    pub fn content(value: impl Into<Value>, x: f32, y: f32) -> Self {
        Self {
            value: Some(value.into()),
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn on_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_size(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = Some(style);
        self
    }
}

/// Styling for a free text box. Alignments are kept as raw tokens and parsed
/// when the box is drawn, so an unknown token only disables alignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, alias = "Leading", skip_serializing_if = "Option::is_none")]
    pub leading: Option<f32>,
    #[serde(default, alias = "Color", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "HorizontalAlignment", skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<String>,
    #[serde(default, alias = "VerticalAlignment", skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<String>,
    #[serde(default, alias = "Font", skip_serializing_if = "Option::is_none")]
    pub font: Option<FontStyle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, alias = "Bold", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, alias = "Italic", skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, alias = "Underline", skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlignment(pub String);

impl fmt::Display for UnknownAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown alignment value '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlignment {}

impl FromStr for HorizontalAlignment {
    type Err = UnknownAlignment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" => Ok(Self::Left),
            "CENTER" => Ok(Self::Center),
            "RIGHT" => Ok(Self::Right),
            _ => Err(UnknownAlignment(s.to_string())),
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = UnknownAlignment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Self::Top),
            "MIDDLE" => Ok(Self::Middle),
            "BOTTOM" => Ok(Self::Bottom),
            _ => Err(UnknownAlignment(s.to_string())),
        }
    }
}
