use serde::{Deserialize, Serialize};

/// Geometry of one document page. `number` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: usize,
    pub width: f32,
    pub height: f32,
}

impl PageInfo {
    pub fn new(number: usize, width: f32, height: f32) -> Self {
        Self { number, width, height }
    }
}
