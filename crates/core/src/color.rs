//! Validating and converting text colour tokens.

use crate::error::ValidationError;
use acrofill_types::Color;

/// Accepts named colours and `#RGB[A]` / `#RRGGBB[AA]` hex tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorResolver;

impl ColorResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn is_valid(&self, token: &str) -> bool {
        Color::parse(token).is_ok()
    }

    pub fn convert(&self, token: &str) -> Result<Color, ValidationError> {
        Color::parse(token).map_err(|e| ValidationError::InvalidColor(e.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_hex_tokens() {
        let colors = ColorResolver::new();
        assert_eq!(colors.convert("Red").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(colors.convert("#00ff00").unwrap(), Color::rgb(0, 255, 0));
        let translucent = colors.convert("#0000FF80").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_tokens() {
        let colors = ColorResolver::new();
        assert!(!colors.is_valid("blurple"));
        assert!(!colors.is_valid("#12345"));
        assert_eq!(
            colors.convert("blurple").unwrap_err(),
            ValidationError::InvalidColor("blurple".into())
        );
    }
}
