use crate::renderer::colours;
use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_COLOR: &str = "lightCyan";

/// Options as the user supplied them. Nothing here has been checked yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            color: Some(DEFAULT_COLOR.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("invalid plugin options: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Returns every problem found in `options`, empty when they are usable.
pub fn validate_options(options: &PluginOptions) -> Vec<String> {
    let mut errors = Vec::new();

    match options.color.as_deref() {
        None | Some("") => {
            errors.push("'color' color string is required but missing.".to_string());
        }
        Some(color) if !colours::colour_exists(color) => {
            errors.push(format!("invalid color '{}'", color));
        }
        Some(_) => {}
    }

    errors
}

/// Options that passed validation, with the colour already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    color_name: String,
    fill: Rgba<u8>,
}

impl ValidatedOptions {
    pub fn color_name(&self) -> &str {
        &self.color_name
    }

    pub fn fill(&self) -> Rgba<u8> {
        self.fill
    }
}

impl Default for ValidatedOptions {
    fn default() -> Self {
        Self {
            color_name: DEFAULT_COLOR.to_string(),
            fill: colours::colour(DEFAULT_COLOR).unwrap_or(Rgba([104, 253, 254, 255])),
        }
    }
}

impl TryFrom<PluginOptions> for ValidatedOptions {
    type Error = OptionsError;

    fn try_from(options: PluginOptions) -> Result<Self, Self::Error> {
        let errors = validate_options(&options);
        if !errors.is_empty() {
            return Err(OptionsError::Invalid(errors));
        }

        let color_name = options.color.unwrap_or_default();
        match colours::colour(&color_name) {
            Some(fill) => Ok(Self { color_name, fill }),
            None => Err(OptionsError::Invalid(vec![format!("invalid color '{}'", color_name)])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(color: Option<&str>) -> PluginOptions {
        PluginOptions {
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_color() {
        let errors = validate_options(&options(None));
        assert_eq!(errors, vec!["'color' color string is required but missing."]);
    }

    #[test]
    fn test_empty_color_counts_as_missing() {
        let errors = validate_options(&options(Some("")));
        assert_eq!(errors, vec!["'color' color string is required but missing."]);
    }

    #[test]
    fn test_unknown_color() {
        let errors = validate_options(&options(Some("not-a-real-color")));
        assert_eq!(errors, vec!["invalid color 'not-a-real-color'"]);
    }

    #[test]
    fn test_known_color() {
        assert!(validate_options(&options(Some("lightCyan"))).is_empty());
        assert!(validate_options(&options(Some("red"))).is_empty());
    }

    #[test]
    fn test_default_options() {
        let defaults = PluginOptions::default();
        assert_eq!(defaults.color.as_deref(), Some("lightCyan"));
        assert!(validate_options(&defaults).is_empty());
    }

    #[test]
    fn test_validated_resolves_colour() {
        let validated = ValidatedOptions::try_from(options(Some("lightRed"))).unwrap();
        assert_eq!(validated.color_name(), "lightRed");
        assert_eq!(validated.fill(), Rgba([253, 111, 107, 255]));
    }

    #[test]
    fn test_validated_rejects_bad_options() {
        let err = ValidatedOptions::try_from(options(Some("mauve"))).unwrap_err();
        assert_eq!(err, OptionsError::Invalid(vec!["invalid color 'mauve'".to_string()]));
        assert_eq!(err.to_string(), "invalid plugin options: invalid color 'mauve'");
    }

    #[test]
    fn test_validated_default_matches_default_options() {
        let validated = ValidatedOptions::try_from(PluginOptions::default()).unwrap();
        assert_eq!(validated, ValidatedOptions::default());
    }
}
