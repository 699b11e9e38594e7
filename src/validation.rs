//! Stylesheet validation
//!
//! Checks an email stylesheet for the selectors the rewriter looks up, so
//! authors learn about missing rules before a campaign goes out rather than
//! from a plain-looking email. Missing styles never break a rewrite, which
//! is why every finding here is a warning.
//!
//! # Checks
//!
//! 1. **Recommended selectors**: `body`, `h1`, `h2`, `h3`, `p`, `a`
//! 2. **Primary button**: `a.button` or `a.btn`
//! 3. **Secondary button**: `a.button.secondary` or `a.btn.alt`
//! 4. **Tertiary button**: `a.button.tertiary` or `a.btn.alt2`

use crate::stylesheet::StyleSheet;

/// Selectors every email stylesheet should define
const RECOMMENDED_SELECTORS: &[&str] = &["body", "h1", "h2", "h3", "p", "a"];

/// Alternative selector pairs for each button variant, with a note on use
const BUTTON_SELECTOR_PAIRS: &[(&str, &str, &str)] = &[
    ("a.button", "a.btn", "required if using button links"),
    (
        "a.button.secondary",
        "a.btn.alt",
        "optional, for secondary buttons",
    ),
    (
        "a.button.tertiary",
        "a.btn.alt2",
        "optional, for tertiary buttons",
    ),
];

/// Outcome of validating a stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the stylesheet unusable
    pub errors: Vec<String>,
    /// Missing rules that degrade the rendered email
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` when there are no errors (warnings are allowed)
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` when there are neither errors nor warnings
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validator for email stylesheets
pub struct StyleValidator {
    recommended: Vec<String>,
}

impl StyleValidator {
    /// Create a validator with the default recommended selectors
    pub fn new() -> Self {
        Self {
            recommended: RECOMMENDED_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a validator with a custom list of recommended selectors
    ///
    /// Button checks are always performed.
    pub fn with_recommended<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recommended: selectors.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate a stylesheet
    ///
    /// # Examples
    ///
    /// ```
    /// use email_safe_markup::stylesheet::StyleSheet;
    /// use email_safe_markup::validation::StyleValidator;
    ///
    /// let styles = StyleSheet::parse("body, h1, h2, h3, p, a { color: #222 } a.btn { color: #fff }");
    /// let report = StyleValidator::new().validate(&styles);
    /// assert!(report.is_ok());
    /// assert_eq!(report.warnings.len(), 2); // secondary + tertiary buttons
    /// ```
    pub fn validate(&self, styles: &StyleSheet) -> ValidationReport {
        let mut report = ValidationReport::default();

        for selector in &self.recommended {
            if styles.get_style(selector).is_empty() {
                report.warnings.push(format!(
                    "CSS rule for '{}' is missing (recommended for proper styling)",
                    selector
                ));
            }
        }

        for (primary, alternative, note) in BUTTON_SELECTOR_PAIRS {
            if styles.get_style(primary).is_empty() && styles.get_style(alternative).is_empty() {
                report.warnings.push(format!(
                    "CSS rule for '{}' or '{}' is missing ({})",
                    primary, alternative, note
                ));
            }
        }

        report
    }
}

impl Default for StyleValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stylesheet_warns_everything() {
        let report = StyleValidator::new().validate(&StyleSheet::parse(""));
        assert!(report.is_ok());
        assert!(!report.is_clean());
        assert_eq!(report.warnings.len(), RECOMMENDED_SELECTORS.len() + 3);
        assert!(
            report
                .warnings
                .contains(&"CSS rule for 'h1' is missing (recommended for proper styling)".to_string())
        );
    }

    #[test]
    fn test_complete_stylesheet_is_clean() {
        let css = "body, h1, h2, h3, p, a { color: #222 }
            a.button { color: #fff }
            a.button.secondary { color: #000 }
            a.btn.alt2 { color: #333 }";
        let report = StyleValidator::new().validate(&StyleSheet::parse(css));
        assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    }

    #[test]
    fn test_either_button_selector_satisfies() {
        let report = StyleValidator::with_recommended(Vec::<String>::new())
            .validate(&StyleSheet::parse("a.btn { color: red }"));
        assert!(
            !report
                .warnings
                .iter()
                .any(|w| w.starts_with("CSS rule for 'a.button' or 'a.btn'"))
        );
    }

    #[test]
    fn test_custom_recommended_selectors() {
        let validator = StyleValidator::with_recommended(["td", "table"]);
        let report = validator.validate(&StyleSheet::parse("table { width: 100% }"));
        let missing: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.contains("recommended"))
            .collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("'td'"));
    }
}
