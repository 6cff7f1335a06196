//! Selector configuration.

/// How [`crate::normalize`] treats rules that fail [`crate::TrafficRule::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Validation {
    /// The first invalid rule fails the whole refresh; the active table is kept.
    #[default]
    Strict,
    /// Invalid rules are dropped (and logged); the rest are published.
    Lenient,
}

/// Configuration for a [`crate::WeightedSelector`].
///
/// Start with [`SelectorConfig::default()`] and adjust fields directly or via the
/// `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectorConfig {
    pub validation: Validation,
    /// Seed mixed into [`crate::WeightedSelector::select_keyed`].
    ///
    /// Two selectors with the same seed and table route a given key identically.
    pub seed: u64,
}

impl SelectorConfig {
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: SelectorConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.validation, Validation::Strict);

        let cfg: SelectorConfig = serde_json::from_str(r#"{"validation": "lenient"}"#).unwrap();
        assert_eq!(cfg, SelectorConfig::default().with_validation(Validation::Lenient));
    }
}
