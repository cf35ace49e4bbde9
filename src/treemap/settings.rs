// src/treemap/settings.rs

use crate::math::error::{MathError, MathResult};
use crate::math::geometry::voronoi::EqualizationConfig;
use serde::{Deserialize, Serialize};

/// Einstellungen einer hierarchischen Zerlegung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapSettings {
    /// Anzahl der Worker im Thread-Pool
    pub thread_count: usize,
    /// Startwert für den Zufallsgenerator jedes Knotenschritts
    pub seed: u64,
    /// Optionaler Schrumpffaktor für Zellränder in `(0, 1]`
    pub border_shrink_factor: Option<f64>,
    pub equalization: EqualizationConfig,
}

impl TreemapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_border_shrink_factor(mut self, factor: f64) -> Self {
        self.border_shrink_factor = Some(factor);
        self
    }

    pub fn with_equalization(mut self, config: EqualizationConfig) -> Self {
        self.equalization = config;
        self
    }

    /// Schrumpffaktor, falls er tatsächlich etwas verändert
    pub fn effective_shrink_factor(&self) -> Option<f64> {
        self.border_shrink_factor.filter(|factor| *factor != 1.0)
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.thread_count == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "Thread count must be greater than 0".to_string(),
            });
        }

        if let Some(factor) = self.border_shrink_factor {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Border shrink factor must be in (0, 1], got {}", factor),
                });
            }
        }

        self.equalization.validate()
    }
}

impl Default for TreemapSettings {
    fn default() -> Self {
        Self {
            thread_count: 4,
            seed: 666,
            border_shrink_factor: None,
            equalization: EqualizationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TreemapSettings::default();
        assert_eq!(settings.thread_count, 4);
        assert_eq!(settings.seed, 666);
        assert!(settings.border_shrink_factor.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(TreemapSettings::new().with_thread_count(0).validate().is_err());
        assert!(
            TreemapSettings::new()
                .with_border_shrink_factor(1.5)
                .validate()
                .is_err()
        );
        assert!(
            TreemapSettings::new()
                .with_border_shrink_factor(0.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_shrink_factor_of_one_is_ignored() {
        let settings = TreemapSettings::new().with_border_shrink_factor(1.0);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.effective_shrink_factor(), None);

        let settings = TreemapSettings::new().with_border_shrink_factor(0.9);
        assert_eq!(settings.effective_shrink_factor(), Some(0.9));
    }
}
