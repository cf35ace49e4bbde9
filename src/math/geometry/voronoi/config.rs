// src/math/geometry/voronoi/config.rs
use crate::math::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};

/// Stellschrauben der Flächen-Angleichung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizationConfig {
    /// Iterationsobergrenze (wirkt nur mit `cancel_on_max_iterations`)
    pub max_iterations: usize,
    /// Abbruchschwelle für den Flächenfehler
    pub area_error_threshold: f64,
    /// Zusätzlich den größten relativen Einzelfehler gegen die Schwelle prüfen
    pub use_local_error_for_termination: bool,
    pub cancel_on_area_error: bool,
    pub cancel_on_max_iterations: bool,
    /// Totzone `[1 - ε, 1 + ε]`, in der Gewichte unverändert bleiben
    pub ratio_epsilon: f64,
    /// Größere Ausdehnung der Clip-Region im normalisierten Koordinatensystem
    pub nominal_width: f64,
    /// Anteil des Abstands, den die Wurzel eines Gewichts höchstens erreichen darf
    pub dominance_factor: f64,
    /// Obergrenze für Reparaturversuche nach einem gescheiterten Diagramm
    pub max_recovery_attempts: usize,
    /// Aufeinanderfolgende Runden, in denen eine Site ohne Zelle bleiben darf
    pub max_bad_rounds: usize,
    /// Clip-Region vor dem Lauf normalisieren
    pub normalize: bool,
}

impl EqualizationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_area_error_threshold(mut self, threshold: f64) -> Self {
        self.area_error_threshold = threshold;
        self
    }

    pub fn with_local_error_termination(mut self, enabled: bool) -> Self {
        self.use_local_error_for_termination = enabled;
        self
    }

    pub fn with_cancel_on_area_error(mut self, enabled: bool) -> Self {
        self.cancel_on_area_error = enabled;
        self
    }

    pub fn with_cancel_on_max_iterations(mut self, enabled: bool) -> Self {
        self.cancel_on_max_iterations = enabled;
        self
    }

    pub fn with_max_recovery_attempts(mut self, attempts: usize) -> Self {
        self.max_recovery_attempts = attempts;
        self
    }

    pub fn with_max_bad_rounds(mut self, rounds: usize) -> Self {
        self.max_bad_rounds = rounds;
        self
    }

    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.cancel_on_area_error && !self.cancel_on_max_iterations {
            return Err(MathError::InvalidConfiguration {
                message: "At least one termination criterion must be enabled".to_string(),
            });
        }

        if !(self.area_error_threshold > 0.0 && self.area_error_threshold.is_finite()) {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Area error threshold must be positive, got {}",
                    self.area_error_threshold
                ),
            });
        }

        if !(0.0..1.0).contains(&self.ratio_epsilon) {
            return Err(MathError::InvalidConfiguration {
                message: "Ratio epsilon must be between 0.0 and 1.0".to_string(),
            });
        }

        if !(self.nominal_width > 0.0 && self.nominal_width.is_finite()) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Nominal width must be positive, got {}", self.nominal_width),
            });
        }

        if !(self.dominance_factor > 0.0 && self.dominance_factor < 1.0) {
            return Err(MathError::InvalidConfiguration {
                message: "Dominance factor must be between 0.0 and 1.0".to_string(),
            });
        }

        if self.max_recovery_attempts == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "At least one recovery attempt is required".to_string(),
            });
        }

        if self.max_bad_rounds == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "At least one round without a complete diagram must be allowed"
                    .to_string(),
            });
        }

        Ok(())
    }
}

impl Default for EqualizationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 800,
            area_error_threshold: 0.01,
            use_local_error_for_termination: false,
            cancel_on_area_error: true,
            cancel_on_max_iterations: true,
            ratio_epsilon: 0.01,
            nominal_width: 500.0,
            dominance_factor: 0.999,
            max_recovery_attempts: 1000,
            max_bad_rounds: 1600,
            normalize: true,
        }
    }
}
