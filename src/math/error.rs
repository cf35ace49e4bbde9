// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Geometric calculation failed: {operation}")]
    GeometricFailure { operation: String },

    /// Der Power-Diagramm-Löser konnte für die aktuelle Site-Menge kein Diagramm bauen
    #[error("Power diagram is degenerate: {reason}")]
    DegenerateDiagram { reason: String },

    #[error("Unreachable geometry: {reason}")]
    UnreachableGeometry { reason: String },

    #[error("Power diagram recovery gave up after {attempts} attempts")]
    RecoveryExhausted { attempts: usize },

    #[error("Decomposition step at depth {depth} failed: {reason}")]
    NodeStepFailed { depth: usize, reason: String },

    #[error("Treemap service not initialized: missing {missing}")]
    NotInitialized { missing: &'static str },
}

pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::RecoveryExhausted { attempts: 12 };
        assert_eq!(
            err.to_string(),
            "Power diagram recovery gave up after 12 attempts"
        );

        let err = MathError::NotInitialized {
            missing: "root polygon",
        };
        assert!(err.to_string().contains("root polygon"));
    }
}
