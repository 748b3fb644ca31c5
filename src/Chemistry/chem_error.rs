use thiserror::Error;

/// error types of formula parsing, molar mass and mole calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChemError {
    /// structurally malformed formula (unbalanced brackets, stray characters in strict mode)
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
    /// syntactically valid token that names no element of the periodic table
    #[error("Unknown element: {0}")]
    UnknownElement(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// zero, negative or non-finite divisor in a mole computation
    #[error("Division error: cannot divide {dividend} by {divisor}")]
    DivisionError { dividend: f64, divisor: f64 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ChemError {
    pub(crate) fn invalid_formula(formula: &str, reason: impl Into<String>) -> Self {
        ChemError::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}
