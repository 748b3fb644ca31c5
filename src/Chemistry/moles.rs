//! # Amount of substance
//!
//! n = m / M. The molar mass M comes from a formula or SMILES through the molar mass
//! calculator, or is given directly for an unknown substance. A divisor that is zero,
//! negative or not finite is an error, never an infinite or NaN amount.
use log::info;

use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::molmass::{
    MolarMassCalculator, Strategy, SubstanceInput, calculate_molar_mass,
};

/// what the sample is known as
#[derive(Debug, Clone, PartialEq)]
pub enum MoleInput {
    /// formula or SMILES, molar mass is calculated
    Substance(SubstanceInput),
    /// substance of unknown structure with a measured molecular weight, g/mol
    UnknownSubstance { molecular_weight: f64 },
}

impl MoleInput {
    /// input kind from the optional request fields: formula wins over SMILES, and without
    /// either the molecular weight is used
    pub fn from_fields(
        formula: Option<&str>,
        smiles: Option<&str>,
        molecular_weight: Option<f64>,
    ) -> Result<Self, ChemError> {
        match (formula, smiles, molecular_weight) {
            (Some(formula), _, _) => Ok(MoleInput::Substance(SubstanceInput::formula(formula))),
            (None, Some(smiles), _) => Ok(MoleInput::Substance(SubstanceInput::smiles(smiles))),
            (None, None, Some(molecular_weight)) => {
                Ok(MoleInput::UnknownSubstance { molecular_weight })
            }
            (None, None, None) => Err(ChemError::InvalidInput(
                "formula, SMILES or molecular weight is required".to_string(),
            )),
        }
    }
}

fn divide(sample_mass: f64, divisor: f64) -> Result<f64, ChemError> {
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(ChemError::DivisionError {
            dividend: sample_mass,
            divisor,
        });
    }
    Ok(sample_mass / divisor)
}

/// moles in `sample_mass` grams of a substance of unknown structure
pub fn moles_of_unknown_substance(
    sample_mass: f64,
    molecular_weight: f64,
) -> Result<f64, ChemError> {
    divide(sample_mass, molecular_weight)
}

/// moles in `sample_mass` grams of a substance given by formula or SMILES
pub fn moles_of_substance(
    sample_mass: f64,
    input: &SubstanceInput,
    strategy: &Strategy,
) -> Result<f64, ChemError> {
    let (molar_mass, _) = calculate_molar_mass(input, strategy)?;
    let moles = divide(sample_mass, molar_mass)?;
    info!("{} g of '{}' is {} mol", sample_mass, input.text(), moles);
    Ok(moles)
}

pub fn moles(sample_mass: f64, input: &MoleInput, strategy: &Strategy) -> Result<f64, ChemError> {
    match input {
        MoleInput::Substance(substance) => moles_of_substance(sample_mass, substance, strategy),
        MoleInput::UnknownSubstance { molecular_weight } => {
            moles_of_unknown_substance(sample_mass, *molecular_weight)
        }
    }
}

impl MolarMassCalculator {
    /// moles in `sample_mass` grams with the strategy of this calculator
    pub fn moles(&self, sample_mass: f64, input: &MoleInput) -> Result<f64, ChemError> {
        moles(sample_mass, input, self.strategy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moles_of_water() {
        let n = moles_of_substance(18.015, &SubstanceInput::formula("H2O"), &Strategy::custom())
            .unwrap();
        assert_relative_eq!(n, 1.0, epsilon = 1e-4);
        let n = moles(
            36.03,
            &MoleInput::Substance(SubstanceInput::formula("H2O")),
            &Strategy::default(),
        )
        .unwrap();
        assert_relative_eq!(n, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_unknown_substance() {
        assert_eq!(moles_of_unknown_substance(10.0, 5.0), Ok(2.0));
        let input = MoleInput::UnknownSubstance {
            molecular_weight: 5.0,
        };
        assert_eq!(moles(10.0, &input, &Strategy::custom()), Ok(2.0));
    }

    #[test]
    fn test_bad_divisors() {
        for divisor in [0.0, -0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                moles_of_unknown_substance(10.0, divisor),
                Err(ChemError::DivisionError { .. })
            ));
        }
        // a formula without atoms has zero molar mass
        assert!(matches!(
            moles_of_substance(1.0, &SubstanceInput::formula("()"), &Strategy::custom()),
            Err(ChemError::DivisionError { .. })
        ));
    }

    #[test]
    fn test_errors_propagate() {
        let strategy = Strategy::custom();
        assert_eq!(
            moles_of_substance(1.0, &SubstanceInput::formula("Zz2O"), &strategy),
            Err(ChemError::UnknownElement("Zz".to_string()))
        );
        assert!(matches!(
            moles_of_substance(1.0, &SubstanceInput::smiles("O"), &strategy),
            Err(ChemError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_input_from_fields() {
        assert_eq!(
            MoleInput::from_fields(Some("H2O"), Some("O"), Some(1.0)).unwrap(),
            MoleInput::Substance(SubstanceInput::formula("H2O"))
        );
        assert_eq!(
            MoleInput::from_fields(None, Some("O"), None).unwrap(),
            MoleInput::Substance(SubstanceInput::smiles("O"))
        );
        assert_eq!(
            MoleInput::from_fields(None, None, Some(5.0)).unwrap(),
            MoleInput::UnknownSubstance {
                molecular_weight: 5.0
            }
        );
        assert!(MoleInput::from_fields(None, None, None).is_err());
    }

    #[test]
    fn test_calculator_moles() {
        let calculator = MolarMassCalculator::new(Strategy::custom());
        let n = calculator
            .moles(
                74.093,
                &MoleInput::Substance(SubstanceInput::formula("Ca(OH)2")),
            )
            .unwrap();
        assert_relative_eq!(n, 1.0, epsilon = 1e-4);
    }
}
