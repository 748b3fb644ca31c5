#[cfg(test)]
mod tests {
    use crate::Chemistry::atomic_weights::atomic_weight;
    use crate::Chemistry::chem_error::ChemError;
    use crate::Chemistry::composition::Composition;
    use crate::Chemistry::formula_parser::UnclosedGroupPolicy;
    use crate::Chemistry::molmass::*;
    use crate::Chemistry::toolkit::{BuiltinToolkit, FormulaToolkit};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn w(symbol: &str) -> f64 {
        atomic_weight(symbol).unwrap()
    }

    fn custom() -> MolarMassCalculator {
        MolarMassCalculator::new(Strategy::custom())
    }

    #[test]
    fn test_calculate_molar_mass() {
        for calculator in [custom(), MolarMassCalculator::default()] {
            let cases = [
                ("H2O", 18.015),
                ("NaCl", 58.44),
                ("C6H8O6", 176.12),
                ("Ca(NO3)2", 164.09),
            ];
            for (formula, expected) in cases {
                let molar_mass = calculator
                    .molar_mass(&SubstanceInput::formula(formula))
                    .unwrap();
                assert_relative_eq!(molar_mass, expected, epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn test_water() {
        let molar_mass = custom().molar_mass(&SubstanceInput::formula("H2O")).unwrap();
        assert_relative_eq!(molar_mass, 2.0 * 1.008 + 15.999, epsilon = 1e-9);
    }

    #[test]
    fn test_groups_multiply() {
        let calculator = custom();
        let calcium_hydroxide = calculator
            .molar_mass(&SubstanceInput::formula("Ca(OH)2"))
            .unwrap();
        assert_relative_eq!(
            calcium_hydroxide,
            w("Ca") + 2.0 * (w("O") + w("H")),
            epsilon = 1e-9
        );
        let ferrocyanide = calculator
            .molar_mass(&SubstanceInput::formula("K4(Fe(CN)6)"))
            .unwrap();
        assert_relative_eq!(
            ferrocyanide,
            4.0 * w("K") + w("Fe") + 6.0 * (w("C") + w("N")),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unknown_element() {
        for calculator in [custom(), MolarMassCalculator::default()] {
            assert_eq!(
                calculator.molar_mass(&SubstanceInput::formula("Zz2O")),
                Err(ChemError::UnknownElement("Zz".to_string()))
            );
        }
    }

    #[test]
    fn test_unmatched_bracket() {
        for calculator in [custom(), MolarMassCalculator::default()] {
            assert!(matches!(
                calculator.molar_mass(&SubstanceInput::formula("Na)Cl")),
                Err(ChemError::InvalidFormula { .. })
            ));
        }
    }

    #[test]
    fn test_empty_formula_weighs_nothing() {
        assert_eq!(custom().molar_mass(&SubstanceInput::formula("")), Ok(0.0));
        assert_eq!(molar_mass_of_composition(&Composition::new()), Ok(0.0));
    }

    #[test]
    fn test_custom_strategy_rejects_smiles() {
        assert!(matches!(
            custom().molar_mass(&SubstanceInput::smiles("CCO")),
            Err(ChemError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_unclosed_group_policy_of_custom_strategy() {
        let dropping = custom()
            .molar_mass(&SubstanceInput::formula("Ca(OH"))
            .unwrap();
        assert_relative_eq!(dropping, w("Ca"), epsilon = 1e-9);
        let strict = MolarMassCalculator::new(Strategy::Custom(CustomStrategy::new(
            UnclosedGroupPolicy::Reject,
        )));
        assert!(strict.molar_mass(&SubstanceInput::formula("Ca(OH")).is_err());
    }

    #[test]
    fn test_library_strategy_hydrate() {
        let calculator = MolarMassCalculator::default();
        let molar_mass = calculator
            .molar_mass(&SubstanceInput::formula("CuSO4·5H2O"))
            .unwrap();
        assert_relative_eq!(molar_mass, 249.68, epsilon = 1e-2);
        // the lenient custom parser skips '·' and the coefficient before H2O
        let lenient = custom()
            .molar_mass(&SubstanceInput::formula("CuSO4·5H2O"))
            .unwrap();
        assert!(lenient < molar_mass);
    }

    #[derive(Debug)]
    struct EthanolToolkit;

    impl FormulaToolkit for EthanolToolkit {
        fn name(&self) -> &str {
            "ethanol-only"
        }
        fn formula_composition(&self, formula: &str) -> Result<Composition, ChemError> {
            BuiltinToolkit::new().formula_composition(formula)
        }
        fn smiles_composition(&self, smiles: &str) -> Result<Composition, ChemError> {
            match smiles {
                "CCO" => Ok([("C", 2), ("H", 6), ("O", 1)].into_iter().collect()),
                other => Err(ChemError::InvalidFormula {
                    formula: other.to_string(),
                    reason: "not ethanol".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_injected_toolkit_reads_smiles() {
        let calculator = MolarMassCalculator::new(Strategy::Library(LibraryStrategy::new(
            Arc::new(EthanolToolkit),
        )));
        let (molar_mass, composition) = calculator
            .molar_mass_with_composition(&SubstanceInput::smiles("CCO"))
            .unwrap();
        assert_relative_eq!(molar_mass, 46.069, epsilon = 1e-2);
        assert_eq!(composition.get("C"), Some(2));
        assert!(calculator.molar_mass(&SubstanceInput::smiles("c1ccccc1")).is_err());
        // the default toolkit cannot read SMILES at all
        assert!(matches!(
            MolarMassCalculator::default().molar_mass(&SubstanceInput::smiles("CCO")),
            Err(ChemError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_strategy_names() {
        assert!(matches!(Strategy::from_name(None), Ok(Strategy::Library(_))));
        assert!(matches!(
            Strategy::from_name(Some("default")),
            Ok(Strategy::Library(_))
        ));
        assert!(matches!(
            Strategy::from_name(Some("Custom")),
            Ok(Strategy::Custom(_))
        ));
        assert!(matches!(
            "quantum".parse::<Strategy>(),
            Err(ChemError::UnsupportedOperation(_))
        ));
        assert_eq!(Strategy::custom().strategy_name(), "custom");
        assert_eq!(Strategy::default().strategy_name(), "library");
    }

    #[test]
    fn test_calculate_molar_mass_of_vector_of_substances() {
        let molar_masses = custom()
            .molar_masses(&["H2O", "NaCl", "C6H8O6", "Ca(NO3)2"])
            .unwrap();
        let expected = [18.01528, 58.44316, 176.12, 164.093];
        for (calculated, expected) in molar_masses.iter().zip(expected) {
            assert_relative_eq!(*calculated, expected, epsilon = 1e-2);
        }
        assert!(custom().molar_masses(&["H2O", "Xq"]).is_err());
    }

    #[test]
    fn test_element_matrix() {
        let (matrix, elements) = custom()
            .composition_matrix(&["H2O", "NaCl", "C3H8", "CH4"])
            .unwrap();
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix.ncols(), 5);
        assert_eq!(elements, vec!["C", "Cl", "H", "Na", "O"]);
        // C3H8 row
        assert_eq!(matrix[(2, 0)], 3.0);
        assert_eq!(matrix[(2, 2)], 8.0);
        assert_eq!(matrix[(2, 4)], 0.0);
    }
}
