/// error types shared by the chemistry modules
pub mod chem_error;
/// Standard atomic weights of the 118 elements, looked up by case-sensitive symbol
///
///  # Examples
/// ```
/// use MolarCalc::Chemistry::atomic_weights::atomic_weight;
/// let oxygen = atomic_weight("O").unwrap();
/// assert!((oxygen - 15.999).abs() < 1e-9);
/// assert!(atomic_weight("Zz").is_err());
/// ```
pub mod atomic_weights;
pub mod composition;
/// Module to calculate the atomic composition of a chemical formula with nested groups:
/// a single scan with an explicit stack of groups, one group per level of brackets
///
///  # Examples
/// ```
/// use MolarCalc::Chemistry::formula_parser::parse_formula;
/// let formula = "Na(NO3)2";
/// let atomic_composition = parse_formula(formula).unwrap();
/// println!("{:?}", atomic_composition);
/// assert_eq!(atomic_composition.get("O"), Some(6));
/// ```
pub mod formula_parser;
/// Interpreters of formula and SMILES strings for the library strategy
pub mod toolkit;
/// Module to calculate the molar mass of a chemical formula with a chosen strategy
///
///  # Examples
/// ```
/// use MolarCalc::Chemistry::molmass::{MolarMassCalculator, Strategy, SubstanceInput};
/// let calculator = MolarMassCalculator::new(Strategy::custom());
/// let (molar_mass, element_composition) = calculator
///     .molar_mass_with_composition(&SubstanceInput::formula("C6H8O6"))
///     .unwrap();
/// println!("Element counts: {:?}", element_composition);
/// println!("Molar mass: {:?} g/mol", molar_mass);
/// ```
pub mod molmass;
mod molmass_tests;
/// amount of substance (moles) of a weighed sample
///
///  # Examples
/// ```
/// use MolarCalc::Chemistry::moles::moles_of_unknown_substance;
/// assert_eq!(moles_of_unknown_substance(10.0, 5.0), Ok(2.0));
/// assert!(moles_of_unknown_substance(10.0, 0.0).is_err());
/// ```
pub mod moles;
pub mod atomic_structure;
