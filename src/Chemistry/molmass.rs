//! # Molar mass
//!
//! Turns a formula (or SMILES) into a composition with the chosen [`Strategy`] and sums
//! `count * atomic weight` over it.
//!
//! - [`Strategy::Library`] asks a [`FormulaToolkit`] for the composition (the strict
//!   [`BuiltinToolkit`] unless another toolkit is injected) and accepts formulas and SMILES
//! - [`Strategy::Custom`] uses the group parser of [`crate::Chemistry::formula_parser`] and
//!   accepts formulas only
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use nalgebra::DMatrix;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use crate::Chemistry::atomic_weights::atomic_weight;
use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::composition::Composition;
use crate::Chemistry::formula_parser::{UnclosedGroupPolicy, parse_formula_with_policy};
use crate::Chemistry::toolkit::{BuiltinToolkit, FormulaToolkit};

/// what the caller hands over: a chemical formula or a SMILES string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstanceInput {
    Formula(String),
    Smiles(String),
}

impl SubstanceInput {
    pub fn formula(formula: &str) -> Self {
        SubstanceInput::Formula(formula.to_string())
    }

    pub fn smiles(smiles: &str) -> Self {
        SubstanceInput::Smiles(smiles.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            SubstanceInput::Formula(s) | SubstanceInput::Smiles(s) => s,
        }
    }
}

#[enum_dispatch]
pub trait CompositionStrategy {
    /// atomic composition of the substance
    fn composition(&self, input: &SubstanceInput) -> Result<Composition, ChemError>;
    fn strategy_name(&self) -> &'static str;
}

/// composition from a cheminformatics toolkit
#[derive(Debug, Clone)]
pub struct LibraryStrategy {
    toolkit: Arc<dyn FormulaToolkit>,
}

impl LibraryStrategy {
    pub fn new(toolkit: Arc<dyn FormulaToolkit>) -> Self {
        Self { toolkit }
    }

    pub fn toolkit(&self) -> &dyn FormulaToolkit {
        self.toolkit.as_ref()
    }
}

impl Default for LibraryStrategy {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinToolkit::new()))
    }
}

impl CompositionStrategy for LibraryStrategy {
    fn composition(&self, input: &SubstanceInput) -> Result<Composition, ChemError> {
        debug!("toolkit '{}' reads {:?}", self.toolkit.name(), input);
        match input {
            SubstanceInput::Formula(formula) => self.toolkit.formula_composition(formula),
            SubstanceInput::Smiles(smiles) => self.toolkit.smiles_composition(smiles),
        }
    }

    fn strategy_name(&self) -> &'static str {
        "library"
    }
}

/// composition from the stack based group parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomStrategy {
    pub unclosed_groups: UnclosedGroupPolicy,
}

impl CustomStrategy {
    pub fn new(unclosed_groups: UnclosedGroupPolicy) -> Self {
        Self { unclosed_groups }
    }
}

impl CompositionStrategy for CustomStrategy {
    fn composition(&self, input: &SubstanceInput) -> Result<Composition, ChemError> {
        match input {
            SubstanceInput::Formula(formula) => {
                parse_formula_with_policy(formula, self.unclosed_groups)
            }
            SubstanceInput::Smiles(smiles) => Err(ChemError::UnsupportedOperation(format!(
                "custom strategy reads chemical formulas only, got SMILES '{}'",
                smiles
            ))),
        }
    }

    fn strategy_name(&self) -> &'static str {
        "custom"
    }
}

#[enum_dispatch(CompositionStrategy)]
#[derive(Debug, Clone)]
pub enum Strategy {
    Library(LibraryStrategy),
    Custom(CustomStrategy),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Library(LibraryStrategy::default())
    }
}

impl Strategy {
    pub fn custom() -> Self {
        Strategy::Custom(CustomStrategy::default())
    }

    /// strategy by name as it comes from a request: none, "default" and "library" select the
    /// library strategy, "custom" the group parser
    pub fn from_name(name: Option<&str>) -> Result<Self, ChemError> {
        match name {
            None => Ok(Strategy::default()),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for Strategy {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" | "library" => Ok(Strategy::default()),
            "custom" => Ok(Strategy::custom()),
            other => Err(ChemError::UnsupportedOperation(format!(
                "unknown molar mass strategy '{}'",
                other
            ))),
        }
    }
}

/// molar mass of a composition, g/mol. An empty composition weighs 0
pub fn molar_mass_of_composition(composition: &Composition) -> Result<f64, ChemError> {
    let mut molar_mass = 0.0;
    for (element, count) in composition.iter() {
        let weight = atomic_weight(element)?;
        debug!("element: {}, number of atoms {}", element, count);
        molar_mass += weight * count as f64;
    }
    Ok(molar_mass)
}

/// molar mass of a substance together with its atomic composition
pub fn calculate_molar_mass(
    input: &SubstanceInput,
    strategy: &Strategy,
) -> Result<(f64, Composition), ChemError> {
    let composition = strategy.composition(input)?;
    let molar_mass = molar_mass_of_composition(&composition)?;
    info!(
        "molar mass of '{}' ({} strategy): {} g/mol",
        input.text(),
        strategy.strategy_name(),
        molar_mass
    );
    Ok((molar_mass, composition))
}

/// molar mass calculator bound to one strategy
#[derive(Debug, Clone, Default)]
pub struct MolarMassCalculator {
    strategy: Strategy,
}

impl MolarMassCalculator {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn composition(&self, input: &SubstanceInput) -> Result<Composition, ChemError> {
        self.strategy.composition(input)
    }

    pub fn molar_mass(&self, input: &SubstanceInput) -> Result<f64, ChemError> {
        calculate_molar_mass(input, &self.strategy).map(|(molar_mass, _)| molar_mass)
    }

    pub fn molar_mass_with_composition(
        &self,
        input: &SubstanceInput,
    ) -> Result<(f64, Composition), ChemError> {
        calculate_molar_mass(input, &self.strategy)
    }

    /// molar masses of a list of formulas, in input order
    pub fn molar_masses(&self, formulae: &[&str]) -> Result<Vec<f64>, ChemError> {
        formulae
            .iter()
            .map(|formula| self.molar_mass(&SubstanceInput::formula(formula)))
            .collect()
    }

    /// element composition matrix: one row per formula, one column per element.
    /// Elements are returned in alphabetical order
    pub fn composition_matrix(
        &self,
        formulae: &[&str],
    ) -> Result<(DMatrix<f64>, Vec<String>), ChemError> {
        let compositions = formulae
            .iter()
            .map(|formula| self.composition(&SubstanceInput::formula(formula)))
            .collect::<Result<Vec<_>, _>>()?;
        let elements: Vec<String> = compositions
            .iter()
            .flat_map(|c| c.elements())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut matrix = DMatrix::zeros(compositions.len(), elements.len());
        for (i, composition) in compositions.iter().enumerate() {
            for (j, element) in elements.iter().enumerate() {
                if let Some(count) = composition.get(element) {
                    matrix[(i, j)] = count as f64;
                }
            }
        }
        debug!("composition matrix {}x{}", matrix.nrows(), matrix.ncols());
        Ok((matrix, elements))
    }
}
