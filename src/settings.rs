//! # Settings Module
//!
//! ## Purpose
//! JSON-backed configuration of the molar mass calculator: which strategy is used when the
//! caller does not name one, what happens to unclosed groups in the custom parser, and the
//! abbreviations the built-in formula toolkit expands.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "default_strategy": "library",
//!   "unclosed_groups": "drop",
//!   "abbreviations": {
//!     "Me": { "C": 1, "H": 3 },
//!     "Et": { "C": 2, "H": 5 }
//!   }
//! }
//! ```
//! Every field is optional; missing fields take their defaults.
//!
//! ## Usage
//! ```rust, ignore
//! use MolarCalc::settings::CalculatorSettings;
//!
//! let settings = CalculatorSettings::load_from_file("molar_calc.json")?;
//! let calculator = settings.build_calculator()?;
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::formula_parser::UnclosedGroupPolicy;
use crate::Chemistry::molmass::{CustomStrategy, LibraryStrategy, MolarMassCalculator, Strategy};
use crate::Chemistry::toolkit::BuiltinToolkit;

/// default name of the configuration file
pub const SETTINGS_FILE: &str = "molar_calc.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ChemError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Library,
    Custom,
}

/// serializable calculator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    pub default_strategy: StrategyKind,
    pub unclosed_groups: UnclosedGroupPolicy,
    /// abbreviation name -> element counts, expanded by the built-in toolkit
    pub abbreviations: HashMap<String, HashMap<String, usize>>,
}

impl CalculatorSettings {
    /// Loads settings from a JSON file. A missing file gives the default settings,
    /// an unreadable or malformed one is an error.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no settings file {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: CalculatorSettings = serde_json::from_str(&content)?;
        info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn toolkit(&self) -> Result<BuiltinToolkit, ChemError> {
        BuiltinToolkit::new().with_abbreviations(&self.abbreviations)
    }

    /// strategy of the given kind configured from these settings
    pub fn strategy(&self, kind: StrategyKind) -> Result<Strategy, SettingsError> {
        Ok(match kind {
            StrategyKind::Library => {
                Strategy::Library(LibraryStrategy::new(Arc::new(self.toolkit()?)))
            }
            StrategyKind::Custom => Strategy::Custom(CustomStrategy::new(self.unclosed_groups)),
        })
    }

    pub fn build_strategy(&self) -> Result<Strategy, SettingsError> {
        self.strategy(self.default_strategy)
    }

    pub fn build_calculator(&self) -> Result<MolarMassCalculator, SettingsError> {
        Ok(MolarMassCalculator::new(self.build_strategy()?))
    }
}
