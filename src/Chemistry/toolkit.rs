//! # Formula toolkit
//!
//! Interpretation of formula and SMILES strings for the library strategy of the molar mass
//! calculator. [`FormulaToolkit`] is the point where a full cheminformatics library is plugged
//! in; [`BuiltinToolkit`] is the default implementation and understands formulas only.
//!
//! The built-in interpreter is strict where the custom group parser is lenient:
//! - `()`, `[]` and `{}` groups must be balanced and closed by the same kind of bracket
//! - letters, digits and brackets are the only accepted characters (whitespace is ignored)
//! - hydrates and adducts are written as segments joined by `.`, `·` or `*`, each with an
//!   optional leading coefficient: "CuSO4·5H2O"
//! - a trailing charge is dropped: "NH4+", "Fe^3+", "SO4 2-", "[Fe(CN)6]4-".
//!   A charge with a magnitude must be separated by a space, `^` or a closing `]`
//! - user abbreviations ("Me" -> CH3) are expanded in place
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::OnceLock;

use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::composition::Composition;

/// formula/SMILES interpreter used by the library strategy
pub trait FormulaToolkit: Debug + Send + Sync {
    fn name(&self) -> &str;
    fn formula_composition(&self, formula: &str) -> Result<Composition, ChemError>;
    fn smiles_composition(&self, smiles: &str) -> Result<Composition, ChemError>;
}

static CHARGE_RE: OnceLock<Regex> = OnceLock::new();
static COEFFICIENT_RE: OnceLock<Regex> = OnceLock::new();

fn charge_re() -> &'static Regex {
    CHARGE_RE.get_or_init(|| {
        Regex::new(r"^(?P<body>.*?)(?:(?P<bracket>\])\d*[+-]|\^\d*[+-]|\s+\d*[+-]|[+-]+)\s*$")
            .expect("charge pattern")
    })
}

fn coefficient_re() -> &'static Regex {
    COEFFICIENT_RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<coefficient>\d+)\s*(?P<rest>.*)$").expect("coefficient pattern")
    })
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// default toolkit: strict formula interpreter with abbreviation support, no SMILES
#[derive(Debug, Clone, Default)]
pub struct BuiltinToolkit {
    abbreviations: HashMap<String, Composition>,
}

impl BuiltinToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// registers an abbreviation such as "Me" or "Ph". The name must be an uppercase letter
    /// followed by lowercase letters so it reads as one token
    pub fn with_abbreviation(
        mut self,
        name: &str,
        composition: Composition,
    ) -> Result<Self, ChemError> {
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_lowercase());
        if !valid {
            return Err(ChemError::InvalidInput(format!(
                "abbreviation '{}' must be an uppercase letter followed by lowercase letters",
                name
            )));
        }
        if composition.is_empty() {
            return Err(ChemError::InvalidInput(format!(
                "abbreviation '{}' has no atoms",
                name
            )));
        }
        if let Some((symbol, _)) = composition.iter().find(|(_, count)| *count == 0) {
            return Err(ChemError::InvalidInput(format!(
                "abbreviation '{}' has a zero count of {}",
                name, symbol
            )));
        }
        self.abbreviations.insert(name.to_string(), composition);
        Ok(self)
    }

    pub fn with_abbreviations(
        self,
        abbreviations: &HashMap<String, HashMap<String, usize>>,
    ) -> Result<Self, ChemError> {
        abbreviations.iter().try_fold(self, |toolkit, (name, counts)| {
            toolkit.with_abbreviation(name, Composition::from(counts.clone()))
        })
    }

    pub fn abbreviations(&self) -> &HashMap<String, Composition> {
        &self.abbreviations
    }

    fn parse_segment(&self, segment: &str, formula: &str) -> Result<Composition, ChemError> {
        let too_large = || ChemError::invalid_formula(formula, "atom count is too large");
        let chars: Vec<char> = segment.chars().collect();
        let mut base = Composition::new();
        // open groups with the bracket that opened them
        let mut open: Vec<(char, Composition)> = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
            } else if c.is_ascii_uppercase() {
                let start = i;
                i += 1;
                while chars.get(i).is_some_and(|c| c.is_ascii_lowercase()) {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                let count = read_strict_count(&chars, &mut i, formula)?;
                let top = match open.last_mut() {
                    Some((_, group)) => group,
                    None => &mut base,
                };
                match self.abbreviations.get(&token) {
                    Some(expansion) => {
                        let mut expansion = expansion.clone();
                        top.merge_scaled(&mut expansion, count).ok_or_else(too_large)?;
                    }
                    None => top.add(&token, count).ok_or_else(too_large)?,
                }
            } else if matches!(c, '(' | '[' | '{') {
                open.push((c, Composition::new()));
                i += 1;
            } else if matches!(c, ')' | ']' | '}') {
                let Some((bracket, mut group)) = open.pop() else {
                    return Err(ChemError::invalid_formula(
                        formula,
                        format!("unmatched '{}'", c),
                    ));
                };
                if closing_for(bracket) != c {
                    return Err(ChemError::invalid_formula(
                        formula,
                        format!("'{}' closed by '{}'", bracket, c),
                    ));
                }
                i += 1;
                let multiplier = read_strict_count(&chars, &mut i, formula)?;
                let parent = match open.last_mut() {
                    Some((_, group)) => group,
                    None => &mut base,
                };
                parent.merge_scaled(&mut group, multiplier).ok_or_else(too_large)?;
            } else {
                return Err(ChemError::invalid_formula(
                    formula,
                    format!("unexpected character '{}'", c),
                ));
            }
        }
        if !open.is_empty() {
            return Err(ChemError::invalid_formula(
                formula,
                format!("{} unclosed bracket(s)", open.len()),
            ));
        }
        Ok(base)
    }
}

/// splits a trailing ionic charge off the formula
fn strip_charge(formula: &str) -> Option<&str> {
    let caps = charge_re().captures(formula)?;
    let body = caps.name("body").map_or("", |m| m.as_str());
    // the closing bracket the charge was written on belongs to the formula
    let end = body.len() + caps.name("bracket").map_or(0, |m| m.len());
    Some(&formula[..end])
}

/// count after a symbol or a closing bracket; missing digits give 1, an explicit 0 is invalid
fn read_strict_count(chars: &[char], i: &mut usize, formula: &str) -> Result<usize, ChemError> {
    let start = *i;
    let mut count: usize = 0;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        count = count
            .checked_mul(10)
            .and_then(|c| c.checked_add(d as usize))
            .ok_or_else(|| ChemError::invalid_formula(formula, "count is too large"))?;
        *i += 1;
    }
    match (*i == start, count) {
        (true, _) => Ok(1),
        (false, 0) => Err(ChemError::invalid_formula(formula, "zero count")),
        (false, n) => Ok(n),
    }
}

impl FormulaToolkit for BuiltinToolkit {
    fn name(&self) -> &str {
        "builtin"
    }

    fn formula_composition(&self, formula: &str) -> Result<Composition, ChemError> {
        let trimmed = formula.trim();
        let body = match strip_charge(trimmed) {
            Some(body) => {
                debug!("charge stripped from '{}', parsing '{}'", formula, body);
                body
            }
            None => trimmed,
        };
        let mut composition = Composition::new();
        for segment in body.split(['.', '·', '*']) {
            let (coefficient, rest) = match coefficient_re().captures(segment) {
                Some(caps) => {
                    let digits = caps.name("coefficient").map_or("", |m| m.as_str());
                    let coefficient: usize = digits.parse().map_err(|_| {
                        ChemError::invalid_formula(formula, "coefficient is too large")
                    })?;
                    let rest = caps.name("rest").map_or("", |m| m.as_str());
                    (coefficient, rest)
                }
                None => (1, segment),
            };
            if coefficient == 0 {
                return Err(ChemError::invalid_formula(formula, "zero coefficient"));
            }
            if rest.trim().is_empty() && body.contains(['.', '·', '*']) {
                return Err(ChemError::invalid_formula(formula, "empty formula segment"));
            }
            let mut part = self.parse_segment(rest, formula)?;
            composition
                .merge_scaled(&mut part, coefficient)
                .ok_or_else(|| ChemError::invalid_formula(formula, "atom count is too large"))?;
        }
        Ok(composition)
    }

    fn smiles_composition(&self, smiles: &str) -> Result<Composition, ChemError> {
        Err(ChemError::UnsupportedOperation(format!(
            "SMILES '{}' needs an external cheminformatics toolkit; the builtin toolkit reads formulas only",
            smiles
        )))
    }
}
