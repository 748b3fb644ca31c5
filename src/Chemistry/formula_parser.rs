//! # Formula Group Parser
//!
//! Single left-to-right scan of a chemical formula with an explicit stack of groups, one group
//! per level of parenthesis nesting.
//!
//! - an uppercase letter starts an element symbol; one following lowercase letter belongs to it.
//!   Digits after the symbol are its count (1 if there are none)
//! - `(` opens a new group on top of the stack
//! - `)` closes the top group; digits after it are the group multiplier (1 if there are none)
//!   and the group's atoms, multiplied, are merged into the enclosing group
//! - every other character is skipped without effect
//!
//! A `)` without an open group is an error. Groups still open when the scan ends are handled
//! according to [`UnclosedGroupPolicy`].
//!
//! The stack is an arena of groups addressed by depth: a closed group is drained into its
//! parent and its map is reused the next time that depth is entered.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::composition::Composition;

/// what to do with groups that are still open when the formula ends, e.g. "Ca(OH"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnclosedGroupPolicy {
    /// atoms of unclosed groups are excluded from the result and a warning is logged
    #[default]
    Drop,
    /// unclosed groups make the formula invalid
    Reject,
}

struct GroupStack {
    groups: Vec<Composition>,
    depth: usize,
}

impl GroupStack {
    fn new() -> Self {
        Self {
            groups: vec![Composition::new()],
            depth: 0,
        }
    }

    fn top(&mut self) -> &mut Composition {
        &mut self.groups[self.depth]
    }

    fn open(&mut self) {
        self.depth += 1;
        if self.groups.len() == self.depth {
            self.groups.push(Composition::new());
        } else {
            self.groups[self.depth].clear();
        }
    }

    /// closes the top group into its parent; `None` if the multiplied counts overflow.
    /// The caller checks that a group is open
    fn close(&mut self, multiplier: usize) -> Option<()> {
        debug_assert!(self.depth > 0);
        let (lower, upper) = self.groups.split_at_mut(self.depth);
        self.depth -= 1;
        lower[self.depth].merge_scaled(&mut upper[0], multiplier)
    }

    fn into_base(mut self) -> Composition {
        self.groups.swap_remove(0)
    }
}

/// reads a run of decimal digits starting at `*i`, advancing `*i` past it.
/// No digits and a literal 0 both give 1
fn read_count(chars: &[char], i: &mut usize, formula: &str) -> Result<usize, ChemError> {
    let mut count: usize = 0;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        count = count
            .checked_mul(10)
            .and_then(|c| c.checked_add(d as usize))
            .ok_or_else(|| ChemError::invalid_formula(formula, "count is too large"))?;
        *i += 1;
    }
    Ok(if count == 0 { 1 } else { count })
}

/// parses a formula into its atomic composition, keeping the contents of unclosed groups out
/// of the result
///
/// # Examples
/// ```
/// use MolarCalc::Chemistry::formula_parser::parse_formula;
/// let composition = parse_formula("K4(Fe(CN)6)").unwrap();
/// assert_eq!(composition.get("K"), Some(4));
/// assert_eq!(composition.get("C"), Some(6));
/// assert!(parse_formula("Na)Cl").is_err());
/// ```
pub fn parse_formula(formula: &str) -> Result<Composition, ChemError> {
    parse_formula_with_policy(formula, UnclosedGroupPolicy::Drop)
}

pub fn parse_formula_with_policy(
    formula: &str,
    policy: UnclosedGroupPolicy,
) -> Result<Composition, ChemError> {
    let chars: Vec<char> = formula.chars().collect();
    let mut stack = GroupStack::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_uppercase() {
            let start = i;
            i += 1;
            if chars.get(i).is_some_and(|next| next.is_lowercase()) {
                i += 1;
            }
            let symbol: String = chars[start..i].iter().collect();
            let count = read_count(&chars, &mut i, formula)?;
            debug!("element {} x{} at depth {}", symbol, count, stack.depth);
            stack.top().add(&symbol, count).ok_or_else(|| {
                ChemError::invalid_formula(formula, "atom count is too large")
            })?;
        } else if c == '(' {
            stack.open();
            i += 1;
        } else if c == ')' {
            i += 1;
            let multiplier = read_count(&chars, &mut i, formula)?;
            if stack.depth == 0 {
                return Err(ChemError::invalid_formula(
                    formula,
                    format!("unmatched ')' at position {}", i - 1),
                ));
            }
            stack.close(multiplier).ok_or_else(|| {
                ChemError::invalid_formula(formula, "atom count is too large")
            })?;
        } else {
            i += 1;
        }
    }

    if stack.depth > 0 {
        match policy {
            UnclosedGroupPolicy::Drop => {
                warn!(
                    "formula '{}' has {} unclosed group(s); their atoms are not counted",
                    formula, stack.depth
                );
            }
            UnclosedGroupPolicy::Reject => {
                return Err(ChemError::invalid_formula(
                    formula,
                    format!("{} unclosed '('", stack.depth),
                ));
            }
        }
    }
    Ok(stack.into_base())
}
