use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Chemistry::atomic_weights::atomic_weight;
use crate::Chemistry::chem_error::ChemError;

/// atomic composition of a formula or of a group inside it: element symbol -> number of atoms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition {
    counts: HashMap<String, usize>,
}

impl Composition {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// adds atoms of an element; counts of a recurring symbol are summed.
    /// Returns `None` if the sum overflows, leaving the count unchanged
    pub fn add(&mut self, symbol: &str, count: usize) -> Option<()> {
        match self.counts.get_mut(symbol) {
            Some(n) => *n = n.checked_add(count)?,
            None => {
                self.counts.insert(symbol.to_string(), count);
            }
        }
        Some(())
    }

    /// moves every entry of `group` into self, multiplied by `multiplier`; `group` is left empty.
    /// Returns `None` if an atom count overflows.
    pub fn merge_scaled(&mut self, group: &mut Composition, multiplier: usize) -> Option<()> {
        for (symbol, count) in group.counts.drain() {
            let scaled = count.checked_mul(multiplier)?;
            let entry = self.counts.entry(symbol).or_insert(0);
            *entry = entry.checked_add(scaled)?;
        }
        Some(())
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.counts.get(symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, n)| (s.as_str(), *n))
    }

    /// element symbols in alphabetical order
    pub fn elements(&self) -> Vec<String> {
        let mut elements: Vec<String> = self.counts.keys().cloned().collect();
        elements.sort();
        elements
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn total_atoms(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn into_inner(self) -> HashMap<String, usize> {
        self.counts
    }

    /// table of elements with their counts, atomic weights and mass fractions
    pub fn pretty_print(&self) -> Result<Table, ChemError> {
        let mut rows = Vec::with_capacity(self.len());
        let mut molar_mass = 0.0;
        for symbol in self.elements() {
            let count = self.counts[&symbol];
            let weight = atomic_weight(&symbol)?;
            molar_mass += weight * count as f64;
            rows.push((symbol, count, weight));
        }
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Element"),
            Cell::new("Atoms"),
            Cell::new("Atomic weight, g/mol"),
            Cell::new("Mass fraction, %"),
        ]));
        for (symbol, count, weight) in rows {
            let fraction = if molar_mass > 0.0 {
                100.0 * weight * count as f64 / molar_mass
            } else {
                0.0
            };
            table.add_row(Row::new(vec![
                Cell::new(&symbol),
                Cell::new(&count.to_string()),
                Cell::new(&format!("{:.4}", weight)),
                Cell::new(&format!("{:.2}", fraction)),
            ]));
        }
        table.add_row(Row::new(vec![
            Cell::new("Total"),
            Cell::new(&self.total_atoms().to_string()),
            Cell::new(&format!("{:.4}", molar_mass)),
            Cell::new("100.00"),
        ]));
        Ok(table)
    }
}

impl From<HashMap<String, usize>> for Composition {
    fn from(counts: HashMap<String, usize>) -> Self {
        Self { counts }
    }
}

/// as with `HashMap`, a recurring symbol keeps the last count
impl<'a> FromIterator<(&'a str, usize)> for Composition {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        Self {
            counts: iter
                .into_iter()
                .map(|(symbol, count)| (symbol.to_string(), count))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sums_recurring_symbols() {
        let mut c = Composition::new();
        assert_eq!(c.add("C", 5), Some(()));
        assert_eq!(c.add("H", 6), Some(()));
        assert_eq!(c.add("H", 1), Some(()));
        assert_eq!(c.get("H"), Some(7));
        assert_eq!(c.get("C"), Some(5));
        assert_eq!(c.get("O"), None);
        assert_eq!(c.total_atoms(), 12);
    }

    #[test]
    fn test_add_overflow_keeps_count() {
        let mut c = Composition::new();
        assert_eq!(c.add("H", usize::MAX), Some(()));
        assert_eq!(c.add("H", 1), None);
        assert_eq!(c.get("H"), Some(usize::MAX));
    }

    #[test]
    fn test_merge_scaled_drains_group() {
        let mut parent: Composition = [("Ca", 1)].into_iter().collect();
        let mut group: Composition = [("O", 1), ("H", 1)].into_iter().collect();
        assert_eq!(parent.merge_scaled(&mut group, 2), Some(()));
        assert!(group.is_empty());
        let expected: Composition = [("Ca", 1), ("O", 2), ("H", 2)].into_iter().collect();
        assert_eq!(parent, expected);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let c: Composition = [("H", 2)].into_iter().collect();
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"H":2}"#);
        let back: Composition = serde_json::from_str(r#"{"H":2}"#).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_pretty_print() {
        let c: Composition = [("H", 2), ("O", 1)].into_iter().collect();
        let table = c.pretty_print().unwrap();
        // header + two elements + total
        assert_eq!(table.len(), 4);
        let unknown: Composition = [("Xx", 1)].into_iter().collect();
        assert_eq!(
            unknown.pretty_print().err(),
            Some(ChemError::UnknownElement("Xx".to_string()))
        );
    }
}
