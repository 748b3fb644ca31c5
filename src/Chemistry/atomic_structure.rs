//! Atomic structure arithmetic: particle counts, ion kind, average atomic mass, bond order.
use crate::Chemistry::atomic_weights::element;
use crate::Chemistry::chem_error::ChemError;

const MAX_PROTONS: u32 = 118;
const MAX_NEUTRONS: u32 = 177;
const MAX_ISOTOPES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonKind {
    Neutral,
    Cation,
    Anion,
}

fn check_protons(protons: u32) -> Result<(), ChemError> {
    if !(1..=MAX_PROTONS).contains(&protons) {
        return Err(ChemError::InvalidInput(format!(
            "invalid number of protons: {}",
            protons
        )));
    }
    Ok(())
}

/// neutral atom, cation or anion by its proton and electron counts
pub fn ion_kind(protons: u32, electrons: u32) -> Result<IonKind, ChemError> {
    check_protons(protons)?;
    Ok(match protons.cmp(&electrons) {
        std::cmp::Ordering::Equal => IonKind::Neutral,
        std::cmp::Ordering::Greater => IonKind::Cation,
        std::cmp::Ordering::Less => IonKind::Anion,
    })
}

/// number of protons equals the atomic number
pub fn protons(atomic_number: u32) -> u32 {
    atomic_number
}

pub fn atomic_number(protons: u32) -> u32 {
    protons
}

pub fn neutrons(atomic_mass: f64, atomic_number: u32) -> f64 {
    atomic_mass - atomic_number as f64
}

/// estimated neutron count of an element from its standard atomic weight
pub fn neutrons_of_element(symbol: &str) -> Result<f64, ChemError> {
    let e = element(symbol)?;
    Ok(neutrons(e.atomic_mass, e.atomic_number as u32))
}

pub fn electrons(atomic_number: u32, charge: f64) -> f64 {
    atomic_number as f64 - charge
}

pub fn neutral_electrons(atomic_number: u32) -> f64 {
    electrons(atomic_number, 0.0)
}

pub fn charge(protons: u32, electrons: u32) -> i64 {
    protons as i64 - electrons as i64
}

/// mass number A = Z + N
pub fn mass_number(protons: u32, neutrons: u32) -> Result<u32, ChemError> {
    check_protons(protons)?;
    if !(1..=MAX_NEUTRONS).contains(&neutrons) {
        return Err(ChemError::InvalidInput(format!(
            "invalid number of neutrons: {}",
            neutrons
        )));
    }
    Ok(protons + neutrons)
}

/// average atomic mass from (isotope mass, natural abundance in %) pairs
pub fn average_atomic_mass(isotopes: &[(f64, f64)]) -> Result<f64, ChemError> {
    if isotopes.is_empty() || isotopes.len() > MAX_ISOTOPES {
        return Err(ChemError::InvalidInput(format!(
            "expected 1 to {} isotopes, got {}",
            MAX_ISOTOPES,
            isotopes.len()
        )));
    }
    let sum: f64 = isotopes
        .iter()
        .map(|(mass, abundance)| mass * abundance)
        .sum();
    Ok(sum / 100.0)
}

pub fn bond_order(bonding_electrons: i32, antibonding_electrons: i32) -> Result<i32, ChemError> {
    if bonding_electrons < 0 || antibonding_electrons < 0 {
        return Err(ChemError::InvalidInput(
            "electron counts must be non-negative".to_string(),
        ));
    }
    if bonding_electrons < antibonding_electrons {
        return Err(ChemError::InvalidInput(
            "there are always more bonding electrons than antibonding electrons".to_string(),
        ));
    }
    Ok((bonding_electrons - antibonding_electrons) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ion_kind() {
        assert_eq!(ion_kind(11, 11), Ok(IonKind::Neutral));
        assert_eq!(ion_kind(11, 10), Ok(IonKind::Cation));
        assert_eq!(ion_kind(17, 18), Ok(IonKind::Anion));
        assert!(ion_kind(0, 0).is_err());
        assert!(ion_kind(119, 119).is_err());
    }

    #[test]
    fn test_particle_counts() {
        assert_eq!(protons(8), 8);
        assert_eq!(atomic_number(26), 26);
        assert_relative_eq!(neutrons(15.999, 8), 7.999, epsilon = 1e-9);
        assert_relative_eq!(neutrons_of_element("Na").unwrap(), 11.98976928, epsilon = 1e-9);
        assert!(neutrons_of_element("Qq").is_err());
        assert_relative_eq!(electrons(12, 2.0), 10.0);
        assert_relative_eq!(neutral_electrons(12), 12.0);
        assert_eq!(charge(12, 10), 2);
        assert_eq!(charge(17, 18), -1);
    }

    #[test]
    fn test_mass_number() {
        assert_eq!(mass_number(6, 6), Ok(12));
        assert!(mass_number(6, 0).is_err());
        assert!(mass_number(6, 178).is_err());
        assert!(mass_number(0, 6).is_err());
    }

    #[test]
    fn test_average_atomic_mass() {
        // chlorine: 35Cl 75.78 %, 37Cl 24.22 %
        let cl = average_atomic_mass(&[(34.96885, 75.78), (36.96590, 24.22)]).unwrap();
        assert_relative_eq!(cl, 35.45, epsilon = 1e-2);
        assert!(average_atomic_mass(&[]).is_err());
        assert!(average_atomic_mass(&[(1.0, 10.0); 11]).is_err());
    }

    #[test]
    fn test_bond_order() {
        // O2: 10 bonding, 6 antibonding
        assert_eq!(bond_order(10, 6), Ok(2));
        assert_eq!(bond_order(8, 2), Ok(3));
        assert!(bond_order(-1, 0).is_err());
        assert!(bond_order(2, 4).is_err());
    }
}
