//! # Mixture Module
//!
//! Parsing and handling of gas mixture specifications. A mixture is given
//! either as a map of species to mole amounts or as a string in the
//! conventional `"CH4: 0.04, O2: 0.08, AR: 0.88"` form. A bare species name
//! (`"AR"`) is a pure gas. Species names are canonicalized to uppercase.
//!
//! # Examples
//! ```
//! use KnightShock::Kinetics::mixture::Mixture;
//! let mix = Mixture::parse("CH4: 0.05, O2: 0.10, AR: 0.85").unwrap();
//! let x = mix.mole_fractions();
//! assert!((x["AR"] - 0.85).abs() < 1e-12);
//! assert!((mix.mean_molar_mass().unwrap() - 37.96).abs() < 0.05);
//! ```
use super::molmass::{FormulaError, molar_mass};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixtureError {
    #[error("Empty mixture specification")]
    Empty,
    #[error("Malformed mixture component '{0}'; expected 'SPECIES: amount'")]
    MalformedComponent(String),
    #[error("Invalid amount '{1}' for species '{0}'")]
    InvalidAmount(String, String),
    #[error("Amount for species '{0}' must be finite and non-negative")]
    NegativeAmount(String),
    #[error("Mixture amounts sum to zero")]
    ZeroTotal,
    #[error("Molar mass of '{0}' could not be determined: {1}")]
    UnknownSpecies(String, FormulaError),
}

/// A gas mixture: species names (uppercase) with relative mole amounts.
/// Amounts need not sum to unity; [`Mixture::mole_fractions`] normalizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    /// species name -> relative mole amount, in first-appearance order
    species: Vec<(String, f64)>,
}

impl Mixture {
    /// Parses a mixture string: `"CH4: 0.04, O2: 0.08, AR: 0.88"`, with
    /// optional surrounding braces, or a bare species name for a pure gas.
    /// Duplicate species have their amounts summed.
    pub fn parse(spec: &str) -> Result<Self, MixtureError> {
        let spec = spec.replace("{", "").replace("}", "").to_uppercase();
        if spec.trim().is_empty() {
            return Err(MixtureError::Empty);
        }
        if !spec.contains(':') {
            return Self::from_components(vec![(spec.trim().to_string(), 1.0)]);
        }
        let mut components = Vec::new();
        for element in spec.split(',') {
            let mut parts = element.splitn(2, ':');
            let name = parts
                .next()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| MixtureError::MalformedComponent(element.to_string()))?;
            let amount_str = parts
                .next()
                .map(|s| s.trim())
                .ok_or_else(|| MixtureError::MalformedComponent(element.to_string()))?;
            let amount: f64 = amount_str
                .parse()
                .map_err(|_| MixtureError::InvalidAmount(name.clone(), amount_str.to_string()))?;
            components.push((name, amount));
        }
        Self::from_components(components)
    }

    /// Builds a mixture from a species -> amount map. Names are uppercased;
    /// the species order is alphabetical for reproducibility.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, MixtureError> {
        let mut components: Vec<(String, f64)> = map
            .iter()
            .map(|(name, amount)| (name.trim().to_uppercase(), *amount))
            .collect();
        components.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_components(components)
    }

    fn from_components(components: Vec<(String, f64)>) -> Result<Self, MixtureError> {
        if components.is_empty() {
            return Err(MixtureError::Empty);
        }
        let mut species: Vec<(String, f64)> = Vec::new();
        for (name, amount) in components {
            if name.is_empty() {
                return Err(MixtureError::MalformedComponent(name));
            }
            if !amount.is_finite() || amount < 0.0 {
                return Err(MixtureError::NegativeAmount(name));
            }
            match species.iter_mut().find(|(n, _)| *n == name) {
                Some((_, a)) => *a += amount,
                None => species.push((name, amount)),
            }
        }
        let total: f64 = species.iter().map(|(_, a)| a).sum();
        if total <= 0.0 {
            return Err(MixtureError::ZeroTotal);
        }
        Ok(Self { species })
    }

    /// Species names in first-appearance order.
    pub fn species_names(&self) -> Vec<String> {
        self.species.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Raw (unnormalized) amounts as a map.
    pub fn amounts(&self) -> HashMap<String, f64> {
        self.species.iter().cloned().collect()
    }

    /// Mole fractions normalized to unit sum.
    pub fn mole_fractions(&self) -> HashMap<String, f64> {
        let total: f64 = self.species.iter().map(|(_, a)| a).sum();
        self.species
            .iter()
            .map(|(n, a)| (n.clone(), a / total))
            .collect()
    }

    /// Mole fraction of a single species, zero when absent.
    pub fn mole_fraction(&self, name: &str) -> f64 {
        let name = name.trim().to_uppercase();
        let total: f64 = self.species.iter().map(|(_, a)| a).sum();
        self.species
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, a)| a / total)
            .unwrap_or(0.0)
    }

    /// Mole-fraction-weighted mean molar mass [kg/kmol].
    pub fn mean_molar_mass(&self) -> Result<f64, MixtureError> {
        let x = self.mole_fractions();
        let mut mw = 0.0;
        for (name, xi) in x.iter() {
            let (mass, _) = molar_mass(name)
                .map_err(|e| MixtureError::UnknownSpecies(name.clone(), e))?;
            mw += xi * mass;
        }
        Ok(mw)
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .species
            .iter()
            .map(|(n, a)| format!("{}: {}", n, a))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_multi_component() {
        let mix = Mixture::parse("CH4: 0.04, O2: 0.08, AR: 0.88").unwrap();
        assert_eq!(
            mix.species_names(),
            vec!["CH4".to_string(), "O2".to_string(), "AR".to_string()]
        );
        assert_relative_eq!(mix.mole_fraction("AR"), 0.88, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_pure_gas() {
        let mix = Mixture::parse(" ar ").unwrap();
        assert_relative_eq!(mix.mole_fraction("AR"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_braces_and_case() {
        let mix = Mixture::parse("{ch4: 1, o2: 2}").unwrap();
        assert_relative_eq!(mix.mole_fraction("O2"), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicates_summed() {
        let mix = Mixture::parse("AR: 0.5, AR: 0.5").unwrap();
        assert_eq!(mix.species_names().len(), 1);
        assert_relative_eq!(mix.mole_fraction("AR"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalization() {
        let mix = Mixture::parse("N2: 2, O2: 2").unwrap();
        let x = mix.mole_fractions();
        assert_relative_eq!(x["N2"], 0.5, epsilon = 1e-12);
        assert_relative_eq!(x["O2"], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert("o2".to_string(), 0.21);
        map.insert("n2".to_string(), 0.79);
        let mix = Mixture::from_map(&map).unwrap();
        assert_relative_eq!(mix.mole_fraction("O2"), 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_molar_mass_air() {
        let mix = Mixture::parse("N2: 0.79, O2: 0.21").unwrap();
        // 0.79*28.014 + 0.21*31.998
        assert_relative_eq!(mix.mean_molar_mass().unwrap(), 28.85, epsilon = 0.01);
    }

    #[test]
    fn test_errors() {
        assert!(Mixture::parse("").is_err());
        assert!(Mixture::parse("CH4: abc").is_err());
        assert!(Mixture::parse("CH4: -1").is_err());
        assert!(Mixture::parse("CH4: 0.0").is_err());
        assert!(Mixture::parse(": 1.0").is_err());
    }
}
