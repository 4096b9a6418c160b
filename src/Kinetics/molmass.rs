//! # Molar Mass Module
//!
//! Calculates the atomic composition and molar mass of a chemical formula.
//! Formulas may contain nested brackets with trailing stoichiometric
//! multipliers, e.g. `Na(NO3)2`, and phase marks like `(G)` or `(S)` which are
//! stripped before parsing.
//!
//! # Examples
//! ```
//! use KnightShock::Kinetics::molmass::molar_mass;
//! let (mw, composition) = molar_mass("CH4").unwrap();
//! assert!((mw - 16.043).abs() < 1e-3);
//! assert_eq!(composition.get("H"), Some(&4));
//! ```
use std::collections::HashMap;
use thiserror::Error;

pub struct Element {
    name: &'static str,
    atomic_mass: f64,
}

// Atomic masses in kg/kmol (g/mol). Species encountered in shock tube work
// are light, so the table stops after the first few rows of the periodic table
// plus a handful of heavier elements seen in bath gases and dopants.
const ELEMENTS: &[Element] = &[
    Element {
        name: "H",
        atomic_mass: 1.008,
    },
    Element {
        name: "He",
        atomic_mass: 4.0026,
    },
    Element {
        name: "Li",
        atomic_mass: 6.94,
    },
    Element {
        name: "B",
        atomic_mass: 10.81,
    },
    Element {
        name: "C",
        atomic_mass: 12.011,
    },
    Element {
        name: "N",
        atomic_mass: 14.007,
    },
    Element {
        name: "O",
        atomic_mass: 15.999,
    },
    Element {
        name: "F",
        atomic_mass: 18.998,
    },
    Element {
        name: "Ne",
        atomic_mass: 20.18,
    },
    Element {
        name: "Na",
        atomic_mass: 22.99,
    },
    Element {
        name: "Mg",
        atomic_mass: 24.305,
    },
    Element {
        name: "Al",
        atomic_mass: 26.98,
    },
    Element {
        name: "Si",
        atomic_mass: 28.085,
    },
    Element {
        name: "P",
        atomic_mass: 30.974,
    },
    Element {
        name: "S",
        atomic_mass: 32.065,
    },
    Element {
        name: "Cl",
        atomic_mass: 35.45,
    },
    Element {
        name: "Ar",
        atomic_mass: 39.948,
    },
    Element {
        name: "K",
        atomic_mass: 39.102,
    },
    Element {
        name: "Ca",
        atomic_mass: 40.08,
    },
    Element {
        name: "Kr",
        atomic_mass: 83.798,
    },
    Element {
        name: "Xe",
        atomic_mass: 131.293,
    },
];

/// Errors produced while parsing a chemical formula.
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Unexpected character '{0}' in formula")]
    UnexpectedChar(char),
    #[error("Unbalanced brackets in formula")]
    UnbalancedBrackets,
    #[error("Empty formula")]
    EmptyFormula,
}

fn atomic_mass_of(symbol: &str) -> Option<f64> {
    ELEMENTS
        .iter()
        .find(|e| e.name == symbol)
        .map(|e| e.atomic_mass)
}

fn filter_phase_marks(formula: &str) -> String {
    let mut formula = formula.to_string();
    let phases = ["(C)", "(c)", "(L)", "(l)", "(G)", "(g)", "(S)", "(s)"];
    for phase in phases {
        formula = formula.replace(phase, "");
    }
    formula
}

// Species names in mechanisms are conventionally uppercase ("AR", "HE"),
// while element symbols are proper case. Known noble gas names are rewritten
// before parsing so that "AR" is argon rather than a parse failure.
fn canonicalize(formula: &str) -> String {
    match formula {
        "AR" => "Ar".to_string(),
        "HE" => "He".to_string(),
        "NE" => "Ne".to_string(),
        "KR" => "Kr".to_string(),
        "XE" => "Xe".to_string(),
        other => other.to_string(),
    }
}

/// Parses a chemical formula and returns a map of element symbols to their
/// counts. Brackets may be nested: `Ca(NO3)2` gives `{Ca: 1, N: 2, O: 6}`.
pub fn parse_formula(formula: &str) -> Result<HashMap<String, usize>, FormulaError> {
    let formula = canonicalize(&filter_phase_marks(formula).replace(" ", ""));
    if formula.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }
    let chars: Vec<char> = formula.chars().collect();
    let (counts, end) = parse_group(&chars, 0)?;
    if end != chars.len() {
        return Err(FormulaError::UnbalancedBrackets);
    }
    Ok(counts)
}

// Parses a bracket-free run of element symbols or a bracketed group, starting
// at position `i`. Returns the composition and the position after the group.
fn parse_group(
    chars: &[char],
    mut i: usize,
) -> Result<(HashMap<String, usize>, usize), FormulaError> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    while i < chars.len() {
        let c = chars[i];
        if c == '(' {
            let (inner, after) = parse_group(chars, i + 1)?;
            if after >= chars.len() || chars[after] != ')' {
                return Err(FormulaError::UnbalancedBrackets);
            }
            i = after + 1;
            let (mult, next) = read_count(chars, i);
            i = next;
            for (elem, n) in inner {
                *counts.entry(elem).or_insert(0) += n * mult;
            }
        } else if c == ')' {
            return Ok((counts, i));
        } else if c.is_ascii_uppercase() {
            let mut symbol = c.to_string();
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                symbol.push(chars[i]);
                i += 1;
            }
            if atomic_mass_of(&symbol).is_none() {
                return Err(FormulaError::UnknownElement(symbol));
            }
            let (n, next) = read_count(chars, i);
            i = next;
            *counts.entry(symbol).or_insert(0) += n;
        } else {
            return Err(FormulaError::UnexpectedChar(c));
        }
    }
    Ok((counts, i))
}

fn read_count(chars: &[char], mut i: usize) -> (usize, usize) {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        (1, i)
    } else {
        let n: usize = chars[start..i]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(1);
        (n, i)
    }
}

/// Calculates the molar mass of a formula in kg/kmol together with its atomic
/// composition.
pub fn molar_mass(formula: &str) -> Result<(f64, HashMap<String, usize>), FormulaError> {
    let composition = parse_formula(formula)?;
    let mut mw = 0.0;
    for (elem, n) in composition.iter() {
        let mass =
            atomic_mass_of(elem).ok_or_else(|| FormulaError::UnknownElement(elem.clone()))?;
        mw += mass * (*n as f64);
    }
    Ok((mw, composition))
}

/// Molar masses for a vector of formulas, in the input order.
pub fn molar_mass_of_vector_of_subs(formulas: &[String]) -> Result<Vec<f64>, FormulaError> {
    formulas
        .iter()
        .map(|f| molar_mass(f).map(|(mw, _)| mw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_formula() {
        let counts = parse_formula("C6H8O6").unwrap();
        assert_eq!(counts.get("C"), Some(&6));
        assert_eq!(counts.get("H"), Some(&8));
        assert_eq!(counts.get("O"), Some(&6));
    }

    #[test]
    fn test_brackets() {
        let counts = parse_formula("Ca(NO3)2").unwrap();
        assert_eq!(counts.get("Ca"), Some(&1));
        assert_eq!(counts.get("N"), Some(&2));
        assert_eq!(counts.get("O"), Some(&6));
    }

    #[test]
    fn test_molar_mass() {
        let (mw, _) = molar_mass("CH4").unwrap();
        assert_relative_eq!(mw, 16.043, epsilon = 1e-3);
        let (mw, _) = molar_mass("H2O").unwrap();
        assert_relative_eq!(mw, 18.015, epsilon = 1e-3);
    }

    #[test]
    fn test_uppercase_noble_gases() {
        let (mw, _) = molar_mass("AR").unwrap();
        assert_relative_eq!(mw, 39.948, epsilon = 1e-6);
        let (mw, _) = molar_mass("HE").unwrap();
        assert_relative_eq!(mw, 4.0026, epsilon = 1e-6);
    }

    #[test]
    fn test_phase_marks() {
        let (mw, _) = molar_mass("H2O(G)").unwrap();
        assert_relative_eq!(mw, 18.015, epsilon = 1e-3);
    }

    #[test]
    fn test_unknown_element() {
        assert!(molar_mass("Zz2").is_err());
    }

    #[test]
    fn test_vector_of_subs() {
        let subs = vec!["O2".to_string(), "N2".to_string()];
        let mws = molar_mass_of_vector_of_subs(&subs).unwrap();
        assert_relative_eq!(mws[0], 31.998, epsilon = 1e-3);
        assert_relative_eq!(mws[1], 28.014, epsilon = 1e-3);
    }
}
