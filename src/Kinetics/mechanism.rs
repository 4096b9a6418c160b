//! # Reaction Mechanism Module
//!
//! Elementary irreversible reactions with simple Arrhenius kinetics
//! `k(T) = A * T^n * exp(-E/(R*T))`. The module takes a vector of reaction
//! equations given as strings and produces:
//! 1) the vector of species in first-appearance order
//! 2) the stoichiometric matrix (reactions x species, products minus reagents)
//! 3) the matrix of reagent orders used in the rate law
//! 4) numeric and symbolic rate constants and rates of progress
//!
//! Equations are written `aA + bB => cC + dD`; `=` is accepted as well.
//! Stoichiometric prefixes may be integer or decimal (`1.5O2`).
use crate::constants::R;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MechanismError {
    #[error("Empty mechanism: no reactions given")]
    EmptyMechanism,
    #[error("Malformed reaction equation '{0}'")]
    MalformedEquation(String),
    #[error("Malformed term '{1}' in reaction '{0}'")]
    MalformedTerm(String, String),
    #[error("Reaction '{0}' has no reagents or no products")]
    OneSidedReaction(String),
}

/// Elementary reaction with Arrhenius parameters.
///
/// `A` has units matching the overall reaction order, `E` is in J/mol and `Q`
/// is the heat release per mole of reaction progress [J/mol], positive
/// exothermic.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElemReact {
    /// Chemical equation (e.g., "A + B => C + D")
    pub eq: String,
    /// Pre-exponential factor
    pub A: f64,
    /// Temperature exponent (dimensionless)
    pub n: f64,
    /// Activation energy (J/mol)
    pub E: f64,
    /// Heat of reaction (J/mol), positive exothermic
    pub Q: f64,
}

impl ElemReact {
    /// Numeric rate constant at temperature `T` [K].
    pub fn k_const(&self, temp: f64) -> f64 {
        self.A * temp.powf(self.n) * f64::exp(-self.E / (R * temp))
    }

    /// Symbolic rate constant as a function of the given temperature variable.
    pub fn k_expr(&self, temp: Expr) -> Expr {
        let mut k = Expr::Const(self.A);
        if self.n != 0.0 {
            k = k * temp.clone().pow(Expr::Const(self.n));
        }
        if self.E != 0.0 {
            let r_sym = Expr::Const(R);
            k = k * (-(Expr::Const(self.E) / (r_sym * temp))).exp();
        }
        k
    }
}

/// One side of a parsed reaction equation: (coefficient, species) pairs.
type Side = Vec<(f64, String)>;

fn parse_side(eq: &str, side: &str) -> Result<Side, MechanismError> {
    let term_re = Regex::new(r"^([0-9]*\.?[0-9]*)\s*([A-Za-z][A-Za-z0-9]*)$").unwrap();
    let mut parsed = Vec::new();
    for term in side.split('+') {
        let term = term.trim();
        if term.is_empty() {
            return Err(MechanismError::MalformedTerm(
                eq.to_string(),
                term.to_string(),
            ));
        }
        let caps = term_re
            .captures(term)
            .ok_or_else(|| MechanismError::MalformedTerm(eq.to_string(), term.to_string()))?;
        let coeff_str = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let coeff: f64 = if coeff_str.is_empty() {
            1.0
        } else {
            coeff_str.parse().map_err(|_| {
                MechanismError::MalformedTerm(eq.to_string(), term.to_string())
            })?
        };
        let name = caps.get(2).unwrap().as_str().to_uppercase();
        parsed.push((coeff, name));
    }
    Ok(parsed)
}

/// Splits a reaction equation into reagent and product sides.
pub fn parse_equation(eq: &str) -> Result<(Side, Side), MechanismError> {
    let (lhs, rhs) = if let Some((l, r)) = eq.split_once("=>") {
        (l, r)
    } else if let Some((l, r)) = eq.split_once('=') {
        (l, r)
    } else {
        return Err(MechanismError::MalformedEquation(eq.to_string()));
    };
    let reagents = parse_side(eq, lhs)?;
    let products = parse_side(eq, rhs)?;
    if reagents.is_empty() || products.is_empty() {
        return Err(MechanismError::OneSidedReaction(eq.to_string()));
    }
    Ok((reagents, products))
}

/// A set of elementary reactions with the derived stoichiometry.
#[derive(Debug, Clone)]
pub struct ReactionMech {
    pub reactions: Vec<ElemReact>,
    /// species in first-appearance order, uppercase
    pub substances: Vec<String>,
    /// reactions x species, products minus reagents
    pub stoich_matrix: DMatrix<f64>,
    /// reactions x species, reagent coefficients (rate law orders)
    pub reag_orders: DMatrix<f64>,
}

impl ReactionMech {
    pub fn new(reactions: Vec<ElemReact>) -> Result<Self, MechanismError> {
        if reactions.is_empty() {
            return Err(MechanismError::EmptyMechanism);
        }
        let mut substances: Vec<String> = Vec::new();
        let mut sides: Vec<(Side, Side)> = Vec::new();
        for react in &reactions {
            let (reagents, products) = parse_equation(&react.eq)?;
            for (_, name) in reagents.iter().chain(products.iter()) {
                if !substances.contains(name) {
                    substances.push(name.clone());
                }
            }
            sides.push((reagents, products));
        }
        let k = reactions.len();
        let n = substances.len();
        let mut stoich_matrix = DMatrix::zeros(k, n);
        let mut reag_orders = DMatrix::zeros(k, n);
        for (j, (reagents, products)) in sides.iter().enumerate() {
            for (coeff, name) in reagents {
                let i = substances.iter().position(|s| s == name).unwrap();
                stoich_matrix[(j, i)] -= coeff;
                reag_orders[(j, i)] += coeff;
            }
            for (coeff, name) in products {
                let i = substances.iter().position(|s| s == name).unwrap();
                stoich_matrix[(j, i)] += coeff;
            }
        }
        Ok(Self {
            reactions,
            substances,
            stoich_matrix,
            reag_orders,
        })
    }

    pub fn number_of_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn number_of_substances(&self) -> usize {
        self.substances.len()
    }

    /// Symbolic rate of progress of reaction `j`:
    /// `R_j = k_j(T) * prod_i C_i^nu_ij` over the reagents, with species
    /// concentrations as variables named after the species.
    pub fn rate_expr(&self, j: usize, temp_var: &str) -> Expr {
        let temp = Expr::Var(temp_var.to_string());
        let mut rate = self.reactions[j].k_expr(temp);
        for (i, name) in self.substances.iter().enumerate() {
            let order = self.reag_orders[(j, i)];
            if order == 0.0 {
                continue;
            }
            let conc = Expr::Var(name.clone());
            if order == 1.0 {
                rate = rate * conc;
            } else {
                rate = rate * conc.pow(Expr::Const(order));
            }
        }
        rate
    }

    /// Numeric rate of progress of reaction `j` at temperature `temp` and
    /// concentrations `conc` (species order of `self.substances`).
    pub fn rate_const(&self, j: usize, temp: f64, conc: &[f64]) -> f64 {
        let mut rate = self.reactions[j].k_const(temp);
        for (i, c) in conc.iter().enumerate() {
            let order = self.reag_orders[(j, i)];
            if order != 0.0 {
                rate *= c.powf(order);
            }
        }
        rate
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new("A"),
            Cell::new("n"),
            Cell::new("E, J/mol"),
            Cell::new("Q, J/mol"),
        ]));
        for react in &self.reactions {
            table.add_row(Row::new(vec![
                Cell::new(&react.eq),
                Cell::new(&format!("{:.3e}", react.A)),
                Cell::new(&format!("{}", react.n)),
                Cell::new(&format!("{}", react.E)),
                Cell::new(&format!("{}", react.Q)),
            ]));
        }
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_step() -> ReactionMech {
        ReactionMech::new(vec![
            ElemReact {
                eq: "A=>B".to_string(),
                A: 1e10,
                n: 0.0,
                E: 50000.0,
                Q: 100000.0,
            },
            ElemReact {
                eq: "B=>A+2C".to_string(),
                A: 1e8,
                n: 0.5,
                E: 30000.0,
                Q: -50000.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_substances_first_appearance_order() {
        let mech = two_step();
        assert_eq!(
            mech.substances,
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_stoich_matrix() {
        let mech = two_step();
        // A=>B: [-1, 1, 0]
        assert_relative_eq!(mech.stoich_matrix[(0, 0)], -1.0);
        assert_relative_eq!(mech.stoich_matrix[(0, 1)], 1.0);
        assert_relative_eq!(mech.stoich_matrix[(0, 2)], 0.0);
        // B=>A+2C: [1, -1, 2]
        assert_relative_eq!(mech.stoich_matrix[(1, 0)], 1.0);
        assert_relative_eq!(mech.stoich_matrix[(1, 1)], -1.0);
        assert_relative_eq!(mech.stoich_matrix[(1, 2)], 2.0);
    }

    #[test]
    fn test_reag_orders() {
        let mech = two_step();
        assert_relative_eq!(mech.reag_orders[(0, 0)], 1.0);
        assert_relative_eq!(mech.reag_orders[(0, 1)], 0.0);
        assert_relative_eq!(mech.reag_orders[(1, 1)], 1.0);
    }

    #[test]
    fn test_decimal_coefficients() {
        let (reagents, products) = parse_equation("CH4 + 1.5O2 => CO + 2H2O").unwrap();
        assert_relative_eq!(reagents[1].0, 1.5);
        assert_eq!(reagents[1].1, "O2");
        assert_relative_eq!(products[1].0, 2.0);
    }

    #[test]
    fn test_k_const() {
        let react = ElemReact {
            eq: "A=>B".to_string(),
            A: 1e10,
            n: 0.0,
            E: 50000.0,
            Q: 0.0,
        };
        let expected = 1e10 * f64::exp(-50000.0 / (R * 1500.0));
        assert_relative_eq!(react.k_const(1500.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_activation_energy() {
        let react = ElemReact {
            eq: "A=>B".to_string(),
            A: 100.0,
            n: 0.0,
            E: 0.0,
            Q: 0.0,
        };
        assert_relative_eq!(react.k_const(300.0), 100.0, max_relative = 1e-12);
        assert_relative_eq!(react.k_const(3000.0), 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rate_const_first_order() {
        let mech = two_step();
        let conc = [2.0, 0.0, 0.0];
        let expected = 2.0 * mech.reactions[0].k_const(1200.0);
        assert_relative_eq!(
            mech.rate_const(0, 1200.0, &conc),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_malformed_equations() {
        assert!(parse_equation("A + B").is_err());
        assert!(parse_equation("=> B").is_err());
        assert!(parse_equation("A + => B").is_err());
        assert!(ReactionMech::new(vec![]).is_err());
    }
}
