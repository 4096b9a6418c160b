/// Avogadro's number [molecules/mol].
pub const AVOGADRO_NUMBER: f64 = 6.02214076e23;

/// Universal gas constant [J kmol^-1 K^-1]; pairs with molar masses in kg/kmol.
pub const GAS_CONSTANT: f64 = 8.31432e3;

/// Universal gas constant [J mol^-1 K^-1]; used in Arrhenius and NASA
/// polynomial forms where activation energies are given in J/mol.
pub const R: f64 = 8.314;
