/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use KnightShock::Kinetics::molmass::molar_mass;
/// let (mw, composition) = molar_mass("C6H8O6").unwrap();
/// println!("Element counts: {:?}", composition);
/// println!("Molar mass: {:?} g/mol", mw);
/// ```
pub mod molmass;
/// The module takes a mixture specification - either a string like
/// "CH4: 0.04, O2: 0.08, AR: 0.88" or a map of species to amounts - and
/// produces a canonical mixture: uppercase species names, summed duplicates,
/// normalized mole fractions and the mean molar mass.
pub mod mixture;
/// Frozen-chemistry heat capacities and specific heat ratios from a built-in
/// NASA polynomial table of common shock tube species.
pub mod thermo;
/// The module takes a vector of reaction equations given as strings together
/// with Arrhenius parameters and produces the following data:
/// 1) the vector of species in first-appearance order
/// 2) the stoichiometric matrix (products minus reagents)
/// 3) the matrix of reagent orders for the rate laws
/// 4) numeric and symbolic rate constants and rates of progress
pub mod mechanism;
/// Zero-dimensional constant-volume adiabatic reactor: the workhorse of
/// ignition delay simulations behind the reflected shock.
pub mod reactor;
/// Parallel parameter studies over (mechanism, T, P, mixture) grids.
pub mod pool;
