#[allow(non_snake_case)]
pub mod Absorption;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Figures;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod ShockTube;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod constants;
