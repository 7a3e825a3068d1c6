//! Ecophysiological constants.

use uom::si::{f64::MolarMass, molar_mass::gram_per_mole};

/// Molar mass of carbon (g mol⁻¹).
pub const C_MOLAR_MASS: f64 = 12.0;

/// Molar mass of nitrogen (g mol⁻¹).
pub const N_MOLAR_MASS: f64 = 14.0;

/// Mean contribution of carbon to structural dry mass (g C g⁻¹ mstruct).
pub const RATIO_C_MSTRUCT: f64 = 0.384;

/// Mean number of mol of C in 1 mol of the major amino acids of plants
/// (Glu, Gln, Ser, Asp, Ala, Gly).
pub const AMINO_ACIDS_C_RATIO: f64 = 3.67;

/// Mean number of mol of N in 1 mol of the major amino acids of plants
/// (Glu, Gln, Ser, Asp, Ala, Gly).
pub const AMINO_ACIDS_N_RATIO: f64 = 1.17;

/// Mean contribution of N to the mass of gluten amino acids (Glu, Gln, Pro).
pub const GRAIN_AMINO_ACIDS_MOLAR_MASS_N_RATIO: f64 = 0.136;

/// Carbon consumed per unit of amino-acid nitrogen synthesized (mol C mol⁻¹ N).
#[must_use]
pub fn amino_acid_carbon_per_nitrogen() -> f64 {
    AMINO_ACIDS_C_RATIO / AMINO_ACIDS_N_RATIO
}

/// Molar mass of carbon as a [`MolarMass`].
#[must_use]
pub fn carbon_molar_mass() -> MolarMass {
    MolarMass::new::<gram_per_mole>(C_MOLAR_MASS)
}

/// Molar mass of nitrogen as a [`MolarMass`].
#[must_use]
pub fn nitrogen_molar_mass() -> MolarMass {
    MolarMass::new::<gram_per_mole>(N_MOLAR_MASS)
}
