use uom::si::{
    amount_of_substance::micromole,
    f64::{AmountOfSubstance, Mass, MolarMass},
};

/// Extension trait for converting element masses to and from micromoles.
pub trait MolarConversion: Sized {
    /// Returns the amount, in micromoles, of `self` for the given molar mass.
    fn to_micromoles(self, molar_mass: MolarMass) -> f64;

    /// Returns the mass of `micromoles` of an element with the given molar mass.
    fn from_micromoles(micromoles: f64, molar_mass: MolarMass) -> Self;
}

impl MolarConversion for Mass {
    fn to_micromoles(self, molar_mass: MolarMass) -> f64 {
        let amount: AmountOfSubstance = self / molar_mass;
        amount.get::<micromole>()
    }

    fn from_micromoles(micromoles: f64, molar_mass: MolarMass) -> Self {
        AmountOfSubstance::new::<micromole>(micromoles) * molar_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{mass::gram, molar_mass::gram_per_mole};

    #[test]
    fn carbon_roundtrip() {
        let carbon = MolarMass::new::<gram_per_mole>(12.0);
        let mass = Mass::from_micromoles(5_000.0, carbon);

        assert_relative_eq!(mass.get::<gram>(), 0.06, epsilon = 1e-12);
        assert_relative_eq!(mass.to_micromoles(carbon), 5_000.0, epsilon = 1e-9);
    }
}
