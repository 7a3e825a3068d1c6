use std::ops::Deref;

use crate::support::constraint::{Constrained, ConstraintResult, StrictlyPositive};
use uom::si::{f64::Mass, mass::gram};

/// Structural dry mass (`mstruct`) of an organ or element.
///
/// The value must be strictly positive, since every kinetic law divides by it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct StructuralMass(Constrained<Mass, StrictlyPositive>);

impl StructuralMass {
    /// Create a [`StructuralMass`] from a scalar value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is not strictly positive.
    pub fn new<U>(value: f64) -> ConstraintResult<Self>
    where
        U: uom::si::mass::Unit + uom::Conversion<f64, T = f64>,
    {
        Self::from_quantity(Mass::new::<U>(value))
    }

    /// Create a [`StructuralMass`] from a mass quantity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the quantity is not strictly positive.
    pub fn from_quantity(quantity: Mass) -> ConstraintResult<Self> {
        Ok(Self(StrictlyPositive::new(quantity)?))
    }

    /// Returns the mass in grams, the unit used by all kinetic laws.
    #[must_use]
    pub fn grams(&self) -> f64 {
        self.0.as_ref().get::<gram>()
    }
}

impl Deref for StructuralMass {
    type Target = Mass;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::mass::milligram;

    use super::*;
    use crate::support::constraint::ConstraintError;

    #[test]
    fn converts_to_grams() -> ConstraintResult<()> {
        let mstruct = StructuralMass::new::<milligram>(50.0)?;
        assert_relative_eq!(mstruct.grams(), 0.05);
        assert_relative_eq!(mstruct.get::<milligram>(), 50.0);
        Ok(())
    }

    #[test]
    fn rejects_empty_organs() {
        assert_eq!(
            StructuralMass::new::<gram>(0.0),
            Err(ConstraintError::Zero)
        );
        assert_eq!(
            StructuralMass::new::<gram>(-0.1),
            Err(ConstraintError::Negative)
        );
    }
}
