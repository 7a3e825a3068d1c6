use super::super::state::impl_compartments;

/// Compartments of the axis phloem.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhloemCompartments {
    /// µmol C
    pub sucrose: f64,
    /// µmol N
    pub amino_acids: f64,
}

impl_compartments!(PhloemCompartments {
    sucrose => Sucrose,
    amino_acids => AminoAcids,
});

/// Transport pool shared by all organs of an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phloem {
    pub compartments: PhloemCompartments,
}

impl Phloem {
    #[must_use]
    pub fn new(compartments: PhloemCompartments) -> Self {
        Self { compartments }
    }

    /// Sucrose balance over all contributors of the axis (µmol C).
    ///
    /// Contributors must be complete and listed once each.
    #[must_use]
    pub fn sucrose_derivative(contributors: &[PhloemContributor]) -> f64 {
        contributors.iter().map(PhloemContributor::sucrose).sum()
    }

    /// Amino-acid balance over all contributors of the axis (µmol N).
    ///
    /// Contributors must be complete and listed once each.
    #[must_use]
    pub fn amino_acids_derivative(contributors: &[PhloemContributor]) -> f64 {
        contributors.iter().map(PhloemContributor::amino_acids).sum()
    }

    #[must_use]
    pub fn derivatives(contributors: &[PhloemContributor]) -> PhloemCompartments {
        PhloemCompartments {
            sucrose: Self::sucrose_derivative(contributors),
            amino_acids: Self::amino_acids_derivative(contributors),
        }
    }
}

/// Read-only view of the phloem pools seen by the organs of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhloemView {
    /// µmol C
    pub sucrose: f64,
    /// µmol N
    pub amino_acids: f64,
    /// Structural mass of the whole axis (g).
    pub mstruct_axis: f64,
    /// Fraction of the axis structural mass holding phloem substrates.
    pub alpha_axis: f64,
}

impl PhloemView {
    /// Sucrose per gram of metabolically active axis mass.
    #[must_use]
    pub fn sucrose_concentration(&self) -> f64 {
        self.sucrose / (self.mstruct_axis * self.alpha_axis)
    }

    /// Amino acids per gram of metabolically active axis mass.
    #[must_use]
    pub fn amino_acids_concentration(&self) -> f64 {
        self.amino_acids / (self.mstruct_axis * self.alpha_axis)
    }

    /// Amino acids carried per unit of sucrose, or `None` without sucrose.
    #[must_use]
    pub fn amino_acids_per_sucrose(&self) -> Option<f64> {
        (self.sucrose > 0.0).then(|| self.amino_acids / self.sucrose)
    }
}

/// An organ exchanging with the phloem, reduced to the fluxes the phloem needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhloemContributor {
    /// An element loading into the phloem.
    Element {
        sucrose_loading: f64,
        amino_acids_loading: f64,
    },
    /// Grains drawing sucrose for structure and starch, and amino acids for proteins.
    Grains {
        structure_synthesis: f64,
        starch_synthesis: f64,
        structural_dry_mass: f64,
        proteins_synthesis: f64,
    },
    /// Roots unloading per gram of structural mass.
    Roots {
        sucrose_unloading: f64,
        amino_acids_unloading: f64,
        mstruct: f64,
        alpha: f64,
    },
    /// A hidden zone unloading whole amounts.
    HiddenZone {
        sucrose_unloading: f64,
        amino_acids_unloading: f64,
    },
}

impl PhloemContributor {
    /// Signed sucrose contribution to the phloem (µmol C).
    #[must_use]
    pub fn sucrose(&self) -> f64 {
        match *self {
            Self::Element {
                sucrose_loading, ..
            } => sucrose_loading,
            Self::Grains {
                structure_synthesis,
                starch_synthesis,
                structural_dry_mass,
                ..
            } => -(structure_synthesis + starch_synthesis * structural_dry_mass),
            Self::Roots {
                sucrose_unloading,
                mstruct,
                alpha,
                ..
            } => -sucrose_unloading * mstruct * alpha,
            Self::HiddenZone {
                sucrose_unloading, ..
            } => -sucrose_unloading,
        }
    }

    /// Signed amino-acid contribution to the phloem (µmol N).
    #[must_use]
    pub fn amino_acids(&self) -> f64 {
        match *self {
            Self::Element {
                amino_acids_loading,
                ..
            } => amino_acids_loading,
            Self::Grains {
                proteins_synthesis, ..
            } => -proteins_synthesis,
            Self::Roots {
                amino_acids_unloading,
                mstruct,
                alpha,
                ..
            } => -amino_acids_unloading * mstruct * alpha,
            Self::HiddenZone {
                amino_acids_unloading,
                ..
            } => -amino_acids_unloading,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sums_signed_contributions() {
        let contributors = [
            PhloemContributor::Element {
                sucrose_loading: 120.0,
                amino_acids_loading: 12.0,
            },
            PhloemContributor::Element {
                sucrose_loading: -20.0,
                amino_acids_loading: 3.0,
            },
            PhloemContributor::Grains {
                structure_synthesis: 10.0,
                starch_synthesis: 4.0,
                structural_dry_mass: 2.5,
                proteins_synthesis: 1.0,
            },
            PhloemContributor::Roots {
                sucrose_unloading: 30.0,
                amino_acids_unloading: 2.0,
                mstruct: 0.5,
                alpha: 1.0,
            },
            PhloemContributor::HiddenZone {
                sucrose_unloading: 15.0,
                amino_acids_unloading: 4.0,
            },
        ];

        let d = Phloem::derivatives(&contributors);
        assert_relative_eq!(d.sucrose, 120.0 - 20.0 - 20.0 - 15.0 - 15.0);
        assert_relative_eq!(d.amino_acids, 12.0 + 3.0 - 1.0 - 1.0 - 4.0);
    }

    #[test]
    fn no_contributors_means_no_change() {
        assert_eq!(Phloem::derivatives(&[]), PhloemCompartments::default());
    }

    #[test]
    fn ratio_requires_sucrose() {
        let view = |sucrose| PhloemView {
            sucrose,
            amino_acids: 50.0,
            mstruct_axis: 2.0,
            alpha_axis: 1.0,
        };
        assert_eq!(view(0.0).amino_acids_per_sucrose(), None);
        assert_eq!(view(200.0).amino_acids_per_sucrose(), Some(0.25));
        assert_relative_eq!(view(200.0).sucrose_concentration(), 100.0);
    }
}
