use uom::si::{
    f64::{Mass, Time},
    mass::gram,
    time::second,
};

use crate::support::{kinetics::michaelis_menten, units::MolarConversion};

use super::{
    super::{
        constants::{
            GRAIN_AMINO_ACIDS_MOLAR_MASS_N_RATIO, RATIO_C_MSTRUCT, carbon_molar_mass,
            nitrogen_molar_mass,
        },
        params::{GrainsParameters, Parameters},
        state::impl_compartments,
    },
    PhloemView,
};

/// Compartments of the grains of an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrainsCompartments {
    /// µmol C
    pub structure: f64,
    /// µmol C
    pub starch: f64,
    /// µmol N
    pub proteins: f64,
}

impl_compartments!(GrainsCompartments {
    structure => Structure,
    starch => Starch,
    proteins => Proteins,
});

/// Grains of an axis, growing in structure then filling with starch.
#[derive(Debug, Clone, PartialEq)]
pub struct Grains {
    /// Age since flowering.
    pub age_from_flowering: Time,
    /// Growth respiration charged to structure over one step (µmol C).
    pub structure_respiration: f64,
    /// Growth respiration charged to starch over one step (µmol C).
    pub starch_respiration: f64,
    pub compartments: GrainsCompartments,
    structural_dry_mass: Mass,
}

impl Grains {
    #[must_use]
    pub fn new(age_from_flowering: Time, compartments: GrainsCompartments) -> Self {
        Self {
            age_from_flowering,
            structure_respiration: 0.0,
            starch_respiration: 0.0,
            compartments,
            structural_dry_mass: structural_dry_mass(compartments.structure),
        }
    }

    /// Structural dry mass as of the last aggregation.
    #[must_use]
    pub fn structural_dry_mass(&self) -> Mass {
        self.structural_dry_mass
    }

    pub(crate) fn set_structural_dry_mass(&mut self, value: Mass) {
        self.structural_dry_mass = value;
    }

    /// Dry mass of grain proteins, assuming gluten-like amino acids.
    #[must_use]
    pub fn proteins_dry_mass(&self) -> Mass {
        Mass::from_micromoles(self.compartments.proteins, nitrogen_molar_mass())
            / GRAIN_AMINO_ACIDS_MOLAR_MASS_N_RATIO
    }

    #[must_use]
    pub fn kinetics<'a>(&self, parameters: &'a Parameters, delta_t: Time) -> GrainsKinetics<'a> {
        GrainsKinetics {
            age_from_flowering: self.age_from_flowering,
            structural_dry_mass: self.structural_dry_mass.get::<gram>(),
            delta_t: delta_t.get::<second>(),
            grains: &parameters.grains,
        }
    }
}

/// Structural dry mass of grains holding `structure` µmol C.
#[must_use]
pub fn structural_dry_mass(structure: f64) -> Mass {
    Mass::from_micromoles(structure, carbon_molar_mass()) / RATIO_C_MSTRUCT
}

/// Fluxes of the grains over one step.
///
/// Structure and protein synthesis are amounts; starch synthesis is per
/// gram of structural dry mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrainsFluxes {
    /// Relative growth rate of structure (s⁻¹).
    pub rgr_structure: f64,
    pub structure_synthesis: f64,
    pub starch_synthesis: f64,
    pub proteins_synthesis: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GrainsKinetics<'a> {
    age_from_flowering: Time,
    structural_dry_mass: f64,
    delta_t: f64,
    grains: &'a GrainsParameters,
}

impl GrainsKinetics<'_> {
    fn is_enlarging(&self) -> bool {
        self.age_from_flowering <= self.grains.filling_init
    }

    fn is_filling(&self) -> bool {
        !self.is_enlarging() && self.age_from_flowering <= self.grains.filling_end
    }

    /// Relative growth rate of structure, driven by phloem sucrose (s⁻¹).
    #[must_use]
    pub fn rgr_structure(&self, phloem: &PhloemView) -> f64 {
        michaelis_menten(
            self.grains.vmax_rgr,
            self.grains.k_rgr,
            phloem.sucrose_concentration(),
        )
    }

    /// Exponential structure growth until filling starts (µmol C).
    #[must_use]
    pub fn structure_synthesis(&self, structure: f64, rgr_structure: f64) -> f64 {
        if self.is_enlarging() {
            structure * rgr_structure * self.delta_t
        } else {
            0.0
        }
    }

    /// Starch synthesis during filling (µmol C g⁻¹).
    #[must_use]
    pub fn starch_synthesis(&self, phloem: &PhloemView) -> f64 {
        if !self.is_filling() {
            return 0.0;
        }
        michaelis_menten(
            self.grains.vmax_starch,
            self.grains.k_starch,
            phloem.sucrose_concentration(),
        ) * self.delta_t
    }

    /// Proteins from amino acids co-transported with the sucrose drawn from
    /// the phloem (µmol N).
    #[must_use]
    pub fn proteins_synthesis(
        &self,
        structure_synthesis: f64,
        starch_synthesis: f64,
        phloem: &PhloemView,
    ) -> f64 {
        phloem.amino_acids_per_sucrose().map_or(0.0, |ratio| {
            (structure_synthesis + starch_synthesis * self.structural_dry_mass) * ratio
        })
    }

    #[must_use]
    pub fn fluxes(&self, state: &GrainsCompartments, phloem: &PhloemView) -> GrainsFluxes {
        let rgr_structure = self.rgr_structure(phloem);
        let structure_synthesis = self.structure_synthesis(state.structure, rgr_structure);
        let starch_synthesis = self.starch_synthesis(phloem);
        GrainsFluxes {
            rgr_structure,
            structure_synthesis,
            starch_synthesis,
            proteins_synthesis: self.proteins_synthesis(
                structure_synthesis,
                starch_synthesis,
                phloem,
            ),
        }
    }

    #[must_use]
    pub fn structure_derivative(&self, structure_synthesis: f64, respiration: f64) -> f64 {
        structure_synthesis - respiration
    }

    #[must_use]
    pub fn starch_derivative(&self, starch_synthesis: f64, respiration: f64) -> f64 {
        starch_synthesis * self.structural_dry_mass - respiration
    }

    #[must_use]
    pub fn proteins_derivative(&self, proteins_synthesis: f64) -> f64 {
        proteins_synthesis
    }

    #[must_use]
    pub fn derivatives(
        &self,
        fluxes: &GrainsFluxes,
        structure_respiration: f64,
        starch_respiration: f64,
    ) -> GrainsCompartments {
        GrainsCompartments {
            structure: self.structure_derivative(fluxes.structure_synthesis, structure_respiration),
            starch: self.starch_derivative(fluxes.starch_synthesis, starch_respiration),
            proteins: self.proteins_derivative(fluxes.proteins_synthesis),
        }
    }

    /// Structural dry mass used to scale starch synthesis (g).
    #[must_use]
    pub fn structural_dry_mass(&self) -> f64 {
        self.structural_dry_mass
    }
}
