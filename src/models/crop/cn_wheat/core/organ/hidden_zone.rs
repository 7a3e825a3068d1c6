use uom::si::{
    f64::{Mass, Time},
    time::second,
};

use crate::support::kinetics::{end_product_inhibition, michaelis_menten, switch_off};

use super::{
    super::{
        error::TreeError,
        params::{HiddenZoneParameters, Parameters, PhotosyntheticOrganParameters},
        state::impl_compartments,
        structural_mass::StructuralMass,
    },
    PhloemView, conductance,
};

/// Compartments of a hidden zone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HiddenZoneCompartments {
    /// µmol C
    pub sucrose: f64,
    /// µmol C
    pub fructan: f64,
    /// µmol N
    pub amino_acids: f64,
    /// µmol N
    pub proteins: f64,
}

impl_compartments!(HiddenZoneCompartments {
    sucrose => Sucrose,
    fructan => Fructan,
    amino_acids => AminoAcids,
    proteins => Proteins,
});

/// Growing zone at the base of a phytomer, enclosed in older sheaths.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenZone {
    pub mstruct: StructuralMass,
    pub nstruct: Mass,
    pub compartments: HiddenZoneCompartments,
}

impl HiddenZone {
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralMass`] if `mstruct` is not strictly positive.
    pub fn new(
        mstruct: Mass,
        nstruct: Mass,
        compartments: HiddenZoneCompartments,
    ) -> Result<Self, TreeError> {
        let mstruct =
            StructuralMass::from_quantity(mstruct).map_err(|source| TreeError::StructuralMass {
                entity: "hidden zone",
                source,
            })?;
        Ok(Self {
            mstruct,
            nstruct,
            compartments,
        })
    }

    /// View of this hidden zone at the given state, as seen by exporting elements.
    #[must_use]
    pub fn view(&self, state: &HiddenZoneCompartments) -> HiddenZoneView {
        HiddenZoneView {
            sucrose: state.sucrose,
            amino_acids: state.amino_acids,
            mstruct: self.mstruct.grams(),
        }
    }

    #[must_use]
    pub fn kinetics<'a>(&self, parameters: &'a Parameters, delta_t: Time) -> HiddenZoneKinetics<'a> {
        HiddenZoneKinetics {
            mstruct: self.mstruct.grams(),
            delta_t: delta_t.get::<second>(),
            organ: &parameters.photosynthetic_organ,
            hidden_zone: &parameters.hidden_zone,
        }
    }
}

/// Read-only view of a hidden zone's pools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HiddenZoneView {
    /// µmol C
    pub sucrose: f64,
    /// µmol N
    pub amino_acids: f64,
    /// g
    pub mstruct: f64,
}

impl HiddenZoneView {
    #[must_use]
    pub fn sucrose_concentration(&self) -> f64 {
        self.sucrose / self.mstruct
    }

    #[must_use]
    pub fn amino_acids_concentration(&self) -> f64 {
        self.amino_acids / self.mstruct
    }
}

/// Fluxes of a hidden zone over one step.
///
/// Unloadings are amounts. All others are per gram of structural mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HiddenZoneFluxes {
    pub sucrose_unloading: f64,
    pub amino_acids_unloading: f64,
    pub proteins_synthesis: f64,
    pub proteins_degradation: f64,
    pub fructan_synthesis_ceiling: f64,
    pub fructan_synthesis: f64,
    pub fructan_degradation: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct HiddenZoneKinetics<'a> {
    mstruct: f64,
    delta_t: f64,
    organ: &'a PhotosyntheticOrganParameters,
    hidden_zone: &'a HiddenZoneParameters,
}

impl HiddenZoneKinetics<'_> {
    fn conductance(&self) -> f64 {
        conductance(
            self.hidden_zone.sigma,
            self.organ.beta,
            self.mstruct,
            self.delta_t,
        )
    }

    /// Sucrose moved from the phloem into the hidden zone (µmol C).
    ///
    /// Negative when the hidden zone is richer than the phloem.
    #[must_use]
    pub fn sucrose_unloading(&self, sucrose: f64, phloem: &PhloemView) -> f64 {
        (phloem.sucrose / phloem.mstruct_axis - sucrose / self.mstruct) * self.conductance()
    }

    /// Amino acids moved from the phloem into the hidden zone (µmol N).
    #[must_use]
    pub fn amino_acids_unloading(&self, amino_acids: f64, phloem: &PhloemView) -> f64 {
        (phloem.amino_acids / phloem.mstruct_axis - amino_acids / self.mstruct) * self.conductance()
    }

    /// Protein synthesis from amino acids (µmol N g⁻¹).
    #[must_use]
    pub fn proteins_synthesis(&self, amino_acids: f64) -> f64 {
        michaelis_menten(
            self.organ.vmax_s_proteins,
            self.organ.k_s_proteins,
            amino_acids / self.mstruct,
        ) * self.delta_t
    }

    /// First-order protein degradation (µmol N g⁻¹).
    #[must_use]
    pub fn proteins_degradation(&self, proteins: f64) -> f64 {
        (self.hidden_zone.delta_d_proteins * proteins / self.mstruct).max(0.0) * self.delta_t
    }

    /// Maximal rate of fructan synthesis, switched off by sucrose unloading.
    #[must_use]
    pub fn fructan_synthesis_ceiling(&self, sucrose_unloading: f64) -> f64 {
        switch_off(
            self.organ.vmax_s_fructan_pot,
            self.organ.k_regul_s_fructan,
            self.organ.n_regul_s_fructan,
            sucrose_unloading / self.mstruct / self.delta_t,
        )
    }

    /// Fructan synthesis from sucrose (µmol C g⁻¹).
    #[must_use]
    pub fn fructan_synthesis(&self, sucrose: f64, ceiling: f64) -> f64 {
        michaelis_menten(ceiling, self.organ.k_s_fructan, sucrose / self.mstruct) * self.delta_t
    }

    /// Fructan degradation inhibited by sucrose, capped by the fructan pool (µmol C g⁻¹).
    #[must_use]
    pub fn fructan_degradation(&self, sucrose: f64, fructan: f64) -> f64 {
        let potential = end_product_inhibition(
            self.organ.vmax_d_fructan,
            self.organ.k_d_fructan,
            sucrose / self.mstruct,
        ) * self.delta_t;
        potential.min(fructan.max(0.0))
    }

    #[must_use]
    pub fn fluxes(&self, state: &HiddenZoneCompartments, phloem: &PhloemView) -> HiddenZoneFluxes {
        let sucrose_unloading = self.sucrose_unloading(state.sucrose, phloem);
        let fructan_synthesis_ceiling = self.fructan_synthesis_ceiling(sucrose_unloading);
        HiddenZoneFluxes {
            sucrose_unloading,
            amino_acids_unloading: self.amino_acids_unloading(state.amino_acids, phloem),
            proteins_synthesis: self.proteins_synthesis(state.amino_acids),
            proteins_degradation: self.proteins_degradation(state.proteins),
            fructan_synthesis_ceiling,
            fructan_synthesis: self.fructan_synthesis(state.sucrose, fructan_synthesis_ceiling),
            fructan_degradation: self.fructan_degradation(state.sucrose, state.fructan),
        }
    }

    /// Sucrose balance, including what growing elements export into the zone.
    #[must_use]
    pub fn sucrose_derivative(
        &self,
        sucrose_unloading: f64,
        fructan_synthesis: f64,
        fructan_degradation: f64,
        loading_contribution: f64,
    ) -> f64 {
        sucrose_unloading
            + (fructan_degradation - fructan_synthesis) * self.mstruct
            + loading_contribution
    }

    /// Amino-acid balance, including what growing elements export into the zone.
    #[must_use]
    pub fn amino_acids_derivative(
        &self,
        amino_acids_unloading: f64,
        proteins_synthesis: f64,
        proteins_degradation: f64,
        loading_contribution: f64,
    ) -> f64 {
        amino_acids_unloading
            + (proteins_degradation - proteins_synthesis) * self.mstruct
            + loading_contribution
    }

    #[must_use]
    pub fn fructan_derivative(&self, fructan_synthesis: f64, fructan_degradation: f64) -> f64 {
        (fructan_synthesis - fructan_degradation) * self.mstruct
    }

    #[must_use]
    pub fn proteins_derivative(&self, proteins_synthesis: f64, proteins_degradation: f64) -> f64 {
        (proteins_synthesis - proteins_degradation) * self.mstruct
    }

    /// `sucrose_loading` and `amino_acids_loading` are the summed exports of
    /// the growing elements feeding this zone.
    #[must_use]
    pub fn derivatives(
        &self,
        fluxes: &HiddenZoneFluxes,
        sucrose_loading: f64,
        amino_acids_loading: f64,
    ) -> HiddenZoneCompartments {
        HiddenZoneCompartments {
            sucrose: self.sucrose_derivative(
                fluxes.sucrose_unloading,
                fluxes.fructan_synthesis,
                fluxes.fructan_degradation,
                sucrose_loading,
            ),
            fructan: self.fructan_derivative(fluxes.fructan_synthesis, fluxes.fructan_degradation),
            amino_acids: self.amino_acids_derivative(
                fluxes.amino_acids_unloading,
                fluxes.proteins_synthesis,
                fluxes.proteins_degradation,
                amino_acids_loading,
            ),
            proteins: self.proteins_derivative(fluxes.proteins_synthesis, fluxes.proteins_degradation),
        }
    }
}
