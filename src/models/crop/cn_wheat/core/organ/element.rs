use uom::si::{
    area::square_meter,
    f64::{Area, Mass, ThermodynamicTemperature, Time},
    thermodynamic_temperature::degree_celsius,
    time::second,
};

use crate::support::{
    kinetics::{
        bi_substrate, end_product_inhibition, michaelis_menten, proportional_share, switch_off,
        transport_resistance,
    },
    units::MolarConversion,
};

use super::{
    super::{
        constants::{amino_acid_carbon_per_nitrogen, nitrogen_molar_mass},
        error::TreeError,
        params::{HiddenZoneParameters, Parameters, PhotosyntheticOrganParameters},
        state::impl_compartments,
        structural_mass::StructuralMass,
    },
    HiddenZoneView, OrganKind, PhloemView, RootExports, conductance,
};

/// Compartments of a photosynthetic organ element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementCompartments {
    /// µmol C
    pub triose_phosphates: f64,
    /// µmol C
    pub starch: f64,
    /// µmol C
    pub sucrose: f64,
    /// µmol C
    pub fructan: f64,
    /// µmol N
    pub nitrates: f64,
    /// µmol N
    pub amino_acids: f64,
    /// µmol N
    pub proteins: f64,
    /// AU
    pub cytokinins: f64,
}

impl_compartments!(ElementCompartments {
    triose_phosphates => TriosePhosphates,
    starch => Starch,
    sucrose => Sucrose,
    fructan => Fructan,
    nitrates => Nitrates,
    amino_acids => AminoAcids,
    proteins => Proteins,
    cytokinins => Cytokinins,
});

/// Exposed or enclosed part of a photosynthetic organ.
///
/// Structural inputs (`mstruct`, `nstruct`, `green_area`, `is_growing`) and
/// microclimate inputs (`ag`, `tr`, `ts`) are supplied by external growth and
/// microclimate models and are read-only during a derivative evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotosyntheticOrganElement {
    pub mstruct: StructuralMass,
    pub nstruct: Mass,
    /// Whether the element is still growing and feeds its phytomer's hidden zone.
    pub is_growing: bool,
    pub green_area: Area,
    /// Gross assimilation (µmol C m⁻² s⁻¹).
    pub ag: f64,
    /// Surfacic transpiration (mmol H₂O m⁻² s⁻¹).
    pub tr: f64,
    /// Organ temperature.
    pub ts: ThermodynamicTemperature,
    /// Respiration losses from sucrose over one step (µmol C).
    pub respiration: f64,
    pub compartments: ElementCompartments,
    total_organic_nitrogen: f64,
}

impl PhotosyntheticOrganElement {
    /// Creates a non-growing element with no green area and no assimilation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralMass`] if `mstruct` is not strictly positive.
    pub fn new(
        mstruct: Mass,
        nstruct: Mass,
        compartments: ElementCompartments,
    ) -> Result<Self, TreeError> {
        let mstruct =
            StructuralMass::from_quantity(mstruct).map_err(|source| TreeError::StructuralMass {
                entity: "photosynthetic organ element",
                source,
            })?;
        let mut element = Self {
            mstruct,
            nstruct,
            is_growing: false,
            green_area: Area::new::<square_meter>(0.0),
            ag: 0.0,
            tr: 0.0,
            ts: ThermodynamicTemperature::new::<degree_celsius>(20.0),
            respiration: 0.0,
            compartments,
            total_organic_nitrogen: 0.0,
        };
        element.total_organic_nitrogen = element.organic_nitrogen();
        Ok(element)
    }

    /// Transpiration of the whole element (mmol H₂O s⁻¹).
    #[must_use]
    pub fn transpiration(&self) -> f64 {
        self.tr * self.green_area.get::<square_meter>()
    }

    /// Amino acids + proteins + structural N (µmol N) of the current compartments.
    #[must_use]
    pub fn organic_nitrogen(&self) -> f64 {
        self.compartments.amino_acids
            + self.compartments.proteins
            + self.nstruct.to_micromoles(nitrogen_molar_mass())
    }

    /// Total organic nitrogen as of the last aggregation (µmol N).
    #[must_use]
    pub fn total_organic_nitrogen(&self) -> f64 {
        self.total_organic_nitrogen
    }

    pub(crate) fn set_total_organic_nitrogen(&mut self, value: f64) {
        self.total_organic_nitrogen = value;
    }

    /// Returns the kinetic laws of this element for one step.
    #[must_use]
    pub fn kinetics<'a>(
        &self,
        kind: OrganKind,
        parameters: &'a Parameters,
        delta_t: Time,
    ) -> ElementKinetics<'a> {
        ElementKinetics {
            mstruct: self.mstruct.grams(),
            alpha: parameters.element(kind).alpha,
            delta_t: delta_t.get::<second>(),
            ag: self.ag,
            green_area: self.green_area.get::<square_meter>(),
            transpiration: self.transpiration(),
            organ: &parameters.photosynthetic_organ,
            hidden_zone: &parameters.hidden_zone,
        }
    }
}

/// Where an element sends its sucrose and amino acids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadingTarget {
    /// Loading into the axis phloem.
    Phloem(PhloemView),
    /// Export into the hidden zone of a growing element's phytomer.
    HiddenZone(HiddenZoneView),
}

/// Pools outside the element that its fluxes depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementNeighbors {
    pub target: LoadingTarget,
    pub root_exports: RootExports,
}

/// Fluxes of an element over one step.
///
/// Values named `*_import`, `photosynthesis` and `*_loading` are amounts
/// (µmol or AU). All others are per gram of structural mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementFluxes {
    pub photosynthesis: f64,
    pub starch_synthesis: f64,
    pub starch_degradation: f64,
    pub sucrose_synthesis: f64,
    pub sucrose_loading: f64,
    pub fructan_synthesis_ceiling: f64,
    pub fructan_synthesis: f64,
    pub fructan_degradation: f64,
    pub nitrates_import: f64,
    pub amino_acids_import: f64,
    pub cytokinins_import: f64,
    pub amino_acids_synthesis: f64,
    pub proteins_synthesis: f64,
    /// First-order rate constant of protein degradation (s⁻¹).
    pub proteins_degradation_rate: f64,
    pub proteins_degradation: f64,
    pub amino_acids_loading: f64,
    pub cytokinins_degradation: f64,
}

/// Kinetic laws of one element over one step.
///
/// Concentrations are amounts divided by `mstruct * alpha`, where `alpha` is
/// the fraction of structural mass holding metabolites for the element's
/// tissue kind.
#[derive(Debug, Clone, Copy)]
pub struct ElementKinetics<'a> {
    mstruct: f64,
    alpha: f64,
    delta_t: f64,
    ag: f64,
    green_area: f64,
    transpiration: f64,
    organ: &'a PhotosyntheticOrganParameters,
    hidden_zone: &'a HiddenZoneParameters,
}

impl ElementKinetics<'_> {
    fn metabolic_mass(&self) -> f64 {
        self.mstruct * self.alpha
    }

    fn concentration(&self, amount: f64) -> f64 {
        amount / self.metabolic_mass()
    }

    /// Gross assimilation over the step (µmol C).
    #[must_use]
    pub fn photosynthesis(&self) -> f64 {
        self.ag * self.green_area * self.delta_t
    }

    /// Starch synthesis from triose phosphates (µmol C g⁻¹).
    #[must_use]
    pub fn starch_synthesis(&self, triose_phosphates: f64) -> f64 {
        michaelis_menten(
            self.organ.vmax_starch * self.delta_t,
            self.organ.k_starch,
            self.concentration(triose_phosphates),
        )
    }

    /// First-order starch degradation (µmol C g⁻¹).
    #[must_use]
    pub fn starch_degradation(&self, starch: f64) -> f64 {
        (self.organ.delta_d_starch * self.delta_t * self.concentration(starch)).max(0.0)
    }

    /// Sucrose synthesis from triose phosphates (µmol C g⁻¹).
    #[must_use]
    pub fn sucrose_synthesis(&self, triose_phosphates: f64) -> f64 {
        michaelis_menten(
            self.organ.vmax_sucrose * self.delta_t,
            self.organ.k_sucrose,
            self.concentration(triose_phosphates),
        )
    }

    /// Sucrose leaving the element toward its loading target (µmol C).
    ///
    /// Loading into the phloem follows the transport-resistance law driven by
    /// the higher of the two concentrations. Export to a hidden zone follows
    /// the plain concentration gradient.
    #[must_use]
    pub fn sucrose_loading(&self, sucrose: f64, target: &LoadingTarget) -> f64 {
        let element = self.concentration(sucrose);
        match target {
            LoadingTarget::Phloem(phloem) => transport_resistance(
                element,
                phloem.sucrose_concentration(),
                conductance(
                    self.organ.sigma_sucrose,
                    self.organ.beta,
                    self.mstruct,
                    self.delta_t,
                ),
            ),
            LoadingTarget::HiddenZone(hidden_zone) => {
                (element - hidden_zone.sucrose_concentration()) * self.hidden_zone_conductance()
            }
        }
    }

    /// Amino acids leaving the element toward its loading target (µmol N).
    #[must_use]
    pub fn amino_acids_loading(&self, amino_acids: f64, target: &LoadingTarget) -> f64 {
        let element = self.concentration(amino_acids);
        match target {
            LoadingTarget::Phloem(phloem) => transport_resistance(
                element,
                phloem.amino_acids_concentration(),
                conductance(
                    self.organ.sigma_amino_acids,
                    self.organ.beta,
                    self.mstruct,
                    self.delta_t,
                ),
            ),
            LoadingTarget::HiddenZone(hidden_zone) => {
                (element - hidden_zone.amino_acids_concentration())
                    * self.hidden_zone_conductance()
            }
        }
    }

    fn hidden_zone_conductance(&self) -> f64 {
        conductance(
            self.hidden_zone.sigma,
            self.organ.beta,
            self.mstruct,
            self.delta_t,
        )
    }

    /// Maximal rate of fructan synthesis, switched off by sucrose loading.
    #[must_use]
    pub fn fructan_synthesis_ceiling(&self, sucrose_loading: f64) -> f64 {
        switch_off(
            self.organ.vmax_s_fructan_pot,
            self.organ.k_regul_s_fructan,
            self.organ.n_regul_s_fructan,
            sucrose_loading / self.mstruct / self.delta_t,
        )
    }

    /// Fructan synthesis from sucrose (µmol C g⁻¹).
    #[must_use]
    pub fn fructan_synthesis(&self, sucrose: f64, ceiling: f64) -> f64 {
        michaelis_menten(ceiling, self.organ.k_s_fructan, self.concentration(sucrose))
            * self.delta_t
    }

    /// Fructan degradation inhibited by sucrose (µmol C g⁻¹).
    ///
    /// Never exceeds `max(0, fructan)`.
    #[must_use]
    pub fn fructan_degradation(&self, sucrose: f64, fructan: f64) -> f64 {
        let potential = end_product_inhibition(
            self.organ.vmax_d_fructan * self.delta_t,
            self.organ.k_d_fructan,
            self.concentration(sucrose),
        );
        potential.min(fructan.max(0.0))
    }

    /// Share of the root nitrate export received by this element (µmol N).
    #[must_use]
    pub fn nitrates_import(&self, exported: f64, total_transpiration: f64) -> f64 {
        proportional_share(exported, self.transpiration, total_transpiration)
    }

    /// Share of the root amino-acid export received by this element (µmol N).
    #[must_use]
    pub fn amino_acids_import(&self, exported: f64, total_transpiration: f64) -> f64 {
        proportional_share(exported, self.transpiration, total_transpiration)
    }

    /// Share of the root cytokinin export received by this element (AU).
    #[must_use]
    pub fn cytokinins_import(&self, exported: f64, total_transpiration: f64) -> f64 {
        proportional_share(exported, self.transpiration, total_transpiration)
    }

    /// Amino-acid synthesis from nitrates and triose phosphates (µmol N g⁻¹).
    #[must_use]
    pub fn amino_acids_synthesis(&self, nitrates: f64, triose_phosphates: f64) -> f64 {
        bi_substrate(
            self.organ.vmax_amino_acids * self.delta_t,
            self.organ.k_amino_acids_nitrates,
            self.concentration(nitrates),
            self.organ.k_amino_acids_triosesp,
            self.concentration(triose_phosphates),
        )
    }

    /// Protein synthesis from amino acids (µmol N g⁻¹).
    #[must_use]
    pub fn proteins_synthesis(&self, amino_acids: f64) -> f64 {
        michaelis_menten(
            self.organ.vmax_s_proteins * self.delta_t,
            self.organ.k_s_proteins,
            self.concentration(amino_acids),
        )
    }

    /// Protein degradation regulated by cytokinins.
    ///
    /// Returns the first-order rate constant and the degradation (µmol N g⁻¹).
    #[must_use]
    pub fn proteins_degradation(&self, proteins: f64, cytokinins: f64) -> (f64, f64) {
        let rate = switch_off(
            self.organ.vmax_d_proteins,
            self.organ.k_d_proteins,
            self.organ.n_d_proteins,
            (cytokinins / self.mstruct).max(0.0),
        );
        let degradation = (rate * self.concentration(proteins)).max(0.0) * self.delta_t;
        (rate, degradation)
    }

    /// First-order cytokinin degradation (AU g⁻¹).
    #[must_use]
    pub fn cytokinins_degradation(&self, cytokinins: f64) -> f64 {
        self.concentration(cytokinins).max(0.0) * self.organ.delta_d_cytokinins * self.delta_t
    }

    /// Evaluates every flux of the element at the given state.
    #[must_use]
    pub fn fluxes(&self, state: &ElementCompartments, neighbors: &ElementNeighbors) -> ElementFluxes {
        let sucrose_loading = self.sucrose_loading(state.sucrose, &neighbors.target);
        let fructan_synthesis_ceiling = self.fructan_synthesis_ceiling(sucrose_loading);
        let (proteins_degradation_rate, proteins_degradation) =
            self.proteins_degradation(state.proteins, state.cytokinins);
        let exports = &neighbors.root_exports;

        ElementFluxes {
            photosynthesis: self.photosynthesis(),
            starch_synthesis: self.starch_synthesis(state.triose_phosphates),
            starch_degradation: self.starch_degradation(state.starch),
            sucrose_synthesis: self.sucrose_synthesis(state.triose_phosphates),
            sucrose_loading,
            fructan_synthesis_ceiling,
            fructan_synthesis: self.fructan_synthesis(state.sucrose, fructan_synthesis_ceiling),
            fructan_degradation: self.fructan_degradation(state.sucrose, state.fructan),
            nitrates_import: self.nitrates_import(exports.nitrates, exports.total_transpiration),
            amino_acids_import: self
                .amino_acids_import(exports.amino_acids, exports.total_transpiration),
            cytokinins_import: self
                .cytokinins_import(exports.cytokinins, exports.total_transpiration),
            amino_acids_synthesis: self
                .amino_acids_synthesis(state.nitrates, state.triose_phosphates),
            proteins_synthesis: self.proteins_synthesis(state.amino_acids),
            proteins_degradation_rate,
            proteins_degradation,
            amino_acids_loading: self.amino_acids_loading(state.amino_acids, &neighbors.target),
            cytokinins_degradation: self.cytokinins_degradation(state.cytokinins),
        }
    }

    #[must_use]
    pub fn triose_phosphates_derivative(
        &self,
        photosynthesis: f64,
        sucrose_synthesis: f64,
        starch_synthesis: f64,
        amino_acids_synthesis: f64,
    ) -> f64 {
        let consumed_by_amino_acids = amino_acids_synthesis * amino_acid_carbon_per_nitrogen();
        photosynthesis
            - (sucrose_synthesis + starch_synthesis + consumed_by_amino_acids)
                * self.metabolic_mass()
    }

    #[must_use]
    pub fn starch_derivative(&self, starch_synthesis: f64, starch_degradation: f64) -> f64 {
        (starch_synthesis - starch_degradation) * self.metabolic_mass()
    }

    /// Sucrose balance. Synthesis terms are scaled by the whole structural mass.
    #[must_use]
    pub fn sucrose_derivative(
        &self,
        sucrose_synthesis: f64,
        starch_degradation: f64,
        sucrose_loading: f64,
        fructan_synthesis: f64,
        fructan_degradation: f64,
        respiration: f64,
    ) -> f64 {
        (sucrose_synthesis + starch_degradation + fructan_degradation - fructan_synthesis)
            * self.mstruct
            - respiration
            - sucrose_loading
    }

    #[must_use]
    pub fn fructan_derivative(&self, fructan_synthesis: f64, fructan_degradation: f64) -> f64 {
        (fructan_synthesis - fructan_degradation) * self.metabolic_mass()
    }

    #[must_use]
    pub fn nitrates_derivative(&self, nitrates_import: f64, amino_acids_synthesis: f64) -> f64 {
        nitrates_import - amino_acids_synthesis * self.metabolic_mass()
    }

    #[must_use]
    pub fn amino_acids_derivative(
        &self,
        amino_acids_import: f64,
        amino_acids_synthesis: f64,
        proteins_synthesis: f64,
        proteins_degradation: f64,
        amino_acids_loading: f64,
    ) -> f64 {
        amino_acids_import - amino_acids_loading
            + (amino_acids_synthesis + proteins_degradation - proteins_synthesis)
                * self.metabolic_mass()
    }

    #[must_use]
    pub fn proteins_derivative(&self, proteins_synthesis: f64, proteins_degradation: f64) -> f64 {
        (proteins_synthesis - proteins_degradation) * self.metabolic_mass()
    }

    #[must_use]
    pub fn cytokinins_derivative(&self, cytokinins_import: f64, cytokinins_degradation: f64) -> f64 {
        cytokinins_import - cytokinins_degradation * self.metabolic_mass()
    }

    /// Combines fluxes into the derivative of every compartment.
    #[must_use]
    pub fn derivatives(&self, fluxes: &ElementFluxes, respiration: f64) -> ElementCompartments {
        let f = fluxes;
        ElementCompartments {
            triose_phosphates: self.triose_phosphates_derivative(
                f.photosynthesis,
                f.sucrose_synthesis,
                f.starch_synthesis,
                f.amino_acids_synthesis,
            ),
            starch: self.starch_derivative(f.starch_synthesis, f.starch_degradation),
            sucrose: self.sucrose_derivative(
                f.sucrose_synthesis,
                f.starch_degradation,
                f.sucrose_loading,
                f.fructan_synthesis,
                f.fructan_degradation,
                respiration,
            ),
            fructan: self.fructan_derivative(f.fructan_synthesis, f.fructan_degradation),
            nitrates: self.nitrates_derivative(f.nitrates_import, f.amino_acids_synthesis),
            amino_acids: self.amino_acids_derivative(
                f.amino_acids_import,
                f.amino_acids_synthesis,
                f.proteins_synthesis,
                f.proteins_degradation,
                f.amino_acids_loading,
            ),
            proteins: self.proteins_derivative(f.proteins_synthesis, f.proteins_degradation),
            cytokinins: self.cytokinins_derivative(f.cytokinins_import, f.cytokinins_degradation),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{mass::gram, time::hour};

    use super::*;
    use crate::models::crop::cn_wheat::core::test_support::lamina;

    fn hour_step() -> Time {
        Time::new::<hour>(1.0)
    }

    #[test]
    fn zero_total_transpiration_imports_nothing() {
        let parameters = Parameters::default();
        let mut element = lamina(0.1);
        element.tr = 5.0;
        element.green_area = Area::new::<square_meter>(2.0);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());

        assert_relative_eq!(element.transpiration(), 10.0);
        assert_eq!(kinetics.nitrates_import(500.0, 0.0), 0.0);
        assert_eq!(kinetics.amino_acids_import(500.0, 0.0), 0.0);
        assert_eq!(kinetics.cytokinins_import(500.0, 0.0), 0.0);

        assert_relative_eq!(kinetics.nitrates_import(500.0, 40.0), 125.0);
    }

    #[test]
    fn fructan_degradation_is_capped_by_the_pool() {
        let mut parameters = Parameters::default();
        // Potential degradation without sucrose is vmax * delta_t = 50.
        parameters.photosynthetic_organ.vmax_d_fructan = 50.0 / 3600.0;
        let element = lamina(0.1);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());

        assert_relative_eq!(kinetics.fructan_degradation(0.0, 1e6), 50.0, epsilon = 1e-9);
        assert_eq!(kinetics.fructan_degradation(0.0, 5.0), 5.0);
        assert_eq!(kinetics.fructan_degradation(0.0, -3.0), 0.0);
        assert!(kinetics.fructan_degradation(-100.0, 5.0) <= 5.0);
    }

    #[test]
    fn clamped_laws_vanish_on_negative_substrates() {
        let parameters = Parameters::default();
        let element = lamina(0.1);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());

        assert_eq!(kinetics.starch_synthesis(-1.0), 0.0);
        assert_eq!(kinetics.sucrose_synthesis(-1.0), 0.0);
        assert_eq!(kinetics.starch_degradation(-1.0), 0.0);
        assert_eq!(kinetics.fructan_synthesis(-1.0, 0.2), 0.0);
        assert_eq!(kinetics.amino_acids_synthesis(-1.0, 10.0), 0.0);
        assert_eq!(kinetics.amino_acids_synthesis(10.0, 0.0), 0.0);
        assert_eq!(kinetics.proteins_synthesis(-1.0), 0.0);
        assert_eq!(kinetics.proteins_degradation(-1.0, 0.0).1, 0.0);
        assert_eq!(kinetics.cytokinins_degradation(-1.0), 0.0);
    }

    #[test]
    fn loading_reverses_with_the_gradient() {
        let parameters = Parameters::default();
        let element = lamina(1.0);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());
        let phloem = |sucrose| {
            LoadingTarget::Phloem(PhloemView {
                sucrose,
                amino_acids: 0.0,
                mstruct_axis: 1.0,
                alpha_axis: 1.0,
            })
        };

        assert!(kinetics.sucrose_loading(1_000.0, &phloem(100.0)) > 0.0);
        assert!(kinetics.sucrose_loading(100.0, &phloem(1_000.0)) < 0.0);
        assert_eq!(kinetics.sucrose_loading(500.0, &phloem(500.0)), 0.0);

        // Driven by the higher concentration in both directions.
        let out = kinetics.sucrose_loading(300.0, &phloem(100.0));
        let back = kinetics.sucrose_loading(100.0, &phloem(300.0));
        assert_relative_eq!(out, -back);
    }

    #[test]
    fn hidden_zone_export_follows_plain_gradient() {
        let parameters = Parameters::default();
        let element = lamina(1.0);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());
        let target = LoadingTarget::HiddenZone(HiddenZoneView {
            sucrose: 50.0,
            amino_acids: 0.0,
            mstruct: 0.5,
        });

        let expected = (400.0 - 100.0) * parameters.hidden_zone.sigma * 3600.0;
        assert_relative_eq!(kinetics.sucrose_loading(400.0, &target), expected);
    }

    #[test]
    fn fructan_ceiling_drops_with_loading() {
        let parameters = Parameters::default();
        let element = lamina(1.0);
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());
        let potential = parameters.photosynthetic_organ.vmax_s_fructan_pot;

        assert_eq!(kinetics.fructan_synthesis_ceiling(-5.0), potential);
        // Loading of K per gram per second halves the ceiling.
        assert_relative_eq!(kinetics.fructan_synthesis_ceiling(3600.0), potential / 2.0);
    }

    #[test]
    fn closed_element_conserves_carbon_and_nitrogen() {
        let parameters = Parameters::default();
        let mut element = lamina(0.2);
        element.compartments = ElementCompartments {
            triose_phosphates: 300.0,
            starch: 150.0,
            sucrose: 900.0,
            fructan: 400.0,
            nitrates: 200.0,
            amino_acids: 120.0,
            proteins: 1_500.0,
            cytokinins: 30.0,
        };
        let kinetics = element.kinetics(OrganKind::Lamina, &parameters, hour_step());
        let state = element.compartments;
        let f = ElementFluxes {
            sucrose_loading: 0.0,
            amino_acids_loading: 0.0,
            ..kinetics.fluxes(
                &state,
                &ElementNeighbors {
                    target: LoadingTarget::HiddenZone(HiddenZoneView {
                        sucrose: state.sucrose,
                        amino_acids: state.amino_acids,
                        mstruct: 0.2,
                    }),
                    root_exports: RootExports::default(),
                },
            )
        };
        let d = kinetics.derivatives(&f, 0.0);

        let carbon_ratio = amino_acid_carbon_per_nitrogen();
        let carbon = d.triose_phosphates
            + d.starch
            + d.sucrose
            + d.fructan
            + carbon_ratio * (d.amino_acids + d.proteins);
        let nitrogen = d.nitrates + d.amino_acids + d.proteins;
        assert_relative_eq!(carbon, 0.0, epsilon = 1e-9);
        assert_relative_eq!(nitrogen, 0.0, epsilon = 1e-9);
        assert!(d.triose_phosphates < 0.0);
    }

    #[test]
    fn rejects_massless_element() {
        let result = PhotosyntheticOrganElement::new(
            Mass::new::<gram>(0.0),
            Mass::new::<gram>(0.0),
            ElementCompartments::default(),
        );
        assert!(matches!(result, Err(TreeError::StructuralMass { .. })));
    }
}
