use uom::si::{
    f64::{Mass, Time},
    time::second,
};

use crate::support::{
    kinetics::{bi_substrate, hill, michaelis_menten},
    units::MolarConversion,
};

use super::{
    super::{
        constants::{amino_acid_carbon_per_nitrogen, nitrogen_molar_mass},
        error::TreeError,
        params::{Parameters, RootsParameters},
        state::impl_compartments,
        structural_mass::StructuralMass,
    },
    PhloemView,
};

/// Compartments of a root system.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootsCompartments {
    /// µmol C
    pub sucrose: f64,
    /// µmol N
    pub nitrates: f64,
    /// µmol N
    pub amino_acids: f64,
    /// AU
    pub cytokinins: f64,
}

impl_compartments!(RootsCompartments {
    sucrose => Sucrose,
    nitrates => Nitrates,
    amino_acids => AminoAcids,
    cytokinins => Cytokinins,
});

/// Root system of an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Roots {
    pub mstruct: StructuralMass,
    pub nstruct: Mass,
    /// Respiration losses from sucrose over one step (µmol C).
    pub respiration: f64,
    pub compartments: RootsCompartments,
    total_organic_nitrogen: f64,
}

impl Roots {
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralMass`] if `mstruct` is not strictly positive.
    pub fn new(
        mstruct: Mass,
        nstruct: Mass,
        compartments: RootsCompartments,
    ) -> Result<Self, TreeError> {
        let mstruct =
            StructuralMass::from_quantity(mstruct).map_err(|source| TreeError::StructuralMass {
                entity: "roots",
                source,
            })?;
        let mut roots = Self {
            mstruct,
            nstruct,
            respiration: 0.0,
            compartments,
            total_organic_nitrogen: 0.0,
        };
        roots.total_organic_nitrogen = roots.organic_nitrogen();
        Ok(roots)
    }

    /// Amino acids + structural N (µmol N) of the current compartments.
    #[must_use]
    pub fn organic_nitrogen(&self) -> f64 {
        self.compartments.amino_acids + self.nstruct.to_micromoles(nitrogen_molar_mass())
    }

    /// Total organic nitrogen as of the last aggregation (µmol N).
    #[must_use]
    pub fn total_organic_nitrogen(&self) -> f64 {
        self.total_organic_nitrogen
    }

    pub(crate) fn set_total_organic_nitrogen(&mut self, value: f64) {
        self.total_organic_nitrogen = value;
    }

    #[must_use]
    pub fn kinetics<'a>(&self, parameters: &'a Parameters, delta_t: Time) -> RootsKinetics<'a> {
        RootsKinetics {
            mstruct: self.mstruct.grams(),
            delta_t: delta_t.get::<second>(),
            roots: &parameters.roots,
        }
    }
}

/// What the roots send to the shoot over one step, with the culm
/// transpiration used to share it among elements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootExports {
    /// µmol N
    pub nitrates: f64,
    /// µmol N
    pub amino_acids: f64,
    /// AU
    pub cytokinins: f64,
    /// Summed transpiration of the axis elements (mmol H₂O s⁻¹).
    pub total_transpiration: f64,
}

/// Fluxes of a root system over one step.
///
/// Uptake, influx and exports are amounts. All others are per gram of
/// structural mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootsFluxes {
    pub regul_transpiration: f64,
    pub sucrose_unloading: f64,
    pub amino_acids_unloading: f64,
    pub nitrates_uptake: f64,
    /// Gross nitrate influx through both transport systems (µmol N).
    pub nitrates_influx: f64,
    pub amino_acids_synthesis: f64,
    pub nitrates_export: f64,
    pub amino_acids_export: f64,
    pub cytokinins_synthesis: f64,
    pub cytokinins_export: f64,
    pub carbon_exudation: f64,
    pub nitrogen_exudation: f64,
}

impl RootsFluxes {
    /// Exports toward the shoot, shared according to `total_transpiration`.
    #[must_use]
    pub fn exports(&self, total_transpiration: f64) -> RootExports {
        RootExports {
            nitrates: self.nitrates_export,
            amino_acids: self.amino_acids_export,
            cytokinins: self.cytokinins_export,
            total_transpiration,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RootsKinetics<'a> {
    mstruct: f64,
    delta_t: f64,
    roots: &'a RootsParameters,
}

impl RootsKinetics<'_> {
    fn metabolic_mass(&self) -> f64 {
        self.mstruct * self.roots.alpha
    }

    /// Dimensionless factor by which shoot transpiration drives root exports.
    ///
    /// `surfacic_transpiration` is the culm transpiration per unit green
    /// area (mmol H₂O m⁻² s⁻¹).
    #[must_use]
    pub fn regul_transpiration(&self, surfacic_transpiration: f64) -> f64 {
        surfacic_transpiration / (surfacic_transpiration + self.roots.k_transpiration)
    }

    /// Sucrose unloaded from the phloem (µmol C g⁻¹).
    #[must_use]
    pub fn sucrose_unloading(&self, phloem: &PhloemView) -> f64 {
        michaelis_menten(
            self.roots.vmax_sucrose_unloading,
            self.roots.k_sucrose_unloading,
            phloem.sucrose_concentration(),
        ) * self.delta_t
    }

    /// Amino acids co-transported with the unloaded sucrose (µmol N g⁻¹).
    #[must_use]
    pub fn amino_acids_unloading(&self, sucrose_unloading: f64, phloem: &PhloemView) -> f64 {
        if phloem.amino_acids <= 0.0 {
            return 0.0;
        }
        phloem
            .amino_acids_per_sucrose()
            .map_or(0.0, |ratio| sucrose_unloading * ratio)
    }

    /// Nitrate uptake from the soil through the HATS and LATS systems.
    ///
    /// Both systems are down-regulated by the root nitrate concentration and
    /// the net uptake is limited by root sucrose. Returns the net uptake and
    /// the gross influx (µmol N).
    #[must_use]
    pub fn nitrates_uptake(
        &self,
        soil_concentration: f64,
        nitrates: f64,
        sucrose: f64,
    ) -> (f64, f64) {
        let r = self.roots;
        let internal = nitrates / self.mstruct;

        let vmax_hats = r.a_vmax_hats * (-r.lambda_vmax_hats * internal).exp();
        let k_hats = r.a_k_hats * (-r.lambda_k_hats * internal).exp();
        let hats = vmax_hats * soil_concentration / (k_hats + soil_concentration);

        let k_lats = r.a_lats * (-r.lambda_lats * internal).exp();
        let lats = k_lats * soil_concentration;

        let influx = (hats + lats) * self.mstruct * self.delta_t;
        let regul_carbon = michaelis_menten(1.0, r.k_c, sucrose / self.mstruct);
        (influx * r.net_influx_uptake_ratio * regul_carbon, influx)
    }

    /// Amino-acid synthesis from nitrates and sucrose (µmol N g⁻¹).
    #[must_use]
    pub fn amino_acids_synthesis(&self, nitrates: f64, sucrose: f64) -> f64 {
        bi_substrate(
            self.roots.vmax_amino_acids,
            self.roots.k_amino_acids_nitrates,
            nitrates / self.metabolic_mass(),
            self.roots.k_amino_acids_sucrose,
            sucrose / self.metabolic_mass(),
        ) * self.delta_t
    }

    fn export(&self, amount: f64, k_export: f64, regul_transpiration: f64) -> f64 {
        amount / self.metabolic_mass() * k_export * self.mstruct * regul_transpiration * self.delta_t
    }

    /// Nitrates exported to the shoot (µmol N).
    #[must_use]
    pub fn nitrates_export(&self, nitrates: f64, regul_transpiration: f64) -> f64 {
        if nitrates <= 0.0 || regul_transpiration <= 0.0 {
            return 0.0;
        }
        self.export(nitrates, self.roots.k_nitrate_export, regul_transpiration)
    }

    /// Amino acids exported to the shoot (µmol N).
    ///
    /// Unlike nitrates, only the amino-acid pool is checked before export.
    #[must_use]
    pub fn amino_acids_export(&self, amino_acids: f64, regul_transpiration: f64) -> f64 {
        if amino_acids <= 0.0 {
            return 0.0;
        }
        self.export(amino_acids, self.roots.k_amino_acids_export, regul_transpiration)
    }

    /// Cytokinin synthesis regulated by root sucrose and nitrates (AU g⁻¹).
    #[must_use]
    pub fn cytokinins_synthesis(&self, sucrose: f64, nitrates: f64) -> f64 {
        let r = self.roots;
        let f_sucrose = hill(sucrose / self.mstruct, r.k_sucrose_cytokinins, r.n_suc_cytokinins);
        let f_nitrates = hill(
            nitrates / self.mstruct,
            r.k_nitrates_cytokinins,
            r.n_nit_cytokinins,
        );
        r.vmax_s_cytokinins * f_sucrose * f_nitrates * self.delta_t
    }

    /// Cytokinins exported to the shoot (AU).
    #[must_use]
    pub fn cytokinins_export(&self, cytokinins: f64, regul_transpiration: f64) -> f64 {
        if cytokinins <= 0.0 {
            return 0.0;
        }
        self.export(cytokinins, self.roots.k_cytokinins_export, regul_transpiration)
    }

    /// Carbon and nitrogen lost by exudation (µmol g⁻¹).
    ///
    /// Carbon is a fraction of the unloaded sucrose, nitrogen follows the
    /// root amino-acid to sucrose ratio.
    #[must_use]
    pub fn exudation(
        &self,
        sucrose_unloading: f64,
        sucrose: f64,
        amino_acids: f64,
        phloem_amino_acids: f64,
    ) -> (f64, f64) {
        let carbon = sucrose.min(sucrose_unloading * self.roots.c_exudation);
        let nitrogen = if phloem_amino_acids <= 0.0 || amino_acids <= 0.0 || sucrose <= 0.0 {
            0.0
        } else {
            amino_acids / sucrose * carbon
        };
        (carbon, nitrogen)
    }

    #[must_use]
    pub fn fluxes(
        &self,
        state: &RootsCompartments,
        phloem: &PhloemView,
        soil_concentration: f64,
        surfacic_transpiration: f64,
    ) -> RootsFluxes {
        let regul_transpiration = self.regul_transpiration(surfacic_transpiration);
        let sucrose_unloading = self.sucrose_unloading(phloem);
        let (nitrates_uptake, nitrates_influx) =
            self.nitrates_uptake(soil_concentration, state.nitrates, state.sucrose);
        let (carbon_exudation, nitrogen_exudation) = self.exudation(
            sucrose_unloading,
            state.sucrose,
            state.amino_acids,
            phloem.amino_acids,
        );

        RootsFluxes {
            regul_transpiration,
            sucrose_unloading,
            amino_acids_unloading: self.amino_acids_unloading(sucrose_unloading, phloem),
            nitrates_uptake,
            nitrates_influx,
            amino_acids_synthesis: self.amino_acids_synthesis(state.nitrates, state.sucrose),
            nitrates_export: self.nitrates_export(state.nitrates, regul_transpiration),
            amino_acids_export: self.amino_acids_export(state.amino_acids, regul_transpiration),
            cytokinins_synthesis: self.cytokinins_synthesis(state.sucrose, state.nitrates),
            cytokinins_export: self.cytokinins_export(state.cytokinins, regul_transpiration),
            carbon_exudation,
            nitrogen_exudation,
        }
    }

    #[must_use]
    pub fn sucrose_derivative(
        &self,
        sucrose_unloading: f64,
        amino_acids_synthesis: f64,
        carbon_exudation: f64,
        respiration: f64,
    ) -> f64 {
        let consumed_by_amino_acids = amino_acids_synthesis * amino_acid_carbon_per_nitrogen();
        (sucrose_unloading - consumed_by_amino_acids - carbon_exudation) * self.mstruct
            - respiration
    }

    #[must_use]
    pub fn nitrates_derivative(
        &self,
        nitrates_uptake: f64,
        nitrates_export: f64,
        amino_acids_synthesis: f64,
    ) -> f64 {
        nitrates_uptake - nitrates_export - amino_acids_synthesis * self.mstruct
    }

    #[must_use]
    pub fn amino_acids_derivative(
        &self,
        amino_acids_unloading: f64,
        amino_acids_synthesis: f64,
        amino_acids_export: f64,
        nitrogen_exudation: f64,
    ) -> f64 {
        (amino_acids_unloading + amino_acids_synthesis - nitrogen_exudation) * self.mstruct
            - amino_acids_export
    }

    #[must_use]
    pub fn cytokinins_derivative(&self, cytokinins_synthesis: f64, cytokinins_export: f64) -> f64 {
        cytokinins_synthesis * self.mstruct - cytokinins_export
    }

    #[must_use]
    pub fn derivatives(&self, fluxes: &RootsFluxes, respiration: f64) -> RootsCompartments {
        let f = fluxes;
        RootsCompartments {
            sucrose: self.sucrose_derivative(
                f.sucrose_unloading,
                f.amino_acids_synthesis,
                f.carbon_exudation,
                respiration,
            ),
            nitrates: self.nitrates_derivative(
                f.nitrates_uptake,
                f.nitrates_export,
                f.amino_acids_synthesis,
            ),
            amino_acids: self.amino_acids_derivative(
                f.amino_acids_unloading,
                f.amino_acids_synthesis,
                f.amino_acids_export,
                f.nitrogen_exudation,
            ),
            cytokinins: self.cytokinins_derivative(f.cytokinins_synthesis, f.cytokinins_export),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{mass::gram, time::hour};

    use super::*;

    fn roots(mstruct: f64) -> Roots {
        Roots::new(
            Mass::new::<gram>(mstruct),
            Mass::new::<gram>(0.014),
            RootsCompartments::default(),
        )
        .unwrap()
    }

    fn phloem(sucrose: f64, amino_acids: f64) -> PhloemView {
        PhloemView {
            sucrose,
            amino_acids,
            mstruct_axis: 1.0,
            alpha_axis: 1.0,
        }
    }

    #[test]
    fn organic_nitrogen_counts_structural_nitrogen() {
        let mut r = roots(0.5);
        r.compartments.amino_acids = 25.0;
        // 0.014 g of N is 1000 µmol.
        assert_relative_eq!(r.organic_nitrogen(), 1_025.0, epsilon = 1e-9);
    }

    #[test]
    fn regul_transpiration_saturates() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));
        let k = parameters.roots.k_transpiration;

        assert_eq!(kinetics.regul_transpiration(0.0), 0.0);
        assert_relative_eq!(kinetics.regul_transpiration(k), 0.5);
        assert!(kinetics.regul_transpiration(1e6) > 0.99);
    }

    #[test]
    fn export_clamps_are_asymmetric() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        assert_eq!(kinetics.nitrates_export(100.0, 0.0), 0.0);
        assert_eq!(kinetics.nitrates_export(-100.0, 0.5), 0.0);
        assert!(kinetics.nitrates_export(100.0, 0.5) > 0.0);

        // Amino-acid export only checks the pool, so a negative regulation
        // factor yields a negative export.
        assert!(kinetics.amino_acids_export(100.0, -0.1) < 0.0);
        assert_eq!(kinetics.amino_acids_export(0.0, 0.5), 0.0);
        assert_eq!(kinetics.cytokinins_export(-1.0, 0.5), 0.0);
    }

    #[test]
    fn amino_acids_follow_sucrose_unloading() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        let unloading = kinetics.sucrose_unloading(&phloem(1_000.0, 100.0));
        assert!(unloading > 0.0);
        assert_relative_eq!(
            kinetics.amino_acids_unloading(unloading, &phloem(1_000.0, 100.0)),
            unloading * 0.1
        );
        assert_eq!(kinetics.amino_acids_unloading(unloading, &phloem(1_000.0, 0.0)), 0.0);
        assert_eq!(kinetics.amino_acids_unloading(unloading, &phloem(0.0, 100.0)), 0.0);
        assert_eq!(kinetics.sucrose_unloading(&phloem(-50.0, 0.0)), 0.0);
    }

    #[test]
    fn uptake_requires_carbon_and_soil_nitrates() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        let (net, influx) = kinetics.nitrates_uptake(5e5, 10.0, 100.0);
        assert!(influx > 0.0);
        assert!(net > 0.0 && net < influx);

        let (starved, influx_starved) = kinetics.nitrates_uptake(5e5, 10.0, 0.0);
        assert_eq!(starved, 0.0);
        assert_relative_eq!(influx_starved, influx);

        assert_eq!(kinetics.nitrates_uptake(0.0, 10.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn uptake_declines_with_internal_nitrates() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        let (_, low) = kinetics.nitrates_uptake(5e5, 0.0, 100.0);
        let (_, high) = kinetics.nitrates_uptake(5e5, 500.0, 100.0);
        assert!(high < low);
    }

    #[test]
    fn exudation_is_bounded_by_sucrose() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        let (carbon, nitrogen) = kinetics.exudation(100.0, 5.0, 10.0, 1.0);
        assert_eq!(carbon, 5.0);
        assert_relative_eq!(nitrogen, 10.0);

        let (carbon, nitrogen) = kinetics.exudation(100.0, 500.0, 10.0, 0.0);
        assert_relative_eq!(carbon, 100.0 * parameters.roots.c_exudation);
        assert_eq!(nitrogen, 0.0);
    }

    #[test]
    fn synthesis_vanishes_without_substrate() {
        let parameters = Parameters::default();
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));

        assert_eq!(kinetics.amino_acids_synthesis(0.0, 100.0), 0.0);
        assert_eq!(kinetics.amino_acids_synthesis(100.0, -1.0), 0.0);
        assert_eq!(kinetics.cytokinins_synthesis(-1.0, 100.0), 0.0);
        assert!(kinetics.cytokinins_synthesis(100.0, 100.0) > 0.0);
    }

    #[test]
    fn closed_roots_conserve_matter() {
        let mut parameters = Parameters::default();
        parameters.roots.c_exudation = 0.0;
        let kinetics = roots(0.5).kinetics(&parameters, Time::new::<hour>(1.0));
        let state = RootsCompartments {
            sucrose: 400.0,
            nitrates: 150.0,
            amino_acids: 50.0,
            cytokinins: 10.0,
        };
        let fluxes = RootsFluxes {
            sucrose_unloading: 0.0,
            amino_acids_unloading: 0.0,
            nitrates_uptake: 0.0,
            ..kinetics.fluxes(&state, &phloem(0.0, 0.0), 0.0, 0.0)
        };
        assert_eq!(fluxes.nitrates_export, 0.0);
        assert_eq!(fluxes.amino_acids_export, 0.0);

        let d = kinetics.derivatives(&fluxes, 0.0);
        let carbon = d.sucrose + amino_acid_carbon_per_nitrogen() * d.amino_acids;
        assert_relative_eq!(carbon, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.nitrates + d.amino_acids, 0.0, epsilon = 1e-9);
    }
}
