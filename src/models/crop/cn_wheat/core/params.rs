//! Kinetic parameter tables, one per organ kind.
//!
//! Every table is an immutable `Copy` struct resolved once when a model is
//! built. Rates are per second and per gram of structural mass unless noted;
//! amounts are µmol C, µmol N, or arbitrary units (AU) for cytokinins.

use uom::si::{f64::Time, time::hour};

use super::organ::OrganKind;

/// All parameter tables used by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Parameters {
    pub axis: AxisParameters,
    pub photosynthetic_organ: PhotosyntheticOrganParameters,
    pub tissues: TissueParameters,
    pub hidden_zone: HiddenZoneParameters,
    pub roots: RootsParameters,
    pub grains: GrainsParameters,
    pub soil: SoilParameters,
}

impl Parameters {
    /// Returns the element parameters for a tissue kind.
    #[must_use]
    pub fn element(&self, kind: OrganKind) -> &ElementParameters {
        self.tissues.get(kind)
    }
}

/// Axis-level parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisParameters {
    /// Proportion of structural mass of the axis containing phloem substrates.
    pub alpha: f64,
}

impl Default for AxisParameters {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

/// Parameters shared by all photosynthetic organ elements.
///
/// Hidden zones reuse the fructan and protein synthesis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotosyntheticOrganParameters {
    /// Conductance coefficient for sucrose loading to phloem (g² µmol⁻¹ s⁻¹).
    pub sigma_sucrose: f64,
    /// Conductance coefficient for amino acid loading to phloem (g² µmol⁻¹ s⁻¹).
    pub sigma_amino_acids: f64,
    /// Kind of volumetric mass density (g^(1/3)).
    pub beta: f64,

    pub vmax_sucrose: f64,
    pub k_sucrose: f64,

    pub vmax_starch: f64,
    pub k_starch: f64,
    /// First-order rate of starch degradation (s⁻¹).
    pub delta_d_starch: f64,

    /// Potential maximal rate of fructan synthesis.
    pub vmax_s_fructan_pot: f64,
    pub k_s_fructan: f64,
    /// Sucrose loading rate at which the fructan ceiling is halved.
    pub k_regul_s_fructan: f64,
    pub n_regul_s_fructan: f64,
    pub vmax_d_fructan: f64,
    /// Sucrose concentration inhibiting fructan degradation by half.
    pub k_d_fructan: f64,

    pub vmax_amino_acids: f64,
    pub k_amino_acids_nitrates: f64,
    pub k_amino_acids_triosesp: f64,

    pub vmax_s_proteins: f64,
    pub k_s_proteins: f64,
    /// Maximal first-order rate of protein degradation (s⁻¹).
    pub vmax_d_proteins: f64,
    /// Cytokinin concentration halving protein degradation (AU g⁻¹).
    pub k_d_proteins: f64,
    pub n_d_proteins: f64,

    /// First-order rate of cytokinin degradation (s⁻¹).
    pub delta_d_cytokinins: f64,
}

impl Default for PhotosyntheticOrganParameters {
    fn default() -> Self {
        Self {
            sigma_sucrose: 1e-7,
            sigma_amino_acids: 1e-7,
            beta: 1.0,
            vmax_sucrose: 1.0,
            k_sucrose: 0.66,
            vmax_starch: 2.0,
            k_starch: 20.0,
            delta_d_starch: 1e-4,
            vmax_s_fructan_pot: 0.2,
            k_s_fructan: 20_000.0,
            k_regul_s_fructan: 1.0,
            n_regul_s_fructan: 15.0,
            vmax_d_fructan: 0.035,
            k_d_fructan: 100.0,
            vmax_amino_acids: 1.0,
            k_amino_acids_nitrates: 3.0,
            k_amino_acids_triosesp: 0.2,
            vmax_s_proteins: 0.0015,
            k_s_proteins: 2_000.0,
            vmax_d_proteins: 1e-6,
            k_d_proteins: 10.0,
            n_d_proteins: 3.0,
            delta_d_cytokinins: 3e-6,
        }
    }
}

/// Tissue-specific parameters of a photosynthetic organ element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementParameters {
    /// Proportion of structural mass containing the metabolic substrates.
    pub alpha: f64,
}

impl Default for ElementParameters {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

/// Element parameters for each tissue kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TissueParameters {
    pub chaff: ElementParameters,
    pub lamina: ElementParameters,
    pub internode: ElementParameters,
    pub peduncle: ElementParameters,
    pub sheath: ElementParameters,
}

impl TissueParameters {
    /// Returns the parameters for a tissue kind.
    #[must_use]
    pub fn get(&self, kind: OrganKind) -> &ElementParameters {
        match kind {
            OrganKind::Chaff => &self.chaff,
            OrganKind::Lamina => &self.lamina,
            OrganKind::Internode => &self.internode,
            OrganKind::Peduncle => &self.peduncle,
            OrganKind::Sheath => &self.sheath,
        }
    }
}

/// Hidden zone parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HiddenZoneParameters {
    /// Conductance coefficient for exchanges with the phloem and with the
    /// elements exporting to the hidden zone (g² µmol⁻¹ s⁻¹).
    pub sigma: f64,
    /// First-order rate of protein degradation (s⁻¹).
    pub delta_d_proteins: f64,
}

impl Default for HiddenZoneParameters {
    fn default() -> Self {
        Self {
            sigma: 1e-4,
            delta_d_proteins: 1.85e-6,
        }
    }
}

/// Roots parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootsParameters {
    pub alpha: f64,

    pub vmax_sucrose_unloading: f64,
    pub k_sucrose_unloading: f64,

    /// HATS maximal influx at zero internal nitrate (µmol N g⁻¹ s⁻¹).
    pub a_vmax_hats: f64,
    pub lambda_vmax_hats: f64,
    /// HATS affinity at zero internal nitrate (µmol m⁻³).
    pub a_k_hats: f64,
    pub lambda_k_hats: f64,
    /// LATS rate constant at zero internal nitrate (m³ g⁻¹ s⁻¹).
    pub a_lats: f64,
    pub lambda_lats: f64,
    /// Fraction of the nitrate influx retained after efflux.
    pub net_influx_uptake_ratio: f64,
    /// Root sucrose concentration halving the nitrate uptake (µmol C g⁻¹).
    pub k_c: f64,

    pub vmax_amino_acids: f64,
    pub k_amino_acids_nitrates: f64,
    pub k_amino_acids_sucrose: f64,

    pub k_nitrate_export: f64,
    pub k_amino_acids_export: f64,
    pub k_cytokinins_export: f64,

    /// Fraction of unloaded sucrose lost by exudation.
    pub c_exudation: f64,
    /// Surfacic transpiration halving root exports (mmol m⁻² s⁻¹).
    pub k_transpiration: f64,

    pub vmax_s_cytokinins: f64,
    pub k_sucrose_cytokinins: f64,
    pub n_suc_cytokinins: f64,
    pub k_nitrates_cytokinins: f64,
    pub n_nit_cytokinins: f64,
}

impl Default for RootsParameters {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            vmax_sucrose_unloading: 0.03,
            k_sucrose_unloading: 1_000.0,
            a_vmax_hats: 0.1,
            lambda_vmax_hats: 0.005,
            a_k_hats: 1e5,
            lambda_k_hats: 0.01,
            a_lats: 1e-8,
            lambda_lats: 0.005,
            net_influx_uptake_ratio: 0.6,
            k_c: 1.0,
            vmax_amino_acids: 1e-3,
            k_amino_acids_nitrates: 6.0,
            k_amino_acids_sucrose: 350.0,
            k_nitrate_export: 1e-6,
            k_amino_acids_export: 3e-5,
            k_cytokinins_export: 2e-4,
            c_exudation: 0.2,
            k_transpiration: 10.0,
            vmax_s_cytokinins: 9e-4,
            k_sucrose_cytokinins: 100.0,
            n_suc_cytokinins: 3.0,
            k_nitrates_cytokinins: 200.0,
            n_nit_cytokinins: 2.0,
        }
    }
}

/// Grains parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainsParameters {
    /// Maximal relative growth rate of grain structure (s⁻¹).
    pub vmax_rgr: f64,
    pub k_rgr: f64,
    pub vmax_starch: f64,
    pub k_starch: f64,
    /// Age from flowering at which grain filling starts.
    pub filling_init: Time,
    /// Age from flowering at which grain filling ends.
    pub filling_end: Time,
}

impl Default for GrainsParameters {
    fn default() -> Self {
        Self {
            vmax_rgr: 1.9e-6,
            k_rgr: 300.0,
            vmax_starch: 0.5,
            k_starch: 100.0,
            filling_init: Time::new::<hour>(360.0),
            filling_end: Time::new::<hour>(1_100.0),
        }
    }
}

/// Soil parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilParameters {
    /// Mineralisation of organic N into nitrates (µmol N s⁻¹).
    pub mineralisation_rate: f64,
}

impl Default for SoilParameters {
    fn default() -> Self {
        Self {
            mineralisation_rate: 2e-3,
        }
    }
}
