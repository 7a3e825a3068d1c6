//! Derivative evaluation over the whole population.
//!
//! Reads a trial state, resolves the shared pools each entity depends on
//! (phloem, hidden zones, root exports, soil) and combines every entity's
//! fluxes into a derivative of the same shape. The tree itself is only
//! read: structural inputs and the integrative variables of the last
//! aggregation.

use uom::si::{f64::Time, mass::gram, time::second};

use super::{
    error::EvaluationError,
    layout::{AxisState, PhytomerState, PopulationState},
    organ::{
        ElementNeighbors, HiddenZoneView, LoadingTarget, Phloem, PhloemContributor, PhloemView,
        RootExports,
    },
    params::Parameters,
    soil::{CulmDensity, Soil, SoilCompartments, SoilContributor},
    tree::{Axis, Phytomer, Population},
};

/// Everything a derivative evaluation reads besides the trial state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluation<'a> {
    pub(crate) population: &'a Population,
    pub(crate) soil: &'a Soil,
    pub(crate) culm_density: &'a CulmDensity,
    pub(crate) parameters: &'a Parameters,
}

/// Rejects step durations that are not finite and strictly positive.
pub(crate) fn check_step(delta_t: Time) -> Result<(), EvaluationError> {
    let seconds = delta_t.get::<second>();
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(EvaluationError::InvalidStep { seconds })
    }
}

impl Evaluation<'_> {
    /// Derivatives of every compartment at `state` over a step of `delta_t`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::InvalidStep`] for a bad `delta_t` and
    /// [`EvaluationError::MissingCulmDensity`] if a plant has no culm density.
    pub(crate) fn derivatives(
        &self,
        state: &PopulationState,
        delta_t: Time,
    ) -> Result<PopulationState, EvaluationError> {
        check_step(delta_t)?;

        let soil_kinetics = self.soil.kinetics(self.parameters, delta_t);
        let soil_concentration = soil_kinetics.nitrates_concentration(state.soil.nitrates);
        let mut soil_contributors = Vec::new();

        let plants = self
            .population
            .plants
            .iter()
            .zip(&state.plants)
            .map(|(plant, axes)| {
                plant
                    .axes
                    .iter()
                    .zip(axes)
                    .map(|(axis, axis_state)| {
                        let (derivatives, uptake) =
                            self.axis_derivatives(axis, axis_state, soil_concentration, delta_t);
                        soil_contributors.push(SoilContributor {
                            plant: plant.index,
                            nitrates_uptake: uptake,
                        });
                        derivatives
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let nitrates = soil_kinetics.nitrates_derivative(
            soil_kinetics.mineralisation(),
            &soil_contributors,
            self.culm_density,
        )?;

        Ok(PopulationState {
            plants,
            soil: SoilCompartments { nitrates },
        })
    }

    /// Derivatives of one axis, with the nitrates its roots take from the soil.
    fn axis_derivatives(
        &self,
        axis: &Axis,
        state: &AxisState,
        soil_concentration: f64,
        delta_t: Time,
    ) -> (AxisState, f64) {
        let parameters = self.parameters;
        let totals = axis.totals();
        let phloem = PhloemView {
            sucrose: state.phloem.sucrose,
            amino_acids: state.phloem.amino_acids,
            mstruct_axis: totals.mstruct.get::<gram>(),
            alpha_axis: parameters.axis.alpha,
        };
        let mut contributors = Vec::new();

        let roots = axis.roots.kinetics(parameters, delta_t);
        let roots_fluxes = roots.fluxes(
            &state.roots,
            &phloem,
            soil_concentration,
            totals.surfacic_transpiration(),
        );
        let root_exports = roots_fluxes.exports(totals.transpiration);
        contributors.push(PhloemContributor::Roots {
            sucrose_unloading: roots_fluxes.sucrose_unloading,
            amino_acids_unloading: roots_fluxes.amino_acids_unloading,
            mstruct: axis.roots.mstruct.grams(),
            alpha: parameters.roots.alpha,
        });

        let grains = axis
            .grains
            .as_ref()
            .zip(state.grains.as_ref())
            .map(|(grains, grains_state)| {
                let kinetics = grains.kinetics(parameters, delta_t);
                let fluxes = kinetics.fluxes(grains_state, &phloem);
                contributors.push(PhloemContributor::Grains {
                    structure_synthesis: fluxes.structure_synthesis,
                    starch_synthesis: fluxes.starch_synthesis,
                    structural_dry_mass: kinetics.structural_dry_mass(),
                    proteins_synthesis: fluxes.proteins_synthesis,
                });
                kinetics.derivatives(
                    &fluxes,
                    grains.structure_respiration,
                    grains.starch_respiration,
                )
            });

        let phytomers = axis
            .phytomers
            .iter()
            .zip(&state.phytomers)
            .map(|(phytomer, phytomer_state)| {
                self.phytomer_derivatives(
                    phytomer,
                    phytomer_state,
                    &phloem,
                    root_exports,
                    delta_t,
                    &mut contributors,
                )
            })
            .collect();

        let derivatives = AxisState {
            roots: roots.derivatives(&roots_fluxes, axis.roots.respiration),
            phloem: Phloem::derivatives(&contributors),
            grains,
            phytomers,
        };
        (derivatives, roots_fluxes.nitrates_uptake)
    }

    /// Derivatives of the elements and hidden zone of one phytomer.
    ///
    /// Growing elements export into the hidden zone; every other element,
    /// and the hidden zone itself, exchanges with the phloem.
    fn phytomer_derivatives(
        &self,
        phytomer: &Phytomer,
        state: &PhytomerState,
        phloem: &PhloemView,
        root_exports: RootExports,
        delta_t: Time,
        contributors: &mut Vec<PhloemContributor>,
    ) -> PhytomerState {
        let parameters = self.parameters;
        let hidden_zone = phytomer.hidden_zone.as_ref().zip(state.hidden_zone.as_ref());
        let hidden_zone_view: Option<HiddenZoneView> =
            hidden_zone.map(|(zone, zone_state)| zone.view(zone_state));

        let mut sucrose_export = 0.0;
        let mut amino_acids_export = 0.0;
        let mut elements = Vec::with_capacity(state.elements.len());
        for ((kind, _, element), element_state) in phytomer.elements().zip(&state.elements) {
            let target = match hidden_zone_view {
                Some(view) if element.is_growing => LoadingTarget::HiddenZone(view),
                _ => LoadingTarget::Phloem(*phloem),
            };
            let kinetics = element.kinetics(kind, parameters, delta_t);
            let fluxes = kinetics.fluxes(
                element_state,
                &ElementNeighbors {
                    target,
                    root_exports,
                },
            );
            match target {
                LoadingTarget::HiddenZone(_) => {
                    sucrose_export += fluxes.sucrose_loading;
                    amino_acids_export += fluxes.amino_acids_loading;
                }
                LoadingTarget::Phloem(_) => contributors.push(PhloemContributor::Element {
                    sucrose_loading: fluxes.sucrose_loading,
                    amino_acids_loading: fluxes.amino_acids_loading,
                }),
            }
            elements.push(kinetics.derivatives(&fluxes, element.respiration));
        }

        let hidden_zone = hidden_zone.map(|(zone, zone_state)| {
            let kinetics = zone.kinetics(parameters, delta_t);
            let fluxes = kinetics.fluxes(zone_state, phloem);
            contributors.push(PhloemContributor::HiddenZone {
                sucrose_unloading: fluxes.sucrose_unloading,
                amino_acids_unloading: fluxes.amino_acids_unloading,
            });
            kinetics.derivatives(&fluxes, sucrose_export, amino_acids_export)
        });

        PhytomerState {
            elements,
            hidden_zone,
        }
    }
}
