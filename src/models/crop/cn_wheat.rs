//! CN-Wheat: carbon and nitrogen partitioning in a wheat population.
//!
//! [`CnWheat`] owns the composition tree of the population and the shared
//! soil, and exposes the right-hand side of the compartment ODE system to an
//! external integrator through [`twine_core::Model`]. The computational core
//! is in the internal [`core`] module.
//!
//! A typical step:
//!
//! 1. Read the accepted state with [`CnWheat::initial_state`].
//! 2. Let the integrator call the model at as many trial states as it needs.
//! 3. Write the accepted result back with [`CnWheat::commit`], which also
//!    recomputes the integrative variables of the tree.

pub(crate) mod core;

use tracing::{debug, warn};
use twine_core::Model;
use uom::si::f64::Time;

pub use self::core::{
    Axis, AxisBuilder, AxisParameters, AxisTotals, Compartment, CompartmentAddress, Compartments,
    CulmDensity, ElementCompartments, ElementFluxes, ElementKinetics, ElementNeighbors,
    ElementParameters, ElementPosition, EntityPath, EvaluationError, Grains, GrainsCompartments,
    GrainsFluxes, GrainsKinetics, GrainsParameters, HiddenZone, HiddenZoneCompartments,
    HiddenZoneFluxes, HiddenZoneKinetics, HiddenZoneParameters, HiddenZoneView, LoadingTarget,
    OrganKind, Parameters, Phloem, PhloemCompartments, PhloemContributor, PhloemView,
    PhotosyntheticOrgan, PhotosyntheticOrganElement, PhotosyntheticOrganParameters, Phytomer,
    Plant, Population, RootExports, Roots, RootsCompartments, RootsFluxes, RootsKinetics,
    RootsParameters, Soil, SoilCompartments, SoilContributor, SoilKinetics, SoilParameters,
    StateLayout, StructuralMass, TissueParameters, TreeError, constants, structural_dry_mass,
};

use self::core::{Evaluation, PopulationState, aggregate};

/// Input of one derivative evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeInput {
    /// Trial compartment values, laid out as [`CnWheat::layout`] describes.
    pub compartments: Vec<f64>,
    /// Duration of the integration step the fluxes are computed over.
    pub delta_t: Time,
}

/// CN-Wheat model of a plant population and its soil.
///
/// Calling the model never changes it: derivatives are computed from the
/// trial compartments in the input and from the structural inputs and
/// integrative variables stored in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CnWheat {
    population: Population,
    soil: Soil,
    culm_density: CulmDensity,
    parameters: Parameters,
    layout: StateLayout,
}

impl CnWheat {
    /// Validates the population and computes its integrative variables.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if the tree is malformed or a plant has no
    /// culm density.
    pub fn new(
        mut population: Population,
        soil: Soil,
        culm_density: CulmDensity,
        parameters: Parameters,
    ) -> Result<Self, TreeError> {
        check_population(&population, &culm_density)?;
        aggregate(&mut population);
        let layout = StateLayout::new(&population);
        debug!(
            plants = population.plants.len(),
            compartments = layout.len(),
            "built CN-Wheat model"
        );
        Ok(Self {
            population,
            soil,
            culm_density,
            parameters,
            layout,
        })
    }

    /// Accepted compartment values, in layout order.
    #[must_use]
    pub fn initial_state(&self) -> Vec<f64> {
        PopulationState::from_tree(&self.population, &self.soil).to_vec()
    }

    /// Stores an accepted state and recomputes the integrative variables.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::StateLength`] if `accepted` does not match
    /// the layout. The model is left unchanged in that case.
    pub fn commit(&mut self, accepted: &[f64]) -> Result<(), EvaluationError> {
        let state = self.read(accepted)?;
        state.apply_to(&mut self.population, &mut self.soil);
        aggregate(&mut self.population);
        debug!(
            compartments = accepted.len(),
            soil_nitrates = self.soil.compartments.nitrates,
            "committed accepted state"
        );
        Ok(())
    }

    /// Applies an external change to the tree, such as growth of structural
    /// masses or new microclimate inputs, between two integration steps.
    ///
    /// The updated tree is validated, aggregated and laid out again, so the
    /// layout may change if entities were added.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if the updated tree is invalid. The model is
    /// left unchanged in that case.
    pub fn update_population<F>(&mut self, update: F) -> Result<(), TreeError>
    where
        F: FnOnce(&mut Population),
    {
        let mut population = self.population.clone();
        update(&mut population);
        check_population(&population, &self.culm_density)?;
        aggregate(&mut population);
        self.layout = StateLayout::new(&population);
        self.population = population;
        debug!(
            compartments = self.layout.len(),
            "updated plant population"
        );
        Ok(())
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn soil(&self) -> &Soil {
        &self.soil
    }

    #[must_use]
    pub fn culm_density(&self) -> &CulmDensity {
        &self.culm_density
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Mapping between compartment vector indices and tree positions.
    #[must_use]
    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    fn read(&self, values: &[f64]) -> Result<PopulationState, EvaluationError> {
        PopulationState::read(&self.population, values).ok_or(EvaluationError::StateLength {
            expected: self.layout.len(),
            actual: values.len(),
        })
    }
}

fn check_population(population: &Population, culm_density: &CulmDensity) -> Result<(), TreeError> {
    population.validate()?;
    match population
        .plants
        .iter()
        .find(|plant| culm_density.get(plant.index).is_none())
    {
        Some(plant) => {
            let error = TreeError::MissingCulmDensity(plant.index);
            warn!(%error, "rejected plant population");
            Err(error)
        }
        None => Ok(()),
    }
}

impl Model for CnWheat {
    type Input = DerivativeInput;
    type Output = Vec<f64>;
    type Error = EvaluationError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let state = self.read(&input.compartments)?;
        let evaluation = Evaluation {
            population: &self.population,
            soil: &self.soil,
            culm_density: &self.culm_density,
            parameters: &self.parameters,
        };
        Ok(evaluation.derivatives(&state, input.delta_t)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{mass::gram, time::hour};

    use super::*;
    use crate::models::crop::cn_wheat::core::{
        constants::amino_acid_carbon_per_nitrogen,
        test_support::{closed_parameters, culm_density, populated_axis, soil},
    };

    fn model() -> CnWheat {
        CnWheat::new(populated_axis(), soil(2_000.0), culm_density(1), closed_parameters()).unwrap()
    }

    fn input(model: &CnWheat, delta_t: Time) -> DerivativeInput {
        DerivativeInput {
            compartments: model.initial_state(),
            delta_t,
        }
    }

    fn carbon_weight(compartment: Compartment) -> f64 {
        match compartment {
            Compartment::TriosePhosphates
            | Compartment::Starch
            | Compartment::Sucrose
            | Compartment::Fructan
            | Compartment::Structure => 1.0,
            Compartment::AminoAcids | Compartment::Proteins => amino_acid_carbon_per_nitrogen(),
            Compartment::Nitrates | Compartment::Cytokinins => 0.0,
        }
    }

    fn nitrogen_weight(compartment: Compartment) -> f64 {
        match compartment {
            Compartment::Nitrates | Compartment::AminoAcids | Compartment::Proteins => 1.0,
            _ => 0.0,
        }
    }

    /// Weighted sum of the derivatives and the sum of its absolute terms.
    fn balance(model: &CnWheat, derivatives: &[f64], weight: fn(Compartment) -> f64) -> (f64, f64) {
        model
            .layout()
            .addresses()
            .zip(derivatives)
            .map(|(address, d)| weight(address.compartment) * d)
            .fold((0.0, 0.0), |(sum, scale), term| (sum + term, scale + term.abs()))
    }

    #[test]
    fn closed_axis_conserves_carbon_and_nitrogen() {
        let model = model();
        for hours in [1e-3, 1.0, 24.0] {
            let derivatives = model.call(&input(&model, Time::new::<hour>(hours))).unwrap();

            let (carbon, scale) = balance(&model, &derivatives, carbon_weight);
            assert!(scale > 0.0);
            assert!(carbon.abs() <= 1e-9 * scale, "carbon drift {carbon} at {hours} h");

            let (nitrogen, scale) = balance(&model, &derivatives, nitrogen_weight);
            assert!(scale > 0.0);
            assert!(nitrogen.abs() <= 1e-9 * scale, "nitrogen drift {nitrogen} at {hours} h");
        }
    }

    #[test]
    fn calling_leaves_the_model_untouched() {
        let model = model();
        let before = model.clone();
        let mut trial = input(&model, Time::new::<hour>(1.0));
        for value in &mut trial.compartments {
            *value *= 0.5;
        }
        model.call(&trial).unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn derivatives_follow_the_layout() {
        let model = model();
        let derivatives = model.call(&input(&model, Time::new::<hour>(1.0))).unwrap();
        assert_eq!(derivatives.len(), model.layout().len());
        assert!(derivatives.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn rejects_bad_inputs() {
        let model = model();
        let mut short = input(&model, Time::new::<hour>(1.0));
        short.compartments.pop();
        assert_eq!(
            model.call(&short),
            Err(EvaluationError::StateLength {
                expected: model.layout().len(),
                actual: model.layout().len() - 1,
            })
        );

        let still = input(&model, Time::new::<hour>(0.0));
        assert_eq!(
            model.call(&still),
            Err(EvaluationError::InvalidStep { seconds: 0.0 })
        );
    }

    #[test]
    fn every_plant_needs_a_culm_density() {
        let result = CnWheat::new(
            populated_axis(),
            soil(0.0),
            CulmDensity::new(),
            Parameters::default(),
        );
        assert_eq!(result, Err(TreeError::MissingCulmDensity(1)));
    }

    #[test]
    fn commit_refreshes_integrative_variables() {
        let mut model = model();
        let mstruct_before = model.population().plants[0].axes[0].mstruct();

        let grains_structure = CompartmentAddress {
            entity: EntityPath::Grains { plant: 1, axis: 0 },
            compartment: Compartment::Structure,
        };
        let index = model.layout().index_of(&grains_structure).unwrap();
        let mut accepted = model.initial_state();
        // 32 000 µmol C of grain structure weigh one gram.
        accepted[index] += 32_000.0;
        model.commit(&accepted).unwrap();

        assert_eq!(model.initial_state(), accepted);
        let axis = &model.population().plants[0].axes[0];
        assert_relative_eq!(
            (axis.mstruct() - mstruct_before).get::<gram>(),
            1.0,
            epsilon = 1e-12
        );
        assert_eq!(axis.totals().mstruct, axis.mstruct());

        assert!(matches!(
            model.commit(&accepted[1..]),
            Err(EvaluationError::StateLength { .. })
        ));
    }

    #[test]
    fn structure_updates_rebuild_the_layout() {
        let mut model = model();
        let compartments = model.layout().len();

        model
            .update_population(|population| {
                let axis = &mut population.plants[0].axes[0];
                axis.phytomers[1].hidden_zone = None;
            })
            .unwrap();
        assert_eq!(
            model.layout().len(),
            compartments - HiddenZoneCompartments::KINDS.len()
        );
        assert_eq!(model.initial_state().len(), model.layout().len());

        let before = model.clone();
        let result = model.update_population(|population| population.plants.clear());
        assert_eq!(result, Err(TreeError::EmptyPopulation));
        assert_eq!(model, before);
    }
}
