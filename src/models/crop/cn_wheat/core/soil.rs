use std::collections::BTreeMap;

use uom::si::{
    f64::{ThermodynamicTemperature, Time, Volume},
    time::second,
    volume::cubic_meter,
};

use crate::support::constraint::{Constrained, NonNegative, StrictlyPositive};

use super::{
    error::{EvaluationError, TreeError},
    params::{Parameters, SoilParameters},
    state::impl_compartments,
};

/// Compartments of the soil.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoilCompartments {
    /// µmol N
    pub nitrates: f64,
}

impl_compartments!(SoilCompartments {
    nitrates => Nitrates,
});

/// Soil volume explored by the roots of the whole population.
#[derive(Debug, Clone, PartialEq)]
pub struct Soil {
    volume: Constrained<Volume, StrictlyPositive>,
    pub temperature: ThermodynamicTemperature,
    pub compartments: SoilCompartments,
}

impl Soil {
    /// # Errors
    ///
    /// Returns [`TreeError::SoilVolume`] if `volume` is not strictly positive.
    pub fn new(
        volume: Volume,
        temperature: ThermodynamicTemperature,
        compartments: SoilCompartments,
    ) -> Result<Self, TreeError> {
        Ok(Self {
            volume: StrictlyPositive::new(volume).map_err(TreeError::SoilVolume)?,
            temperature,
            compartments,
        })
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        *self.volume.as_ref()
    }

    #[must_use]
    pub fn kinetics<'a>(&self, parameters: &'a Parameters, delta_t: Time) -> SoilKinetics<'a> {
        SoilKinetics {
            volume: self.volume.as_ref().get::<cubic_meter>(),
            delta_t: delta_t.get::<second>(),
            soil: &parameters.soil,
        }
    }
}

/// Nitrate uptake of one plant's roots, drawn from the soil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilContributor {
    pub plant: usize,
    /// µmol N
    pub nitrates_uptake: f64,
}

/// Number of culms per unit soil area, per plant.
///
/// Scales a single culm's uptake to the depletion of the shared soil pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CulmDensity(BTreeMap<usize, Constrained<f64, NonNegative>>);

impl CulmDensity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the culm density (culms m⁻²) of a plant.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CulmDensity`] if the density is negative or `NaN`.
    pub fn with(mut self, plant: usize, density: f64) -> Result<Self, TreeError> {
        let density = NonNegative::new(density)
            .map_err(|source| TreeError::CulmDensity { plant, source })?;
        self.0.insert(plant, density);
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, plant: usize) -> Option<f64> {
        self.0.get(&plant).map(|density| density.into_inner())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SoilKinetics<'a> {
    volume: f64,
    delta_t: f64,
    soil: &'a SoilParameters,
}

impl SoilKinetics<'_> {
    /// Nitrate concentration of the soil (µmol N m⁻³), never negative.
    #[must_use]
    pub fn nitrates_concentration(&self, nitrates: f64) -> f64 {
        (nitrates / self.volume).max(0.0)
    }

    /// Nitrates produced by mineralisation over the step (µmol N).
    #[must_use]
    pub fn mineralisation(&self) -> f64 {
        self.soil.mineralisation_rate * self.delta_t
    }

    /// Mineralisation minus the uptake of every contributing plant, scaled
    /// by its culm density.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::MissingCulmDensity`] if a contributor's
    /// plant has no culm density.
    pub fn nitrates_derivative(
        &self,
        mineralisation: f64,
        contributors: &[SoilContributor],
        culm_density: &CulmDensity,
    ) -> Result<f64, EvaluationError> {
        contributors.iter().try_fold(mineralisation, |acc, contributor| {
            let density = culm_density
                .get(contributor.plant)
                .ok_or(EvaluationError::MissingCulmDensity(contributor.plant))?;
            Ok(acc - contributor.nitrates_uptake * density)
        })
    }
}
