use thiserror::Error;

use crate::support::constraint::ConstraintError;

use super::organ::OrganKind;

/// Configuration errors detected while building or validating a plant population.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The population contains no plants.
    #[error("population has no plants")]
    EmptyPopulation,

    /// Two plants share the same index.
    #[error("plant index {0} is used more than once")]
    DuplicatePlant(usize),

    /// A plant has no axes.
    #[error("plant {plant} has no axes")]
    PlantWithoutAxes { plant: usize },

    /// An axis was built without roots.
    #[error("axis {axis:?} has no roots")]
    MissingRoots { axis: String },

    /// An axis was built without a phloem.
    #[error("axis {axis:?} has no phloem")]
    MissingPhloem { axis: String },

    /// An axis has no phytomers.
    #[error("axis {axis:?} of plant {plant} has no phytomers")]
    AxisWithoutPhytomers { plant: usize, axis: String },

    /// Two phytomers of the same axis share the same index.
    #[error("phytomer index {phytomer} is used more than once on axis {axis:?}")]
    DuplicatePhytomer { axis: String, phytomer: usize },

    /// A phytomer holds neither a photosynthetic organ nor a hidden zone.
    #[error("phytomer {phytomer} of axis {axis:?} is empty")]
    EmptyPhytomer { axis: String, phytomer: usize },

    /// A photosynthetic organ holds neither an exposed nor an enclosed element.
    #[error("{organ} of phytomer {phytomer} on axis {axis:?} has no elements")]
    OrganWithoutElements {
        axis: String,
        phytomer: usize,
        organ: OrganKind,
    },

    /// No culm density was supplied for a plant.
    #[error("no culm density for plant {0}")]
    MissingCulmDensity(usize),

    /// A structural mass is not strictly positive.
    #[error("invalid structural mass for {entity}")]
    StructuralMass {
        entity: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// The soil volume is not strictly positive.
    #[error("invalid soil volume")]
    SoilVolume(#[source] ConstraintError),

    /// A culm density is negative or not a number.
    #[error("invalid culm density for plant {plant}")]
    CulmDensity {
        plant: usize,
        #[source]
        source: ConstraintError,
    },
}

/// Errors returned by the derivative callback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The compartment vector does not match the model layout.
    #[error("expected {expected} compartment values, got {actual}")]
    StateLength { expected: usize, actual: usize },

    /// The step duration is not finite and strictly positive.
    #[error("step duration must be finite and strictly positive, got {seconds} s")]
    InvalidStep { seconds: f64 },

    /// No culm density is known for a plant.
    #[error("no culm density for plant {0}")]
    MissingCulmDensity(usize),
}
