//! Compartmental carbon and nitrogen exchange within cereal plants.
//!
//! The core holds the composition tree of a plant population, the kinetic
//! laws and mass balances of every organ and element, and the two passes
//! that act on the tree: derivative evaluation (pure, run many times per
//! step at trial states) and aggregation (the only writer of derived
//! fields, run once per accepted state).

mod aggregate;
pub mod constants;
mod error;
mod evaluate;
mod layout;
mod organ;
mod params;
mod soil;
mod state;
mod structural_mass;
mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{EvaluationError, TreeError};
pub use layout::{CompartmentAddress, EntityPath, StateLayout};
pub use organ::{
    ElementCompartments, ElementFluxes, ElementKinetics, ElementNeighbors, ElementPosition,
    Grains, GrainsCompartments, GrainsFluxes, GrainsKinetics, HiddenZone, HiddenZoneCompartments,
    HiddenZoneFluxes, HiddenZoneKinetics, HiddenZoneView, LoadingTarget, OrganKind, Phloem,
    PhloemCompartments, PhloemContributor, PhloemView, PhotosyntheticOrganElement, RootExports,
    Roots, RootsCompartments, RootsFluxes, RootsKinetics, structural_dry_mass,
};
pub use params::{
    AxisParameters, ElementParameters, GrainsParameters, HiddenZoneParameters, Parameters,
    PhotosyntheticOrganParameters, RootsParameters, SoilParameters, TissueParameters,
};
pub use soil::{CulmDensity, Soil, SoilCompartments, SoilContributor, SoilKinetics};
pub use state::{Compartment, Compartments};
pub use structural_mass::StructuralMass;
pub use tree::{Axis, AxisBuilder, AxisTotals, PhotosyntheticOrgan, Phytomer, Plant, Population};

pub(crate) use aggregate::aggregate;
pub(crate) use evaluate::Evaluation;
pub(crate) use layout::PopulationState;
