//! Organ and element engines.
//!
//! Each engine pairs an entity record with a `*Kinetics` context that
//! exposes the kinetic laws (fluxes over one step) and the mass balances
//! (compartment derivatives) of that entity. Kinetics never mutate the
//! entity: every current amount is passed in explicitly, as are the
//! neighbouring pools an organ exchanges with.

mod element;
mod grains;
mod hidden_zone;
mod phloem;
mod roots;

use std::fmt;

pub use element::{
    ElementCompartments, ElementFluxes, ElementKinetics, ElementNeighbors, LoadingTarget,
    PhotosyntheticOrganElement,
};
pub use grains::{Grains, GrainsCompartments, GrainsFluxes, GrainsKinetics, structural_dry_mass};
pub use hidden_zone::{
    HiddenZone, HiddenZoneCompartments, HiddenZoneFluxes, HiddenZoneKinetics, HiddenZoneView,
};
pub use phloem::{Phloem, PhloemCompartments, PhloemContributor, PhloemView};
pub use roots::{RootExports, Roots, RootsCompartments, RootsFluxes, RootsKinetics};

/// Tissue kind of a photosynthetic organ.
///
/// Variants are declared in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrganKind {
    Chaff,
    Peduncle,
    Lamina,
    Internode,
    Sheath,
}

impl OrganKind {
    /// All tissue kinds in layout order.
    pub const ALL: [OrganKind; 5] = [
        OrganKind::Chaff,
        OrganKind::Peduncle,
        OrganKind::Lamina,
        OrganKind::Internode,
        OrganKind::Sheath,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chaff => "chaff",
            Self::Peduncle => "peduncle",
            Self::Lamina => "lamina",
            Self::Internode => "internode",
            Self::Sheath => "sheath",
        }
    }
}

impl fmt::Display for OrganKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of an element within its photosynthetic organ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementPosition {
    /// Part of the organ visible outside the enclosing sheaths.
    Exposed,
    /// Part of the organ hidden inside the enclosing sheaths.
    Enclosed,
}

impl fmt::Display for ElementPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exposed => "exposed",
            Self::Enclosed => "enclosed",
        })
    }
}

/// Conductance of a transport-resistance exchange over one step.
///
/// `sigma * beta * mstruct^(2/3) * delta_t`, with `mstruct` in grams.
fn conductance(sigma: f64, beta: f64, mstruct: f64, delta_t: f64) -> f64 {
    sigma * beta * mstruct.powf(2.0 / 3.0) * delta_t
}
