//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for structural quantities (masses, areas, volumes,
//! durations). Metabolite pools, however, are tracked as plain `f64` amounts
//! in micromoles of an element (µmol C, µmol N), since a pool of sucrose is
//! counted by its carbon atoms rather than by molecules.
//!
//! ## Molar conversions
//!
//! The [`MolarConversion`] trait converts between a mass of an element and
//! its amount in micromoles:
//!
//! ```
//! use twine_crop_models::support::units::MolarConversion;
//! use uom::si::{f64::{Mass, MolarMass}, mass::gram, molar_mass::gram_per_mole};
//!
//! let nitrogen = MolarMass::new::<gram_per_mole>(14.0);
//! let n_struct = Mass::new::<gram>(0.0014);
//!
//! let micromoles = n_struct.to_micromoles(nitrogen);
//! assert!((micromoles - 100.0).abs() < 1e-9);
//! ```

mod molar;

pub use molar::MolarConversion;
