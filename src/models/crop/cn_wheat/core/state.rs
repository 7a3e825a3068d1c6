//! Compartment bookkeeping shared by every entity.

use std::fmt;

/// A named pool of a compound owned by one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compartment {
    TriosePhosphates,
    Starch,
    Sucrose,
    Fructan,
    Nitrates,
    AminoAcids,
    Proteins,
    Cytokinins,
    Structure,
}

impl Compartment {
    /// Snake-case name of the compartment.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TriosePhosphates => "triose_phosphates",
            Self::Starch => "starch",
            Self::Sucrose => "sucrose",
            Self::Fructan => "fructan",
            Self::Nitrates => "nitrates",
            Self::AminoAcids => "amino_acids",
            Self::Proteins => "proteins",
            Self::Cytokinins => "cytokinins",
            Self::Structure => "structure",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed set of compartments held by one kind of entity.
///
/// The same type carries both the amounts and their time derivatives.
/// Values are laid out in the order given by [`Compartments::KINDS`].
pub trait Compartments: Copy + Default {
    /// Compartments of this entity kind, in layout order.
    const KINDS: &'static [Compartment];

    /// Reads the compartments from exactly `KINDS.len()` values.
    ///
    /// Returns `None` if the slice has the wrong length.
    fn from_values(values: &[f64]) -> Option<Self>;

    /// Appends the compartments to `out` in layout order.
    fn extend_values(&self, out: &mut Vec<f64>);
}

/// Implements [`Compartments`] for a struct of `f64` fields.
macro_rules! impl_compartments {
    ($ty:ty { $($field:ident => $kind:ident),+ $(,)? }) => {
        impl $crate::models::crop::cn_wheat::core::state::Compartments for $ty {
            const KINDS: &'static [$crate::models::crop::cn_wheat::core::state::Compartment] =
                &[$($crate::models::crop::cn_wheat::core::state::Compartment::$kind),+];

            fn from_values(values: &[f64]) -> Option<Self> {
                let &[$($field),+] = values else {
                    return None;
                };
                Some(Self { $($field),+ })
            }

            fn extend_values(&self, out: &mut Vec<f64>) {
                out.extend_from_slice(&[$(self.$field),+]);
            }
        }
    };
}

pub(crate) use impl_compartments;

/// Sequential reader over a flat compartment vector.
#[derive(Debug)]
pub(crate) struct StateReader<'a> {
    values: &'a [f64],
}

impl<'a> StateReader<'a> {
    pub(crate) fn new(values: &'a [f64]) -> Self {
        Self { values }
    }

    /// Reads the next entity's compartments, or `None` if too few values remain.
    pub(crate) fn next<C: Compartments>(&mut self) -> Option<C> {
        let n = C::KINDS.len();
        if self.values.len() < n {
            return None;
        }
        let (head, rest) = self.values.split_at(n);
        self.values = rest;
        C::from_values(head)
    }

    /// Returns `true` once every value has been consumed.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.values.is_empty()
    }
}
