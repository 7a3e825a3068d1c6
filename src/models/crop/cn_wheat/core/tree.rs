//! Composition tree of a plant population.
//!
//! `Population → Plant → Axis → {Roots, Phloem, Grains?, Phytomer*}` and
//! `Phytomer → {PhotosyntheticOrgan{Exposed, Enclosed}*, HiddenZone?}`.
//! Each node exclusively owns its children. Derived fields (structural
//! masses, green areas, transpiration) are written by aggregation only.

use std::collections::BTreeSet;

use tracing::warn;
use uom::si::{
    area::square_meter,
    f64::{Area, Mass},
    mass::gram,
};

use super::{
    error::TreeError,
    organ::{ElementPosition, Grains, HiddenZone, OrganKind, Phloem, PhotosyntheticOrganElement, Roots},
};

/// All simulated plants.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub plants: Vec<Plant>,
}

impl Population {
    #[must_use]
    pub fn new(plants: Vec<Plant>) -> Self {
        Self { plants }
    }

    /// Checks the structural invariants of the whole tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] found, walking plants, axes and
    /// phytomers in order.
    pub fn validate(&self) -> Result<(), TreeError> {
        let result = self.check();
        if let Err(error) = &result {
            warn!(%error, "rejected plant population");
        }
        result
    }

    fn check(&self) -> Result<(), TreeError> {
        if self.plants.is_empty() {
            return Err(TreeError::EmptyPopulation);
        }
        let mut indices = BTreeSet::new();
        for plant in &self.plants {
            if !indices.insert(plant.index) {
                return Err(TreeError::DuplicatePlant(plant.index));
            }
            plant.check()?;
        }
        Ok(())
    }
}

/// One plant, identified by its index in the population.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub index: usize,
    pub axes: Vec<Axis>,
}

impl Plant {
    #[must_use]
    pub fn new(index: usize, axes: Vec<Axis>) -> Self {
        Self { index, axes }
    }

    fn check(&self) -> Result<(), TreeError> {
        if self.axes.is_empty() {
            return Err(TreeError::PlantWithoutAxes { plant: self.index });
        }
        self.axes.iter().try_for_each(|axis| axis.check(self.index))
    }
}

/// Integrative variables of an axis, written by aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTotals {
    /// Roots + grain structural dry mass + all phytomers.
    pub mstruct: Mass,
    /// Summed element transpiration (mmol H₂O s⁻¹).
    pub transpiration: f64,
    /// Summed element green area.
    pub green_area: Area,
}

impl AxisTotals {
    /// Culm transpiration per unit green area (mmol H₂O m⁻² s⁻¹).
    ///
    /// Zero when the axis has no green area.
    #[must_use]
    pub fn surfacic_transpiration(&self) -> f64 {
        let area = self.green_area.get::<square_meter>();
        if area > 0.0 {
            self.transpiration / area
        } else {
            0.0
        }
    }
}

impl Default for AxisTotals {
    fn default() -> Self {
        Self {
            mstruct: Mass::new::<gram>(0.0),
            transpiration: 0.0,
            green_area: Area::new::<square_meter>(0.0),
        }
    }
}

/// A culm: main stem or tiller.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub roots: Roots,
    pub phloem: Phloem,
    pub grains: Option<Grains>,
    pub phytomers: Vec<Phytomer>,
    totals: AxisTotals,
}

impl Axis {
    /// Starts building an axis with the given label.
    #[must_use]
    pub fn builder(label: impl Into<String>) -> AxisBuilder {
        AxisBuilder {
            label: label.into(),
            roots: None,
            phloem: None,
            grains: None,
            phytomers: Vec::new(),
        }
    }

    /// Integrative variables as of the last aggregation.
    #[must_use]
    pub fn totals(&self) -> &AxisTotals {
        &self.totals
    }

    /// Structural mass of the axis as of the last aggregation.
    #[must_use]
    pub fn mstruct(&self) -> Mass {
        self.totals.mstruct
    }

    pub(crate) fn set_totals(&mut self, totals: AxisTotals) {
        self.totals = totals;
    }

    fn check(&self, plant: usize) -> Result<(), TreeError> {
        if self.phytomers.is_empty() {
            return Err(TreeError::AxisWithoutPhytomers {
                plant,
                axis: self.label.clone(),
            });
        }
        let mut indices = BTreeSet::new();
        for phytomer in &self.phytomers {
            if !indices.insert(phytomer.index) {
                return Err(TreeError::DuplicatePhytomer {
                    axis: self.label.clone(),
                    phytomer: phytomer.index,
                });
            }
            phytomer.check(&self.label)?;
        }
        Ok(())
    }
}

/// Builder for an [`Axis`], which requires roots and a phloem.
#[derive(Debug, Clone)]
pub struct AxisBuilder {
    label: String,
    roots: Option<Roots>,
    phloem: Option<Phloem>,
    grains: Option<Grains>,
    phytomers: Vec<Phytomer>,
}

impl AxisBuilder {
    #[must_use]
    pub fn roots(mut self, roots: Roots) -> Self {
        self.roots = Some(roots);
        self
    }

    #[must_use]
    pub fn phloem(mut self, phloem: Phloem) -> Self {
        self.phloem = Some(phloem);
        self
    }

    #[must_use]
    pub fn grains(mut self, grains: Grains) -> Self {
        self.grains = Some(grains);
        self
    }

    #[must_use]
    pub fn phytomer(mut self, phytomer: Phytomer) -> Self {
        self.phytomers.push(phytomer);
        self
    }

    /// Builds the axis.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::MissingRoots`] or [`TreeError::MissingPhloem`]
    /// if either was never supplied.
    pub fn build(self) -> Result<Axis, TreeError> {
        let roots = self.roots.ok_or_else(|| TreeError::MissingRoots {
            axis: self.label.clone(),
        })?;
        let phloem = self.phloem.ok_or_else(|| TreeError::MissingPhloem {
            axis: self.label.clone(),
        })?;
        Ok(Axis {
            label: self.label,
            roots,
            phloem,
            grains: self.grains,
            phytomers: self.phytomers,
            totals: AxisTotals::default(),
        })
    }
}

/// A metamer of an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Phytomer {
    pub index: usize,
    pub chaff: Option<PhotosyntheticOrgan>,
    pub peduncle: Option<PhotosyntheticOrgan>,
    pub lamina: Option<PhotosyntheticOrgan>,
    pub internode: Option<PhotosyntheticOrgan>,
    pub sheath: Option<PhotosyntheticOrgan>,
    pub hidden_zone: Option<HiddenZone>,
    mstruct: Mass,
}

impl Phytomer {
    /// Creates an empty phytomer. At least one organ must be added before use.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            chaff: None,
            peduncle: None,
            lamina: None,
            internode: None,
            sheath: None,
            hidden_zone: None,
            mstruct: Mass::new::<gram>(0.0),
        }
    }

    /// Adds or replaces the organ of the given kind.
    #[must_use]
    pub fn with_organ(mut self, kind: OrganKind, organ: PhotosyntheticOrgan) -> Self {
        *self.organ_slot(kind) = Some(organ);
        self
    }

    #[must_use]
    pub fn with_hidden_zone(mut self, hidden_zone: HiddenZone) -> Self {
        self.hidden_zone = Some(hidden_zone);
        self
    }

    /// Returns the organ of the given kind, if present.
    #[must_use]
    pub fn organ(&self, kind: OrganKind) -> Option<&PhotosyntheticOrgan> {
        match kind {
            OrganKind::Chaff => self.chaff.as_ref(),
            OrganKind::Peduncle => self.peduncle.as_ref(),
            OrganKind::Lamina => self.lamina.as_ref(),
            OrganKind::Internode => self.internode.as_ref(),
            OrganKind::Sheath => self.sheath.as_ref(),
        }
    }

    fn organ_slot(&mut self, kind: OrganKind) -> &mut Option<PhotosyntheticOrgan> {
        match kind {
            OrganKind::Chaff => &mut self.chaff,
            OrganKind::Peduncle => &mut self.peduncle,
            OrganKind::Lamina => &mut self.lamina,
            OrganKind::Internode => &mut self.internode,
            OrganKind::Sheath => &mut self.sheath,
        }
    }

    /// Present organs in layout order.
    pub fn organs(&self) -> impl Iterator<Item = (OrganKind, &PhotosyntheticOrgan)> {
        OrganKind::ALL
            .into_iter()
            .filter_map(|kind| self.organ(kind).map(|organ| (kind, organ)))
    }

    /// Present organs in layout order, mutably.
    pub fn organs_mut(&mut self) -> impl Iterator<Item = (OrganKind, &mut PhotosyntheticOrgan)> {
        [
            (OrganKind::Chaff, &mut self.chaff),
            (OrganKind::Peduncle, &mut self.peduncle),
            (OrganKind::Lamina, &mut self.lamina),
            (OrganKind::Internode, &mut self.internode),
            (OrganKind::Sheath, &mut self.sheath),
        ]
        .into_iter()
        .filter_map(|(kind, slot)| slot.as_mut().map(|organ| (kind, organ)))
    }

    /// Every element of the phytomer in layout order.
    pub fn elements(
        &self,
    ) -> impl Iterator<Item = (OrganKind, ElementPosition, &PhotosyntheticOrganElement)> {
        self.organs().flat_map(|(kind, organ)| {
            organ
                .elements()
                .map(move |(position, element)| (kind, position, element))
        })
    }

    /// Every element of the phytomer in layout order, mutably.
    pub fn elements_mut(
        &mut self,
    ) -> impl Iterator<Item = (OrganKind, ElementPosition, &mut PhotosyntheticOrganElement)> {
        self.organs_mut().flat_map(|(kind, organ)| {
            PhotosyntheticOrgan::elements_mut(organ)
                .map(move |(position, element)| (kind, position, element))
        })
    }

    /// Structural mass of the phytomer as of the last aggregation.
    #[must_use]
    pub fn mstruct(&self) -> Mass {
        self.mstruct
    }

    pub(crate) fn set_mstruct(&mut self, value: Mass) {
        self.mstruct = value;
    }

    fn check(&self, axis: &str) -> Result<(), TreeError> {
        if self.organs().next().is_none() && self.hidden_zone.is_none() {
            return Err(TreeError::EmptyPhytomer {
                axis: axis.to_owned(),
                phytomer: self.index,
            });
        }
        for (kind, organ) in self.organs() {
            if organ.elements().next().is_none() {
                return Err(TreeError::OrganWithoutElements {
                    axis: axis.to_owned(),
                    phytomer: self.index,
                    organ: kind,
                });
            }
        }
        Ok(())
    }
}

/// Chaff, peduncle, lamina, internode or sheath, depending on its slot in
/// the phytomer.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotosyntheticOrgan {
    pub exposed: Option<PhotosyntheticOrganElement>,
    pub enclosed: Option<PhotosyntheticOrganElement>,
    mstruct: Mass,
    green_area: Area,
}

impl PhotosyntheticOrgan {
    #[must_use]
    pub fn new(
        exposed: Option<PhotosyntheticOrganElement>,
        enclosed: Option<PhotosyntheticOrganElement>,
    ) -> Self {
        Self {
            exposed,
            enclosed,
            mstruct: Mass::new::<gram>(0.0),
            green_area: Area::new::<square_meter>(0.0),
        }
    }

    /// An organ with only an exposed element.
    #[must_use]
    pub fn exposed(element: PhotosyntheticOrganElement) -> Self {
        Self::new(Some(element), None)
    }

    /// An organ with only an enclosed element.
    #[must_use]
    pub fn enclosed(element: PhotosyntheticOrganElement) -> Self {
        Self::new(None, Some(element))
    }

    /// Present elements, exposed first.
    pub fn elements(&self) -> impl Iterator<Item = (ElementPosition, &PhotosyntheticOrganElement)> {
        [
            (ElementPosition::Exposed, self.exposed.as_ref()),
            (ElementPosition::Enclosed, self.enclosed.as_ref()),
        ]
        .into_iter()
        .filter_map(|(position, element)| element.map(|e| (position, e)))
    }

    /// Present elements, exposed first, mutably.
    pub fn elements_mut(
        &mut self,
    ) -> impl Iterator<Item = (ElementPosition, &mut PhotosyntheticOrganElement)> {
        [
            (ElementPosition::Exposed, self.exposed.as_mut()),
            (ElementPosition::Enclosed, self.enclosed.as_mut()),
        ]
        .into_iter()
        .filter_map(|(position, element)| element.map(|e| (position, e)))
    }

    /// Sum of element structural masses as of the last aggregation.
    #[must_use]
    pub fn mstruct(&self) -> Mass {
        self.mstruct
    }

    /// Sum of element green areas as of the last aggregation.
    #[must_use]
    pub fn green_area(&self) -> Area {
        self.green_area
    }

    pub(crate) fn set_totals(&mut self, mstruct: Mass, green_area: Area) {
        self.mstruct = mstruct;
        self.green_area = green_area;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::crop::cn_wheat::core::{
        organ::{PhloemCompartments, RootsCompartments},
        test_support::{lamina, one_axis_population, roots},
    };

    #[test]
    fn builder_requires_roots_and_phloem() {
        let missing_roots = Axis::builder("MS")
            .phloem(Phloem::new(PhloemCompartments::default()))
            .build();
        assert_eq!(
            missing_roots,
            Err(TreeError::MissingRoots { axis: "MS".into() })
        );

        let missing_phloem = Axis::builder("MS").roots(roots(0.5)).build();
        assert_eq!(
            missing_phloem,
            Err(TreeError::MissingPhloem { axis: "MS".into() })
        );
    }

    #[test]
    fn valid_population_passes() {
        assert_eq!(one_axis_population(&[0.1, 0.2]).validate(), Ok(()));
    }

    #[test]
    fn rejects_malformed_trees() {
        assert_eq!(
            Population::new(Vec::new()).validate(),
            Err(TreeError::EmptyPopulation)
        );

        let mut population = one_axis_population(&[0.1]);
        population.plants.push(population.plants[0].clone());
        assert_eq!(population.validate(), Err(TreeError::DuplicatePlant(1)));

        let mut population = one_axis_population(&[0.1]);
        population.plants[0].axes.clear();
        assert_eq!(
            population.validate(),
            Err(TreeError::PlantWithoutAxes { plant: 1 })
        );

        let mut population = one_axis_population(&[0.1]);
        population.plants[0].axes[0].phytomers.clear();
        assert!(matches!(
            population.validate(),
            Err(TreeError::AxisWithoutPhytomers { plant: 1, .. })
        ));

        let mut population = one_axis_population(&[0.1]);
        population.plants[0].axes[0].phytomers.push(Phytomer::new(7));
        assert!(matches!(
            population.validate(),
            Err(TreeError::EmptyPhytomer { phytomer: 7, .. })
        ));

        let mut population = one_axis_population(&[0.1, 0.1]);
        population.plants[0].axes[0].phytomers[1].index = 1;
        assert!(matches!(
            population.validate(),
            Err(TreeError::DuplicatePhytomer { phytomer: 1, .. })
        ));

        let mut population = one_axis_population(&[0.1]);
        population.plants[0].axes[0].phytomers[0].sheath =
            Some(PhotosyntheticOrgan::new(None, None));
        assert!(matches!(
            population.validate(),
            Err(TreeError::OrganWithoutElements {
                organ: OrganKind::Sheath,
                ..
            })
        ));
    }

    #[test]
    fn elements_follow_layout_order() {
        let phytomer = Phytomer::new(1)
            .with_organ(OrganKind::Sheath, PhotosyntheticOrgan::enclosed(lamina(0.3)))
            .with_organ(
                OrganKind::Lamina,
                PhotosyntheticOrgan::new(Some(lamina(0.1)), Some(lamina(0.2))),
            )
            .with_organ(OrganKind::Chaff, PhotosyntheticOrgan::exposed(lamina(0.4)));

        let order: Vec<_> = phytomer
            .elements()
            .map(|(kind, position, element)| (kind, position, element.mstruct.grams()))
            .collect();
        assert_eq!(
            order,
            vec![
                (OrganKind::Chaff, ElementPosition::Exposed, 0.4),
                (OrganKind::Lamina, ElementPosition::Exposed, 0.1),
                (OrganKind::Lamina, ElementPosition::Enclosed, 0.2),
                (OrganKind::Sheath, ElementPosition::Enclosed, 0.3),
            ]
        );
    }

    #[test]
    fn roots_fixture_is_empty() {
        assert_eq!(roots(0.5).compartments, RootsCompartments::default());
    }
}
