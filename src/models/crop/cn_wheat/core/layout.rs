//! Mapping between the composition tree and the flat compartment vector.
//!
//! Entities are laid out depth-first: for each plant and each of its axes,
//! the roots, the phloem, the grains (if any), then for each phytomer its
//! elements (chaff, peduncle, lamina, internode, sheath; exposed before
//! enclosed) followed by its hidden zone. The soil comes last. Within an
//! entity, compartments follow [`Compartments::KINDS`].

use std::{collections::BTreeMap, fmt};

use super::{
    organ::{
        ElementCompartments, ElementPosition, GrainsCompartments, HiddenZoneCompartments,
        OrganKind, PhloemCompartments, RootsCompartments,
    },
    soil::{Soil, SoilCompartments},
    state::{Compartment, Compartments, StateReader},
    tree::{Axis, Phytomer, Population},
};

/// Position of an entity in the composition tree.
///
/// `plant` is the plant index, `axis` the position of the axis within its
/// plant and `phytomer` the phytomer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityPath {
    Roots {
        plant: usize,
        axis: usize,
    },
    Phloem {
        plant: usize,
        axis: usize,
    },
    Grains {
        plant: usize,
        axis: usize,
    },
    Element {
        plant: usize,
        axis: usize,
        phytomer: usize,
        organ: OrganKind,
        position: ElementPosition,
    },
    HiddenZone {
        plant: usize,
        axis: usize,
        phytomer: usize,
    },
    Soil,
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Roots { plant, axis } => write!(f, "plant {plant}/axis {axis}/roots"),
            Self::Phloem { plant, axis } => write!(f, "plant {plant}/axis {axis}/phloem"),
            Self::Grains { plant, axis } => write!(f, "plant {plant}/axis {axis}/grains"),
            Self::Element {
                plant,
                axis,
                phytomer,
                organ,
                position,
            } => write!(
                f,
                "plant {plant}/axis {axis}/phytomer {phytomer}/{organ}/{position}"
            ),
            Self::HiddenZone {
                plant,
                axis,
                phytomer,
            } => write!(f, "plant {plant}/axis {axis}/phytomer {phytomer}/hidden zone"),
            Self::Soil => f.write_str("soil"),
        }
    }
}

/// One entry of the compartment vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompartmentAddress {
    pub entity: EntityPath,
    pub compartment: Compartment,
}

impl fmt::Display for CompartmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.compartment)
    }
}

/// Stable, invertible index of every compartment of a population.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLayout {
    addresses: Vec<CompartmentAddress>,
    indices: BTreeMap<CompartmentAddress, usize>,
}

impl StateLayout {
    /// Lays out every compartment of the population and the soil.
    #[must_use]
    pub fn new(population: &Population) -> Self {
        let mut layout = Self {
            addresses: Vec::new(),
            indices: BTreeMap::new(),
        };
        for plant in &population.plants {
            for (position, axis) in plant.axes.iter().enumerate() {
                layout.push_axis(plant.index, position, axis);
            }
        }
        layout.push::<SoilCompartments>(EntityPath::Soil);
        layout
    }

    fn push_axis(&mut self, plant: usize, position: usize, axis: &Axis) {
        self.push::<RootsCompartments>(EntityPath::Roots {
            plant,
            axis: position,
        });
        self.push::<PhloemCompartments>(EntityPath::Phloem {
            plant,
            axis: position,
        });
        if axis.grains.is_some() {
            self.push::<GrainsCompartments>(EntityPath::Grains {
                plant,
                axis: position,
            });
        }
        for phytomer in &axis.phytomers {
            self.push_phytomer(plant, position, phytomer);
        }
    }

    fn push_phytomer(&mut self, plant: usize, axis: usize, phytomer: &Phytomer) {
        for (organ, position, _) in phytomer.elements() {
            self.push::<ElementCompartments>(EntityPath::Element {
                plant,
                axis,
                phytomer: phytomer.index,
                organ,
                position,
            });
        }
        if phytomer.hidden_zone.is_some() {
            self.push::<HiddenZoneCompartments>(EntityPath::HiddenZone {
                plant,
                axis,
                phytomer: phytomer.index,
            });
        }
    }

    fn push<C: Compartments>(&mut self, entity: EntityPath) {
        for &compartment in C::KINDS {
            let address = CompartmentAddress {
                entity,
                compartment,
            };
            self.indices.insert(address, self.addresses.len());
            self.addresses.push(address);
        }
    }

    /// Number of compartments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Address of the compartment stored at `index`.
    #[must_use]
    pub fn address(&self, index: usize) -> Option<CompartmentAddress> {
        self.addresses.get(index).copied()
    }

    /// Index of the compartment at `address`.
    #[must_use]
    pub fn index_of(&self, address: &CompartmentAddress) -> Option<usize> {
        self.indices.get(address).copied()
    }

    /// All addresses in vector order.
    pub fn addresses(&self) -> impl Iterator<Item = &CompartmentAddress> {
        self.addresses.iter()
    }
}

/// Compartment values of a whole population, shaped like its tree.
///
/// Holds either amounts or their derivatives.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PopulationState {
    pub(crate) plants: Vec<Vec<AxisState>>,
    pub(crate) soil: SoilCompartments,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisState {
    pub(crate) roots: RootsCompartments,
    pub(crate) phloem: PhloemCompartments,
    pub(crate) grains: Option<GrainsCompartments>,
    pub(crate) phytomers: Vec<PhytomerState>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PhytomerState {
    pub(crate) elements: Vec<ElementCompartments>,
    pub(crate) hidden_zone: Option<HiddenZoneCompartments>,
}

impl PopulationState {
    /// Copies the accepted state held by the tree.
    pub(crate) fn from_tree(population: &Population, soil: &Soil) -> Self {
        Self {
            plants: population
                .plants
                .iter()
                .map(|plant| plant.axes.iter().map(AxisState::from_axis).collect())
                .collect(),
            soil: soil.compartments,
        }
    }

    /// Reads a flat vector laid out for `population`.
    ///
    /// Returns `None` unless `values` holds exactly one value per compartment.
    pub(crate) fn read(population: &Population, values: &[f64]) -> Option<Self> {
        let mut reader = StateReader::new(values);
        let plants = population
            .plants
            .iter()
            .map(|plant| {
                plant
                    .axes
                    .iter()
                    .map(|axis| AxisState::read(axis, &mut reader))
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        let soil = reader.next()?;
        reader.is_exhausted().then_some(Self { plants, soil })
    }

    /// Flattens the state in layout order.
    pub(crate) fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::new();
        for axis in self.plants.iter().flatten() {
            axis.roots.extend_values(&mut out);
            axis.phloem.extend_values(&mut out);
            if let Some(grains) = &axis.grains {
                grains.extend_values(&mut out);
            }
            for phytomer in &axis.phytomers {
                for element in &phytomer.elements {
                    element.extend_values(&mut out);
                }
                if let Some(hidden_zone) = &phytomer.hidden_zone {
                    hidden_zone.extend_values(&mut out);
                }
            }
        }
        self.soil.extend_values(&mut out);
        out
    }

    /// Writes the state into the tree, which must have the shape it was read for.
    pub(crate) fn apply_to(&self, population: &mut Population, soil: &mut Soil) {
        let axes = population.plants.iter_mut().flat_map(|plant| &mut plant.axes);
        for (axis, state) in axes.zip(self.plants.iter().flatten()) {
            state.apply_to(axis);
        }
        soil.compartments = self.soil;
    }
}

impl AxisState {
    fn from_axis(axis: &Axis) -> Self {
        Self {
            roots: axis.roots.compartments,
            phloem: axis.phloem.compartments,
            grains: axis.grains.as_ref().map(|grains| grains.compartments),
            phytomers: axis
                .phytomers
                .iter()
                .map(|phytomer| PhytomerState {
                    elements: phytomer
                        .elements()
                        .map(|(_, _, element)| element.compartments)
                        .collect(),
                    hidden_zone: phytomer.hidden_zone.as_ref().map(|zone| zone.compartments),
                })
                .collect(),
        }
    }

    fn read(axis: &Axis, reader: &mut StateReader<'_>) -> Option<Self> {
        let roots = reader.next()?;
        let phloem = reader.next()?;
        let grains = match axis.grains {
            Some(_) => Some(reader.next()?),
            None => None,
        };
        let phytomers = axis
            .phytomers
            .iter()
            .map(|phytomer| {
                let elements = phytomer
                    .elements()
                    .map(|_| reader.next())
                    .collect::<Option<Vec<_>>>()?;
                let hidden_zone = match phytomer.hidden_zone {
                    Some(_) => Some(reader.next()?),
                    None => None,
                };
                Some(PhytomerState {
                    elements,
                    hidden_zone,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            roots,
            phloem,
            grains,
            phytomers,
        })
    }

    fn apply_to(&self, axis: &mut Axis) {
        axis.roots.compartments = self.roots;
        axis.phloem.compartments = self.phloem;
        if let (Some(grains), Some(state)) = (axis.grains.as_mut(), self.grains) {
            grains.compartments = state;
        }
        for (phytomer, state) in axis.phytomers.iter_mut().zip(&self.phytomers) {
            for ((_, _, element), values) in phytomer.elements_mut().zip(&state.elements) {
                element.compartments = *values;
            }
            if let (Some(zone), Some(values)) = (phytomer.hidden_zone.as_mut(), state.hidden_zone) {
                zone.compartments = values;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crop::cn_wheat::core::test_support::{
        one_axis_population, populated_axis, soil,
    };

    #[test]
    fn layout_is_invertible() {
        let layout = StateLayout::new(&populated_axis());
        assert!(!layout.is_empty());
        for i in 0..layout.len() {
            let address = layout.address(i).unwrap();
            assert_eq!(layout.index_of(&address), Some(i));
        }
        assert_eq!(layout.address(layout.len()), None);
    }

    #[test]
    fn entities_follow_tree_order() {
        let layout = StateLayout::new(&populated_axis());
        let mut entities: Vec<EntityPath> = Vec::new();
        for address in layout.addresses() {
            if entities.last() != Some(&address.entity) {
                entities.push(address.entity);
            }
        }
        let element = |phytomer, organ, position| EntityPath::Element {
            plant: 1,
            axis: 0,
            phytomer,
            organ,
            position,
        };
        assert_eq!(
            entities,
            vec![
                EntityPath::Roots { plant: 1, axis: 0 },
                EntityPath::Phloem { plant: 1, axis: 0 },
                EntityPath::Grains { plant: 1, axis: 0 },
                element(1, OrganKind::Lamina, ElementPosition::Exposed),
                element(1, OrganKind::Sheath, ElementPosition::Exposed),
                element(1, OrganKind::Sheath, ElementPosition::Enclosed),
                element(2, OrganKind::Lamina, ElementPosition::Exposed),
                EntityPath::HiddenZone {
                    plant: 1,
                    axis: 0,
                    phytomer: 2,
                },
                EntityPath::Soil,
            ]
        );
    }

    #[test]
    fn flat_state_matches_layout() {
        let population = populated_axis();
        let soil = soil(1_000.0);
        let layout = StateLayout::new(&population);
        let values = PopulationState::from_tree(&population, &soil).to_vec();
        assert_eq!(values.len(), layout.len());

        let phloem_sucrose = CompartmentAddress {
            entity: EntityPath::Phloem { plant: 1, axis: 0 },
            compartment: Compartment::Sucrose,
        };
        assert_eq!(values[layout.index_of(&phloem_sucrose).unwrap()], 5_000.0);

        let soil_nitrates = CompartmentAddress {
            entity: EntityPath::Soil,
            compartment: Compartment::Nitrates,
        };
        assert_eq!(layout.index_of(&soil_nitrates), Some(layout.len() - 1));
        assert_eq!(values[layout.len() - 1], 1_000.0);
    }

    #[test]
    fn read_rejects_wrong_lengths() {
        let population = one_axis_population(&[0.1]);
        let values = PopulationState::from_tree(&population, &soil(0.0)).to_vec();
        assert!(PopulationState::read(&population, &values).is_some());
        assert!(PopulationState::read(&population, &values[1..]).is_none());

        let mut longer = values.clone();
        longer.push(0.0);
        assert!(PopulationState::read(&population, &longer).is_none());
    }

    #[test]
    fn apply_writes_back_into_the_tree() {
        let mut population = populated_axis();
        let mut soil = soil(1_000.0);
        let mut values = PopulationState::from_tree(&population, &soil).to_vec();
        for value in &mut values {
            *value += 1.0;
        }

        let state = PopulationState::read(&population, &values).unwrap();
        state.apply_to(&mut population, &mut soil);

        assert_eq!(PopulationState::from_tree(&population, &soil).to_vec(), values);
        assert_eq!(population.plants[0].axes[0].phloem.compartments.sucrose, 5_001.0);
        assert_eq!(soil.compartments.nitrates, 1_001.0);
    }
}
