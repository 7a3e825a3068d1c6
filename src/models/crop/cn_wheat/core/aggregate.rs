//! Integrative variables of the tree.
//!
//! Aggregation is split in two: a pure bottom-up reduction that computes
//! every derived quantity from the accepted state, and a single write pass
//! that stores them. Running it twice in a row changes nothing.

use uom::si::{
    area::square_meter,
    f64::{Area, Mass},
    mass::gram,
};

use super::{
    organ::structural_dry_mass,
    tree::{Axis, AxisTotals, Phytomer, PhotosyntheticOrgan, Population},
};

/// Recomputes and stores every derived field of the population.
pub fn aggregate(population: &mut Population) {
    let totals = reduce(population);
    apply(population, &totals);
}

#[derive(Debug, Clone, PartialEq)]
struct PopulationTotals {
    axes: Vec<Vec<AxisAggregate>>,
}

#[derive(Debug, Clone, PartialEq)]
struct AxisAggregate {
    totals: AxisTotals,
    roots_organic_nitrogen: f64,
    grains_structural_dry_mass: Option<Mass>,
    phytomers: Vec<PhytomerAggregate>,
}

#[derive(Debug, Clone, PartialEq)]
struct PhytomerAggregate {
    mstruct: Mass,
    organs: Vec<OrganAggregate>,
}

#[derive(Debug, Clone, PartialEq)]
struct OrganAggregate {
    mstruct: Mass,
    green_area: Area,
    transpiration: f64,
    elements_organic_nitrogen: Vec<f64>,
}

fn reduce(population: &Population) -> PopulationTotals {
    PopulationTotals {
        axes: population
            .plants
            .iter()
            .map(|plant| plant.axes.iter().map(reduce_axis).collect())
            .collect(),
    }
}

fn reduce_axis(axis: &Axis) -> AxisAggregate {
    let grains_structural_dry_mass = axis
        .grains
        .as_ref()
        .map(|grains| structural_dry_mass(grains.compartments.structure));
    let phytomers: Vec<_> = axis.phytomers.iter().map(reduce_phytomer).collect();

    let zero_mass = Mass::new::<gram>(0.0);
    let mstruct = *axis.roots.mstruct
        + grains_structural_dry_mass.unwrap_or(zero_mass)
        + phytomers.iter().fold(zero_mass, |sum, p| sum + p.mstruct);

    let organs = || phytomers.iter().flat_map(|p| &p.organs);
    let transpiration = organs().map(|o| o.transpiration).sum();
    let green_area = organs().fold(Area::new::<square_meter>(0.0), |sum, o| sum + o.green_area);

    AxisAggregate {
        totals: AxisTotals {
            mstruct,
            transpiration,
            green_area,
        },
        roots_organic_nitrogen: axis.roots.organic_nitrogen(),
        grains_structural_dry_mass,
        phytomers,
    }
}

fn reduce_phytomer(phytomer: &Phytomer) -> PhytomerAggregate {
    let organs: Vec<_> = phytomer.organs().map(|(_, organ)| reduce_organ(organ)).collect();
    let hidden_zone = phytomer
        .hidden_zone
        .as_ref()
        .map_or(Mass::new::<gram>(0.0), |zone| *zone.mstruct);
    let mstruct = organs.iter().fold(hidden_zone, |sum, o| sum + o.mstruct);
    PhytomerAggregate { mstruct, organs }
}

fn reduce_organ(organ: &PhotosyntheticOrgan) -> OrganAggregate {
    let mut aggregate = OrganAggregate {
        mstruct: Mass::new::<gram>(0.0),
        green_area: Area::new::<square_meter>(0.0),
        transpiration: 0.0,
        elements_organic_nitrogen: Vec::new(),
    };
    for (_, element) in organ.elements() {
        aggregate.mstruct += *element.mstruct;
        aggregate.green_area += element.green_area;
        aggregate.transpiration += element.transpiration();
        aggregate
            .elements_organic_nitrogen
            .push(element.organic_nitrogen());
    }
    aggregate
}

fn apply(population: &mut Population, totals: &PopulationTotals) {
    let axes = population.plants.iter_mut().flat_map(|plant| &mut plant.axes);
    for (axis, aggregate) in axes.zip(totals.axes.iter().flatten()) {
        axis.set_totals(aggregate.totals);
        axis.roots
            .set_total_organic_nitrogen(aggregate.roots_organic_nitrogen);
        if let (Some(grains), Some(mass)) =
            (axis.grains.as_mut(), aggregate.grains_structural_dry_mass)
        {
            grains.set_structural_dry_mass(mass);
        }
        for (phytomer, phytomer_aggregate) in axis.phytomers.iter_mut().zip(&aggregate.phytomers) {
            apply_phytomer(phytomer, phytomer_aggregate);
        }
    }
}

fn apply_phytomer(phytomer: &mut Phytomer, aggregate: &PhytomerAggregate) {
    phytomer.set_mstruct(aggregate.mstruct);
    for ((_, organ), organ_aggregate) in phytomer.organs_mut().zip(&aggregate.organs) {
        organ.set_totals(organ_aggregate.mstruct, organ_aggregate.green_area);
        for ((_, element), nitrogen) in organ
            .elements_mut()
            .zip(&organ_aggregate.elements_organic_nitrogen)
        {
            element.set_total_organic_nitrogen(*nitrogen);
        }
    }
}
