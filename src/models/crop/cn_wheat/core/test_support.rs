use uom::si::{
    area::square_meter,
    f64::{Area, Mass, ThermodynamicTemperature, Time, Volume},
    mass::gram,
    thermodynamic_temperature::degree_celsius,
    time::hour,
    volume::cubic_meter,
};

use super::{
    organ::{
        ElementCompartments, Grains, GrainsCompartments, HiddenZone, HiddenZoneCompartments,
        OrganKind, Phloem, PhloemCompartments, PhotosyntheticOrganElement, Roots,
        RootsCompartments,
    },
    params::Parameters,
    soil::{CulmDensity, Soil, SoilCompartments},
    tree::{Axis, PhotosyntheticOrgan, Phytomer, Plant, Population},
};

/// An empty, non-growing element with no structural nitrogen.
pub(crate) fn lamina(mstruct: f64) -> PhotosyntheticOrganElement {
    PhotosyntheticOrganElement::new(
        Mass::new::<gram>(mstruct),
        Mass::new::<gram>(0.0),
        ElementCompartments::default(),
    )
    .expect("fixture mass is positive")
}

/// Empty roots with no structural nitrogen.
pub(crate) fn roots(mstruct: f64) -> Roots {
    Roots::new(
        Mass::new::<gram>(mstruct),
        Mass::new::<gram>(0.0),
        RootsCompartments::default(),
    )
    .expect("fixture mass is positive")
}

/// Plant 1 with a single axis whose phytomers (indexed from 1) each carry
/// one exposed lamina of the given structural mass.
pub(crate) fn one_axis_population(laminae: &[f64]) -> Population {
    let axis = laminae
        .iter()
        .enumerate()
        .fold(
            Axis::builder("MS")
                .roots(roots(0.5))
                .phloem(Phloem::new(PhloemCompartments::default())),
            |builder, (i, &mstruct)| {
                builder.phytomer(
                    Phytomer::new(i + 1)
                        .with_organ(OrganKind::Lamina, PhotosyntheticOrgan::exposed(lamina(mstruct))),
                )
            },
        )
        .build()
        .expect("fixture axis has roots and phloem");
    Population::new(vec![Plant::new(1, vec![axis])])
}

/// Defaults with root exudation and soil mineralisation switched off, so
/// an axis without assimilation or respiration exchanges nothing with the
/// outside world.
pub(crate) fn closed_parameters() -> Parameters {
    let mut parameters = Parameters::default();
    parameters.roots.c_exudation = 0.0;
    parameters.soil.mineralisation_rate = 0.0;
    parameters
}

pub(crate) fn soil(nitrates: f64) -> Soil {
    Soil::new(
        Volume::new::<cubic_meter>(0.25),
        ThermodynamicTemperature::new::<degree_celsius>(12.0),
        SoilCompartments { nitrates },
    )
    .expect("fixture volume is positive")
}

pub(crate) fn culm_density(plant: usize) -> CulmDensity {
    CulmDensity::new()
        .with(plant, 1.0)
        .expect("fixture density is non-negative")
}

fn element(mstruct: f64, green_area: f64, compartments: ElementCompartments) -> PhotosyntheticOrganElement {
    let mut element = PhotosyntheticOrganElement::new(
        Mass::new::<gram>(mstruct),
        Mass::new::<gram>(mstruct * 0.01),
        compartments,
    )
    .expect("fixture mass is positive");
    element.green_area = Area::new::<square_meter>(green_area);
    element.tr = 1.5;
    element
}

/// One plant with a fully populated axis: grains still enlarging, a mature
/// phytomer loading into the phloem and a growing phytomer feeding its
/// hidden zone. Nothing assimilates or respires.
pub(crate) fn populated_axis() -> Population {
    let pools = ElementCompartments {
        triose_phosphates: 400.0,
        starch: 300.0,
        sucrose: 2_500.0,
        fructan: 800.0,
        nitrates: 150.0,
        amino_acids: 120.0,
        proteins: 900.0,
        cytokinins: 20.0,
    };

    let mature = Phytomer::new(1)
        .with_organ(
            OrganKind::Lamina,
            PhotosyntheticOrgan::exposed(element(0.12, 0.003, pools)),
        )
        .with_organ(
            OrganKind::Sheath,
            PhotosyntheticOrgan::new(
                Some(element(0.05, 0.001, pools)),
                Some(element(0.04, 0.0, pools)),
            ),
        );

    let mut growing_lamina = element(0.03, 0.0008, pools);
    growing_lamina.is_growing = true;
    let hidden_zone = HiddenZone::new(
        Mass::new::<gram>(0.02),
        Mass::new::<gram>(0.0004),
        HiddenZoneCompartments {
            sucrose: 600.0,
            fructan: 100.0,
            amino_acids: 80.0,
            proteins: 200.0,
        },
    )
    .expect("fixture mass is positive");
    let growing = Phytomer::new(2)
        .with_organ(OrganKind::Lamina, PhotosyntheticOrgan::exposed(growing_lamina))
        .with_hidden_zone(hidden_zone);

    let axis = Axis::builder("MS")
        .roots(
            Roots::new(
                Mass::new::<gram>(0.4),
                Mass::new::<gram>(0.004),
                RootsCompartments {
                    sucrose: 1_200.0,
                    nitrates: 300.0,
                    amino_acids: 90.0,
                    cytokinins: 10.0,
                },
            )
            .expect("fixture mass is positive"),
        )
        .phloem(Phloem::new(PhloemCompartments {
            sucrose: 5_000.0,
            amino_acids: 700.0,
        }))
        .grains(Grains::new(
            Time::new::<hour>(100.0),
            GrainsCompartments {
                structure: 2_000.0,
                starch: 0.0,
                proteins: 50.0,
            },
        ))
        .phytomer(mature)
        .phytomer(growing)
        .build()
        .expect("fixture axis has roots and phloem");

    Population::new(vec![Plant::new(1, vec![axis])])
}
