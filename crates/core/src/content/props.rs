use serde::{Deserialize, Serialize};

use super::interior::BuildingKind;
use super::terrain::Terrain;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropKind {
    DeadTree,
    DeadBush,
    Rock,
    Debris,
    CarWreck,
    ToxicBarrel,
    RuinedHouse,
    GasStation,
    AbandonedShop,
    OfficeBuilding,
    Warehouse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropDef {
    pub name: &'static str,
    /// Footprint as (width, height) in tiles, centred on the anchor.
    pub footprint: (i32, i32),
    pub building: Option<BuildingKind>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropSpawn {
    pub kind: PropKind,
    pub chance: f64,
}

const fn spawn(kind: PropKind, chance: f64) -> PropSpawn {
    PropSpawn { kind, chance }
}

const GRASS: &[PropSpawn] = &[
    spawn(PropKind::DeadTree, 0.2),
    spawn(PropKind::DeadBush, 0.15),
    spawn(PropKind::Rock, 0.05),
];
const DIRT: &[PropSpawn] =
    &[spawn(PropKind::Rock, 0.12), spawn(PropKind::DeadBush, 0.08), spawn(PropKind::Debris, 0.05)];
const MUD: &[PropSpawn] = &[spawn(PropKind::Rock, 0.08)];
const SAND: &[PropSpawn] = &[spawn(PropKind::Rock, 0.1), spawn(PropKind::DeadBush, 0.05)];
const PAVEMENT: &[PropSpawn] = &[
    spawn(PropKind::CarWreck, 0.06),
    spawn(PropKind::Debris, 0.08),
    spawn(PropKind::Warehouse, 0.02),
];
const CONCRETE: &[PropSpawn] = &[
    spawn(PropKind::RuinedHouse, 0.15),
    spawn(PropKind::GasStation, 0.04),
    spawn(PropKind::AbandonedShop, 0.05),
    spawn(PropKind::OfficeBuilding, 0.03),
    spawn(PropKind::Debris, 0.1),
];
const TOXIC: &[PropSpawn] = &[
    spawn(PropKind::ToxicBarrel, 0.25),
    spawn(PropKind::Debris, 0.1),
    spawn(PropKind::Rock, 0.08),
];
const RUBBLE: &[PropSpawn] = &[spawn(PropKind::Debris, 0.3), spawn(PropKind::Rock, 0.15)];

impl PropKind {
    pub fn def(self) -> PropDef {
        let (name, footprint, building) = match self {
            PropKind::DeadTree => ("Dead Tree", (1, 1), None),
            PropKind::DeadBush => ("Dead Bush", (1, 1), None),
            PropKind::Rock => ("Rock", (1, 1), None),
            PropKind::Debris => ("Debris", (1, 1), None),
            PropKind::CarWreck => ("Car Wreck", (1, 1), None),
            PropKind::ToxicBarrel => ("Toxic Barrel", (1, 1), None),
            PropKind::RuinedHouse => ("Ruined House", (2, 2), Some(BuildingKind::RuinedHouse)),
            PropKind::GasStation => ("Gas Station", (3, 2), Some(BuildingKind::GasStation)),
            PropKind::AbandonedShop => {
                ("Abandoned Shop", (2, 2), Some(BuildingKind::AbandonedShop))
            }
            PropKind::OfficeBuilding => {
                ("Office Building", (3, 2), Some(BuildingKind::OfficeBuilding))
            }
            PropKind::Warehouse => ("Warehouse", (3, 2), Some(BuildingKind::Warehouse)),
        };
        PropDef { name, footprint, building }
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn is_building(self) -> bool {
        self.def().building.is_some()
    }

    /// Weighted spawn entries for a terrain, consulted in order.
    pub fn spawn_table(terrain: Terrain) -> &'static [PropSpawn] {
        match terrain {
            Terrain::Grass => GRASS,
            Terrain::Dirt => DIRT,
            Terrain::Mud => MUD,
            Terrain::Sand => SAND,
            Terrain::Pavement => PAVEMENT,
            Terrain::Concrete => CONCRETE,
            Terrain::Toxic => TOXIC,
            Terrain::Rubble => RUBBLE,
            Terrain::Water => &[],
        }
    }
}
