//! Furniture, room, building and loot catalogs for interiors.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::types::Resource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LootTable {
    Household,
    Food,
    Valuable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootBand {
    pub resource: Option<Resource>,
    pub amount: (i32, i32),
    pub chance: f64,
}

const fn band(resource: Resource, min: i32, max: i32, chance: f64) -> LootBand {
    LootBand { resource: Some(resource), amount: (min, max), chance }
}

const fn nothing(chance: f64) -> LootBand {
    LootBand { resource: None, amount: (0, 0), chance }
}

const HOUSEHOLD: &[LootBand] =
    &[band(Resource::Scrap, 1, 3, 0.5), band(Resource::Food, 1, 1, 0.2), nothing(0.3)];
const FOOD: &[LootBand] =
    &[band(Resource::Food, 1, 2, 0.6), band(Resource::Water, 1, 1, 0.2), nothing(0.2)];
const VALUABLE: &[LootBand] =
    &[band(Resource::Scrap, 5, 10, 0.4), band(Resource::Medicine, 2, 3, 0.3), nothing(0.3)];

impl LootTable {
    pub fn bands(self) -> &'static [LootBand] {
        match self {
            LootTable::Household => HOUSEHOLD,
            LootTable::Food => FOOD,
            LootTable::Valuable => VALUABLE,
        }
    }

    /// First cumulative band the roll falls under wins; a resource-less band
    /// means nothing was found.
    pub fn roll(self, rng: &mut impl RandomSource) -> Option<(Resource, i32)> {
        let roll = rng.next_f64();
        let mut cumulative = 0.0;
        for band in self.bands() {
            cumulative += band.chance;
            if roll < cumulative {
                let resource = band.resource?;
                let amount = rng.int_inclusive(band.amount.0, band.amount.1);
                return Some((resource, amount));
            }
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FurnitureKind {
    Cabinet,
    Desk,
    Bed,
    Shelf,
    Refrigerator,
    Counter,
    Locker,
    Safe,
    Table,
    Chair,
    Toilet,
    Sink,
    Bathtub,
    Stove,
    Workbench,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FurnitureDef {
    pub name: &'static str,
    pub loot: Option<LootTable>,
    pub lockable: bool,
}

impl FurnitureKind {
    pub fn def(self) -> FurnitureDef {
        use LootTable::{Food, Household, Valuable};
        let (name, loot, lockable) = match self {
            FurnitureKind::Cabinet => ("Cabinet", Some(Household), false),
            FurnitureKind::Desk => ("Desk", Some(Household), false),
            FurnitureKind::Bed => ("Bed", Some(Household), false),
            FurnitureKind::Shelf => ("Shelf", Some(Household), false),
            FurnitureKind::Refrigerator => ("Refrigerator", Some(Food), false),
            FurnitureKind::Counter => ("Counter", Some(Household), false),
            FurnitureKind::Locker => ("Locker", Some(Valuable), true),
            FurnitureKind::Safe => ("Safe", Some(Valuable), true),
            FurnitureKind::Table => ("Table", None, false),
            FurnitureKind::Chair => ("Chair", None, false),
            FurnitureKind::Toilet => ("Toilet", None, false),
            FurnitureKind::Sink => ("Sink", None, false),
            FurnitureKind::Bathtub => ("Bathtub", None, false),
            FurnitureKind::Stove => ("Stove", Some(Household), false),
            FurnitureKind::Workbench => ("Workbench", Some(Valuable), false),
        };
        FurnitureDef { name, loot, lockable }
    }

    pub fn searchable(self) -> bool {
        self.def().loot.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    LivingRoom,
    Bedroom,
    Kitchen,
    Bathroom,
    Storage,
    Office,
    Garage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomDef {
    pub name: &'static str,
    pub furniture: &'static [FurnitureKind],
    pub min_furniture: i32,
    pub max_furniture: i32,
}

impl RoomKind {
    pub fn def(self) -> RoomDef {
        use FurnitureKind as F;
        let (name, furniture, min_furniture, max_furniture): (_, &'static [FurnitureKind], _, _) =
            match self {
                RoomKind::LivingRoom => {
                    ("Living Room", &[F::Cabinet, F::Shelf, F::Table, F::Chair], 1, 3)
                }
                RoomKind::Bedroom => ("Bedroom", &[F::Bed, F::Desk, F::Cabinet, F::Shelf], 1, 3),
                RoomKind::Kitchen => {
                    ("Kitchen", &[F::Refrigerator, F::Counter, F::Stove, F::Table], 2, 4)
                }
                RoomKind::Bathroom => ("Bathroom", &[F::Toilet, F::Sink, F::Cabinet], 2, 3),
                RoomKind::Storage => ("Storage", &[F::Shelf, F::Locker, F::Cabinet], 1, 3),
                RoomKind::Office => ("Office", &[F::Desk, F::Chair, F::Cabinet, F::Safe], 2, 4),
                RoomKind::Garage => ("Garage", &[F::Workbench, F::Shelf, F::Locker], 1, 3),
            };
        RoomDef { name, furniture, min_furniture, max_furniture }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    RuinedHouse,
    GasStation,
    AbandonedShop,
    OfficeBuilding,
    Warehouse,
    /// Fallback layout for a building tile whose type is unknown.
    Shack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingTemplate {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    pub rooms: &'static [RoomKind],
    pub min_rooms: i32,
    pub max_rooms: i32,
}

impl BuildingKind {
    pub fn template(self) -> BuildingTemplate {
        use RoomKind as R;
        let layout: (_, _, _, &'static [RoomKind], _, _) = match self {
            BuildingKind::RuinedHouse => (
                "Ruined House",
                8,
                8,
                &[R::LivingRoom, R::Bedroom, R::Kitchen, R::Bathroom],
                3,
                4,
            ),
            BuildingKind::GasStation => {
                ("Gas Station", 10, 6, &[R::Office, R::Storage, R::Garage], 2, 3)
            }
            BuildingKind::AbandonedShop => ("Abandoned Shop", 8, 6, &[R::Storage, R::Office], 1, 2),
            BuildingKind::OfficeBuilding => (
                "Office Building",
                10,
                10,
                &[R::Office, R::Office, R::Office, R::Bathroom, R::Storage],
                3,
                5,
            ),
            BuildingKind::Warehouse => (
                "Warehouse",
                12,
                8,
                &[R::Storage, R::Storage, R::Storage, R::Office],
                2,
                4,
            ),
            BuildingKind::Shack => ("Shack", 6, 6, &[R::LivingRoom, R::Storage], 1, 2),
        };
        let (name, width, height, rooms, min_rooms, max_rooms) = layout;
        BuildingTemplate { name, width, height, rooms, min_rooms, max_rooms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Dice;

    #[test]
    fn loot_bands_sum_to_one() {
        for table in [LootTable::Household, LootTable::Food, LootTable::Valuable] {
            let total: f64 = table.bands().iter().map(|band| band.chance).sum();
            assert!((total - 1.0).abs() < 1e-9, "{table:?} sums to {total}");
        }
    }

    #[test]
    fn valuable_rolls_respect_amount_ranges() {
        let mut dice = Dice::from_seed(17);
        for _ in 0..500 {
            match LootTable::Valuable.roll(&mut dice) {
                Some((Resource::Scrap, amount)) => assert!((5..=10).contains(&amount)),
                Some((Resource::Medicine, amount)) => assert!((2..=3).contains(&amount)),
                None => {}
                Some(other) => panic!("expected scrap or medicine, got {other:?}"),
            }
        }
    }

    #[test]
    fn lockable_furniture_is_exactly_locker_and_safe() {
        use FurnitureKind::*;
        let all = [
            Cabinet,
            Desk,
            Bed,
            Shelf,
            Refrigerator,
            Counter,
            Locker,
            Safe,
            Table,
            Chair,
            Toilet,
            Sink,
            Bathtub,
            Stove,
            Workbench,
        ];
        let lockable: Vec<_> = all.into_iter().filter(|kind| kind.def().lockable).collect();
        assert_eq!(lockable, vec![Locker, Safe]);
    }

    #[test]
    fn templates_leave_room_for_a_perimeter() {
        for kind in [
            BuildingKind::RuinedHouse,
            BuildingKind::GasStation,
            BuildingKind::AbandonedShop,
            BuildingKind::OfficeBuilding,
            BuildingKind::Warehouse,
            BuildingKind::Shack,
        ] {
            let template = kind.template();
            assert!(template.width >= 6 && template.height >= 6, "{kind:?}");
            assert!(template.min_rooms <= template.max_rooms);
            assert!(!template.rooms.is_empty());
        }
    }
}
