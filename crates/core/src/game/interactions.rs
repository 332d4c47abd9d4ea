//! Tile-contextual actions: attacking, scavenging, doors, furniture and
//! building transitions.
//! This module exists so the context-menu data and the action handlers share
//! one dispatch table keyed by [`ActionId`]. Every action needs a unit within
//! one tile of the target and enough AP; guards run before anything changes.
//! It does not own loot catalogs, which live in `content`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::*;
use crate::content::{InteriorTerrain, PropKind, Terrain};
use crate::rng::RandomSource;

/// Roll thresholds, checked in order; the first one above the roll wins and
/// the amount is drawn from the inclusive range.
type LootBands = [(f64, Resource, i32, i32)];

const SEARCH_BUILDING: &LootBands = &[
    (0.3, Resource::Food, 1, 2),
    (0.5, Resource::Medicine, 1, 1),
    (0.7, Resource::Water, 1, 2),
    (0.9, Resource::Scrap, 2, 5),
];
const SEARCH_DEBRIS: &LootBands = &[(0.4, Resource::Scrap, 1, 2), (0.5, Resource::Food, 1, 1)];
const SEARCH_GROUND: &LootBands = &[(0.15, Resource::Scrap, 1, 1), (0.2, Resource::Food, 1, 1)];
const DIG: &LootBands = &[
    (0.2, Resource::Scrap, 2, 5),
    (0.3, Resource::Water, 1, 1),
    (0.35, Resource::Medicine, 1, 1),
];
const SEARCH_AGAIN: &LootBands = &[(0.3, Resource::Scrap, 1, 2)];

const CHEMICAL_EXPOSURE_CHANCE: f64 = 0.4;
const CHEMICAL_MEDICINE_CHANCE: f64 = 0.6;
const PICK_DOOR_CHANCE: f64 = 0.5;
const PICK_FURNITURE_CHANCE: f64 = 0.6;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Attack,
    CollectWater,
    HarvestWood,
    EnterBuilding,
    SearchBuilding,
    SalvageChemicals,
    SalvageVehicle,
    SearchDebris,
    SearchGround,
    Dig,
    ExitBuilding,
    ExitWindow,
    SearchFurniture,
    SearchFurnitureAgain,
    UnlockDoor,
    BreakDoor,
    OpenDoor,
    CloseDoor,
    UnlockFurniture,
    BreakFurniture,
}

impl ActionId {
    pub const ALL: [ActionId; 20] = [
        ActionId::Attack,
        ActionId::CollectWater,
        ActionId::HarvestWood,
        ActionId::EnterBuilding,
        ActionId::SearchBuilding,
        ActionId::SalvageChemicals,
        ActionId::SalvageVehicle,
        ActionId::SearchDebris,
        ActionId::SearchGround,
        ActionId::Dig,
        ActionId::ExitBuilding,
        ActionId::ExitWindow,
        ActionId::SearchFurniture,
        ActionId::SearchFurnitureAgain,
        ActionId::UnlockDoor,
        ActionId::BreakDoor,
        ActionId::OpenDoor,
        ActionId::CloseDoor,
        ActionId::UnlockFurniture,
        ActionId::BreakFurniture,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ActionId::Attack => "attack",
            ActionId::CollectWater => "collect_water",
            ActionId::HarvestWood => "harvest_wood",
            ActionId::EnterBuilding => "enter_building",
            ActionId::SearchBuilding => "search_building",
            ActionId::SalvageChemicals => "salvage_chemicals",
            ActionId::SalvageVehicle => "salvage_vehicle",
            ActionId::SearchDebris => "search_debris",
            ActionId::SearchGround => "search_ground",
            ActionId::Dig => "dig",
            ActionId::ExitBuilding => "exit_building",
            ActionId::ExitWindow => "exit_window",
            ActionId::SearchFurniture => "search_furniture",
            ActionId::SearchFurnitureAgain => "search_furniture_again",
            ActionId::UnlockDoor => "unlock_door",
            ActionId::BreakDoor => "break_door",
            ActionId::OpenDoor => "open_door",
            ActionId::CloseDoor => "close_door",
            ActionId::UnlockFurniture => "unlock_furniture",
            ActionId::BreakFurniture => "break_furniture",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionId::Attack => "Attack",
            ActionId::CollectWater => "Collect Water",
            ActionId::HarvestWood => "Harvest Wood",
            ActionId::EnterBuilding => "Enter Building",
            ActionId::SearchBuilding => "Search Outside",
            ActionId::SalvageChemicals => "Salvage Chemicals",
            ActionId::SalvageVehicle => "Salvage Parts",
            ActionId::SearchDebris => "Search Debris",
            ActionId::SearchGround => "Search Area",
            ActionId::Dig => "Dig",
            ActionId::ExitBuilding => "Exit Building",
            ActionId::ExitWindow => "Exit Through Window",
            ActionId::SearchFurniture => "Search",
            ActionId::SearchFurnitureAgain => "Search Again",
            ActionId::UnlockDoor => "Pick Lock",
            ActionId::BreakDoor => "Break Door",
            ActionId::OpenDoor => "Open Door",
            ActionId::CloseDoor => "Close Door",
            ActionId::UnlockFurniture => "Unlock",
            ActionId::BreakFurniture => "Break Open",
        }
    }

    pub fn ap_cost(self) -> i32 {
        match self {
            ActionId::OpenDoor | ActionId::CloseDoor => 0,
            ActionId::SearchBuilding
            | ActionId::SalvageVehicle
            | ActionId::Dig
            | ActionId::BreakDoor
            | ActionId::BreakFurniture => 2,
            _ => 1,
        }
    }

    fn is_transition(self) -> bool {
        matches!(self, ActionId::EnterBuilding | ActionId::ExitBuilding | ActionId::ExitWindow)
    }
}

fn roll_bands(rng: &mut impl RandomSource, bands: &LootBands) -> Option<(Resource, i32)> {
    let roll = rng.next_f64();
    let &(_, resource, min, max) = bands.iter().find(|(threshold, ..)| roll < *threshold)?;
    Some((resource, rng.int_inclusive(min, max)))
}

fn indoor_actions(interior: &BuildingInterior, pos: Pos) -> Vec<ActionId> {
    let Some(tile) = interior.tile(pos) else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    if tile.is_exit || tile.terrain == InteriorTerrain::Exit {
        actions.push(ActionId::ExitBuilding);
    }
    match tile.terrain {
        InteriorTerrain::Window => actions.push(ActionId::ExitWindow),
        InteriorTerrain::LockedDoor => {
            actions.extend([ActionId::UnlockDoor, ActionId::BreakDoor]);
        }
        InteriorTerrain::ClosedDoor => actions.push(ActionId::OpenDoor),
        InteriorTerrain::OpenDoor => actions.push(ActionId::CloseDoor),
        _ => {}
    }
    if let Some(furniture) = tile.furniture {
        if furniture.kind.searchable() && !furniture.searched {
            if furniture.locked {
                actions.extend([ActionId::UnlockFurniture, ActionId::BreakFurniture]);
            } else {
                actions.push(ActionId::SearchFurniture);
            }
        } else if furniture.searched {
            actions.push(ActionId::SearchFurnitureAgain);
        }
    }
    actions
}

impl Game {
    /// The unit that would act on `pos`: the selected unit when it is within
    /// one tile, otherwise the first such unit in the current scene.
    pub fn acting_unit(&self, pos: Pos) -> Option<UnitId> {
        let in_scene = |unit: &Unit| match self.view {
            ViewMode::Outdoor => !unit.is_indoors(),
            ViewMode::Indoor { building } => {
                unit.indoors.is_some_and(|state| state.building == building)
            }
        };
        let reaches = |unit: &Unit| in_scene(unit) && unit.pos.chebyshev(pos) <= 1;
        if let Some(id) = self.selected
            && self.units.get(id).is_some_and(reaches)
        {
            return Some(id);
        }
        self.units.iter().find(|(_, unit)| reaches(unit)).map(|(id, _)| id)
    }

    /// Context-menu entries for `pos` in the current scene. Empty when no
    /// unit is within reach.
    pub fn available_actions(&self, pos: Pos) -> Vec<ActionId> {
        if self.acting_unit(pos).is_none() {
            return Vec::new();
        }
        match self.view {
            ViewMode::Indoor { .. } => self
                .current_interior()
                .map_or_else(Vec::new, |interior| indoor_actions(interior, pos)),
            ViewMode::Outdoor => self.outdoor_actions(pos),
        }
    }

    fn outdoor_actions(&self, pos: Pos) -> Vec<ActionId> {
        let Some(tile) = self.world.tile(pos) else {
            return Vec::new();
        };
        if tile.occupant.enemy().is_some() {
            return vec![ActionId::Attack];
        }
        if tile.terrain == Terrain::Water {
            return vec![ActionId::CollectWater];
        }
        let mut actions = Vec::new();
        if tile.has_prop(PropKind::DeadTree) {
            actions.push(ActionId::HarvestWood);
        }
        if tile.has_building {
            actions.extend([ActionId::EnterBuilding, ActionId::SearchBuilding]);
        }
        if tile.has_prop(PropKind::ToxicBarrel) {
            actions.push(ActionId::SalvageChemicals);
        }
        if tile.has_prop(PropKind::CarWreck) {
            actions.push(ActionId::SalvageVehicle);
        }
        if tile.has_prop(PropKind::Debris) {
            actions.push(ActionId::SearchDebris);
        }
        if tile.is_passable() && actions.is_empty() {
            actions.push(ActionId::SearchGround);
            if tile.terrain.is_soft_ground() {
                actions.push(ActionId::Dig);
            }
        }
        actions
    }

    fn furniture_locked(&self, pos: Pos) -> bool {
        self.current_interior()
            .and_then(|interior| interior.tile(pos))
            .and_then(|tile| tile.furniture)
            .is_some_and(|furniture| furniture.locked)
    }

    /// Validates and resolves one action on `pos`.
    pub fn perform_action(&mut self, action: ActionId, pos: Pos) -> Result<(), GameError> {
        self.ensure_active()?;
        let id = self.acting_unit(pos).ok_or(GameError::NoAdjacentUnit)?;
        if !self.available_actions(pos).contains(&action) {
            if action == ActionId::SearchFurniture && self.furniture_locked(pos) {
                return Err(GameError::Locked);
            }
            return Err(GameError::ActionUnavailable);
        }
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        let needed = action.ap_cost();
        if unit.action_points < needed {
            return Err(GameError::NotEnoughAp { needed, available: unit.action_points });
        }
        if action == ActionId::Attack {
            let reach = unit.pos.euclidean(pos);
            if reach > self.config.combat.melee_range {
                return Err(GameError::OutOfRange);
            }
        }

        if action.is_transition() {
            match action {
                ActionId::EnterBuilding => self.enter_building(id, pos)?,
                _ => self.exit_building(id, pos)?,
            };
        } else {
            if let Some(unit) = self.units.get_mut(id) {
                unit.spend_ap(needed)?;
            }
            self.resolve_action(id, action, pos);
        }
        debug!(action = action.id(), x = pos.x, y = pos.y, "action performed");
        Ok(())
    }

    fn resolve_action(&mut self, id: UnitId, action: ActionId, pos: Pos) {
        match action {
            ActionId::Attack => {
                if let Some(enemy) = self.world.occupant(pos).enemy() {
                    self.unit_attacks(id, enemy);
                }
            }
            ActionId::CollectWater => {
                let amount = self.dice.int_inclusive(1, 2);
                self.grant(Some((Resource::Water, amount)));
            }
            ActionId::HarvestWood => {
                let amount = self.dice.int_inclusive(2, 4);
                self.remove_prop(pos, PropKind::DeadTree);
                self.grant(Some((Resource::Scrap, amount)));
            }
            ActionId::SearchBuilding => {
                let loot = roll_bands(&mut self.dice, SEARCH_BUILDING);
                if let Some(tile) = self.world.tile_mut(pos) {
                    tile.times_searched += 1;
                }
                self.grant(loot);
            }
            ActionId::SalvageChemicals => {
                if self.dice.chance(CHEMICAL_EXPOSURE_CHANCE) {
                    let dose = self.dice.int_inclusive(5, 14);
                    self.irradiate_unit(id, f64::from(dose));
                }
                let resource = if self.dice.chance(CHEMICAL_MEDICINE_CHANCE) {
                    Resource::Medicine
                } else {
                    Resource::Scrap
                };
                self.remove_prop(pos, PropKind::ToxicBarrel);
                self.grant(Some((resource, 1)));
            }
            ActionId::SalvageVehicle => {
                let amount = self.dice.int_inclusive(3, 7);
                self.remove_prop(pos, PropKind::CarWreck);
                self.grant(Some((Resource::Scrap, amount)));
            }
            ActionId::SearchDebris => {
                let loot = roll_bands(&mut self.dice, SEARCH_DEBRIS);
                self.grant(loot);
            }
            ActionId::SearchGround => {
                let loot = roll_bands(&mut self.dice, SEARCH_GROUND);
                self.grant(loot);
            }
            ActionId::Dig => {
                let loot = roll_bands(&mut self.dice, DIG);
                self.grant(loot);
            }
            ActionId::SearchFurniture => self.search_furniture(pos),
            ActionId::SearchFurnitureAgain => {
                let loot = roll_bands(&mut self.dice, SEARCH_AGAIN);
                self.grant(loot);
            }
            ActionId::UnlockDoor | ActionId::UnlockFurniture => {
                let chance = if action == ActionId::UnlockDoor {
                    PICK_DOOR_CHANCE
                } else {
                    PICK_FURNITURE_CHANCE
                };
                if self.dice.chance(chance) {
                    self.change_indoor_tile(pos, action);
                } else {
                    self.note("The lock holds.");
                    self.log.push(LogEvent::LockHeld { pos });
                }
            }
            ActionId::BreakDoor
            | ActionId::OpenDoor
            | ActionId::CloseDoor
            | ActionId::BreakFurniture => self.change_indoor_tile(pos, action),
            ActionId::EnterBuilding | ActionId::ExitBuilding | ActionId::ExitWindow => {}
        }
    }

    /// Adds the loot to the shared pool, or records that nothing turned up.
    fn grant(&mut self, loot: Option<(Resource, i32)>) {
        match loot {
            Some((resource, amount)) if amount > 0 => {
                self.note(format!("Found {amount} {}!", resource.label()));
                self.gain_resource(resource, amount);
            }
            _ => {
                self.note("Found nothing useful.");
                self.log.push(LogEvent::NothingFound);
            }
        }
    }

    fn remove_prop(&mut self, pos: Pos, kind: PropKind) {
        if let Some(tile) = self.world.tile_mut(pos) {
            tile.remove_prop(kind);
        }
    }

    fn search_furniture(&mut self, pos: Pos) {
        let ViewMode::Indoor { building } = self.view else {
            return;
        };
        let Some(tile) = self.interiors.get_mut(&building).and_then(|i| i.tile_mut(pos)) else {
            return;
        };
        let Some(furniture) = tile.furniture.as_mut() else {
            return;
        };
        furniture.searched = true;
        let table = furniture.kind.def().loot;
        let loot = table.and_then(|table| table.roll(&mut self.dice));
        self.grant(loot);
    }

    /// Door and furniture lock changes on the current interior.
    fn change_indoor_tile(&mut self, pos: Pos, action: ActionId) {
        let ViewMode::Indoor { building } = self.view else {
            return;
        };
        let Some(interior) = self.interiors.get_mut(&building) else {
            return;
        };
        let Some(tile) = interior.tile_mut(pos) else {
            return;
        };
        let changed = match action {
            ActionId::UnlockDoor | ActionId::UnlockFurniture | ActionId::BreakFurniture => {
                tile.unlock()
            }
            ActionId::BreakDoor => tile.break_door(),
            _ => tile.toggle_door(),
        };
        let still_locked = tile.terrain == InteriorTerrain::LockedDoor;
        if let Some(door) = interior.doors.iter_mut().find(|door| door.pos == pos) {
            door.locked = still_locked;
        }
        if !changed {
            return;
        }
        let event = match action {
            ActionId::UnlockFurniture | ActionId::BreakFurniture => {
                LogEvent::FurnitureUnlocked { pos }
            }
            _ => LogEvent::DoorChanged { pos },
        };
        self.log.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FurnitureKind;
    use crate::game::test_support::{
        add_raider, first_unit, flatten, lone_game, paint, put_building, put_prop,
    };
    use crate::interior::FurnitureState;

    #[test]
    fn ids_round_trip_and_match_serde_names() {
        for action in ActionId::ALL {
            assert_eq!(ActionId::from_id(action.id()), Some(action));
            let json = serde_json::to_string(&action).expect("serialize");
            assert_eq!(json, format!("\"{}\"", action.id()));
        }
        assert_eq!(ActionId::from_id("teleport"), None);
    }

    #[test]
    fn enemy_and_water_tiles_offer_one_action() {
        let mut game = lone_game(81);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        add_raider(&mut game, pos.offset(1, 0));
        paint(&mut game, pos.offset(0, 1), Terrain::Water);
        assert_eq!(game.available_actions(pos.offset(1, 0)), vec![ActionId::Attack]);
        assert_eq!(game.available_actions(pos.offset(0, 1)), vec![ActionId::CollectWater]);
    }

    #[test]
    fn bare_ground_offers_search_and_soft_ground_offers_dig() {
        let mut game = lone_game(82);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        assert_eq!(game.available_actions(pos.offset(1, 1)), vec![ActionId::SearchGround]);
        paint(&mut game, pos.offset(-1, 0), Terrain::Dirt);
        assert_eq!(
            game.available_actions(pos.offset(-1, 0)),
            vec![ActionId::SearchGround, ActionId::Dig]
        );
        put_prop(&mut game, pos.offset(0, -1), PropKind::DeadTree);
        assert_eq!(game.available_actions(pos.offset(0, -1)), vec![ActionId::HarvestWood]);
        assert!(game.available_actions(pos.offset(3, 3)).is_empty(), "nobody in reach");
    }

    #[test]
    fn out_of_reach_action_changes_nothing() {
        let mut game = lone_game(83);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 4);
        let before = game.snapshot_hash();
        assert_eq!(
            game.perform_action(ActionId::SearchGround, pos.offset(3, 0)),
            Err(GameError::NoAdjacentUnit)
        );
        assert_eq!(
            game.perform_action(ActionId::Dig, pos.offset(1, 0)),
            Err(GameError::ActionUnavailable)
        );
        assert_eq!(game.snapshot_hash(), before);
    }

    #[test]
    fn harvesting_a_tree_removes_it_and_pays_scrap() {
        let mut game = lone_game(84);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        let tree = pos.offset(1, 0);
        put_prop(&mut game, tree, PropKind::DeadTree);
        let scrap = game.resources().scrap;
        game.perform_action(ActionId::HarvestWood, tree).expect("harvest");
        assert!(!game.world().tile(tree).is_some_and(|tile| tile.has_prop(PropKind::DeadTree)));
        assert!((scrap + 2..=scrap + 4).contains(&game.resources().scrap));
        assert_eq!(game.unit(id).map(|unit| unit.action_points), Some(2));
    }

    #[test]
    fn two_ap_actions_need_two_ap() {
        let mut game = lone_game(85);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        let car = pos.offset(1, 0);
        put_prop(&mut game, car, PropKind::CarWreck);
        game.units[id].action_points = 1;
        assert_eq!(
            game.perform_action(ActionId::SalvageVehicle, car),
            Err(GameError::NotEnoughAp { needed: 2, available: 1 })
        );
        game.units[id].action_points = 2;
        game.perform_action(ActionId::SalvageVehicle, car).expect("salvage");
        assert!(game.available_actions(car).contains(&ActionId::SearchGround));
    }

    #[test]
    fn indoor_doors_and_furniture() {
        let mut game = lone_game(86);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        let building = pos.offset(1, 0);
        put_building(&mut game, building, PropKind::RuinedHouse);
        game.perform_action(ActionId::EnterBuilding, building).expect("enter");
        let inside = game.unit(id).map(|unit| unit.pos).expect("unit");
        let door = inside.offset(-1, 0);
        let safe = inside.offset(1, 0);
        let interior = game.interiors.get_mut(&building).expect("interior");
        let door_tile = interior.tile_mut(door).expect("door tile");
        door_tile.terrain = InteriorTerrain::LockedDoor;
        door_tile.furniture = None;
        let safe_tile = interior.tile_mut(safe).expect("safe tile");
        safe_tile.terrain = InteriorTerrain::Floor;
        safe_tile.furniture =
            Some(FurnitureState { kind: FurnitureKind::Safe, locked: true, searched: false });
        game.units[id].action_points = 3;

        assert_eq!(game.available_actions(door), vec![ActionId::UnlockDoor, ActionId::BreakDoor]);
        game.perform_action(ActionId::BreakDoor, door).expect("break door");
        assert_eq!(game.available_actions(door), vec![ActionId::CloseDoor]);
        game.perform_action(ActionId::CloseDoor, door).expect("close is free");
        assert_eq!(game.unit(id).map(|unit| unit.action_points), Some(1));

        assert_eq!(game.perform_action(ActionId::SearchFurniture, safe), Err(GameError::Locked));
        assert_eq!(
            game.available_actions(safe),
            vec![ActionId::UnlockFurniture, ActionId::BreakFurniture]
        );
    }

    #[test]
    fn searched_furniture_only_offers_search_again() {
        let mut game = lone_game(87);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        let building = pos.offset(1, 0);
        put_building(&mut game, building, PropKind::RuinedHouse);
        game.perform_action(ActionId::EnterBuilding, building).expect("enter");
        let inside = game.unit(id).map(|unit| unit.pos).expect("unit");
        let shelf = inside.offset(0, -1);
        let tile = game.interiors.get_mut(&building).and_then(|i| i.tile_mut(shelf)).expect("tile");
        tile.terrain = InteriorTerrain::Floor;
        tile.furniture =
            Some(FurnitureState { kind: FurnitureKind::Shelf, locked: false, searched: false });

        game.perform_action(ActionId::SearchFurniture, shelf).expect("search");
        let searched = game
            .current_interior()
            .and_then(|interior| interior.tile(shelf))
            .and_then(|tile| tile.furniture)
            .is_some_and(|furniture| furniture.searched);
        assert!(searched);
        assert_eq!(game.available_actions(shelf), vec![ActionId::SearchFurnitureAgain]);
    }
}
