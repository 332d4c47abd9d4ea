use serde::{Deserialize, Serialize};

/// Movement costs are carried in hundredths of a tile step.
pub const COST_SCALE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Dirt,
    Mud,
    Sand,
    Pavement,
    Concrete,
    Toxic,
    Water,
    Rubble,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainDef {
    pub name: &'static str,
    pub move_cost: u32,
    pub passable: bool,
    pub base_radiation: f64,
}

impl Terrain {
    pub const ALL: [Terrain; 9] = [
        Terrain::Grass,
        Terrain::Dirt,
        Terrain::Mud,
        Terrain::Sand,
        Terrain::Pavement,
        Terrain::Concrete,
        Terrain::Toxic,
        Terrain::Water,
        Terrain::Rubble,
    ];

    pub fn def(self) -> TerrainDef {
        let (name, move_cost, passable, base_radiation) = match self {
            Terrain::Grass => ("Grass", 100, true, 0.0),
            Terrain::Dirt => ("Dirt", 100, true, 0.0),
            Terrain::Mud => ("Mud", 150, true, 0.0),
            Terrain::Sand => ("Sand", 120, true, 0.0),
            Terrain::Pavement => ("Pavement", 80, true, 0.0),
            Terrain::Concrete => ("Concrete", 80, true, 0.0),
            Terrain::Toxic => ("Toxic", 150, true, 0.5),
            Terrain::Water => ("Water", 300, false, 0.0),
            Terrain::Rubble => ("Rubble", 200, true, 0.0),
        };
        TerrainDef { name, move_cost, passable, base_radiation }
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Diggable ground, used for the `dig` interaction.
    pub fn is_soft_ground(self) -> bool {
        matches!(self, Terrain::Dirt | Terrain::Sand | Terrain::Mud)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InteriorTerrain {
    Floor,
    Wall,
    OpenDoor,
    ClosedDoor,
    LockedDoor,
    Window,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteriorTerrainDef {
    pub name: &'static str,
    pub move_cost: u32,
    pub passable: bool,
}

impl InteriorTerrain {
    pub fn def(self) -> InteriorTerrainDef {
        let (name, move_cost, passable) = match self {
            InteriorTerrain::Floor => ("Floor", 100, true),
            InteriorTerrain::Wall => ("Wall", 0, false),
            InteriorTerrain::OpenDoor => ("Open Door", 100, true),
            InteriorTerrain::ClosedDoor => ("Closed Door", 100, true),
            InteriorTerrain::LockedDoor => ("Locked Door", 0, false),
            InteriorTerrain::Window => ("Window", 0, false),
            InteriorTerrain::Exit => ("Exit", 100, true),
        };
        InteriorTerrainDef { name, move_cost, passable }
    }

    pub fn is_door(self) -> bool {
        matches!(
            self,
            InteriorTerrain::OpenDoor | InteriorTerrain::ClosedDoor | InteriorTerrain::LockedDoor
        )
    }
}
