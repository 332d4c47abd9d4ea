use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Action,
    Skill,
    Item,
    Event,
}

impl CardType {
    pub fn label(self) -> &'static str {
        match self {
            CardType::Action => "action",
            CardType::Skill => "skill",
            CardType::Item => "item",
            CardType::Event => "event",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Applies to the selected unit, which also pays the cost.
    SelectedUnit,
    /// Applies to shared resources; the selected unit still pays the cost.
    Party,
}

/// Effects apply in declaration order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardEffect {
    Heal(i32),
    /// Extra move range until the end of the current turn.
    MoveBonus(i32),
    RestoreAp(i32),
    /// Damage to the target itself.
    SelfDamage(i32),
    CureRadiation(f64),
    Hydrate(i32),
    Nourish(i32),
    GainScrap(i32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTemplate {
    pub name: &'static str,
    pub card_type: CardType,
    pub cost: i32,
    pub effects: &'static [CardEffect],
    pub target: TargetType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Sprint,
    FirstAid,
    Scavenge,
    RadAway,
    PurifiedWater,
    CannedFood,
    SecondWind,
    CombatStim,
    Bandage,
    EmergencyRation,
}

impl CardKind {
    pub const STARTER: [CardKind; 10] = [
        CardKind::Sprint,
        CardKind::FirstAid,
        CardKind::Scavenge,
        CardKind::RadAway,
        CardKind::PurifiedWater,
        CardKind::CannedFood,
        CardKind::SecondWind,
        CardKind::CombatStim,
        CardKind::Bandage,
        CardKind::EmergencyRation,
    ];

    pub fn template(self) -> CardTemplate {
        use CardEffect as E;
        use CardType::{Action, Item, Skill};
        use TargetType::{Party, SelectedUnit};
        let template: (_, _, _, &'static [CardEffect], _) = match self {
            CardKind::Sprint => ("Sprint", Action, 1, &[E::MoveBonus(2)], SelectedUnit),
            CardKind::FirstAid => ("First Aid", Item, 1, &[E::Heal(25)], SelectedUnit),
            CardKind::Scavenge => ("Scavenge", Action, 1, &[E::GainScrap(5)], Party),
            CardKind::RadAway => ("Rad-Away", Item, 1, &[E::CureRadiation(30.0)], SelectedUnit),
            CardKind::PurifiedWater => ("Purified Water", Item, 0, &[E::Hydrate(40)], SelectedUnit),
            CardKind::CannedFood => ("Canned Food", Item, 0, &[E::Nourish(30)], SelectedUnit),
            CardKind::SecondWind => ("Second Wind", Skill, 0, &[E::RestoreAp(1)], SelectedUnit),
            CardKind::CombatStim => (
                "Combat Stim",
                Item,
                0,
                &[E::RestoreAp(2), E::SelfDamage(10)],
                SelectedUnit,
            ),
            CardKind::Bandage => ("Bandage", Item, 0, &[E::Heal(15)], SelectedUnit),
            CardKind::EmergencyRation => (
                "Emergency Ration",
                Item,
                1,
                &[E::Nourish(20), E::Hydrate(20)],
                SelectedUnit,
            ),
        };
        let (name, card_type, cost, effects, target) = template;
        CardTemplate { name, card_type, cost, effects, target }
    }

    pub fn name(self) -> &'static str {
        self.template().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::STARTER.into_iter().find(|kind| kind.name() == name)
    }
}
