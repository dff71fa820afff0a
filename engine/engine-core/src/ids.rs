//! Stable identifiers and small enums shared between the battle engine and
//! the search.
//!
//! `SpeciesId` and `MoveId` are dense indices into a [`Dex`](crate::Dex), which
//! lets the vocabulary build flat lookup arrays keyed by them.

/// Index of a species in the dex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub u16);

/// Index of a move in the dex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveId(pub u16);

impl SpeciesId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MoveId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which of the two battle sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideId {
    P1,
    P2,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::P1 => SideId::P2,
            SideId::P2 => SideId::P1,
        }
    }

    /// Position of this side in `[p1, p2]` arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SideId::P1 => 0,
            SideId::P2 => 1,
        }
    }
}

/// Targeting rule of a move, as declared by the move data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveTarget {
    Normal,
    Any,
    AdjacentFoe,
    AdjacentAlly,
    AdjacentAllyOrSelf,
    User,
    AllAdjacent,
    AllAdjacentFoes,
    Allies,
    AllySide,
    AllyTeam,
    FoeSide,
    All,
    RandomNormal,
    Scripted,
}

/// Non-volatile status conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Paralysis,
    Burn,
    Sleep,
    Poison,
    Toxic,
    Freeze,
}

/// Elemental types a Pokémon can terastallize into.
///
/// Declaration order is part of the model input contract: the encoder uses
/// `discriminant + 1` as the one-hot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeraType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    Stellar,
}

impl TeraType {
    pub const ALL: [TeraType; 19] = [
        TeraType::Normal,
        TeraType::Fire,
        TeraType::Water,
        TeraType::Electric,
        TeraType::Grass,
        TeraType::Ice,
        TeraType::Fighting,
        TeraType::Poison,
        TeraType::Ground,
        TeraType::Flying,
        TeraType::Psychic,
        TeraType::Bug,
        TeraType::Rock,
        TeraType::Ghost,
        TeraType::Dragon,
        TeraType::Dark,
        TeraType::Steel,
        TeraType::Fairy,
        TeraType::Stellar,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    SunnyDay,
    DesolateLand,
    RainDance,
    PrimordialSea,
    Sandstorm,
    Snowscape,
    DeltaStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Electric,
    Grassy,
    Psychic,
    Misty,
}

/// Conditions that sit on one side of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideCondition {
    Tailwind,
    Reflect,
    LightScreen,
    AuroraVeil,
    Safeguard,
    Mist,
    StealthRock,
    Spikes,
    ToxicSpikes,
    StickyWeb,
    WideGuard,
    QuickGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(SideId::P1.opponent(), SideId::P2);
        assert_eq!(SideId::P2.opponent(), SideId::P1);
        assert_eq!(SideId::P2.index(), 1);
    }

    #[test]
    fn test_tera_type_order() {
        assert_eq!(TeraType::ALL.len(), 19);
        for (i, t) in TeraType::ALL.iter().enumerate() {
            assert_eq!(*t as usize, i);
        }
        assert_eq!(TeraType::Stellar as usize, 18);
    }
}
