use std::{fmt, ops};

/// Collection of game mods as the legacy bitflag integer.
///
/// ```
/// use beatmap_pp::model::mods::GameMods;
///
/// let mods = GameMods::from(8 + 16);
/// assert!(mods.hd() && mods.hr());
/// assert_eq!(mods.to_string(), "HDHR");
/// assert!(mods.validate().is_ok());
///
/// let conflicting = GameMods::DT | GameMods::HT;
/// assert!(conflicting.validate().is_err());
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GameMods(u32);

#[rustfmt::skip]
impl GameMods {
    pub const NM: Self = Self(0);
    pub const NF: Self = Self(1 << 0);
    pub const EZ: Self = Self(1 << 1);
    pub const TD: Self = Self(1 << 2);
    pub const HD: Self = Self(1 << 3);
    pub const HR: Self = Self(1 << 4);
    pub const SD: Self = Self(1 << 5);
    pub const DT: Self = Self(1 << 6);
    pub const RX: Self = Self(1 << 7);
    pub const HT: Self = Self(1 << 8);
    pub const NC: Self = Self(1 << 9);
    pub const FL: Self = Self(1 << 10);
    pub const SO: Self = Self(1 << 12);
    pub const AP: Self = Self(1 << 13);
    pub const PF: Self = Self(1 << 14);
    pub const K4: Self = Self(1 << 15);
    pub const K5: Self = Self(1 << 16);
    pub const K6: Self = Self(1 << 17);
    pub const K7: Self = Self(1 << 18);
    pub const K8: Self = Self(1 << 19);
    pub const K9: Self = Self(1 << 24);
    pub const K1: Self = Self(1 << 26);
    pub const K3: Self = Self(1 << 27);
    pub const K2: Self = Self(1 << 28);
}

const KEY_MODS: [(GameMods, u8); 9] = [
    (GameMods::K1, 1),
    (GameMods::K2, 2),
    (GameMods::K3, 3),
    (GameMods::K4, 4),
    (GameMods::K5, 5),
    (GameMods::K6, 6),
    (GameMods::K7, 7),
    (GameMods::K8, 8),
    (GameMods::K9, 9),
];

const ACRONYMS: [(GameMods, &str); 15] = [
    (GameMods::NF, "NF"),
    (GameMods::EZ, "EZ"),
    (GameMods::TD, "TD"),
    (GameMods::HD, "HD"),
    (GameMods::HR, "HR"),
    (GameMods::SD, "SD"),
    (GameMods::DT, "DT"),
    (GameMods::RX, "RX"),
    (GameMods::HT, "HT"),
    (GameMods::NC, "NC"),
    (GameMods::FL, "FL"),
    (GameMods::SO, "SO"),
    (GameMods::AP, "AP"),
    (GameMods::PF, "PF"),
    (GameMods::K1, "1K"),
];

/// Pairs of mods that cannot be enabled at the same time.
const CONFLICTS: [(GameMods, GameMods); 7] = [
    (GameMods::DT, GameMods::HT),
    (GameMods::NC, GameMods::HT),
    (GameMods::HR, GameMods::EZ),
    (GameMods::NF, GameMods::SD),
    (GameMods::NF, GameMods::PF),
    (GameMods::RX, GameMods::AP),
    (GameMods::AP, GameMods::SO),
];

/// Two or more mods were combined that exclude each other.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("mods {a} and {b} cannot be combined")]
pub struct ModConflict {
    pub a: GameMods,
    pub b: GameMods,
}

impl GameMods {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Checks that no two mutually exclusive mods are enabled.
    pub fn validate(self) -> Result<Self, ModConflict> {
        let conflict = CONFLICTS
            .iter()
            .find(|(a, b)| self.intersects(*a) && self.intersects(*b));

        if let Some(&(a, b)) = conflict {
            return Err(ModConflict { a, b });
        }

        let mut keys = KEY_MODS
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| self.intersects(*key));

        if let Some((a, b)) = keys.next().zip(keys.next()) {
            return Err(ModConflict { a, b });
        }

        Ok(self)
    }

    pub const fn nf(self) -> bool {
        self.intersects(Self::NF)
    }

    pub const fn ez(self) -> bool {
        self.intersects(Self::EZ)
    }

    pub const fn td(self) -> bool {
        self.intersects(Self::TD)
    }

    pub const fn hd(self) -> bool {
        self.intersects(Self::HD)
    }

    pub const fn hr(self) -> bool {
        self.intersects(Self::HR)
    }

    /// `DT` or `NC`.
    pub const fn dt(self) -> bool {
        self.intersects(Self(Self::DT.0 | Self::NC.0))
    }

    pub const fn rx(self) -> bool {
        self.intersects(Self::RX)
    }

    pub const fn ht(self) -> bool {
        self.intersects(Self::HT)
    }

    pub const fn fl(self) -> bool {
        self.intersects(Self::FL)
    }

    pub const fn so(self) -> bool {
        self.intersects(Self::SO)
    }

    pub const fn ap(self) -> bool {
        self.intersects(Self::AP)
    }

    /// The clock rate implied by the speed changing mods.
    pub const fn clock_rate(self) -> f64 {
        if self.dt() {
            1.5
        } else if self.ht() {
            0.75
        } else {
            1.0
        }
    }

    pub const fn od_ar_hp_multiplier(self) -> f64 {
        if self.hr() {
            1.4
        } else if self.ez() {
            0.5
        } else {
            1.0
        }
    }

    /// Whether fruits are offset and the playfield is flipped.
    pub const fn hardrock_offsets(self) -> bool {
        self.hr()
    }

    /// The amount of keys requested through a key mod.
    pub fn key_count(self) -> Option<u8> {
        KEY_MODS
            .iter()
            .find(|(key, _)| self.intersects(*key))
            .map(|(_, count)| *count)
    }
}

impl From<u32> for GameMods {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<GameMods> for u32 {
    fn from(mods: GameMods) -> Self {
        mods.0
    }
}

impl ops::BitOr for GameMods {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for GameMods {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for GameMods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NM");
        }

        for (gamemod, acronym) in ACRONYMS.iter() {
            // NC implies DT in the bits of most clients
            if *gamemod == Self::DT && self.intersects(Self::NC) {
                continue;
            }

            if self.intersects(*gamemod) {
                f.write_str(acronym)?;
            }
        }

        if let Some(keys) = self.key_count().filter(|&keys| keys > 1) {
            write!(f, "{keys}K")?;
        }

        Ok(())
    }
}

impl fmt::Debug for GameMods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::GameMods;

    #[test]
    fn clock_rate() {
        assert!((GameMods::DT.clock_rate() - 1.5).abs() < f64::EPSILON);
        assert!(((GameMods::NC | GameMods::DT).clock_rate() - 1.5).abs() < f64::EPSILON);
        assert!((GameMods::HT.clock_rate() - 0.75).abs() < f64::EPSILON);
        assert!((GameMods::HD.clock_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn conflicts() {
        assert!((GameMods::DT | GameMods::HT).validate().is_err());
        assert!((GameMods::NC | GameMods::HT).validate().is_err());
        assert!((GameMods::HR | GameMods::EZ).validate().is_err());
        assert!((GameMods::NF | GameMods::PF).validate().is_err());
        assert!((GameMods::K4 | GameMods::K7).validate().is_err());

        assert!((GameMods::HD | GameMods::HR | GameMods::DT).validate().is_ok());
        assert!((GameMods::EZ | GameMods::HT | GameMods::FL).validate().is_ok());
        assert!((GameMods::NC | GameMods::DT).validate().is_ok());
    }

    #[test]
    fn key_count() {
        assert_eq!(GameMods::K7.key_count(), Some(7));
        assert_eq!(GameMods::K1.key_count(), Some(1));
        assert_eq!(GameMods::HD.key_count(), None);
    }

    #[test]
    fn display() {
        assert_eq!(GameMods::NM.to_string(), "NM");
        assert_eq!((GameMods::HD | GameMods::DT).to_string(), "HDDT");
        assert_eq!((GameMods::NC | GameMods::DT).to_string(), "NC");
        assert_eq!((GameMods::HD | GameMods::K4).to_string(), "HD4K");
    }
}
