use crate::esm::store::{Indexed, StoreItem};

/// One of the eight primary attributes.
///
/// Attributes are not stored in plugins; the table is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub index: usize,
    /// Game setting holding the display name.
    pub name_setting: &'static str,
    /// Game setting holding the description.
    pub description_setting: &'static str,
}

impl Attribute {
    pub const STRENGTH: usize = 0;
    pub const INTELLIGENCE: usize = 1;
    pub const WILLPOWER: usize = 2;
    pub const AGILITY: usize = 3;
    pub const SPEED: usize = 4;
    pub const ENDURANCE: usize = 5;
    pub const PERSONALITY: usize = 6;
    pub const LUCK: usize = 7;

    pub const LENGTH: usize = 8;

    const TABLE: [(&'static str, &'static str); Attribute::LENGTH] = [
        ("sAttributeStrength", "sStrDesc"),
        ("sAttributeIntelligence", "sIntDesc"),
        ("sAttributeWillpower", "sWilDesc"),
        ("sAttributeAgility", "sAgiDesc"),
        ("sAttributeSpeed", "sSpdDesc"),
        ("sAttributeEndurance", "sEndDesc"),
        ("sAttributePersonality", "sPerDesc"),
        ("sAttributeLuck", "sLucDesc"),
    ];

    /// The full attribute table in index order.
    pub fn builtin() -> impl Iterator<Item = Attribute> {
        Self::TABLE
            .iter()
            .enumerate()
            .map(|(index, &(name_setting, description_setting))| Attribute {
                index,
                name_setting,
                description_setting,
            })
    }
}

impl StoreItem for Attribute {
    const DEBUG_NAME: &'static str = "Attribute";
}

impl Indexed for Attribute {
    const CAPACITY: usize = Attribute::LENGTH;

    fn index(&self) -> i64 {
        self.index as i64
    }
}
