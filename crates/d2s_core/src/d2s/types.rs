// Save file constants
pub const MAGIC: u32 = 0xAA55_AA55;
pub const MIN_HEADER_LEN: usize = 335;
/// Format revision written by 1.10 through 1.14 and the mods built on them.
pub const SUPPORTED_VERSION: u32 = 96;

pub const OFFSET_VERSION: usize = 4;
pub const OFFSET_FILE_SIZE: usize = 8;
pub const OFFSET_CHECKSUM: usize = 12;
pub const OFFSET_NAME: usize = 20;
pub const NAME_LEN: usize = 16;
pub const OFFSET_STATUS: usize = 36;
pub const OFFSET_PROGRESSION: usize = 37;
pub const OFFSET_CLASS: usize = 40;
pub const OFFSET_LEVEL: usize = 43;
pub const OFFSET_LAST_PLAYED: usize = 48;
pub const OFFSET_DIFFICULTY: usize = 168;
pub const OFFSET_MERCENARY_ID: usize = 179;
pub const OFFSET_ATTRIBUTES: usize = 765;

pub const STATUS_HARDCORE: u8 = 0x04;
pub const STATUS_DIED: u8 = 0x08;
pub const STATUS_EXPANSION: u8 = 0x20;
pub const STATUS_LADDER: u8 = 0x40;
pub const DIFFICULTY_ACTIVE: u8 = 0x80;

pub const ATTRIBUTES_MARKER: &[u8; 2] = b"gf";
pub const SKILLS_MARKER: &[u8; 2] = b"if";
pub const ITEM_LIST_MARKER: &[u8; 2] = b"JM";
pub const MERCENARY_MARKER: &[u8; 2] = b"jf";
pub const GOLEM_MARKER: &[u8; 2] = b"kf";
/// "JM" read as a 16-bit little-endian field.
pub const ITEM_MARKER_BITS: u32 = 0x4D4A;
pub const CORPSE_HEADER_LEN: usize = 12;

pub const STAT_ID_BITS: u32 = 9;
pub const STAT_LIST_END: u16 = 0x1FF;
/// Attribute list entries are capped well above any real item.
pub const MAX_ITEM_ATTRIBUTES: usize = 512;

// Fallback scanner windows
pub const SCAN_START: usize = 175;
pub const ATTRIBUTE_SCAN_END: usize = 1000;
pub const SKILL_SCAN_END: usize = 2000;

pub const CLASSIC_SKILL_COUNT: usize = 30;
pub const EXTENDED_SKILL_COUNT: usize = 33;

pub const EQUIP_SLOT_COUNT: usize = 12;

// Item stat ids read outside the attribute lists
pub const STAT_ARMOR_DEFENSE: u16 = 31;
pub const STAT_DURABILITY: u16 = 72;
pub const STAT_MAX_DURABILITY: u16 = 73;
pub const DEFAULT_DEFENSE_BITS: (u8, i32) = (11, 10);
pub const DEFAULT_DURABILITY_BITS: (u8, i32) = (9, 0);
pub const DEFAULT_MAX_DURABILITY_BITS: (u8, i32) = (8, 0);
pub const QUANTITY_BITS: u32 = 9;
pub const TOME_CODES: [&str; 2] = ["tbk", "ibk"];

/// Character attribute ids with their stored bit widths.
pub const ATTRIBUTE_WIDTHS: [(u16, u32); 16] = [
    (0, 10),
    (1, 10),
    (2, 10),
    (3, 10),
    (4, 10),
    (5, 8),
    (6, 21),
    (7, 21),
    (8, 21),
    (9, 21),
    (10, 21),
    (11, 21),
    (12, 7),
    (13, 32),
    (14, 25),
    (15, 25),
];

/// Life, mana and stamina (current and max) are stored as 8.8 fixed point.
pub const FIXED_POINT_ATTRIBUTES: std::ops::RangeInclusive<u16> = 6..=11;
pub const FIXED_POINT_SCALE: i64 = 256;

pub const ATTRIBUTE_NAMES: [&str; 16] = [
    "strength",
    "energy",
    "dexterity",
    "vitality",
    "stat_points",
    "skill_points",
    "current_life",
    "life",
    "current_mana",
    "mana",
    "current_stamina",
    "stamina",
    "level",
    "experience",
    "gold",
    "gold_stash",
];

pub fn attribute_width(id: u16) -> Option<u32> {
    ATTRIBUTE_WIDTHS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, width)| *width)
}

pub fn attribute_name(id: u16) -> Option<&'static str> {
    ATTRIBUTE_NAMES.get(id as usize).copied()
}

pub const ATTR_STRENGTH: u16 = 0;
pub const ATTR_ENERGY: u16 = 1;
pub const ATTR_DEXTERITY: u16 = 2;
pub const ATTR_VITALITY: u16 = 3;
pub const ATTR_LIFE: u16 = 7;
pub const ATTR_MANA: u16 = 9;
pub const ATTR_STAMINA: u16 = 11;
pub const ATTR_LEVEL: u16 = 12;

pub const EQUIP_SLOT_NAMES: [&str; EQUIP_SLOT_COUNT] = [
    "head",
    "neck",
    "torso",
    "rArm",
    "lArm",
    "rRing",
    "lRing",
    "belt",
    "feet",
    "hands",
    "rArmSwitch",
    "lArmSwitch",
];

pub const QUALITY_NAMES: [&str; 9] = [
    "low", "normal", "superior", "magic", "set", "rare", "unique", "crafted", "tempered",
];

// --- Built-in skill names for the fallback scanner ---

pub const CLASS_SKILL_NAMES: [[&str; CLASSIC_SKILL_COUNT]; 7] = [
    [
        "Magic Arrow",
        "Fire Arrow",
        "Inner Sight",
        "Critical Strike",
        "Jab",
        "Cold Arrow",
        "Multiple Shot",
        "Dodge",
        "Power Strike",
        "Poison Javelin",
        "Exploding Arrow",
        "Slow Missiles",
        "Avoid",
        "Impale",
        "Lightning Bolt",
        "Ice Arrow",
        "Guided Arrow",
        "Penetrate",
        "Charged Strike",
        "Plague Javelin",
        "Strafe",
        "Immolation Arrow",
        "Decoy",
        "Evade",
        "Fend",
        "Freezing Arrow",
        "Valkyrie",
        "Pierce",
        "Lightning Strike",
        "Lightning Fury",
    ],
    [
        "Fire Bolt",
        "Warmth",
        "Charged Bolt",
        "Ice Bolt",
        "Frozen Armor",
        "Inferno",
        "Static Field",
        "Telekinesis",
        "Frost Nova",
        "Lightning",
        "Blaze",
        "Shiver Armor",
        "Fire Ball",
        "Nova",
        "Thunder Storm",
        "Energy Shield",
        "Blizzard",
        "Chilling Armor",
        "Fire Wall",
        "Chain Lightning",
        "Meteor",
        "Glacial Spike",
        "Teleport",
        "Hydra",
        "Frozen Orb",
        "Lightning Mastery",
        "Fire Mastery",
        "Cold Mastery",
        "Ice Barrage",
        "Combustion",
    ],
    [
        "Amplify Damage",
        "Teeth",
        "Bone Armor",
        "Skeleton Mastery",
        "Raise Skeleton",
        "Dim Vision",
        "Weaken",
        "Poison Dagger",
        "Corpse Explosion",
        "Clay Golem",
        "Iron Maiden",
        "Terror",
        "Bone Wall",
        "Golem Mastery",
        "Raise Skeletal Mage",
        "Confuse",
        "Life Tap",
        "Poison Explosion",
        "Bone Spear",
        "Blood Golem",
        "Attract",
        "Decrepify",
        "Bone Prison",
        "Summon Resist",
        "Iron Golem",
        "Lower Resist",
        "Poison Nova",
        "Bone Spirit",
        "Fire Golem",
        "Revive",
    ],
    [
        "Sacrifice",
        "Smite",
        "Might",
        "Prayer",
        "Resist Fire",
        "Holy Bolt",
        "Holy Fire",
        "Thorns",
        "Defiance",
        "Resist Cold",
        "Zeal",
        "Charge",
        "Blessed Aim",
        "Cleansing",
        "Resist Lightning",
        "Vengeance",
        "Blessed Hammer",
        "Concentration",
        "Holy Freeze",
        "Vigor",
        "Conversion",
        "Holy Shield",
        "Holy Shock",
        "Sanctuary",
        "Meditation",
        "Fist of the Heavens",
        "Fanaticism",
        "Conviction",
        "Redemption",
        "Salvation",
    ],
    [
        "Bash",
        "Sword Mastery",
        "Axe Mastery",
        "Mace Mastery",
        "Howl",
        "Find Potion",
        "Leap",
        "Double Swing",
        "Polearm Mastery",
        "Throwing Mastery",
        "Shout",
        "Taunt",
        "Stun",
        "Double Throw",
        "Increased Stamina",
        "Find Item",
        "Leap Attack",
        "Battle Cry",
        "Frenzy",
        "Increased Speed",
        "Iron Skin",
        "Battle Command",
        "Natural Resistance",
        "War Cry",
        "Berserk",
        "Whirlwind",
        "Battle Orders",
        "Grim Ward",
        "Concentrate",
        "Bear Form",
    ],
    [
        "Raven",
        "Poison Creeper",
        "Werewolf",
        "Lycanthropy",
        "Firestorm",
        "Oak Sage",
        "Summon Spirit Wolf",
        "Werebear",
        "Molten Boulder",
        "Arctic Blast",
        "Carrion Vine",
        "Feral Rage",
        "Maul",
        "Fissure",
        "Cyclone Armor",
        "Heart of Wolverine",
        "Summon Dire Wolf",
        "Rabies",
        "Fire Claws",
        "Twister",
        "Solar Creeper",
        "Hunger",
        "Shock Wave",
        "Volcano",
        "Tornado",
        "Spirit of Barbs",
        "Summon Grizzly",
        "Fury",
        "Armageddon",
        "Hurricane",
    ],
    [
        "Fire Blast",
        "Claw Mastery",
        "Psychic Hammer",
        "Tiger Strike",
        "Dragon Talon",
        "Shock Web",
        "Blade Sentinel",
        "Burst of Speed",
        "Fists of Fire",
        "Dragon Claw",
        "Charged Bolt Sentry",
        "Wake of Fire",
        "Weapon Block",
        "Cloak of Shadows",
        "Cobra Strike",
        "Blade Fury",
        "Fade",
        "Shadow Warrior",
        "Claws of Thunder",
        "Dragon Tail",
        "Lightning Sentry",
        "Wake of Inferno",
        "Mind Blast",
        "Blades of Ice",
        "Dragon Flight",
        "Death Sentry",
        "Blade Shield",
        "Venom",
        "Shadow Master",
        "Phoenix Strike",
    ],
];
