use serde::{Deserialize, Serialize};

/// How a stat's value is turned into text. Numbers match the game's
/// description-function column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DescriptorMode {
    /// `+v text`
    SignedValue,
    /// `v% text`
    Percent,
    /// `v text`
    PlainValue,
    /// `+v% text`
    SignedPercent,
    /// `v*100/128` as a percentage
    Scaled128,
    SignedValueQualified,
    PercentQualified,
    SignedPercentQualified,
    PlainValueQualified,
    Scaled128Qualified,
    /// Repairs durability; value is hundredths
    RepairRate,
    SignedValueAlt,
    /// `+v to <Class> Skill Levels`
    ClassSkills,
    /// `+v to <Tab> Skills (<Class> Only)`
    SkillTab,
    /// `x% chance to cast level y <skill> when ...`
    ChanceToCast,
    /// `Level v <aura> Aura When Equipped`
    Aura,
    ByTime,
    ByTimePercent,
    Template,
    /// Penalty shown with its sign inverted, as a percentage
    NegatedPercent,
    /// Penalty shown with its sign inverted
    Negated,
    VersusMonsterType,
    VersusMonster,
    /// `Level x <skill> (y/z Charges)`
    Charges,
    Unused25,
    Unused26,
    /// `+v to <skill> (<Class> Only)`
    ClassSkill,
    /// `+v to <skill>`
    Skill,
    TemplateAlt,
    Unknown(u8),
}

impl DescriptorMode {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::SignedValue,
            2 => Self::Percent,
            3 => Self::PlainValue,
            4 => Self::SignedPercent,
            5 => Self::Scaled128,
            6 => Self::SignedValueQualified,
            7 => Self::PercentQualified,
            8 => Self::SignedPercentQualified,
            9 => Self::PlainValueQualified,
            10 => Self::Scaled128Qualified,
            11 => Self::RepairRate,
            12 => Self::SignedValueAlt,
            13 => Self::ClassSkills,
            14 => Self::SkillTab,
            15 => Self::ChanceToCast,
            16 => Self::Aura,
            17 => Self::ByTime,
            18 => Self::ByTimePercent,
            19 => Self::Template,
            20 => Self::NegatedPercent,
            21 => Self::Negated,
            22 => Self::VersusMonsterType,
            23 => Self::VersusMonster,
            24 => Self::Charges,
            25 => Self::Unused25,
            26 => Self::Unused26,
            27 => Self::ClassSkill,
            28 => Self::Skill,
            29 => Self::TemplateAlt,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::SignedValue => 1,
            Self::Percent => 2,
            Self::PlainValue => 3,
            Self::SignedPercent => 4,
            Self::Scaled128 => 5,
            Self::SignedValueQualified => 6,
            Self::PercentQualified => 7,
            Self::SignedPercentQualified => 8,
            Self::PlainValueQualified => 9,
            Self::Scaled128Qualified => 10,
            Self::RepairRate => 11,
            Self::SignedValueAlt => 12,
            Self::ClassSkills => 13,
            Self::SkillTab => 14,
            Self::ChanceToCast => 15,
            Self::Aura => 16,
            Self::ByTime => 17,
            Self::ByTimePercent => 18,
            Self::Template => 19,
            Self::NegatedPercent => 20,
            Self::Negated => 21,
            Self::VersusMonsterType => 22,
            Self::VersusMonster => 23,
            Self::Charges => 24,
            Self::Unused25 => 25,
            Self::Unused26 => 26,
            Self::ClassSkill => 27,
            Self::Skill => 28,
            Self::TemplateAlt => 29,
            Self::Unknown(other) => other,
        }
    }

    /// Modes 6 through 10 append the qualifier string after the value.
    pub fn appends_qualifier(&self) -> bool {
        (6..=10).contains(&self.raw())
    }

    /// Modes whose leading values identify a skill, class or tab, so two
    /// entries merge only when those keys match.
    pub fn key_len(&self) -> usize {
        match self {
            Self::ClassSkills | Self::Aura | Self::ClassSkill | Self::Skill => 1,
            Self::SkillTab | Self::ChanceToCast | Self::Charges => 2,
            _ => 0,
        }
    }
}

impl From<u8> for DescriptorMode {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

impl From<DescriptorMode> for u8 {
    fn from(mode: DescriptorMode) -> Self {
        mode.raw()
    }
}

/// Where the formatted value goes relative to the description text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ValuePosition {
    /// Substituted into the template's `%d`/`%s` slot.
    #[default]
    Template,
    Before,
    After,
}

impl From<u8> for ValuePosition {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Template,
            2 => Self::After,
            _ => Self::Before,
        }
    }
}

impl From<ValuePosition> for u8 {
    fn from(position: ValuePosition) -> Self {
        match position {
            ValuePosition::Template => 0,
            ValuePosition::Before => 1,
            ValuePosition::After => 2,
        }
    }
}

/// Replacement renderers for stats the shipped tables describe badly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFormat {
    /// Each `%d` takes the next value in order.
    Template(String),
    /// `<v>% Splash Damage` from the third value, 100 when absent or zero.
    SplashDamage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDescriptor {
    pub mode: Option<DescriptorMode>,
    pub value_position: Option<ValuePosition>,
    pub positive: Option<String>,
    pub negative: Option<String>,
    /// Trailing qualifier, e.g. "(Based on Character Level)".
    pub qualifier: Option<String>,
    /// Compound stats: template for a min-max range.
    pub range: Option<String>,
    /// Compound stats: template when min equals max.
    pub equal_range: Option<String>,
    pub hidden: bool,
    pub custom: Option<CustomFormat>,
}

impl PropertyDescriptor {
    pub fn fill_missing_strings(&mut self, other: &PropertyDescriptor) {
        for (ours, theirs) in [
            (&mut self.positive, &other.positive),
            (&mut self.negative, &other.negative),
            (&mut self.qualifier, &other.qualifier),
            (&mut self.range, &other.range),
            (&mut self.equal_range, &other.equal_range),
        ] {
            if ours.as_deref().is_none_or(str::is_empty) {
                ours.clone_from(theirs);
            }
        }
    }
}
