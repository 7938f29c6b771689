use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationIdentity {
    pub id: String,
    pub name: String,
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub server: String,
}

impl From<SearchResult> for OrganizationIdentity {
    fn from(result: SearchResult) -> Self {
        OrganizationIdentity {
            id: result.id,
            name: result.name,
            server: result.server,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    MembershipDescending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    /// Free Company rank.
    pub organization_rank: String,
    /// Grand Company rank.
    pub external_rank: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPage {
    pub entries: Vec<RosterEntry>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Job {
    Paladin,
    Warrior,
    DarkKnight,
    Gunbreaker,
    WhiteMage,
    Scholar,
    Astrologian,
    Sage,
    Monk,
    Dragoon,
    Ninja,
    Samurai,
    Reaper,
    Viper,
    Bard,
    Machinist,
    Dancer,
    BlackMage,
    Summoner,
    RedMage,
    Pictomancer,
    BlueMage,
    Carpenter,
    Blacksmith,
    Armorer,
    Goldsmith,
    Leatherworker,
    Weaver,
    Alchemist,
    Culinarian,
    Miner,
    Botanist,
    Fisher,
}

impl Job {
    /// Report column order, grouped by role.
    pub const ALL: [Job; 33] = [
        // Tanks
        Job::Paladin,
        Job::Warrior,
        Job::DarkKnight,
        Job::Gunbreaker,
        // Healers
        Job::WhiteMage,
        Job::Scholar,
        Job::Astrologian,
        Job::Sage,
        // Melee DPS
        Job::Monk,
        Job::Dragoon,
        Job::Ninja,
        Job::Samurai,
        Job::Reaper,
        Job::Viper,
        // Physical ranged DPS
        Job::Bard,
        Job::Machinist,
        Job::Dancer,
        // Magical ranged DPS
        Job::BlackMage,
        Job::Summoner,
        Job::RedMage,
        Job::Pictomancer,
        Job::BlueMage,
        // Crafting
        Job::Carpenter,
        Job::Blacksmith,
        Job::Armorer,
        Job::Goldsmith,
        Job::Leatherworker,
        Job::Weaver,
        Job::Alchemist,
        Job::Culinarian,
        // Gathering
        Job::Miner,
        Job::Botanist,
        Job::Fisher,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Job::Paladin => "Paladin",
            Job::Warrior => "Warrior",
            Job::DarkKnight => "DarkKnight",
            Job::Gunbreaker => "Gunbreaker",
            Job::WhiteMage => "WhiteMage",
            Job::Scholar => "Scholar",
            Job::Astrologian => "Astrologian",
            Job::Sage => "Sage",
            Job::Monk => "Monk",
            Job::Dragoon => "Dragoon",
            Job::Ninja => "Ninja",
            Job::Samurai => "Samurai",
            Job::Reaper => "Reaper",
            Job::Viper => "Viper",
            Job::Bard => "Bard",
            Job::Machinist => "Machinist",
            Job::Dancer => "Dancer",
            Job::BlackMage => "BlackMage",
            Job::Summoner => "Summoner",
            Job::RedMage => "RedMage",
            Job::Pictomancer => "Pictomancer",
            Job::BlueMage => "BlueMage",
            Job::Carpenter => "Carpenter",
            Job::Blacksmith => "Blacksmith",
            Job::Armorer => "Armorer",
            Job::Goldsmith => "Goldsmith",
            Job::Leatherworker => "Leatherworker",
            Job::Weaver => "Weaver",
            Job::Alchemist => "Alchemist",
            Job::Culinarian => "Culinarian",
            Job::Miner => "Miner",
            Job::Botanist => "Botanist",
            Job::Fisher => "Fisher",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobLevel {
    pub unlocked: bool,
    pub level: u8,
}

impl JobLevel {
    pub fn unlocked(level: u8) -> Self {
        JobLevel {
            unlocked: true,
            level,
        }
    }

    pub fn locked() -> Self {
        JobLevel::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobProficiency {
    levels: BTreeMap<Job, JobLevel>,
}

impl JobProficiency {
    pub fn set(&mut self, job: Job, level: JobLevel) {
        self.levels.insert(job, level);
    }

    /// Jobs never recorded read as locked.
    pub fn get(&self, job: Job) -> JobLevel {
        self.levels.get(&job).copied().unwrap_or_default()
    }
}

impl FromIterator<(Job, JobLevel)> for JobProficiency {
    fn from_iter<I: IntoIterator<Item = (Job, JobLevel)>>(iter: I) -> Self {
        JobProficiency {
            levels: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proficiency {
    Known(JobProficiency),
    /// Lookup failed or the character has no job data.
    Missing,
    /// The profile exists but its job data is private or unreadable.
    Restricted,
}

#[derive(Debug, Clone)]
pub struct EnrichedMember {
    pub id: u64,
    pub entry: RosterEntry,
    pub proficiency: Proficiency,
}

impl EnrichedMember {
    pub fn new(entry: RosterEntry, proficiency: Proficiency) -> Self {
        // Non-numeric ids sort after every real character id.
        let id = entry.id.trim().parse().unwrap_or(u64::MAX);
        EnrichedMember {
            id,
            entry,
            proficiency,
        }
    }
}
