pub type ClubId = u32;
pub type PlayerId = u32;
pub type FixtureId = u64;
pub type SeasonId = u32;
pub type Gameweek = u16;
