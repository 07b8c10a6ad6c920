use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionTier {
    Premier,
    Championship,
}

impl DivisionTier {
    pub const ALL: [DivisionTier; 2] = [DivisionTier::Premier, DivisionTier::Championship];

    pub fn slug(&self) -> &'static str {
        match self {
            DivisionTier::Premier => "premier",
            DivisionTier::Championship => "championship",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DivisionTier::Premier => "Premier Division",
            DivisionTier::Championship => "Championship",
        }
    }
}

impl fmt::Display for DivisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DivisionTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let slug = value.to_ascii_lowercase();

        DivisionTier::ALL
            .into_iter()
            .find(|tier| tier.slug() == slug)
            .ok_or_else(|| format!("unknown division '{}'", slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("premier".parse::<DivisionTier>(), Ok(DivisionTier::Premier));
        assert_eq!("Championship".parse::<DivisionTier>(), Ok(DivisionTier::Championship));
        assert!("league-two".parse::<DivisionTier>().is_err());
    }
}
