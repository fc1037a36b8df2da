//! Vendor deployment regions and their API hosts.

use crate::CorosError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Europe,
    America,
    China,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Europe, Region::America, Region::China];

    pub fn name(self) -> &'static str {
        match self {
            Region::Europe => "europe",
            Region::America => "america",
            Region::China => "china",
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Region::Europe => "https://teameuapi.coros.com",
            Region::America => "https://teamapi.coros.com",
            Region::China => "https://teamcnapi.coros.com",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = CorosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.name() == lowered)
            .ok_or_else(|| {
                CorosError::Config(format!(
                    "unknown region '{s}', expected one of: europe, america, china"
                ))
            })
    }
}

/// Resolve a region name to the base URL of its API host.
pub fn resolve(region: &str) -> Result<&'static str, CorosError> {
    region.parse::<Region>().map(Region::base_url)
}
