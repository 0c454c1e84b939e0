#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// A supported competitive-programming site.
///
/// Usernames live in one global namespace, so a profile belongs to exactly one platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "leetcode"))]
    LeetCode,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "codeforces"))]
    Codeforces,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "codechef"))]
    CodeChef,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[Self::LeetCode, Self::Codeforces, Self::CodeChef];

    const NAMES: &'static [&'static str] = &["leetcode", "codeforces", "codechef"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeetCode => "leetcode",
            Self::Codeforces => "codeforces",
            Self::CodeChef => "codechef",
        }
    }

    /// Human-facing name, e.g. for table cells.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LeetCode => "LeetCode",
            Self::Codeforces => "Codeforces",
            Self::CodeChef => "CodeChef",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leetcode" => Ok(Self::LeetCode),
            "codeforces" => Ok(Self::Codeforces),
            "codechef" => Ok(Self::CodeChef),
            _ => Err(ParseEnumError::new("platform", s, Self::NAMES)),
        }
    }
}

/// Problem difficulty as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "easy"))]
    Easy,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "medium"))]
    Medium,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "hard"))]
    Hard,
}

impl Difficulty {
    const NAMES: &'static [&'static str] = &["easy", "medium", "hard"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseEnumError::new("difficulty", s, Self::NAMES)),
        }
    }
}
