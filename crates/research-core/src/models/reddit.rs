//! Reddit listing parameters.

use crate::error::{ResearchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subreddit listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedditSort {
    #[default]
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl RedditSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedditSort::Hot => "hot",
            RedditSort::New => "new",
            RedditSort::Rising => "rising",
            RedditSort::Top => "top",
            RedditSort::Controversial => "controversial",
        }
    }

    /// Whether the listing honors a time window (`t=`).
    pub fn uses_period(&self) -> bool {
        matches!(self, RedditSort::Top | RedditSort::Controversial)
    }
}

impl fmt::Display for RedditSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedditSort {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(RedditSort::Hot),
            "new" => Ok(RedditSort::New),
            "rising" => Ok(RedditSort::Rising),
            "top" => Ok(RedditSort::Top),
            "controversial" => Ok(RedditSort::Controversial),
            other => Err(ResearchError::validation(
                "sort",
                format!(
                    "unknown sort '{}', expected hot, new, rising, top or controversial",
                    other
                ),
            )),
        }
    }
}

/// Time window for `top` and `controversial` listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedditPeriod {
    Hour,
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl RedditPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedditPeriod::Hour => "hour",
            RedditPeriod::Day => "day",
            RedditPeriod::Week => "week",
            RedditPeriod::Month => "month",
            RedditPeriod::Year => "year",
            RedditPeriod::All => "all",
        }
    }
}

impl fmt::Display for RedditPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedditPeriod {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(RedditPeriod::Hour),
            "day" => Ok(RedditPeriod::Day),
            "week" => Ok(RedditPeriod::Week),
            "month" => Ok(RedditPeriod::Month),
            "year" => Ok(RedditPeriod::Year),
            "all" => Ok(RedditPeriod::All),
            other => Err(ResearchError::validation(
                "period",
                format!("unknown period '{}'", other),
            )),
        }
    }
}
