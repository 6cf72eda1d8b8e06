use serde::{Deserialize, Serialize};
use std::fmt;

/// Account information from `info/my`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account email
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub username: Option<String>,

    /// F-coin balance
    #[serde(default)]
    pub fcoin: i64,

    /// Whether the account has any paid membership
    #[serde(default, rename = "isvip")]
    pub is_vip: bool,

    /// Membership tier
    #[serde(default)]
    pub vip_level: VipLevel,

    /// Remaining API queries in the current period
    #[serde(default)]
    pub remain_api_query: i64,

    /// Remaining API data rows in the current period
    #[serde(default)]
    pub remain_api_data: i64,
}

impl AccountInfo {
    /// Returns true if there are API queries left
    #[must_use]
    pub const fn has_query_quota(&self) -> bool {
        self.remain_api_query > 0
    }
}

/// Membership tier reported as an integer on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum VipLevel {
    /// Registered user without membership
    #[default]
    None,
    /// Regular member
    Normal,
    /// Advanced member
    Advanced,
    /// Enterprise member
    Enterprise,
    /// Enterprise member (second enterprise tier)
    Enterprise2,
    /// Personal subscription
    SubPersonal,
    /// Professional subscription
    SubPro,
    /// Business subscription
    SubBusiness,
    /// Red team edition
    Red,
    /// Education account
    Student,
    /// Sentinel level that no real account holds
    Never,
    /// A level this client does not know
    Other(i64),
}

impl VipLevel {
    /// Returns true if the tier can query enterprise-only fields such as `fid`
    #[must_use]
    pub const fn is_enterprise(self) -> bool {
        matches!(self, Self::Enterprise | Self::Enterprise2)
    }

    /// Returns true for the subscription tiers
    #[must_use]
    pub const fn is_subscription(self) -> bool {
        matches!(self, Self::SubPersonal | Self::SubPro | Self::SubBusiness)
    }
}

impl From<i64> for VipLevel {
    fn from(level: i64) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Normal,
            2 => Self::Advanced,
            3 => Self::Enterprise,
            5 => Self::Enterprise2,
            11 => Self::SubPersonal,
            12 => Self::SubPro,
            13 => Self::SubBusiness,
            20 => Self::Red,
            22 => Self::Student,
            100 => Self::Never,
            other => Self::Other(other),
        }
    }
}

impl From<VipLevel> for i64 {
    fn from(level: VipLevel) -> Self {
        match level {
            VipLevel::None => 0,
            VipLevel::Normal => 1,
            VipLevel::Advanced => 2,
            VipLevel::Enterprise => 3,
            VipLevel::Enterprise2 => 5,
            VipLevel::SubPersonal => 11,
            VipLevel::SubPro => 12,
            VipLevel::SubBusiness => 13,
            VipLevel::Red => 20,
            VipLevel::Student => 22,
            VipLevel::Never => 100,
            VipLevel::Other(other) => other,
        }
    }
}

impl fmt::Display for VipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "registered"),
            Self::Normal => write!(f, "normal"),
            Self::Advanced => write!(f, "advanced"),
            Self::Enterprise | Self::Enterprise2 => write!(f, "enterprise"),
            Self::SubPersonal => write!(f, "subscription-personal"),
            Self::SubPro => write!(f, "subscription-pro"),
            Self::SubBusiness => write!(f, "subscription-business"),
            Self::Red => write!(f, "red-team"),
            Self::Student => write!(f, "education"),
            Self::Never => write!(f, "never"),
            Self::Other(level) => write!(f, "level-{level}"),
        }
    }
}
