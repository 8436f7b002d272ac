use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::UnknownDraftStatus;

/// Approval status of a value, ordered from weakest to strongest.
///
/// Data without an explicit `draft` attribute is considered approved, which
/// is why paths store `Option<DraftStatus>` and treat `None` as the top of
/// the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftStatus {
    Unconfirmed,
    Provisional,
    Contributed,
    Approved,
}

impl DraftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftStatus::Unconfirmed => "unconfirmed",
            DraftStatus::Provisional => "provisional",
            DraftStatus::Contributed => "contributed",
            DraftStatus::Approved => "approved",
        }
    }

    /// Whether a (possibly absent) status satisfies this minimum.
    pub fn admits(self, status: Option<DraftStatus>) -> bool {
        status.is_none_or(|s| s >= self)
    }
}

impl Display for DraftStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftStatus {
    type Err = UnknownDraftStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unconfirmed" => Ok(DraftStatus::Unconfirmed),
            "provisional" => Ok(DraftStatus::Provisional),
            "contributed" => Ok(DraftStatus::Contributed),
            "approved" => Ok(DraftStatus::Approved),
            other => Err(UnknownDraftStatus(other.to_owned())),
        }
    }
}
