use std::fmt;

use serde::{Deserialize, Serialize};

/// Review state of a monthly activity report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "Belum")]
    NotSubmitted,
    #[serde(rename = "Diajukan")]
    Submitted,
    #[serde(rename = "Diverifikasi")]
    Verified,
    #[serde(rename = "Disetujui")]
    Approved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSubmitted => "Belum",
            Self::Submitted => "Diajukan",
            Self::Verified => "Diverifikasi",
            Self::Approved => "Disetujui",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Belum" => Some(Self::NotSubmitted),
            "Diajukan" => Some(Self::Submitted),
            "Diverifikasi" => Some(Self::Verified),
            "Disetujui" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Reports move strictly forward, one stage at a time.
    pub fn can_transition_to(
        &self,
        next: ReportStatus,
    ) -> bool {
        matches!(
            (self, next),
            (Self::NotSubmitted, Self::Submitted)
                | (Self::Submitted, Self::Verified)
                | (Self::Verified, Self::Approved)
        )
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a submitted profile change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    #[serde(rename = "Diajukan")]
    Submitted,
    #[serde(rename = "Menunggu Verifikasi")]
    UnderReview,
    #[serde(rename = "Disetujui")]
    Approved,
    #[serde(rename = "Revisi")]
    NeedsRevision,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Diajukan",
            Self::UnderReview => "Menunggu Verifikasi",
            Self::Approved => "Disetujui",
            Self::NeedsRevision => "Revisi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Diajukan" => Some(Self::Submitted),
            "Menunggu Verifikasi" => Some(Self::UnderReview),
            "Disetujui" => Some(Self::Approved),
            "Revisi" => Some(Self::NeedsRevision),
            _ => None,
        }
    }

    /// A revision request sends the change back to the owner, who resubmits.
    pub fn can_transition_to(
        &self,
        next: ChangeStatus,
    ) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::UnderReview)
                | (Self::UnderReview, Self::Approved)
                | (Self::UnderReview, Self::NeedsRevision)
                | (Self::NeedsRevision, Self::Submitted)
        )
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a stage on a status timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStage {
    pub title: String,
    pub description: String,
    pub state: StageState,
}

impl TimelineStage {
    pub fn new(
        title: &str,
        description: &str,
        state: StageState,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            state,
        }
    }
}
