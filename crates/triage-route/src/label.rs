//! Final topic labels
//!
//! The label set is closed: nine topics plus the `Outlier` and `Unknown`
//! sentinels. Labels serialize as their display text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopicLabel {
    #[serde(rename = "Permintaan Akses ARO/RO")]
    AccessRequestAroRo,
    #[serde(rename = "Kendala Akses Aplikasi/Authorized Error")]
    ApplicationAccess,
    #[serde(rename = "Lupa Password/Reset Password")]
    PasswordReset,
    #[serde(rename = "Kendala Username Salah")]
    WrongUsername,
    #[serde(rename = "Kesalahan File/Validasi")]
    FileValidation,
    #[serde(rename = "Perpanjangan Waktu Pengumpulan")]
    DeadlineExtension,
    #[serde(rename = "Gagal Upload Pelaporan")]
    UploadFailure,
    #[serde(rename = "Kendala pelaporan APOLO")]
    ApoloReporting,
    #[serde(rename = "Kendala Install Aplikasi Client")]
    ClientInstall,
    /// The primary model's outlier cluster that the outlier sub-model did not claim.
    #[serde(rename = "Outlier")]
    Outlier,
    /// A topic id no mapping covers.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl TopicLabel {
    pub const ALL: [TopicLabel; 11] = [
        TopicLabel::AccessRequestAroRo,
        TopicLabel::ApplicationAccess,
        TopicLabel::PasswordReset,
        TopicLabel::WrongUsername,
        TopicLabel::FileValidation,
        TopicLabel::DeadlineExtension,
        TopicLabel::UploadFailure,
        TopicLabel::ApoloReporting,
        TopicLabel::ClientInstall,
        TopicLabel::Outlier,
        TopicLabel::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TopicLabel::AccessRequestAroRo => "Permintaan Akses ARO/RO",
            TopicLabel::ApplicationAccess => "Kendala Akses Aplikasi/Authorized Error",
            TopicLabel::PasswordReset => "Lupa Password/Reset Password",
            TopicLabel::WrongUsername => "Kendala Username Salah",
            TopicLabel::FileValidation => "Kesalahan File/Validasi",
            TopicLabel::DeadlineExtension => "Perpanjangan Waktu Pengumpulan",
            TopicLabel::UploadFailure => "Gagal Upload Pelaporan",
            TopicLabel::ApoloReporting => "Kendala pelaporan APOLO",
            TopicLabel::ClientInstall => "Kendala Install Aplikasi Client",
            TopicLabel::Outlier => "Outlier",
            TopicLabel::Unknown => "Unknown",
        }
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, TopicLabel::Outlier | TopicLabel::Unknown)
    }
}

impl fmt::Display for TopicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic label {0:?}")]
pub struct UnknownLabel(pub String);

impl FromStr for TopicLabel {
    type Err = UnknownLabel;

    /// Exact label text, or the same text ignoring case and surrounding space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TopicLabel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
