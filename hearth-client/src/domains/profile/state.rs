//! Transient state owned by the profile view.

use hearth_model::PendingEdits;
use std::fmt;

/// Progress tracking for the avatar transfer tied to one file selection.
///
/// Reset implicitly when a new file is selected. A failure only raises the
/// flag; the percent is deliberately left where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadProgress {
    /// Percent of bytes acknowledged, in `[0, 100]`
    pub percent: u8,
    /// True once the transfer has failed
    pub failed: bool,
}

impl UploadProgress {
    /// Collapse the progress pair into the single status the view renders.
    ///
    /// Checks run in priority order: a failure beats a transiently-complete
    /// percent, so a failed transfer can never render as a success.
    pub fn status(&self) -> UploadStatus {
        if self.failed {
            UploadStatus::Failed
        } else if self.percent > 0 && self.percent < 100 {
            UploadStatus::Uploading(self.percent)
        } else if self.percent == 100 {
            UploadStatus::Complete
        } else {
            UploadStatus::Idle
        }
    }
}

/// What the profile view shows for the avatar transfer. Variants are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// No transfer running and nothing to report
    Idle,
    /// Transfer in flight at the carried percent
    Uploading(u8),
    /// Transfer finished successfully
    Complete,
    /// Transfer failed; the user must reselect a file
    Failed,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Idle => Ok(()),
            UploadStatus::Uploading(percent) => write!(f, "Uploading {percent}%"),
            UploadStatus::Complete => write!(f, "Image successfully uploaded"),
            UploadStatus::Failed => {
                write!(f, "Error uploading image (image must be less than 2 MiB)")
            }
        }
    }
}

/// Local transient state of the profile view.
///
/// Discarded when the view goes away; nothing here persists anywhere.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    /// Buffered field changes, sent as the update payload on submit
    pub pending: PendingEdits,
    /// Progress of the current avatar transfer
    pub upload: UploadProgress,
    /// Set after a successful submit; never cleared automatically
    pub update_success: bool,
}
