//! Review submission events.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::models::ReviewState;

/// The verdict attached to a pending review when it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionEvent {
    /// Approve the pull request.
    Approve,
    /// Request changes before merging.
    RequestChanges,
    /// Submit general feedback without a verdict.
    Comment,
}

impl SubmissionEvent {
    /// Value sent in the `event` field of the submit call.
    #[must_use]
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::RequestChanges => "REQUEST_CHANGES",
            Self::Comment => "COMMENT",
        }
    }

    /// State the review ends up in once the event is accepted.
    #[must_use]
    pub const fn resulting_state(self) -> ReviewState {
        match self {
            Self::Approve => ReviewState::Approved,
            Self::RequestChanges => ReviewState::ChangesRequested,
            Self::Comment => ReviewState::Commented,
        }
    }

    /// Returns true when GitHub rejects the event without a body.
    #[must_use]
    pub const fn requires_body(self) -> bool {
        matches!(self, Self::RequestChanges | Self::Comment)
    }
}

impl fmt::Display for SubmissionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Approve => "approve",
            Self::RequestChanges => "request-changes",
            Self::Comment => "comment",
        };
        f.write_str(label)
    }
}

/// Token could not be mapped to a [`SubmissionEvent`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown submission event '{token}'")]
pub struct UnknownSubmissionEvent {
    /// The rejected token.
    pub token: String,
}

impl FromStr for SubmissionEvent {
    type Err = UnknownSubmissionEvent;

    /// Accepts `approve`, `request-changes`, and `comment` in any case, with
    /// `-` or `_` separators or none (`RequestChanges`, `REQUEST_CHANGES`).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalised: String = token
            .trim()
            .chars()
            .filter(|character| !matches!(character, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalised.as_str() {
            "approve" => Ok(Self::Approve),
            "requestchanges" => Ok(Self::RequestChanges),
            "comment" => Ok(Self::Comment),
            _ => Err(UnknownSubmissionEvent {
                token: token.to_owned(),
            }),
        }
    }
}
