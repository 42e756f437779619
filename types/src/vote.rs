//! Vote choices.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A member's recorded choice on a proposal.
///
/// `Abstain` is also the value read back for a member who never voted; use
/// the vote record's `has_voted` flag to tell the two apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    #[default]
    Abstain,
    For,
    Against,
}

impl VoteChoice {
    /// Wire tag: 0 = Abstain, 1 = For, 2 = Against.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Abstain => 0,
            Self::For => 1,
            Self::Against => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abstain => "abstain",
            Self::For => "for",
            Self::Against => "against",
        }
    }
}

impl TryFrom<u8> for VoteChoice {
    type Error = TypesError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Abstain),
            1 => Ok(Self::For),
            2 => Ok(Self::Against),
            other => Err(TypesError::UnknownVoteChoice(other)),
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
