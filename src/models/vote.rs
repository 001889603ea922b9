use serde::{Deserialize, Serialize};

/// What a vote submission asks for. `is_positive: null` (or a missing field)
/// on the wire means `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    SetPositive,
    SetNegative,
    Clear,
}

impl From<Option<bool>> for VoteAction {
    fn from(is_positive: Option<bool>) -> Self {
        match is_positive {
            Some(true) => VoteAction::SetPositive,
            Some(false) => VoteAction::SetNegative,
            None => VoteAction::Clear,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoteRequestBody {
    post_id: i64,
    is_positive: Option<bool>,
}

// Vote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "VoteRequestBody")]
pub struct VoteRequest {
    pub post_id: i64,
    pub action: VoteAction,
}

impl From<VoteRequestBody> for VoteRequest {
    fn from(body: VoteRequestBody) -> Self {
        Self {
            post_id: body.post_id,
            action: body.is_positive.into(),
        }
    }
}

/// State of a single (post, user) vote relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    NoVote,
    Positive,
    Negative,
}

impl VoteState {
    /// `+1` / `-1`, or `None` when there is no vote.
    pub fn sign(self) -> Option<i32> {
        match self {
            VoteState::NoVote => None,
            VoteState::Positive => Some(1),
            VoteState::Negative => Some(-1),
        }
    }
}

impl From<Option<bool>> for VoteState {
    fn from(is_positive: Option<bool>) -> Self {
        match is_positive {
            Some(true) => VoteState::Positive,
            Some(false) => VoteState::Negative,
            None => VoteState::NoVote,
        }
    }
}

/// Derived per read; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostScore {
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<i32>,
}

// Vote response
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub post_id: i64,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<i32>,
}

impl VoteResponse {
    pub fn new(post_id: i64, score: PostScore) -> Self {
        Self {
            post_id,
            score: score.score,
            user_vote: score.user_vote,
        }
    }
}
