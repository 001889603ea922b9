use crate::{
    error::Result,
    models::{PostScore, VoteAction, VoteState},
    store::{VoteStore, VoteTally},
};

/// Applies a vote submission for `user_id` on `post_id`.
pub async fn apply_vote(
    store: &dyn VoteStore,
    post_id: i64,
    user_id: i64,
    action: VoteAction,
) -> Result<()> {
    match action {
        VoteAction::SetPositive => store.set_vote(post_id, user_id, true).await?,
        VoteAction::SetNegative => store.set_vote(post_id, user_id, false).await?,
        VoteAction::Clear => store.clear_vote(post_id, user_id).await?,
    }

    tracing::debug!(post_id, user_id, ?action, "Vote applied");
    Ok(())
}

/// Score of a post plus the viewer's own vote, from one store read.
pub async fn compute_score(
    store: &dyn VoteStore,
    post_id: i64,
    viewer_id: Option<i64>,
) -> Result<PostScore> {
    let tally = store.tally(post_id, viewer_id).await?;
    Ok(score_from_tally(&tally, viewer_id.is_some()))
}

pub fn score_from_tally(tally: &VoteTally, has_viewer: bool) -> PostScore {
    let user_vote = if has_viewer {
        VoteState::from(tally.viewer_vote).sign()
    } else {
        None
    };

    PostScore {
        score: tally.positive - tally.negative,
        user_vote,
    }
}
