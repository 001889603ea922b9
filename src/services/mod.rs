pub mod comment_service;
pub mod post_service;
pub mod topic_service;
pub mod user_service;
pub mod vote_service;
