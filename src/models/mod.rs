pub mod comment;
pub mod post;
pub mod topic;
pub mod user;
pub mod vote;

pub use comment::*;
pub use post::*;
pub use topic::*;
pub use user::*;
pub use vote::*;
