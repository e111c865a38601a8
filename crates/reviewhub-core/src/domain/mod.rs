//! Domain entities - the core business objects.

mod comment;
mod review;
mod session;
mod user;
pub mod wire;

pub use comment::{Comment, CommentPatch, NewComment};
pub use review::{Category, MAX_TAGS, NewReview, Rating, Review, ReviewPatch};
pub use session::{PersistedSession, Session};
pub use user::{AuthorDirectory, User, UserRecord, mask_email};
pub use wire::{CommentId, ReviewId, Stamped, UserId};
