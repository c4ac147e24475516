//! Headless browser-side state: the comment section, the app context that
//! replaces a global store, route guards, and the REST client they use.

pub mod api;
pub mod comment_section;
pub mod context;
pub mod error;
pub mod guards;

pub use api::{ApiClient, CommentApi};
pub use comment_section::CommentSection;
pub use context::{AppContext, CurrentUser, Theme};
pub use error::ClientError;
