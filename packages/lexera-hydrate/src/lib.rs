pub mod config;
pub mod context;
pub mod datefmt;
pub mod error;
pub mod host;
pub mod hydrate;
pub mod links;
pub mod patch;
pub mod query;
pub mod search;
pub mod types;

pub use context::HydrationContext;
pub use error::{HydrateError, QueryError, RenderError};
pub use hydrate::{hydrate_board, hydrate_item, hydrate_lane};
pub use patch::{hydrate_post_op, PatchKind, PatchOp};
