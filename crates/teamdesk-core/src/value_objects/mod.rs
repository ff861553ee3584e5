//! Value objects - immutable types that represent domain concepts

mod ids;
mod position;
mod role;

pub use ids::{DocumentId, IdParseError, UserId};
pub use position::{Position, PositionBadge};
pub use role::{AccessLevel, Capabilities, Role};
