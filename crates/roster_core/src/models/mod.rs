pub mod member;
pub mod role;

pub use member::{normalize_name, parse_weaknesses, BaseStats, Member, StatKind};
pub use role::{classify, Role, SWEEPER_MIN_SPEED};
