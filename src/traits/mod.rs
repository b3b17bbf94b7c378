pub mod ability;
pub mod permission;

pub use ability::{ability_fn, Ability, FnAbility};
pub use permission::PermissionGate;
