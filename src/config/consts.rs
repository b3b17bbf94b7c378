/// Archetype tag given to every context Root node
pub const ROOT_ARCHETYPE: &str = "root";
/// Fixture key that always names the context Root
pub const ROOT_KEY: &str = "root";
/// Tenant used when a spawn section doesn't name one
pub const DEFAULT_TENANT: &str = "default";
