mod badges;

pub use badges::{BadgeStore, JsonBadgeStore, MemoryBadgeStore, StoreError, DEFAULT_BADGES_PATH};
