use crate::pools::PoolPriority;

/// Default horizontal extent of a `CellGrid` (cells from the origin on x and z).
pub const WORLD_HORIZONTAL_LIMIT: i32 = 30_000_000;
/// Default lowest addressable layer.
pub const WORLD_MIN_Y: i32 = -64;
/// Default highest addressable layer.
pub const WORLD_MAX_Y: i32 = 319;

/// Entries kept in the `ClipboardLog` ring buffer.
pub const LOG_CAPACITY: usize = 64;

/// Saveable key of the active clipboard slot.
pub const CLIPBOARD_SAVE_KEY: &str = "clipboard";
/// Saveable key of the named blueprint library.
pub const LIBRARY_SAVE_KEY: &str = "blueprint_library";

/// Pool priorities: lower drains first. The agent's own inventory goes
/// before nearby containers, which go before remote networks.
pub const PRIORITY_POSSESSION: PoolPriority = PoolPriority(0);
pub const PRIORITY_NEARBY: PoolPriority = PoolPriority(10);
pub const PRIORITY_NETWORK: PoolPriority = PoolPriority(20);
