/// Ledger configuration constants.
///
/// Retry policy for submitting actions to the settlement layer.
pub const MAX_ATTEMPTS: u32 = 5;

/// Delay between two submission attempts, in milliseconds.
pub const RETRY_DELAY_MS: u64 = 2000;
