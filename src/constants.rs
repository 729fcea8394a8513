// ============================================================
// Time
// ============================================================

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Block time is counted in half-second slots
pub const SLOTS_PER_SECOND: u64 = 2;

pub const SLOTS_PER_DAY: u64 = SECONDS_PER_DAY * SLOTS_PER_SECOND;

/// Producer schedule bookkeeping runs at most once a minute
pub const SCHEDULE_UPDATE_SLOTS: u64 = 120;

// ============================================================
// Global parameters
// ============================================================

pub const DEFAULT_MAX_RAM_SIZE: u64 = 64 * 1024 * 1024 * 1024;

/// 2^50 bytes
pub const MAX_REALISTIC_RAM_SIZE: u64 = 1024 * 1024 * 1024 * 1024 * 1024;

pub const MIN_AUTHORITY_DEPTH: u16 = 3;

/// Highest revision this code knows how to run
pub const MAX_SUPPORTED_REVISION: u8 = 1;

// ============================================================
// Resource market
// ============================================================

pub const MARKET_INIT_VERSION: u64 = 0;

/// Synthetic market-core token supply
pub const RAMCORE_SUPPLY: u64 = 100_000_000_000_000;

/// Quote reserve seeded at 0.1% of the core token supply
pub const QUOTE_SEED_DIVISOR: u64 = 1_000;

/// 0.5% fee on every trade, rounded up
pub const RAM_FEE_DIVISOR: u64 = 200;

// ============================================================
// Name auction
// ============================================================

/// Minimum outbid is strictly more than high_bid / 10
pub const BID_INCREMENT_DIVISOR: u64 = 10;

pub const REFUND_DELAY_SECONDS: u64 = 0;

pub const NAME_CLOSE_MIN_BID_AGE: u64 = SECONDS_PER_DAY;

pub const NAME_CLOSE_ACTIVATION_AGE: u64 = 14 * SECONDS_PER_DAY;

// ============================================================
// Rewards
// ============================================================

/// Until activated stake crosses this threshold no rewards are paid
pub const MIN_ACTIVATED_STAKE: u64 = 150_000_000_0000;

pub const MIN_ACTIVE_PRODUCERS: usize = 4;

pub const CLAIM_COOLDOWN: u64 = SECONDS_PER_DAY;

pub const MAX_PRODUCER_URL_LEN: usize = 512;

// ============================================================
// Governance
// ============================================================

pub const GOVERNANCE_STAKE_AMOUNT: u64 = 10_000;

pub const PROPOSAL_FEE: u64 = 15_000;

pub const VALIDATOR_PROPOSAL_DURATION: u64 = 15 * SECONDS_PER_DAY;

pub const CONSENSUS_PROPOSAL_DURATION: u64 = 30 * SECONDS_PER_DAY;
