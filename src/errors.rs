// Authorization failures on root-only endpoints come from `#[only_owner]`.

// ── Invariant violations ──

pub const ERR_RAM_DECREASE: &str = "ram may only be increased";
pub const ERR_RAM_UNREALISTIC: &str = "ram size is unrealistic";
pub const ERR_RAM_BELOW_RESERVED: &str = "attempt to set max below reserved";
pub const ERR_AUTHORITY_DEPTH: &str = "max_authority_depth should be at least 3";
pub const ERR_REVISION_WRAP: &str = "can not increment revision";
pub const ERR_REVISION_SKIP: &str = "can only increment revision by one";
pub const ERR_REVISION_UNSUPPORTED: &str = "specified revision is not yet supported by the code";
pub const ERR_UNSUPPORTED_INIT_VERSION: &str = "unsupported version for init action";
pub const ERR_ZERO_SUPPLY: &str = "system token supply must be greater than 0";
pub const ERR_EMPTY_RESERVE: &str = "market reserves must be positive";
pub const ERR_RAM_OUT_ZERO: &str = "must reserve a positive amount";
pub const ERR_TOKENS_OUT_ZERO: &str = "token amount received from selling ram is too low";
pub const ERR_SELL_ZERO: &str = "cannot sell negative or zero bytes";
pub const ERR_INSUFFICIENT_QUOTA: &str = "insufficient quota";
pub const ERR_RAM_EXHAUSTED: &str = "no more ram available for sale";
pub const ERR_MANAGED_LIMITS: &str = "only supports unlimited accounts";
pub const ERR_WRONG_TOKEN: &str = "asset must be system token";
pub const ERR_ZERO_PAYMENT: &str = "payment must be positive";
pub const ERR_WRONG_AMOUNT: &str = "payment does not match the required amount";
pub const ERR_ESCROW_NOT_WITHDRAWABLE: &str = "escrow account is not withdrawable";
pub const ERR_ESCROW_OVERDRAWN: &str = "escrow account balance is insufficient";
pub const ERR_INVALID_NAME: &str = "invalid account name";
pub const ERR_NOT_TOP_LEVEL: &str = "you can only bid on top-level suffix";
pub const ERR_FREE_NAME: &str = "accounts with 12 character names and no dots can be created without bidding required";
pub const ERR_AUCTION_CLOSED: &str = "this auction has already closed";
pub const ERR_BID_INCREMENT: &str = "must increase bid by 10%";
pub const ERR_ALREADY_HIGH_BIDDER: &str = "account is already highest bidder";
pub const ERR_AUCTION_OPEN: &str = "auction for name is not closed yet";
pub const ERR_NOT_HIGH_BIDDER: &str = "only highest bidder can claim";
pub const ERR_SUFFIX_ONLY: &str = "only suffix may create this account";
pub const ERR_URL_TOO_LONG: &str = "url too long";
pub const ERR_PRODUCER_INACTIVE: &str = "producer does not have an active key";
pub const ERR_CHAIN_NOT_ACTIVATED: &str = "cannot claim rewards until the chain is activated";
pub const ERR_BUCKET_EXHAUSTED: &str = "block pay bucket is exhausted";
pub const ERR_UNPAID_BLOCKS: &str = "unpaid block accounting is inconsistent";
pub const ERR_ADD_OTHER_VALIDATOR: &str = "can not add other account to bp";
pub const ERR_PROPOSAL_TYPE: &str = "invalid proposal type";
pub const ERR_PROPOSAL_NOT_PENDING: &str = "proposal is not pending";
pub const ERR_VOTING_ENDED: &str = "proposal voting has ended";
pub const ERR_VOTING_OPEN: &str = "proposal voting is still open";
pub const ERR_OPEN_PROPOSALS: &str = "governance node has proposals in voting";
pub const ERR_TASK_NOT_DUE: &str = "deferred task is not due yet";

// ── State not found ──

pub const ERR_NOT_INITIALIZED: &str = "system contract has not been initialized";
pub const ERR_NO_ACTIVE_BID: &str = "no active bid for name";
pub const ERR_REFUND_NOT_FOUND: &str = "refund not found";
pub const ERR_PRODUCER_NOT_FOUND: &str = "producer not found";
pub const ERR_NOT_GOVERNANCE_NODE: &str = "only governance node can new proposal";
pub const ERR_PROPOSAL_NOT_FOUND: &str = "proposal does not exist";
pub const ERR_TASK_NOT_FOUND: &str = "deferred task not found";

// ── Already exists ──

pub const ERR_ALREADY_INITIALIZED: &str = "system contract has already been initialized";
pub const ERR_ACCOUNT_EXISTS: &str = "account already exists";
pub const ERR_ALREADY_STAKED: &str = "account already holds a governance stake";
pub const ERR_ALREADY_VOTED: &str = "governance node already voted on this proposal";

// ── Rate limited ──

pub const ERR_CLAIM_COOLDOWN: &str = "already claimed rewards within past day";
