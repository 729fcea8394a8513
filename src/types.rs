multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::constants::{DEFAULT_MAX_RAM_SIZE, SLOTS_PER_SECOND};

// ============================================================
// Chain parameters: mirrored into the global state
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ChainParams {
    pub max_block_net_usage: u64,
    pub target_block_net_usage_pct: u32,
    pub max_transaction_net_usage: u32,
    pub base_per_transaction_net_usage: u32,
    pub net_usage_leeway: u32,
    pub context_free_discount_net_usage_num: u32,
    pub context_free_discount_net_usage_den: u32,
    pub max_block_cpu_usage: u32,
    pub target_block_cpu_usage_pct: u32,
    pub max_transaction_cpu_usage: u32,
    pub min_transaction_cpu_usage: u32,
    pub max_transaction_lifetime: u32,
    pub deferred_trx_expiration_window: u32,
    pub max_transaction_delay: u32,
    pub max_inline_action_size: u32,
    pub max_inline_action_depth: u16,
    pub max_authority_depth: u16,
}

impl Default for ChainParams {
    fn default() -> Self {
        ChainParams {
            max_block_net_usage: 1024 * 1024,
            target_block_net_usage_pct: 1_000,
            max_transaction_net_usage: 512 * 1024,
            base_per_transaction_net_usage: 12,
            net_usage_leeway: 500,
            context_free_discount_net_usage_num: 20,
            context_free_discount_net_usage_den: 100,
            max_block_cpu_usage: 200_000,
            target_block_cpu_usage_pct: 1_000,
            max_transaction_cpu_usage: 150_000,
            min_transaction_cpu_usage: 100,
            max_transaction_lifetime: 3_600,
            deferred_trx_expiration_window: 600,
            max_transaction_delay: 45 * 24 * 3_600,
            max_inline_action_size: 4_096,
            max_inline_action_depth: 4,
            max_authority_depth: 6,
        }
    }
}

// ============================================================
// Global state: three generations, upgraded by appending
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct GlobalState<M: ManagedTypeApi> {
    pub params: ChainParams,
    pub max_ram_size: u64,
    pub total_ram_bytes_reserved: u64,
    pub total_ram_stake: BigUint<M>,
    /// slot
    pub last_producer_schedule_update: u64,
    /// seconds
    pub last_pervote_bucket_fill: u64,
    pub perblock_bucket: BigUint<M>,
    pub reward_per_block: BigUint<M>,
    pub total_unpaid_blocks: u64,
    pub total_activated_stake: BigUint<M>,
    /// seconds; 0 until the activation threshold is first crossed
    pub thresh_activated_stake_time: u64,
    pub last_producer_schedule_size: u16,
    /// slot
    pub last_name_close: u64,
}

impl<M: ManagedTypeApi> GlobalState<M> {
    pub fn with_params(params: ChainParams) -> Self {
        GlobalState {
            params,
            max_ram_size: DEFAULT_MAX_RAM_SIZE,
            total_ram_bytes_reserved: 0,
            total_ram_stake: BigUint::zero(),
            last_producer_schedule_update: 0,
            last_pervote_bucket_fill: 0,
            perblock_bucket: BigUint::zero(),
            reward_per_block: BigUint::zero(),
            total_unpaid_blocks: 0,
            total_activated_stake: BigUint::zero(),
            thresh_activated_stake_time: 0,
            last_producer_schedule_size: 0,
            last_name_close: 0,
        }
    }

    pub fn free_ram(&self) -> u64 {
        self.max_ram_size - self.total_ram_bytes_reserved
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Default, PartialEq, Debug)]
pub struct GlobalState2 {
    pub new_ram_per_block: u16,
    /// slot
    pub last_ram_increase: u64,
    /// Deprecated, still written by every block
    pub last_block_num: u64,
    pub revision: u8,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Default, PartialEq, Debug)]
pub struct GlobalState3 {
    pub last_vpay_state_update: u64,
    pub total_vpay_share_change_rate: u64,
}

/// All three generations, loaded once per invocation and written back at the end.
pub struct SystemContext<M: ManagedTypeApi> {
    pub global: GlobalState<M>,
    pub global2: GlobalState2,
    pub global3: GlobalState3,
}

pub fn seconds_to_slot(seconds: u64) -> u64 {
    seconds * SLOTS_PER_SECOND
}

// ============================================================
// Currency escrow sub-accounts
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum EscrowAccount {
    /// Open bids and pending bid refunds
    Names,
    /// Funds owed to block producers
    BlockPay,
    /// Governance node stakes
    GovernanceStake,
    /// Proposal submission fees
    ProposalFees,
    /// Currency backing the resource market reserve
    RamMarket,
    /// Trading fees of the resource market
    RamFee,
}

impl EscrowAccount {
    /// Fee income owes nothing to anyone and may be withdrawn by root.
    pub fn is_withdrawable(&self) -> bool {
        matches!(self, EscrowAccount::RamFee | EscrowAccount::ProposalFees)
    }
}

// ============================================================
// Resource market
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ExchangeState<M: ManagedTypeApi> {
    pub supply: BigUint<M>,
    /// bytes
    pub base_balance: BigUint<M>,
    /// core token
    pub quote_balance: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ResourceLimits {
    pub ram_bytes: i64,
    pub net_weight: i64,
    pub cpu_weight: i64,
}

// ============================================================
// Name auction
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct NameBid<M: ManagedTypeApi> {
    pub name: ManagedBuffer<M>,
    pub high_bidder: ManagedAddress<M>,
    /// Negative once the auction is closed
    pub high_bid: BigInt<M>,
    pub last_bid_time: u64,
}

impl<M: ManagedTypeApi> NameBid<M> {
    pub fn is_open(&self) -> bool {
        self.high_bid > BigInt::zero()
    }

    pub fn bid_amount(&self) -> BigUint<M> {
        self.high_bid.magnitude()
    }

    pub fn close(&mut self) {
        self.high_bid = -self.high_bid.clone();
    }
}

/// Ordered index entry of an open auction.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct BidIndexEntry<M: ManagedTypeApi> {
    pub high_bid: BigUint<M>,
    pub name: ManagedBuffer<M>,
}

// ============================================================
// Deferred tasks
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct DeferredKey<M: ManagedTypeApi> {
    pub name: ManagedBuffer<M>,
    pub account: ManagedAddress<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum DeferredAction {
    /// Pay out the bid refund owed to the key's account on the key's name
    BidRefund,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct DeferredTask {
    pub execute_after: u64,
    pub action: DeferredAction,
}

// ============================================================
// Producers
// ============================================================

/// Opaque block header handed to the per-block hook. Only the slot and the
/// producer are read.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct BlockHeader<M: ManagedTypeApi> {
    pub timestamp: u64,
    pub producer: ManagedAddress<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct ProducerInfo<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub total_votes: BigUint<M>,
    pub is_active: bool,
    pub url: ManagedBuffer<M>,
    pub location: u16,
    pub unpaid_blocks: u64,
    pub last_claim_time: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ProducerPayShare<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub last_votepay_share_update: u64,
}

// ============================================================
// Governance
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum StakeStatus {
    Open,
    Unstaked,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct GovernanceStake<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub staked: BigUint<M>,
    pub stake_time: u64,
    /// Yea votes cast by this node
    pub total_yeas: u64,
    /// Nay votes cast by this node
    pub total_nays: u64,
    pub is_validator: bool,
    pub status: StakeStatus,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalType {
    AddValidator,
    RemoveValidator,
    SwitchConsensus,
}

impl ProposalType {
    /// Wire codes are 1-based.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(ProposalType::AddValidator),
            2 => Some(ProposalType::RemoveValidator),
            3 => Some(ProposalType::SwitchConsensus),
            _ => None,
        }
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Accepting votes until end_time
    Pending,
    Approved,
    Rejected,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub owner: ManagedAddress<M>,
    pub account: ManagedAddress<M>,
    pub block_height: u32,
    pub proposal_type: ProposalType,
    pub start_time: u64,
    pub end_time: u64,
    pub total_yeas: BigUint<M>,
    pub total_nays: BigUint<M>,
    pub is_satisfied: bool,
    pub status: ProposalStatus,
}
