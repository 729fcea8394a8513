#![allow(dead_code)]

use multiversx_sc::types::{Address, BigUint, EgldOrEsdtTokenIdentifier, ManagedBuffer};
use multiversx_sc_scenario::{
    managed_address, managed_biguint, rust_biguint,
    whitebox_legacy::{BlockchainStateWrapper, ContractObjWrapper},
    DebugApi,
};

pub use native_system::currency::CurrencyModule;
pub use native_system::errors::*;
pub use native_system::deferred::DeferredModule;
pub use native_system::global_params::GlobalParamsModule;
pub use native_system::governance::GovernanceModule;
pub use native_system::name_auction::NameAuctionModule;
pub use native_system::resource_market::ResourceMarketModule;
pub use native_system::rewards::RewardsModule;
pub use native_system::types::*;
pub use native_system::NativeSystem;

pub const WASM_PATH: &str = "output/native-system.wasm";

pub const START_TIME: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;
pub const TOKEN_SUPPLY: u64 = 10_000_000_000;
pub const MIN_ACTIVATED_STAKE: u64 = 150_000_000_0000;
pub const OWNER_ERROR: &str = "Endpoint can only be called by owner";

/// Expected outcome of a transaction: `OK` or `Some(error message)`.
pub type Expect = Option<&'static str>;
pub const OK: Expect = None;

macro_rules! check {
    ($result:expr, $expected:expr) => {
        match $expected {
            None => $result.assert_ok(),
            Some(message) => $result.assert_user_error(message),
        }
    };
}

pub struct SystemSetup<ObjBuilder>
where
    ObjBuilder: 'static + Copy + Fn() -> native_system::ContractObj<DebugApi>,
{
    pub b_mock: BlockchainStateWrapper,
    pub owner: Address,
    pub sc_wrapper: ContractObjWrapper<native_system::ContractObj<DebugApi>, ObjBuilder>,
    pub now: u64,
}

impl<ObjBuilder> SystemSetup<ObjBuilder>
where
    ObjBuilder: 'static + Copy + Fn() -> native_system::ContractObj<DebugApi>,
{
    /// Deployed, market not initialized.
    pub fn new(builder: ObjBuilder) -> Self {
        let rust_zero = rust_biguint!(0);
        let mut b_mock = BlockchainStateWrapper::new();
        let owner = b_mock.create_user_account(&rust_zero);
        let sc_wrapper = b_mock.create_sc_account(&rust_zero, Some(&owner), builder, WASM_PATH);
        b_mock.set_block_timestamp(START_TIME);

        b_mock
            .execute_tx(&owner, &sc_wrapper, &rust_zero, |sc| {
                sc.init();
            })
            .assert_ok();

        SystemSetup {
            b_mock,
            owner,
            sc_wrapper,
            now: START_TIME,
        }
    }

    /// Deployed with the market seeded from an EGLD supply of TOKEN_SUPPLY.
    pub fn initialized(builder: ObjBuilder) -> Self {
        let mut setup = Self::new(builder);
        setup.sync_supply(TOKEN_SUPPLY);
        setup.init_market(OK);
        setup
    }

    pub fn sync_supply(&mut self, supply: u64) {
        self.b_mock
            .execute_tx(&self.owner, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.sync_token_supply(EgldOrEsdtTokenIdentifier::egld(), managed_biguint!(supply));
            })
            .assert_ok();
    }

    pub fn init_market(&mut self, expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(&self.owner, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.init_market(0, EgldOrEsdtTokenIdentifier::egld());
            });
        check!(result, expected);
    }

    pub fn new_user(&mut self, egld: u64) -> Address {
        self.b_mock.create_user_account(&rust_biguint!(egld))
    }

    pub fn set_time(&mut self, timestamp: u64) {
        self.now = timestamp;
        self.b_mock.set_block_timestamp(timestamp);
    }

    pub fn advance(&mut self, seconds: u64) {
        let next = self.now + seconds;
        self.set_time(next);
    }

    // ── Name auction ──

    pub fn bid(&mut self, bidder: &Address, name: &[u8], amount: u64, expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(bidder, &self.sc_wrapper, &rust_biguint!(amount), |sc| {
                sc.bid_name(ManagedBuffer::new_from_bytes(name));
            });
        check!(result, expected);
    }

    pub fn claim_refund(&mut self, bidder: &Address, name: &[u8], expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(bidder, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.bid_refund(ManagedBuffer::new_from_bytes(name));
            });
        check!(result, expected);
    }

    pub fn create_account(&mut self, creator: &Address, name: &[u8], expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(creator, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.create_account(ManagedBuffer::new_from_bytes(name));
            });
        check!(result, expected);
    }

    // ── Producers and blocks ──

    pub fn register_producer(&mut self, producer: &Address) {
        self.b_mock
            .execute_tx(producer, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.reg_producer(ManagedBuffer::new_from_bytes(b"https://producer.example"), 1);
            })
            .assert_ok();
    }

    pub fn set_activated_stake(&mut self, stake: u64) {
        self.b_mock
            .execute_tx(&self.owner, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.set_activated_stake(managed_biguint!(stake));
            })
            .assert_ok();
    }

    /// Registers four producers and crosses the activation threshold now.
    pub fn activate_chain(&mut self) -> [Address; 4] {
        let producers = [
            self.new_user(0),
            self.new_user(0),
            self.new_user(0),
            self.new_user(0),
        ];
        for producer in producers.iter() {
            self.register_producer(producer);
        }
        self.set_activated_stake(MIN_ACTIVATED_STAKE);
        producers
    }

    pub fn on_block(&mut self, producer: &Address) {
        let slot = self.now * 2;
        self.b_mock
            .execute_tx(&self.owner, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.on_block(BlockHeader {
                    timestamp: slot,
                    producer: managed_address!(producer),
                });
            })
            .assert_ok();
    }

    pub fn claim_rewards(&mut self, producer: &Address, expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(producer, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.claim_rewards();
            });
        check!(result, expected);
    }

    pub fn fund_block_pay(&mut self, funder: &Address, amount: u64) {
        self.b_mock
            .execute_tx(funder, &self.sc_wrapper, &rust_biguint!(amount), |sc| {
                sc.fund_block_pay();
            })
            .assert_ok();
    }

    pub fn set_block_reward(&mut self, reward: u64) {
        self.b_mock
            .execute_tx(&self.owner, &self.sc_wrapper, &rust_biguint!(0), |sc| {
                sc.set_block_reward(managed_biguint!(reward));
            })
            .assert_ok();
    }

    // ── Governance ──

    pub fn stake_governance(&mut self, owner: &Address, amount: u64, expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(owner, &self.sc_wrapper, &rust_biguint!(amount), |sc| {
                sc.stake_to_governance_node();
            });
        check!(result, expected);
    }

    pub fn new_proposal(&mut self, owner: &Address, account: &Address, proposal_type: u16, fee: u64, expected: Expect) {
        let result = self
            .b_mock
            .execute_tx(owner, &self.sc_wrapper, &rust_biguint!(fee), |sc| {
                sc.new_proposal(managed_address!(account), 100, proposal_type, 0);
            });
        check!(result, expected);
    }

    // ── Queries ──

    pub fn global_state(&mut self) -> (u64, u64, u64, u64) {
        let mut result = (0, 0, 0, 0);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let global = sc.get_global_state();
                result = (
                    global.max_ram_size,
                    global.total_ram_bytes_reserved,
                    global.total_unpaid_blocks,
                    global.last_name_close,
                );
            })
            .assert_ok();
        result
    }

    pub fn escrow_balance(&mut self, account: EscrowAccount) -> u64 {
        let mut balance = 0u64;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                balance = sc.get_escrow_balance(account).to_u64().unwrap();
            })
            .assert_ok();
        balance
    }

    pub fn market_reserves(&mut self) -> (u64, u64) {
        let mut reserves = (0, 0);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let market = sc.get_ram_market().unwrap();
                reserves = (
                    market.base_balance.to_u64().unwrap(),
                    market.quote_balance.to_u64().unwrap(),
                );
            })
            .assert_ok();
        reserves
    }
}

pub fn to_u64(value: &BigUint<DebugApi>) -> u64 {
    value.to_u64().unwrap()
}
