#![no_std]

multiversx_sc::imports!();

pub mod constants;
pub mod currency;
pub mod deferred;
pub mod errors;
pub mod global_params;
pub mod governance;
pub mod name_auction;
pub mod names;
pub mod resource_market;
pub mod rewards;
pub mod types;

// ============================================================
// Contract
// ============================================================

/// Economic core of the chain: storage market, premium name auctions,
/// block pay and governance staking, over one shared store.
#[multiversx_sc::contract]
pub trait NativeSystem:
    global_params::GlobalParamsModule
    + currency::CurrencyModule
    + deferred::DeferredModule
    + resource_market::ResourceMarketModule
    + name_auction::NameAuctionModule
    + rewards::RewardsModule
    + governance::GovernanceModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// Persists the default global state so later generations start from
    /// the chain's parameters.
    #[init]
    fn init(&self) {
        let ctx = self.load_context();
        self.store_context(&ctx);
    }

    #[upgrade]
    fn upgrade(&self) {}
}
