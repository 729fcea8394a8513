multiversx_sc::imports!();

use crate::constants::*;
use crate::errors::*;
use crate::types::{EscrowAccount, ExchangeState, ResourceLimits, SystemContext};
use crate::{currency, global_params};

/// Constant-product market between the core token (quote) and storage bytes
/// (base), plus the linear growth schedule of the byte supply.
#[multiversx_sc::module]
pub trait ResourceMarketModule: global_params::GlobalParamsModule + currency::CurrencyModule {
    // ========================================================
    // ENDPOINT: initMarket
    // One-time seeding of the reserves from the free storage
    // and 0.1% of the core token supply.
    // ========================================================

    #[only_owner]
    #[endpoint(initMarket)]
    fn init_market(&self, version: u64, core_token: EgldOrEsdtTokenIdentifier) {
        require!(version == MARKET_INIT_VERSION, ERR_UNSUPPORTED_INIT_VERSION);
        require!(self.ram_market().is_empty(), ERR_ALREADY_INITIALIZED);

        let token_supply = self.get_supply(&core_token);
        require!(token_supply > 0u64, ERR_ZERO_SUPPLY);

        let ctx = self.load_context();
        let market = ExchangeState {
            supply: BigUint::from(RAMCORE_SUPPLY),
            base_balance: BigUint::from(ctx.global.free_ram()),
            quote_balance: token_supply / QUOTE_SEED_DIVISOR,
        };
        require!(
            market.base_balance > 0u64 && market.quote_balance > 0u64,
            ERR_EMPTY_RESERVE
        );
        self.ram_market().set(&market);
        self.open_core_token(&core_token);
        self.store_context(&ctx);

        self.market_initialized_event(&core_token, &market.base_balance, &market.quote_balance);
    }

    // ========================================================
    // ENDPOINT: setRamSize
    // Pure supply injection: the delta lands in the base reserve.
    // ========================================================

    #[only_owner]
    #[endpoint(setRamSize)]
    fn set_ram_size(&self, max_ram_size: u64) {
        let mut ctx = self.load_context();

        require!(ctx.global.max_ram_size < max_ram_size, ERR_RAM_DECREASE);
        require!(max_ram_size < MAX_REALISTIC_RAM_SIZE, ERR_RAM_UNREALISTIC);
        require!(
            max_ram_size > ctx.global.total_ram_bytes_reserved,
            ERR_RAM_BELOW_RESERVED
        );
        require!(!self.ram_market().is_empty(), ERR_NOT_INITIALIZED);

        let delta = max_ram_size - ctx.global.max_ram_size;
        self.ram_market()
            .update(|market| market.base_balance += &BigUint::from(delta));
        ctx.global.max_ram_size = max_ram_size;
        self.store_context(&ctx);

        self.ram_size_event(max_ram_size, delta);
    }

    // ========================================================
    // ENDPOINT: setRamRate
    // Growth at the old rate is flushed up to now first.
    // ========================================================

    #[only_owner]
    #[endpoint(setRamRate)]
    fn set_ram_rate(&self, bytes_per_block: u16) {
        let mut ctx = self.load_context();
        self.grow_ram_supply(&mut ctx);
        ctx.global2.new_ram_per_block = bytes_per_block;
        self.store_context(&ctx);

        self.ram_rate_event(bytes_per_block);
    }

    #[endpoint(growRamSupply)]
    fn grow_ram_supply_endpoint(&self) {
        let mut ctx = self.load_context();
        self.grow_ram_supply(&mut ctx);
        self.store_context(&ctx);
    }

    // ========================================================
    // ENDPOINT: buyRam
    // ========================================================

    #[payable("*")]
    #[endpoint(buyRam)]
    fn buy_ram(&self, receiver: ManagedAddress) -> u64 {
        require!(!self.ram_market().is_empty(), ERR_NOT_INITIALIZED);
        let mut ctx = self.load_context();
        self.grow_ram_supply(&mut ctx);

        let memo = ManagedBuffer::new_from_bytes(b"buy ram");
        let quant = self.receive_payment(EscrowAccount::RamMarket, &memo);
        let fee = ram_fee(&quant);
        let quant_after_fee = &quant - &fee;
        if fee > 0u64 {
            self.move_escrow(EscrowAccount::RamMarket, EscrowAccount::RamFee, &fee);
        }

        let mut market = self.ram_market().get();
        let bytes_out = self.bancor_output(&market.quote_balance, &market.base_balance, &quant_after_fee);
        require!(bytes_out > 0u64, ERR_RAM_OUT_ZERO);
        require!(bytes_out < market.base_balance, ERR_RAM_EXHAUSTED);
        market.quote_balance += &quant_after_fee;
        market.base_balance -= &bytes_out;
        self.ram_market().set(&market);

        let bytes = match bytes_out.to_u64() {
            Some(bytes) => bytes,
            None => sc_panic!(ERR_RAM_EXHAUSTED),
        };
        require!(
            ctx.global.total_ram_bytes_reserved + bytes <= ctx.global.max_ram_size,
            ERR_RAM_EXHAUSTED
        );
        ctx.global.total_ram_bytes_reserved += bytes;
        ctx.global.total_ram_stake += &quant_after_fee;
        self.ram_quota(&receiver).update(|quota| *quota += bytes);
        self.ram_holder(&receiver).set(true);
        self.store_context(&ctx);

        self.ram_bought_event(&self.blockchain().get_caller(), &receiver, bytes, &quant);
        bytes
    }

    // ========================================================
    // ENDPOINT: sellRam
    // ========================================================

    #[endpoint(sellRam)]
    fn sell_ram(&self, bytes: u64) -> BigUint {
        require!(bytes > 0, ERR_SELL_ZERO);
        require!(!self.ram_market().is_empty(), ERR_NOT_INITIALIZED);
        let account = self.blockchain().get_caller();
        let quota = self.ram_quota(&account).get();
        require!(quota >= bytes, ERR_INSUFFICIENT_QUOTA);

        let mut ctx = self.load_context();
        self.grow_ram_supply(&mut ctx);

        let bytes_in = BigUint::from(bytes);
        let mut market = self.ram_market().get();
        let tokens_out = self.bancor_output(&market.base_balance, &market.quote_balance, &bytes_in);
        require!(tokens_out > 0u64, ERR_TOKENS_OUT_ZERO);
        market.base_balance += &bytes_in;
        market.quote_balance -= &tokens_out;
        self.ram_market().set(&market);

        ctx.global.total_ram_bytes_reserved -= bytes;
        ctx.global.total_ram_stake = if ctx.global.total_ram_stake > tokens_out {
            &ctx.global.total_ram_stake - &tokens_out
        } else {
            BigUint::zero()
        };
        self.ram_quota(&account).set(quota - bytes);
        self.store_context(&ctx);

        let fee = ram_fee(&tokens_out);
        let payout = &tokens_out - &fee;
        if fee > 0u64 {
            self.move_escrow(EscrowAccount::RamMarket, EscrowAccount::RamFee, &fee);
        }
        if payout > 0u64 {
            let memo = ManagedBuffer::new_from_bytes(b"sell ram");
            self.transfer_out(EscrowAccount::RamMarket, &account, &payout, &memo);
        }

        self.ram_sold_event(&account, bytes, &payout);
        payout
    }

    // ========================================================
    // ENDPOINT: setAccountLimits
    // Override for accounts that never bought storage, even if
    // they have since sold all of it.
    // ========================================================

    #[only_owner]
    #[endpoint(setAccountLimits)]
    fn set_account_limits(&self, account: ManagedAddress, ram_bytes: i64, net_weight: i64, cpu_weight: i64) {
        require!(!self.ram_holder(&account).get(), ERR_MANAGED_LIMITS);

        let limits = ResourceLimits {
            ram_bytes,
            net_weight,
            cpu_weight,
        };
        self.resource_limits(&account).set(&limits);
        self.account_limits_event(&account, &limits);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    /// Idempotent within one slot.
    fn grow_ram_supply(&self, ctx: &mut SystemContext<Self::Api>) {
        let slot = self.current_block_slot();
        if slot <= ctx.global2.last_ram_increase {
            return;
        }

        let new_ram = (slot - ctx.global2.last_ram_increase) * u64::from(ctx.global2.new_ram_per_block);
        ctx.global.max_ram_size += new_ram;
        if new_ram > 0 && !self.ram_market().is_empty() {
            self.ram_market()
                .update(|market| market.base_balance += &BigUint::from(new_ram));
        }
        ctx.global2.last_ram_increase = slot;
    }

    /// Routes closed-auction proceeds into the quote reserve.
    fn channel_to_ram_market(&self, from: EscrowAccount, amount: &BigUint) {
        self.move_escrow(from, EscrowAccount::RamMarket, amount);
        self.ram_market()
            .update(|market| market.quote_balance += amount);
    }

    /// out = inp * out_reserve / (inp_reserve + inp)
    fn bancor_output(&self, inp_reserve: &BigUint, out_reserve: &BigUint, inp: &BigUint) -> BigUint {
        require!(
            *inp_reserve > 0u64 && *out_reserve > 0u64,
            ERR_EMPTY_RESERVE
        );
        (inp * out_reserve) / (inp_reserve + inp)
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getRamMarket)]
    fn get_ram_market(&self) -> Option<ExchangeState<Self::Api>> {
        if self.ram_market().is_empty() {
            None
        } else {
            Some(self.ram_market().get())
        }
    }

    #[view(getRamQuota)]
    fn get_ram_quota(&self, account: &ManagedAddress) -> u64 {
        self.ram_quota(account).get()
    }

    #[view(getAccountLimits)]
    fn get_account_limits(&self, account: &ManagedAddress) -> Option<ResourceLimits> {
        if self.resource_limits(account).is_empty() {
            None
        } else {
            Some(self.resource_limits(account).get())
        }
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("marketInitialized")]
    fn market_initialized_event(
        &self,
        #[indexed] core_token: &EgldOrEsdtTokenIdentifier,
        #[indexed] base_balance: &BigUint,
        quote_balance: &BigUint,
    );

    #[event("ramSize")]
    fn ram_size_event(&self, #[indexed] max_ram_size: u64, delta: u64);

    #[event("ramRate")]
    fn ram_rate_event(&self, #[indexed] bytes_per_block: u16);

    #[event("ramBought")]
    fn ram_bought_event(
        &self,
        #[indexed] payer: &ManagedAddress,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] bytes: u64,
        paid: &BigUint,
    );

    #[event("ramSold")]
    fn ram_sold_event(&self, #[indexed] account: &ManagedAddress, #[indexed] bytes: u64, received: &BigUint);

    #[event("accountLimits")]
    fn account_limits_event(&self, #[indexed] account: &ManagedAddress, limits: &ResourceLimits);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("ramMarket")]
    fn ram_market(&self) -> SingleValueMapper<ExchangeState<Self::Api>>;

    #[storage_mapper("ramQuota")]
    fn ram_quota(&self, account: &ManagedAddress) -> SingleValueMapper<u64>;

    /// Set on first purchase and never cleared
    #[storage_mapper("ramHolder")]
    fn ram_holder(&self, account: &ManagedAddress) -> SingleValueMapper<bool>;

    #[storage_mapper("resourceLimits")]
    fn resource_limits(&self, account: &ManagedAddress) -> SingleValueMapper<ResourceLimits>;
}

/// 0.5%, rounded up
fn ram_fee<M: ManagedTypeApi>(amount: &BigUint<M>) -> BigUint<M> {
    (amount + &BigUint::from(RAM_FEE_DIVISOR - 1)) / RAM_FEE_DIVISOR
}
