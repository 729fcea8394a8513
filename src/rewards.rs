multiversx_sc::imports!();

use crate::constants::*;
use crate::errors::*;
use crate::types::{BlockHeader, EscrowAccount, ProducerInfo, ProducerPayShare, SystemContext};
use crate::{currency, deferred, global_params, name_auction, resource_market};

/// Per-block accounting and fixed-rate block pay. Vote-weighted pay is not
/// part of this revision; the pay-share record is only kept up to date.
#[multiversx_sc::module]
pub trait RewardsModule:
    global_params::GlobalParamsModule
    + currency::CurrencyModule
    + deferred::DeferredModule
    + resource_market::ResourceMarketModule
    + name_auction::NameAuctionModule
{
    // ========================================================
    // ENDPOINT: onBlock
    // Called by the host for every block. Only authorization may
    // abort it; everything else degrades to a no-op.
    // ========================================================

    #[only_owner]
    #[endpoint(onBlock)]
    fn on_block(&self, header: BlockHeader<Self::Api>) {
        let mut ctx = self.load_context();
        ctx.global2.last_block_num = header.timestamp;

        if ctx.global.total_activated_stake < MIN_ACTIVATED_STAKE
            || self.active_producers().len() < MIN_ACTIVE_PRODUCERS
        {
            self.store_context(&ctx);
            return;
        }

        let now = self.blockchain().get_block_timestamp();
        if ctx.global.last_pervote_bucket_fill == 0 {
            ctx.global.last_pervote_bucket_fill = now;
        }

        // the genesis producer may not be registered
        if let Some(mut producer) = self.producers().get(&header.producer) {
            producer.unpaid_blocks += 1;
            ctx.global.total_unpaid_blocks += 1;
            self.producers().insert(header.producer.clone(), producer);
        }

        let since_schedule = header
            .timestamp
            .saturating_sub(ctx.global.last_producer_schedule_update);
        if since_schedule > SCHEDULE_UPDATE_SLOTS {
            self.update_elected_producers(&mut ctx, header.timestamp);

            let since_close = header.timestamp.saturating_sub(ctx.global.last_name_close);
            if since_close > SLOTS_PER_DAY {
                self.close_highest_bid(&mut ctx, header.timestamp, now);
            }
        }

        self.store_context(&ctx);
    }

    // ========================================================
    // ENDPOINT: claimRewards
    // ========================================================

    #[endpoint(claimRewards)]
    fn claim_rewards(&self) -> BigUint {
        let owner = self.blockchain().get_caller();
        let mut producer = match self.producers().get(&owner) {
            Some(producer) => producer,
            None => sc_panic!(ERR_PRODUCER_NOT_FOUND),
        };
        require!(producer.is_active, ERR_PRODUCER_INACTIVE);

        let mut ctx = self.load_context();
        require!(
            ctx.global.total_activated_stake >= MIN_ACTIVATED_STAKE,
            ERR_CHAIN_NOT_ACTIVATED
        );

        let now = self.blockchain().get_block_timestamp();
        require!(
            now >= producer.last_claim_time + CLAIM_COOLDOWN,
            ERR_CLAIM_COOLDOWN
        );

        if !self.producer_pay_shares().contains_key(&owner) {
            let share = ProducerPayShare {
                owner: owner.clone(),
                last_votepay_share_update: now,
            };
            self.producer_pay_shares().insert(owner.clone(), share);
        }
        ctx.global3.last_vpay_state_update = now;

        let block_pay = if ctx.global.total_unpaid_blocks > 0 {
            &ctx.global.reward_per_block * &BigUint::from(producer.unpaid_blocks)
        } else {
            BigUint::zero()
        };

        require!(ctx.global.perblock_bucket >= block_pay, ERR_BUCKET_EXHAUSTED);
        require!(
            ctx.global.total_unpaid_blocks >= producer.unpaid_blocks,
            ERR_UNPAID_BLOCKS
        );
        ctx.global.perblock_bucket -= &block_pay;
        ctx.global.total_unpaid_blocks -= producer.unpaid_blocks;

        let paid_blocks = producer.unpaid_blocks;
        producer.last_claim_time = now;
        producer.unpaid_blocks = 0;
        self.producers().insert(owner.clone(), producer);
        self.store_context(&ctx);

        if block_pay > 0u64 {
            let memo = ManagedBuffer::new_from_bytes(b"producer block pay");
            self.transfer_out(EscrowAccount::BlockPay, &owner, &block_pay, &memo);
        }

        self.rewards_claimed_event(&owner, paid_blocks, &block_pay);
        block_pay
    }

    // ========================================================
    // ENDPOINT: regProducer / unregProducer
    // ========================================================

    #[endpoint(regProducer)]
    fn reg_producer(&self, url: ManagedBuffer, location: u16) {
        require!(url.len() <= MAX_PRODUCER_URL_LEN, ERR_URL_TOO_LONG);
        let owner = self.blockchain().get_caller();

        let producer = match self.producers().get(&owner) {
            Some(mut existing) => {
                existing.is_active = true;
                existing.url = url;
                existing.location = location;
                existing
            }
            None => ProducerInfo {
                owner: owner.clone(),
                total_votes: BigUint::zero(),
                is_active: true,
                url,
                location,
                unpaid_blocks: 0,
                last_claim_time: 0,
            },
        };
        self.producers().insert(owner.clone(), producer);
        self.active_producers().insert(owner.clone());

        self.producer_registered_event(&owner, location);
    }

    #[endpoint(unregProducer)]
    fn unreg_producer(&self) {
        let owner = self.blockchain().get_caller();
        self.deactivate_producer(&owner);
    }

    // ========================================================
    // ENDPOINT: rmvProducer
    // Deactivates without deleting; unpaid blocks stay claimable
    // only after reactivation.
    // ========================================================

    #[only_owner]
    #[endpoint(rmvProducer)]
    fn remove_producer(&self, producer: ManagedAddress) {
        self.deactivate_producer(&producer);
    }

    // ========================================================
    // ENDPOINT: fundBlockPay
    // ========================================================

    #[payable("*")]
    #[endpoint(fundBlockPay)]
    fn fund_block_pay(&self) {
        let memo = ManagedBuffer::new_from_bytes(b"fund block pay");
        let amount = self.receive_payment(EscrowAccount::BlockPay, &memo);

        let mut ctx = self.load_context();
        ctx.global.perblock_bucket += &amount;
        self.store_context(&ctx);

        self.block_pay_funded_event(&self.blockchain().get_caller(), &amount);
    }

    // ========================================================
    // Root-reported inputs
    // ========================================================

    #[only_owner]
    #[endpoint(setBlockReward)]
    fn set_block_reward(&self, reward_per_block: BigUint) {
        let mut ctx = self.load_context();
        ctx.global.reward_per_block = reward_per_block.clone();
        self.store_context(&ctx);

        self.block_reward_event(&reward_per_block);
    }

    /// The delegation layer reports the chain-wide activated stake. The
    /// first time it reaches the threshold the crossing time is recorded.
    #[only_owner]
    #[endpoint(setActivatedStake)]
    fn set_activated_stake(&self, total_activated_stake: BigUint) {
        let mut ctx = self.load_context();
        if ctx.global.thresh_activated_stake_time == 0 && total_activated_stake >= MIN_ACTIVATED_STAKE {
            ctx.global.thresh_activated_stake_time = self.blockchain().get_block_timestamp();
            self.chain_activated_event(ctx.global.thresh_activated_stake_time);
        }
        ctx.global.total_activated_stake = total_activated_stake;
        self.store_context(&ctx);
    }

    #[only_owner]
    #[endpoint(setProducerVotes)]
    fn set_producer_votes(&self, producer: ManagedAddress, total_votes: BigUint) {
        let mut info = match self.producers().get(&producer) {
            Some(info) => info,
            None => sc_panic!(ERR_PRODUCER_NOT_FOUND),
        };
        info.total_votes = total_votes;
        self.producers().insert(producer, info);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn deactivate_producer(&self, owner: &ManagedAddress) {
        let mut producer = match self.producers().get(owner) {
            Some(producer) => producer,
            None => sc_panic!(ERR_PRODUCER_NOT_FOUND),
        };
        producer.is_active = false;
        self.producers().insert(owner.clone(), producer);
        self.active_producers().swap_remove(owner);

        self.producer_deactivated_event(owner);
    }

    /// Schedule selection belongs to the consensus layer; only the
    /// bookkeeping lives here.
    fn update_elected_producers(&self, ctx: &mut SystemContext<Self::Api>, slot: u64) {
        ctx.global.last_producer_schedule_update = slot;
        let schedule_size = self.active_producers().len();
        ctx.global.last_producer_schedule_size = schedule_size.min(u16::MAX as usize) as u16;

        self.schedule_updated_event(slot, ctx.global.last_producer_schedule_size);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getProducer)]
    fn get_producer(&self, owner: ManagedAddress) -> Option<ProducerInfo<Self::Api>> {
        self.producers().get(&owner)
    }

    #[view(getProducerPayShare)]
    fn get_producer_pay_share(&self, owner: ManagedAddress) -> Option<ProducerPayShare<Self::Api>> {
        self.producer_pay_shares().get(&owner)
    }

    #[view(getActiveProducerCount)]
    fn get_active_producer_count(&self) -> usize {
        self.active_producers().len()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("rewardsClaimed")]
    fn rewards_claimed_event(&self, #[indexed] owner: &ManagedAddress, #[indexed] blocks: u64, amount: &BigUint);

    #[event("producerRegistered")]
    fn producer_registered_event(&self, #[indexed] owner: &ManagedAddress, #[indexed] location: u16);

    #[event("producerDeactivated")]
    fn producer_deactivated_event(&self, #[indexed] owner: &ManagedAddress);

    #[event("blockPayFunded")]
    fn block_pay_funded_event(&self, #[indexed] funder: &ManagedAddress, amount: &BigUint);

    #[event("blockReward")]
    fn block_reward_event(&self, reward_per_block: &BigUint);

    #[event("chainActivated")]
    fn chain_activated_event(&self, #[indexed] activated_at: u64);

    #[event("scheduleUpdated")]
    fn schedule_updated_event(&self, #[indexed] slot: u64, #[indexed] size: u16);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("producers")]
    fn producers(&self) -> MapMapper<ManagedAddress, ProducerInfo<Self::Api>>;

    #[storage_mapper("producerPayShares")]
    fn producer_pay_shares(&self) -> MapMapper<ManagedAddress, ProducerPayShare<Self::Api>>;

    /// Secondary index used to count active producers
    #[storage_mapper("activeProducers")]
    fn active_producers(&self) -> UnorderedSetMapper<ManagedAddress>;
}
