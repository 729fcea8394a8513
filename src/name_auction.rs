multiversx_sc::imports!();

use crate::constants::*;
use crate::errors::*;
use crate::names::{self, NameClass, MAX_NAME_LEN};
use crate::types::{BidIndexEntry, DeferredAction, DeferredKey, EscrowAccount, NameBid, SystemContext};
use crate::{currency, deferred, global_params, resource_market};

#[multiversx_sc::module]
pub trait NameAuctionModule:
    global_params::GlobalParamsModule
    + currency::CurrencyModule
    + deferred::DeferredModule
    + resource_market::ResourceMarketModule
{
    // ========================================================
    // ENDPOINT: bidName
    // Out-bid parties get an escrowed refund and a deferred
    // settlement keyed by (name, bidder).
    // ========================================================

    #[payable("*")]
    #[endpoint(bidName)]
    fn bid_name(&self, name: ManagedBuffer) {
        let bidder = self.blockchain().get_caller();

        match self.classify_name(&name) {
            NameClass::Premium => {}
            NameClass::Dotted => sc_panic!(ERR_NOT_TOP_LEVEL),
            NameClass::Regular => sc_panic!(ERR_FREE_NAME),
        }
        require!(!self.account_names().contains_key(&name), ERR_ACCOUNT_EXISTS);

        let memo = self.memo_with_name(b"bid name ", &name);
        let amount = self.receive_payment(EscrowAccount::Names, &memo);
        let now = self.blockchain().get_block_timestamp();

        match self.name_bids().get(&name) {
            None => {
                let bid = NameBid {
                    name: name.clone(),
                    high_bidder: bidder.clone(),
                    high_bid: BigInt::from(amount.clone()),
                    last_bid_time: now,
                };
                self.name_bids().insert(name.clone(), bid);
            }
            Some(mut current) => {
                require!(current.is_open(), ERR_AUCTION_CLOSED);
                let prior = current.bid_amount();
                let min_increment = prior.clone() / BID_INCREMENT_DIVISOR;
                require!(amount > &prior + &min_increment, ERR_BID_INCREMENT);
                require!(current.high_bidder != bidder, ERR_ALREADY_HIGH_BIDDER);

                let prior_bidder = current.high_bidder.clone();
                let owed = match self.bid_refunds(&name).get(&prior_bidder) {
                    Some(existing) => existing + &prior,
                    None => prior.clone(),
                };
                self.bid_refunds(&name).insert(prior_bidder.clone(), owed);

                let key = DeferredKey {
                    name: name.clone(),
                    account: prior_bidder.clone(),
                };
                self.schedule_deferred(&key, REFUND_DELAY_SECONDS, DeferredAction::BidRefund);

                current.high_bidder = bidder.clone();
                current.high_bid = BigInt::from(amount.clone());
                current.last_bid_time = now;
                self.name_bids().insert(name.clone(), current);
                self.bid_index_remove(&name);

                self.outbid_event(&name, &prior_bidder, &prior);
            }
        }
        self.bid_index_insert(&name, &amount);

        self.name_bid_event(&name, &bidder, &amount);
    }

    // ========================================================
    // ENDPOINT: bidRefund
    // ========================================================

    #[endpoint(bidRefund)]
    fn bid_refund(&self, name: ManagedBuffer) {
        let bidder = self.blockchain().get_caller();
        self.settle_bid_refund(&name, &bidder);
        self.cancel_deferred(&DeferredKey {
            name,
            account: bidder,
        });
    }

    // ========================================================
    // ENDPOINT: runDeferred
    // Anyone may push a due settlement through; funds always go
    // to the account named in the key.
    // ========================================================

    #[endpoint(runDeferred)]
    fn run_deferred(&self, name: ManagedBuffer, account: ManagedAddress) {
        let key = DeferredKey {
            name: name.clone(),
            account: account.clone(),
        };
        let task = self.take_due_task(&key);
        match task.action {
            DeferredAction::BidRefund => self.settle_bid_refund(&name, &account),
        }
    }

    // ========================================================
    // ENDPOINT: createAccount
    // The only path that consumes a closed auction.
    // ========================================================

    #[endpoint(createAccount)]
    fn create_account(&self, name: ManagedBuffer) {
        let creator = self.blockchain().get_caller();
        let class = self.classify_name(&name);
        require!(!self.account_names().contains_key(&name), ERR_ACCOUNT_EXISTS);

        if creator != self.blockchain().get_sc_address() {
            match class {
                NameClass::Premium => {
                    let bid = match self.name_bids().get(&name) {
                        Some(bid) => bid,
                        None => sc_panic!(ERR_NO_ACTIVE_BID),
                    };
                    require!(bid.high_bidder == creator, ERR_NOT_HIGH_BIDDER);
                    require!(!bid.is_open(), ERR_AUCTION_OPEN);
                    self.name_bids().remove(&name);
                }
                NameClass::Dotted => {
                    let suffix = self.name_suffix(&name);
                    require!(
                        self.account_names().get(&suffix) == Some(creator.clone()),
                        ERR_SUFFIX_ONLY
                    );
                }
                NameClass::Regular => {}
            }
        }

        self.account_names().insert(name.clone(), creator.clone());
        self.account_created_event(&name, &creator);
    }

    // ========================================================
    // INTERNAL: closing sweep, driven by the per-block hook
    // ========================================================

    /// Closes the highest open auction once it is a day old and the chain
    /// has been activated for two weeks. Never aborts.
    fn close_highest_bid(&self, ctx: &mut SystemContext<Self::Api>, slot: u64, now: u64) {
        if self.open_bid_index().is_empty() || self.ram_market().is_empty() {
            return;
        }
        let highest = self.open_bid_index().get(1);
        let mut bid = match self.name_bids().get(&highest.name) {
            Some(bid) => bid,
            None => return,
        };
        if !bid.is_open() {
            return;
        }

        let thresh_time = ctx.global.thresh_activated_stake_time;
        let bid_age = now.saturating_sub(bid.last_bid_time);
        if bid_age > NAME_CLOSE_MIN_BID_AGE
            && thresh_time > 0
            && now.saturating_sub(thresh_time) > NAME_CLOSE_ACTIVATION_AGE
        {
            let proceeds = bid.bid_amount();
            if self.escrow_balance(EscrowAccount::Names).get() < proceeds {
                return;
            }

            ctx.global.last_name_close = slot;
            self.channel_to_ram_market(EscrowAccount::Names, &proceeds);
            bid.close();
            self.name_bids().insert(highest.name.clone(), bid);
            self.bid_index_remove(&highest.name);

            self.auction_closed_event(&highest.name, &proceeds);
        }
    }

    fn settle_bid_refund(&self, name: &ManagedBuffer, bidder: &ManagedAddress) {
        let amount = match self.bid_refunds(name).remove(bidder) {
            Some(amount) => amount,
            None => sc_panic!(ERR_REFUND_NOT_FOUND),
        };
        let memo = self.memo_with_name(b"refund bid on name ", name);
        self.transfer_out(EscrowAccount::Names, bidder, &amount, &memo);

        self.bid_refunded_event(name, bidder, &amount);
    }

    // ── Ordered index of open auctions: binary max-heap, root at 1 ──

    fn bid_index_insert(&self, name: &ManagedBuffer, high_bid: &BigUint) {
        let mut index = self.open_bid_index();
        let entry = BidIndexEntry {
            high_bid: high_bid.clone(),
            name: name.clone(),
        };
        index.push(&entry);
        let position = index.len();
        self.open_bid_positions().insert(name.clone(), position);
        self.bid_index_sift_up(position);
    }

    fn bid_index_remove(&self, name: &ManagedBuffer) {
        let position = match self.open_bid_positions().remove(name) {
            Some(position) => position,
            None => return,
        };
        let mut index = self.open_bid_index();
        index.swap_remove(position);
        if position > index.len() {
            return;
        }

        let moved = index.get(position);
        self.open_bid_positions().insert(moved.name, position);
        self.bid_index_sift_up(position);
        self.bid_index_sift_down(position);
    }

    fn bid_index_sift_up(&self, start: usize) {
        let mut position = start;
        let index = self.open_bid_index();
        while position > 1 {
            let parent = position / 2;
            if index.get(parent).high_bid >= index.get(position).high_bid {
                break;
            }
            self.bid_index_swap(parent, position);
            position = parent;
        }
    }

    fn bid_index_sift_down(&self, start: usize) {
        let mut position = start;
        let index = self.open_bid_index();
        let len = index.len();
        loop {
            let left = position * 2;
            if left > len {
                break;
            }
            let right = left + 1;
            let mut largest = left;
            if right <= len && index.get(right).high_bid > index.get(left).high_bid {
                largest = right;
            }
            if index.get(position).high_bid >= index.get(largest).high_bid {
                break;
            }
            self.bid_index_swap(position, largest);
            position = largest;
        }
    }

    fn bid_index_swap(&self, i: usize, j: usize) {
        let mut index = self.open_bid_index();
        let first = index.get(i);
        let second = index.get(j);
        index.set(i, &second);
        index.set(j, &first);
        self.open_bid_positions().insert(second.name, i);
        self.open_bid_positions().insert(first.name, j);
    }

    // ── Name helpers ──

    fn classify_name(&self, name: &ManagedBuffer) -> NameClass {
        let mut buffer = [0u8; MAX_NAME_LEN];
        let bytes = self.load_name(name, &mut buffer);
        match names::classify(bytes) {
            Some(class) => class,
            None => sc_panic!(ERR_INVALID_NAME),
        }
    }

    fn name_suffix(&self, name: &ManagedBuffer) -> ManagedBuffer {
        let mut buffer = [0u8; MAX_NAME_LEN];
        let bytes = self.load_name(name, &mut buffer);
        ManagedBuffer::new_from_bytes(names::suffix(bytes))
    }

    fn load_name<'a>(&self, name: &ManagedBuffer, buffer: &'a mut [u8; MAX_NAME_LEN]) -> &'a [u8] {
        let len = name.len();
        require!(len > 0 && len <= MAX_NAME_LEN, ERR_INVALID_NAME);
        let slice = &mut buffer[..len];
        require!(name.load_slice(0, slice).is_ok(), ERR_INVALID_NAME);
        slice
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getNameBid)]
    fn get_name_bid(&self, name: ManagedBuffer) -> Option<NameBid<Self::Api>> {
        self.name_bids().get(&name)
    }

    #[view(getBidRefund)]
    fn get_bid_refund(&self, name: ManagedBuffer, bidder: ManagedAddress) -> BigUint {
        self.bid_refunds(&name).get(&bidder).unwrap_or_else(BigUint::zero)
    }

    #[view(getHighestOpenBid)]
    fn get_highest_open_bid(&self) -> Option<BidIndexEntry<Self::Api>> {
        if self.open_bid_index().is_empty() {
            None
        } else {
            Some(self.open_bid_index().get(1))
        }
    }

    #[view(getAccountOwner)]
    fn get_account_owner(&self, name: ManagedBuffer) -> Option<ManagedAddress> {
        self.account_names().get(&name)
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("nameBid")]
    fn name_bid_event(&self, #[indexed] name: &ManagedBuffer, #[indexed] bidder: &ManagedAddress, amount: &BigUint);

    #[event("outbid")]
    fn outbid_event(&self, #[indexed] name: &ManagedBuffer, #[indexed] bidder: &ManagedAddress, refund: &BigUint);

    #[event("bidRefunded")]
    fn bid_refunded_event(&self, #[indexed] name: &ManagedBuffer, #[indexed] bidder: &ManagedAddress, amount: &BigUint);

    #[event("auctionClosed")]
    fn auction_closed_event(&self, #[indexed] name: &ManagedBuffer, proceeds: &BigUint);

    #[event("accountCreated")]
    fn account_created_event(&self, #[indexed] name: &ManagedBuffer, #[indexed] creator: &ManagedAddress);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("nameBids")]
    fn name_bids(&self) -> MapMapper<ManagedBuffer, NameBid<Self::Api>>;

    #[storage_mapper("openBidIndex")]
    fn open_bid_index(&self) -> VecMapper<BidIndexEntry<Self::Api>>;

    /// Heap position of each open auction in `openBidIndex`
    #[storage_mapper("openBidPositions")]
    fn open_bid_positions(&self) -> MapMapper<ManagedBuffer, usize>;

    #[storage_mapper("bidRefunds")]
    fn bid_refunds(&self, name: &ManagedBuffer) -> MapMapper<ManagedAddress, BigUint>;

    #[storage_mapper("accountNames")]
    fn account_names(&self) -> MapMapper<ManagedBuffer, ManagedAddress>;
}
