multiversx_sc::imports!();

use crate::constants::*;
use crate::errors::*;
use crate::types::{seconds_to_slot, ChainParams, GlobalState, GlobalState2, GlobalState3, SystemContext};

#[multiversx_sc::module]
pub trait GlobalParamsModule {
    // ========================================================
    // Context: loaded at the start of an endpoint, stored at the end
    // ========================================================

    fn load_context(&self) -> SystemContext<Self::Api> {
        let global = if self.global_state().is_empty() {
            GlobalState::with_params(self.current_chain_params())
        } else {
            self.global_state().get()
        };
        let global2 = if self.global_state2().is_empty() {
            GlobalState2::default()
        } else {
            self.global_state2().get()
        };
        let global3 = if self.global_state3().is_empty() {
            GlobalState3::default()
        } else {
            self.global_state3().get()
        };

        SystemContext {
            global,
            global2,
            global3,
        }
    }

    fn store_context(&self, ctx: &SystemContext<Self::Api>) {
        self.global_state().set(&ctx.global);
        self.global_state2().set(&ctx.global2);
        self.global_state3().set(&ctx.global3);
    }

    fn current_chain_params(&self) -> ChainParams {
        if self.chain_params().is_empty() {
            ChainParams::default()
        } else {
            self.chain_params().get()
        }
    }

    fn current_block_slot(&self) -> u64 {
        seconds_to_slot(self.blockchain().get_block_timestamp())
    }

    // ========================================================
    // ENDPOINT: setParams
    // ========================================================

    #[only_owner]
    #[endpoint(setParams)]
    fn set_params(&self, params: ChainParams) {
        require!(
            params.max_authority_depth >= MIN_AUTHORITY_DEPTH,
            ERR_AUTHORITY_DEPTH
        );

        let mut ctx = self.load_context();
        ctx.global.params = params.clone();
        self.chain_params().set(&params);
        self.store_context(&ctx);

        self.params_updated_event(&params);
    }

    // ========================================================
    // ENDPOINT: setPriv
    // ========================================================

    #[only_owner]
    #[endpoint(setPriv)]
    fn set_priv(&self, account: ManagedAddress, is_priv: bool) {
        self.privileged(&account).set(is_priv);
        self.privileged_event(&account, is_priv);
    }

    // ========================================================
    // ENDPOINT: updateRevision
    // ========================================================

    #[only_owner]
    #[endpoint(updateRevision)]
    fn update_revision(&self, revision: u8) {
        let mut ctx = self.load_context();
        let current = ctx.global2.revision;
        require!(current < u8::MAX, ERR_REVISION_WRAP);
        require!(revision == current + 1, ERR_REVISION_SKIP);
        require!(revision <= MAX_SUPPORTED_REVISION, ERR_REVISION_UNSUPPORTED);

        ctx.global2.revision = revision;
        self.store_context(&ctx);

        self.revision_event(revision);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getGlobalState)]
    fn get_global_state(&self) -> GlobalState<Self::Api> {
        self.load_context().global
    }

    #[view(getGlobalState2)]
    fn get_global_state2(&self) -> GlobalState2 {
        self.load_context().global2
    }

    #[view(getGlobalState3)]
    fn get_global_state3(&self) -> GlobalState3 {
        self.load_context().global3
    }

    #[view(getChainParams)]
    fn get_chain_params(&self) -> ChainParams {
        self.current_chain_params()
    }

    #[view(isPrivileged)]
    fn is_privileged(&self, account: &ManagedAddress) -> bool {
        self.privileged(account).get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("paramsUpdated")]
    fn params_updated_event(&self, params: &ChainParams);

    #[event("privileged")]
    fn privileged_event(&self, #[indexed] account: &ManagedAddress, #[indexed] is_priv: bool);

    #[event("revisionUpdated")]
    fn revision_event(&self, #[indexed] revision: u8);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("global")]
    fn global_state(&self) -> SingleValueMapper<GlobalState<Self::Api>>;

    #[storage_mapper("global2")]
    fn global_state2(&self) -> SingleValueMapper<GlobalState2>;

    #[storage_mapper("global3")]
    fn global_state3(&self) -> SingleValueMapper<GlobalState3>;

    #[storage_mapper("chainParams")]
    fn chain_params(&self) -> SingleValueMapper<ChainParams>;

    #[storage_mapper("privileged")]
    fn privileged(&self, account: &ManagedAddress) -> SingleValueMapper<bool>;
}
