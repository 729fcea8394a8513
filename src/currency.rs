multiversx_sc::imports!();

use crate::errors::*;
use crate::types::EscrowAccount;

/// Core token movements. Every unit the contract holds belongs to exactly one
/// escrow sub-account; a payment in credits one, a payment out debits one.
#[multiversx_sc::module]
pub trait CurrencyModule {
    // ========================================================
    // ENDPOINT: syncTokenSupply
    // The token ledger reports circulating supply.
    // ========================================================

    #[only_owner]
    #[endpoint(syncTokenSupply)]
    fn sync_token_supply(&self, token: EgldOrEsdtTokenIdentifier, supply: BigUint) {
        self.token_supply(&token).set(&supply);
        self.supply_synced_event(&token, &supply);
    }

    // ========================================================
    // ENDPOINT: withdrawEscrow
    // Only fee accounts are spendable; the rest back open
    // obligations.
    // ========================================================

    #[only_owner]
    #[endpoint(withdrawEscrow)]
    fn withdraw_escrow(&self, account: EscrowAccount, to: ManagedAddress, amount: BigUint) {
        require!(account.is_withdrawable(), ERR_ESCROW_NOT_WITHDRAWABLE);
        require!(amount > 0u64, ERR_ZERO_PAYMENT);

        let memo = ManagedBuffer::new_from_bytes(b"withdraw fees");
        self.transfer_out(account, &to, &amount, &memo);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn open_core_token(&self, token: &EgldOrEsdtTokenIdentifier) {
        self.core_token().set(token);
    }

    fn require_core_token(&self) -> EgldOrEsdtTokenIdentifier {
        require!(!self.core_token().is_empty(), ERR_NOT_INITIALIZED);
        self.core_token().get()
    }

    /// Accepts the attached core token payment into `account`.
    fn receive_payment(&self, account: EscrowAccount, memo: &ManagedBuffer) -> BigUint {
        let core = self.require_core_token();
        let payment = self.call_value().egld_or_single_esdt();
        require!(payment.token_identifier == core, ERR_WRONG_TOKEN);
        require!(payment.amount > 0u64, ERR_ZERO_PAYMENT);

        self.credit_escrow(account, &payment.amount);
        self.payment_received_event(account, &self.blockchain().get_caller(), &payment.amount, memo);
        payment.amount
    }

    /// Accepts a payment that must match `expected` exactly.
    fn receive_exact_payment(&self, account: EscrowAccount, expected: u64, memo: &ManagedBuffer) -> BigUint {
        let core = self.require_core_token();
        let payment = self.call_value().egld_or_single_esdt();
        require!(payment.token_identifier == core, ERR_WRONG_TOKEN);
        require!(payment.amount == expected, ERR_WRONG_AMOUNT);

        self.credit_escrow(account, &payment.amount);
        self.payment_received_event(account, &self.blockchain().get_caller(), &payment.amount, memo);
        payment.amount
    }

    fn credit_escrow(&self, account: EscrowAccount, amount: &BigUint) {
        self.escrow_balance(account).update(|balance| *balance += amount);
    }

    fn debit_escrow(&self, account: EscrowAccount, amount: &BigUint) {
        let balance = self.escrow_balance(account).get();
        require!(&balance >= amount, ERR_ESCROW_OVERDRAWN);
        self.escrow_balance(account).set(&(balance - amount));
    }

    /// Internal movement, no tokens leave the contract.
    fn move_escrow(&self, from: EscrowAccount, to: EscrowAccount, amount: &BigUint) {
        self.debit_escrow(from, amount);
        self.credit_escrow(to, amount);
    }

    fn transfer_out(&self, from: EscrowAccount, to: &ManagedAddress, amount: &BigUint, memo: &ManagedBuffer) {
        let core = self.require_core_token();
        self.debit_escrow(from, amount);
        self.send().direct(to, &core, 0, amount);
        self.payment_sent_event(from, to, amount, memo);
    }

    fn memo_with_name(&self, prefix: &[u8], name: &ManagedBuffer) -> ManagedBuffer {
        let mut memo = ManagedBuffer::new_from_bytes(prefix);
        memo.append(name);
        memo
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getSupply)]
    fn get_supply(&self, token: &EgldOrEsdtTokenIdentifier) -> BigUint {
        self.token_supply(token).get()
    }

    #[view(getEscrowBalance)]
    fn get_escrow_balance(&self, account: EscrowAccount) -> BigUint {
        self.escrow_balance(account).get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("supplySynced")]
    fn supply_synced_event(&self, #[indexed] token: &EgldOrEsdtTokenIdentifier, supply: &BigUint);

    #[event("paymentReceived")]
    fn payment_received_event(
        &self,
        #[indexed] account: EscrowAccount,
        #[indexed] from: &ManagedAddress,
        #[indexed] amount: &BigUint,
        memo: &ManagedBuffer,
    );

    #[event("paymentSent")]
    fn payment_sent_event(
        &self,
        #[indexed] account: EscrowAccount,
        #[indexed] to: &ManagedAddress,
        #[indexed] amount: &BigUint,
        memo: &ManagedBuffer,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("coreToken")]
    fn core_token(&self) -> SingleValueMapper<EgldOrEsdtTokenIdentifier>;

    #[storage_mapper("tokenSupply")]
    fn token_supply(&self, token: &EgldOrEsdtTokenIdentifier) -> SingleValueMapper<BigUint>;

    #[storage_mapper("escrowBalance")]
    fn escrow_balance(&self, account: EscrowAccount) -> SingleValueMapper<BigUint>;
}
