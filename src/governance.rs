multiversx_sc::imports!();

use crate::constants::*;
use crate::errors::*;
use crate::types::{EscrowAccount, GovernanceStake, Proposal, ProposalStatus, ProposalType, StakeStatus};
use crate::{currency, global_params};

// ============================================================
// Governance nodes stake a fixed amount and may then submit and
// vote on proposals. Only bookkeeping is done here: what an
// approved proposal changes on the chain is up to the consensus
// layer.
// ============================================================

#[multiversx_sc::module]
pub trait GovernanceModule: global_params::GlobalParamsModule + currency::CurrencyModule {
    // ========================================================
    // ENDPOINT: stakeToGovernanceNode
    // ========================================================

    #[payable("*")]
    #[endpoint(stakeToGovernanceNode)]
    fn stake_to_governance_node(&self) {
        let owner = self.blockchain().get_caller();
        if let Some(existing) = self.governance_stakes().get(&owner) {
            require!(existing.status != StakeStatus::Open, ERR_ALREADY_STAKED);
        }

        let memo = ManagedBuffer::new_from_bytes(b"stake to governance node");
        let staked = self.receive_exact_payment(EscrowAccount::GovernanceStake, GOVERNANCE_STAKE_AMOUNT, &memo);

        let now = self.blockchain().get_block_timestamp();
        let stake = GovernanceStake {
            owner: owner.clone(),
            staked: staked.clone(),
            stake_time: now,
            total_yeas: 0,
            total_nays: 0,
            is_validator: false,
            status: StakeStatus::Open,
        };
        self.governance_stakes().insert(owner.clone(), stake);

        self.governance_staked_event(&owner, &staked);
    }

    // ========================================================
    // ENDPOINT: unstakeGovernanceNode
    // Not allowed while one of the owner's proposals is voting.
    // ========================================================

    #[endpoint(unstakeGovernanceNode)]
    fn unstake_governance_node(&self) {
        let owner = self.blockchain().get_caller();
        let mut stake = self.require_open_stake(&owner);

        // proposals settle only after end_time, so none inside the window is settled
        let now = self.blockchain().get_block_timestamp();
        require!(now >= self.proposal_voting_end(&owner).get(), ERR_OPEN_PROPOSALS);

        let refund = stake.staked.clone();
        stake.status = StakeStatus::Unstaked;
        stake.staked = BigUint::zero();
        stake.is_validator = false;
        self.governance_stakes().insert(owner.clone(), stake);

        let memo = ManagedBuffer::new_from_bytes(b"unstake from governance node");
        self.transfer_out(EscrowAccount::GovernanceStake, &owner, &refund, &memo);

        self.governance_unstaked_event(&owner, &refund);
    }

    // ========================================================
    // ENDPOINT: newProposal
    // ========================================================

    #[payable("*")]
    #[endpoint(newProposal)]
    fn new_proposal(&self, account: ManagedAddress, block_height: u32, proposal_type: u16, _status: u16) -> u64 {
        let owner = self.blockchain().get_caller();
        self.require_open_stake(&owner);

        let proposal_type = match ProposalType::from_code(proposal_type) {
            Some(proposal_type) => proposal_type,
            None => sc_panic!(ERR_PROPOSAL_TYPE),
        };
        if proposal_type == ProposalType::AddValidator {
            require!(owner == account, ERR_ADD_OTHER_VALIDATOR);
        }

        let memo = ManagedBuffer::new_from_bytes(b"new proposal fee");
        self.receive_exact_payment(EscrowAccount::ProposalFees, PROPOSAL_FEE, &memo);

        let proposal_id = self.proposal_count().get() + 1;
        let start_time = self.blockchain().get_block_timestamp();
        let duration = match proposal_type {
            ProposalType::AddValidator | ProposalType::RemoveValidator => VALIDATOR_PROPOSAL_DURATION,
            ProposalType::SwitchConsensus => CONSENSUS_PROPOSAL_DURATION,
        };
        let end_time = start_time + duration;

        let proposal = Proposal {
            id: proposal_id,
            owner: owner.clone(),
            account,
            block_height,
            proposal_type,
            start_time,
            end_time,
            total_yeas: BigUint::zero(),
            total_nays: BigUint::zero(),
            is_satisfied: false,
            status: ProposalStatus::Pending,
        };
        self.proposals().insert(proposal_id, proposal);
        self.proposal_count().set(proposal_id);
        self.proposal_voting_end(&owner).update(|latest| {
            if end_time > *latest {
                *latest = end_time;
            }
        });

        self.proposal_created_event(proposal_id, &owner, end_time);
        proposal_id
    }

    // ========================================================
    // ENDPOINT: voteProposal
    // Tallies are weighted by the voter's stake.
    // ========================================================

    #[endpoint(voteProposal)]
    fn vote_proposal(&self, proposal_id: u64, approve: bool) {
        let voter = self.blockchain().get_caller();
        let mut stake = self.require_open_stake(&voter);
        let mut proposal = self.require_proposal(proposal_id);

        require!(proposal.status == ProposalStatus::Pending, ERR_PROPOSAL_NOT_PENDING);
        let now = self.blockchain().get_block_timestamp();
        require!(now < proposal.end_time, ERR_VOTING_ENDED);
        require!(!self.has_voted(proposal_id, &voter).get(), ERR_ALREADY_VOTED);

        if approve {
            proposal.total_yeas += &stake.staked;
            stake.total_yeas += 1;
        } else {
            proposal.total_nays += &stake.staked;
            stake.total_nays += 1;
        }
        self.has_voted(proposal_id, &voter).set(true);
        self.proposals().insert(proposal_id, proposal);
        self.governance_stakes().insert(voter.clone(), stake);

        self.proposal_vote_event(proposal_id, &voter, approve);
    }

    // ========================================================
    // ENDPOINT: execProposal
    // Settles a proposal whose voting window has passed.
    // ========================================================

    #[endpoint(execProposal)]
    fn exec_proposal(&self, proposal_id: u64) {
        let mut proposal = self.require_proposal(proposal_id);
        require!(proposal.status == ProposalStatus::Pending, ERR_PROPOSAL_NOT_PENDING);
        let now = self.blockchain().get_block_timestamp();
        require!(now >= proposal.end_time, ERR_VOTING_OPEN);

        proposal.is_satisfied = proposal.total_yeas > proposal.total_nays;
        if proposal.is_satisfied {
            proposal.status = ProposalStatus::Approved;
            let validator_flag = match proposal.proposal_type {
                ProposalType::AddValidator => Some(true),
                ProposalType::RemoveValidator => Some(false),
                ProposalType::SwitchConsensus => None,
            };
            if let Some(is_validator) = validator_flag {
                if let Some(mut target) = self.governance_stakes().get(&proposal.account) {
                    target.is_validator = is_validator;
                    self.governance_stakes().insert(proposal.account.clone(), target);
                }
            }
        } else {
            proposal.status = ProposalStatus::Rejected;
        }

        let status = proposal.status;
        self.proposals().insert(proposal_id, proposal);
        self.proposal_settled_event(proposal_id, status);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_open_stake(&self, owner: &ManagedAddress) -> GovernanceStake<Self::Api> {
        match self.governance_stakes().get(owner) {
            Some(stake) if stake.status == StakeStatus::Open => stake,
            _ => sc_panic!(ERR_NOT_GOVERNANCE_NODE),
        }
    }

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        match self.proposals().get(&proposal_id) {
            Some(proposal) => proposal,
            None => sc_panic!(ERR_PROPOSAL_NOT_FOUND),
        }
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getGovernanceStake)]
    fn get_governance_stake(&self, owner: ManagedAddress) -> Option<GovernanceStake<Self::Api>> {
        self.governance_stakes().get(&owner)
    }

    #[view(getProposal)]
    fn get_proposal(&self, proposal_id: u64) -> Option<Proposal<Self::Api>> {
        self.proposals().get(&proposal_id)
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> u64 {
        self.proposal_count().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("governanceStaked")]
    fn governance_staked_event(&self, #[indexed] owner: &ManagedAddress, amount: &BigUint);

    #[event("governanceUnstaked")]
    fn governance_unstaked_event(&self, #[indexed] owner: &ManagedAddress, amount: &BigUint);

    #[event("proposalCreated")]
    fn proposal_created_event(&self, #[indexed] proposal_id: u64, #[indexed] owner: &ManagedAddress, end_time: u64);

    #[event("proposalVote")]
    fn proposal_vote_event(&self, #[indexed] proposal_id: u64, #[indexed] voter: &ManagedAddress, #[indexed] approve: bool);

    #[event("proposalSettled")]
    fn proposal_settled_event(&self, #[indexed] proposal_id: u64, status: ProposalStatus);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("governanceStakes")]
    fn governance_stakes(&self) -> MapMapper<ManagedAddress, GovernanceStake<Self::Api>>;

    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self) -> MapMapper<u64, Proposal<Self::Api>>;

    /// Latest end time among the owner's proposals
    #[storage_mapper("proposalVotingEnd")]
    fn proposal_voting_end(&self, owner: &ManagedAddress) -> SingleValueMapper<u64>;

    #[storage_mapper("hasVoted")]
    fn has_voted(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<bool>;
}
