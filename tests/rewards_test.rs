mod setup;

use multiversx_sc_scenario::{managed_address, managed_biguint, rust_biguint};
use setup::*;

const REWARD_PER_BLOCK: u64 = 100;
const BUCKET: u64 = 1_000_000;

fn unpaid_blocks<B>(setup: &mut SystemSetup<B>, producer: &multiversx_sc::types::Address) -> u64
where
    B: 'static + Copy + Fn() -> native_system::ContractObj<multiversx_sc_scenario::DebugApi>,
{
    let mut unpaid = 0u64;
    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            unpaid = sc.get_producer(managed_address!(producer)).unwrap().unpaid_blocks;
        })
        .assert_ok();
    unpaid
}

#[test]
fn test_on_block_is_noop_before_activation() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = [setup.new_user(0), setup.new_user(0), setup.new_user(0)];
    for producer in producers.iter() {
        setup.register_producer(producer);
    }
    setup.set_activated_stake(MIN_ACTIVATED_STAKE);

    setup.on_block(&producers[0]);

    let (_, _, total_unpaid, _) = setup.global_state();
    assert_eq!(total_unpaid, 0);
    assert_eq!(unpaid_blocks(&mut setup, &producers[0]), 0);
    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            assert_eq!(sc.get_global_state2().last_block_num, START_TIME * 2);
            assert_eq!(sc.get_global_state().last_pervote_bucket_fill, 0);
        })
        .assert_ok();
}

#[test]
fn test_on_block_is_noop_below_stake_threshold() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = [
        setup.new_user(0),
        setup.new_user(0),
        setup.new_user(0),
        setup.new_user(0),
    ];
    for producer in producers.iter() {
        setup.register_producer(producer);
    }
    setup.set_activated_stake(MIN_ACTIVATED_STAKE - 1);

    setup.on_block(&producers[0]);

    let (_, _, total_unpaid, _) = setup.global_state();
    assert_eq!(total_unpaid, 0);
}

#[test]
fn test_on_block_counts_unpaid_blocks() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = setup.activate_chain();
    let genesis = setup.new_user(0);

    setup.on_block(&producers[0]);
    setup.advance(1);
    setup.on_block(&producers[0]);
    setup.advance(1);
    setup.on_block(&producers[1]);
    setup.advance(1);
    setup.on_block(&genesis);

    assert_eq!(unpaid_blocks(&mut setup, &producers[0]), 2);
    assert_eq!(unpaid_blocks(&mut setup, &producers[1]), 1);
    let (_, _, total_unpaid, _) = setup.global_state();
    assert_eq!(total_unpaid, 3);
    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            let global = sc.get_global_state();
            assert_eq!(global.last_pervote_bucket_fill, START_TIME);
            assert_eq!(global.last_producer_schedule_update, START_TIME * 2);
            assert_eq!(global.last_producer_schedule_size, 4);
        })
        .assert_ok();
}

#[test]
fn test_claim_rewards_pays_unpaid_blocks() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = setup.activate_chain();
    let funder = setup.new_user(BUCKET);
    setup.fund_block_pay(&funder, BUCKET);
    setup.set_block_reward(REWARD_PER_BLOCK);

    for _ in 0..3 {
        setup.on_block(&producers[0]);
        setup.advance(1);
    }
    setup.on_block(&producers[1]);

    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            assert!(sc.get_producer_pay_share(managed_address!(&producers[0])).is_none());
        })
        .assert_ok();

    setup.claim_rewards(&producers[0], OK);

    setup
        .b_mock
        .check_egld_balance(&producers[0], &rust_biguint!(3 * REWARD_PER_BLOCK));
    assert_eq!(setup.escrow_balance(EscrowAccount::BlockPay), BUCKET - 300);
    assert_eq!(unpaid_blocks(&mut setup, &producers[0]), 0);
    let (_, _, total_unpaid, _) = setup.global_state();
    assert_eq!(total_unpaid, 1);

    let now = setup.now;
    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            let global = sc.get_global_state();
            assert_eq!(global.perblock_bucket, managed_biguint!(BUCKET - 300));

            let producer = sc.get_producer(managed_address!(&producers[0])).unwrap();
            assert_eq!(producer.last_claim_time, now);

            let share = sc.get_producer_pay_share(managed_address!(&producers[0])).unwrap();
            assert_eq!(share.last_votepay_share_update, now);
            assert_eq!(sc.get_global_state3().last_vpay_state_update, now);
        })
        .assert_ok();
}

#[test]
fn test_claim_rewards_once_per_day() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = setup.activate_chain();
    let funder = setup.new_user(BUCKET);
    setup.fund_block_pay(&funder, BUCKET);
    setup.set_block_reward(REWARD_PER_BLOCK);

    setup.on_block(&producers[0]);
    setup.claim_rewards(&producers[0], OK);

    setup.advance(DAY - 1);
    setup.on_block(&producers[0]);
    setup.claim_rewards(&producers[0], Some(ERR_CLAIM_COOLDOWN));

    setup.advance(1);
    setup.claim_rewards(&producers[0], OK);
    setup
        .b_mock
        .check_egld_balance(&producers[0], &rust_biguint!(2 * REWARD_PER_BLOCK));
}

#[test]
fn test_claim_rewards_preconditions() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let stranger = setup.new_user(0);
    setup.claim_rewards(&stranger, Some(ERR_PRODUCER_NOT_FOUND));

    let producers = [
        setup.new_user(0),
        setup.new_user(0),
        setup.new_user(0),
        setup.new_user(0),
    ];
    for producer in producers.iter() {
        setup.register_producer(producer);
    }
    setup.claim_rewards(&producers[0], Some(ERR_CHAIN_NOT_ACTIVATED));

    setup.set_activated_stake(MIN_ACTIVATED_STAKE);
    setup
        .b_mock
        .execute_tx(&producers[1], &setup.sc_wrapper, &rust_biguint!(0), |sc| {
            sc.unreg_producer();
        })
        .assert_ok();
    setup.claim_rewards(&producers[1], Some(ERR_PRODUCER_INACTIVE));
}

#[test]
fn test_claim_rewards_rejects_exhausted_bucket() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = setup.activate_chain();
    setup.set_block_reward(REWARD_PER_BLOCK);

    setup.on_block(&producers[0]);
    setup.claim_rewards(&producers[0], Some(ERR_BUCKET_EXHAUSTED));
    assert_eq!(unpaid_blocks(&mut setup, &producers[0]), 1);
}

#[test]
fn test_remove_producer_is_owner_only() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producers = setup.activate_chain();

    setup
        .b_mock
        .execute_tx(&producers[0], &setup.sc_wrapper, &rust_biguint!(0), |sc| {
            sc.remove_producer(managed_address!(&producers[1]));
        })
        .assert_user_error(OWNER_ERROR);

    setup
        .b_mock
        .execute_tx(&setup.owner, &setup.sc_wrapper, &rust_biguint!(0), |sc| {
            sc.remove_producer(managed_address!(&producers[1]));
        })
        .assert_ok();

    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            let producer = sc.get_producer(managed_address!(&producers[1])).unwrap();
            assert!(!producer.is_active);
            assert_eq!(sc.get_active_producer_count(), 3);
        })
        .assert_ok();

    // below four active producers the hook stops counting
    setup.on_block(&producers[0]);
    let (_, _, total_unpaid, _) = setup.global_state();
    assert_eq!(total_unpaid, 0);
}

#[test]
fn test_register_producer_rejects_long_url() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);
    let producer = setup.new_user(0);

    setup
        .b_mock
        .execute_tx(&producer, &setup.sc_wrapper, &rust_biguint!(0), |sc| {
            let url = [b'a'; 513];
            sc.reg_producer(multiversx_sc::types::ManagedBuffer::new_from_bytes(&url), 1);
        })
        .assert_user_error(ERR_URL_TOO_LONG);
}

#[test]
fn test_activation_time_is_recorded_once() {
    let mut setup = SystemSetup::initialized(native_system::contract_obj);

    setup.set_activated_stake(MIN_ACTIVATED_STAKE);
    setup.advance(DAY);
    setup.set_activated_stake(MIN_ACTIVATED_STAKE * 2);

    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            let global = sc.get_global_state();
            assert_eq!(global.thresh_activated_stake_time, START_TIME);
            assert_eq!(global.total_activated_stake, managed_biguint!(MIN_ACTIVATED_STAKE * 2));
        })
        .assert_ok();
}
