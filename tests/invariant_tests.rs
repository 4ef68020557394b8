use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use subtrack::application::router::CommandRouter;

mod common;
use common::{in_memory_router, send};

async fn assert_balance_matches_history(router: &CommandRouter, user: i64) {
    let ledger = router.ledger();
    let balance = ledger.get(user).await.unwrap().unwrap().balance.value();
    let logged: Decimal = ledger
        .history(user)
        .await
        .unwrap()
        .iter()
        .map(|t| t.amount)
        .sum();
    assert_eq!(balance, logged, "user {user}");
    assert!(balance >= Decimal::ZERO, "user {user} overdrawn");
}

fn random_answer(rng: &mut StdRng) -> String {
    match rng.gen_range(0..6) {
        0 => "-5".to_string(),
        1 => "abc".to_string(),
        2 => "0".to_string(),
        3 => rng.gen_range(100_001..200_000u32).to_string(),
        _ => rng.gen_range(1..=500u32).to_string(),
    }
}

#[tokio::test]
async fn test_balance_equals_sum_of_history_under_random_traffic() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut router = in_memory_router();
    let users = [1, 2, 3];

    for user in users {
        send(&mut router, user, "/start").await;
    }

    for _ in 0..500 {
        let user = users[rng.gen_range(0..users.len())];
        let text = match rng.gen_range(0..5) {
            0 => "/add_funds".to_string(),
            1 => "/add_subscription".to_string(),
            2 => "Platform".to_string(),
            3 => rng.gen_range(0..=14u32).to_string(),
            _ => random_answer(&mut rng),
        };
        send(&mut router, user, &text).await;
        assert_balance_matches_history(&router, user).await;
    }

    for user in users {
        assert_balance_matches_history(&router, user).await;
        let ledger = router.ledger();
        let purchases = ledger
            .history(user)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.amount < Decimal::ZERO)
            .count();
        assert_eq!(
            purchases,
            ledger.subscriptions(user).await.unwrap().len(),
            "every subscription has exactly one purchase entry"
        );
    }
}
