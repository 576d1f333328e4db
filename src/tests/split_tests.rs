use super::*;
use crate::constants::{PAYMENT_EXECUTED, SPLIT_CREATED, SPLIT_REDISTRIBUTED, SPLIT_RESET};
use crate::core::models::payment::PaymentLine;
use crate::core::money::AmountInput;

fn amounts(view: &crate::core::services::SplitView) -> Vec<Decimal> {
    view.split.entries().iter().map(|e| e.amount).collect()
}

fn line(card_id: &str, amount: &str) -> PaymentLine {
    PaymentLine {
        card_id: card_id.to_string(),
        amount: d(amount),
    }
}

#[tokio::test]
async fn test_edit_flow_keeps_total_and_reports_summary() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());
    let cards = service.resolve_cards(USER, vec![]).await.unwrap();
    let recommended = optimizer_plans().minimize_interest_plan;

    let built = service.build_split(USER, &recommended, &cards).await.unwrap();
    assert_eq!(amounts(&built), vec![d("275"), d("25")]);
    assert_eq!(built.split.entries()[0].apr, d("24.99"));

    let edited = service
        .redistribute_split(USER, built.split.clone(), 1, &AmountInput::Text("$100".to_string()), &cards)
        .await
        .unwrap();

    assert_eq!(amounts(&edited), vec![d("200"), d("100")]);
    assert_eq!(edited.summary.total, d("300"));
    // 200 * 24.99 / 1200 + 100 * 18.99 / 1200
    assert_eq!(edited.summary.estimated_monthly_interest_saved, d("5.75"));
    assert_eq!(edited.summary.utilization.before, d("25.6"));
    assert_eq!(edited.summary.utilization.after, d("22.2"));

    let reset = service.reset_split(USER, edited.split, &cards).await.unwrap();
    assert_eq!(reset.split, built.split);

    let actions: Vec<String> = service
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec![SPLIT_CREATED, SPLIT_REDISTRIBUTED, SPLIT_RESET]);
}

#[tokio::test]
async fn test_decrease_feeds_highest_apr_card() {
    let service = create_test_service(InMemoryStorage::new(), StubOptimizer::default());
    let split = crate::core::models::split::PaymentSplit::manual(vec![
        crate::core::models::split::PaymentSplitEntry::new("a", d("100"), d("25")),
        crate::core::models::split::PaymentSplitEntry::new("b", d("50"), d("15")),
        crate::core::models::split::PaymentSplitEntry::new("c", d("50"), d("10")),
    ])
    .unwrap();

    let view = service
        .redistribute_split(USER, split, 0, &AmountInput::Number(d("50")), &[])
        .await
        .unwrap();

    assert_eq!(amounts(&view), vec![d("50"), d("100"), d("50")]);
}

#[tokio::test]
async fn test_tampered_split_is_rejected() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());
    let cards = service.resolve_cards(USER, vec![]).await.unwrap();
    let built = service
        .build_split(USER, &optimizer_plans().minimize_interest_plan, &cards)
        .await
        .unwrap();

    let mut json = serde_json::to_value(&built.split).unwrap();
    json["entries"][0]["amount"] = serde_json::json!(900.0);
    let tampered = serde_json::from_value(json).unwrap();

    let result = service
        .redistribute_split(USER, tampered, 0, &AmountInput::Number(d("10")), &cards)
        .await;
    assert!(matches!(result, Err(NexusError::SplitOutOfBalance { .. })));
}

#[tokio::test]
async fn test_reset_rejects_inflated_recommendation() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());
    let cards = service.resolve_cards(USER, vec![]).await.unwrap();
    let built = service
        .build_split(USER, &optimizer_plans().minimize_interest_plan, &cards)
        .await
        .unwrap();

    let mut json = serde_json::to_value(&built.split).unwrap();
    json["recommended"][0]["amount"] = serde_json::json!(5000.0);
    let tampered = serde_json::from_value(json).unwrap();

    let result = service.reset_split(USER, tampered, &cards).await;
    assert!(matches!(
        result,
        Err(NexusError::SplitOutOfBalance { expected, actual }) if expected == d("300") && actual == d("5025")
    ));
}

#[tokio::test]
async fn test_oversized_client_values_are_rejected() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());
    let mut card = service.resolve_cards(USER, vec![]).await.unwrap().remove(0);
    card.balance = Decimal::MAX;

    let recommend = service.recommend(USER, vec![card], d("100"), None).await;
    assert!(matches!(recommend, Err(NexusError::InvalidInput(field, _)) if field == "balance"));

    let amount = service.recommend(USER, vec![], Decimal::MAX, None).await;
    assert!(matches!(amount, Err(NexusError::InvalidInput(field, _)) if field == "payment_amount"));

    let payment = service
        .execute_payment(USER, "chk", vec![line("visa", "79228162514264337593543950335")], as_of())
        .await;
    assert!(matches!(payment, Err(NexusError::InvalidInput(field, _)) if field == "split"));
    assert!(service.payment_history(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_execute_payment_is_simulated_and_recorded() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());

    let response = service
        .execute_payment(USER, "chk", vec![line("visa", "200"), line("amex", "100")], as_of())
        .await
        .unwrap();

    assert_eq!(response.payments.len(), 2);
    assert!(response.payments.iter().all(|p| p.status == "success"));
    assert!(response.payments.iter().all(|p| p.message == "Sandbox payment simulated"));
    assert!(response.warning.is_none());

    let history = service.payment_history(USER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, response.payment_id);
    assert_eq!(history[0].amount, d("300"));
    assert_eq!(history[0].funding_account_id, "chk");

    let logs = service.get_app_logs().await.unwrap();
    assert_eq!(logs.last().unwrap().action, PAYMENT_EXECUTED);
}

#[tokio::test]
async fn test_payment_above_ceiling_warns_but_proceeds() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());

    let response = service
        .execute_payment(USER, "sav", vec![line("visa", "4000")], as_of())
        .await
        .unwrap();

    let warning = response.warning.unwrap();
    assert_eq!(warning.requested, d("4000"));
    assert_eq!(warning.max_safe_payment, d("3700"));
    assert_eq!(service.payment_history(USER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_payment_needs_a_cash_funding_account() {
    let service = create_test_service(seeded_storage().await, StubOptimizer::default());

    for funding in ["nope", "visa"] {
        let result = service
            .execute_payment(USER, funding, vec![line("amex", "50")], as_of())
            .await;
        assert!(matches!(result, Err(NexusError::FundingAccountNotFound(id)) if id == funding));
    }
    let empty = service.execute_payment(USER, "chk", vec![], as_of()).await;
    assert!(matches!(empty, Err(NexusError::EmptySplit)));
    assert!(service.payment_history(USER).await.unwrap().is_empty());
}
