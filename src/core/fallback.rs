use crate::constants::{
    AVALANCHE_PLAN, DEFAULT_MINIMUM_PAYMENT, GOAL_MAXIMIZE_CREDIT_SCORE, SCORE_BOOSTER_PLAN,
};
use crate::core::models::recommendation::{
    CardAccount, PaymentPlan, PlanSplitItem, RecommendationResponse, UserContext,
};
use crate::core::money::round_cents;
use log::warn;
use rust_decimal::Decimal;

const MINIMUM_PAYMENT: &str = "Minimum Payment";
const POWER_PAYMENT: &str = "Power Payment";

/// Local plans served when the optimizer cannot be reached.
///
/// Every card gets its minimum payment and whatever is left goes to one target card:
/// the highest APR for the avalanche plan, the highest utilization for the score
/// booster. If the payment does not cover all minimums, cards are paid in target
/// order until it runs out.
pub fn fallback_recommendation(
    cards: &[CardAccount],
    payment_amount: Decimal,
    user_context: &UserContext,
) -> RecommendationResponse {
    warn!(
        "Building fallback plans for {} cards and payment {}",
        cards.len(),
        payment_amount
    );
    let cards: Vec<CardAccount> = cards.iter().cloned().map(CardAccount::normalized).collect();
    let payment_amount = round_cents(payment_amount.max(Decimal::ZERO));

    let by_apr = priority(&cards, |card| card.apr_or_default());
    let by_utilization = priority(&cards, utilization);

    let minimize_interest_plan = PaymentPlan {
        name: format!("{} (Fallback)", AVALANCHE_PLAN),
        split: allocate(&cards, &by_apr, payment_amount),
        explanation: by_apr.first().map(|&i| {
            format!(
                "Paying extra to your highest APR card ({}% APR) to minimize interest costs. AI service temporarily unavailable.",
                cards[i].apr_or_default()
            )
        }),
        projected_outcome: None,
    };
    let maximize_score_plan = PaymentPlan {
        name: format!("{} (Fallback)", SCORE_BOOSTER_PLAN),
        split: allocate(&cards, &by_utilization, payment_amount),
        explanation: by_utilization.first().map(|&i| {
            format!(
                "Paying extra to your highest utilization card ({}% utilization) to improve your credit score. AI service temporarily unavailable.",
                (utilization(&cards[i]) * Decimal::ONE_HUNDRED).round_dp(1)
            )
        }),
        projected_outcome: None,
    };

    let nexus_recommendation = if user_context.primary_goal == GOAL_MAXIMIZE_CREDIT_SCORE {
        maximize_score_plan.name.clone()
    } else {
        minimize_interest_plan.name.clone()
    };

    RecommendationResponse {
        nexus_recommendation: Some(nexus_recommendation),
        minimize_interest_plan,
        maximize_score_plan,
        fallback: true,
    }
}

fn minimum_payment(card: &CardAccount) -> Decimal {
    match card.minimum_payment {
        Some(minimum) if minimum > Decimal::ZERO => minimum,
        _ => DEFAULT_MINIMUM_PAYMENT,
    }
}

fn utilization(card: &CardAccount) -> Decimal {
    card.balance / card.credit_limit_or_default()
}

/// Card indices ordered by `key` descending, ties in input order.
fn priority(cards: &[CardAccount], key: impl Fn(&CardAccount) -> Decimal) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cards.len()).collect();
    order.sort_by(|&a, &b| key(&cards[b]).cmp(&key(&cards[a])));
    order
}

fn allocate(cards: &[CardAccount], order: &[usize], payment_amount: Decimal) -> Vec<PlanSplitItem> {
    let mut amounts = vec![Decimal::ZERO; cards.len()];
    let mut left = payment_amount;
    for &index in order {
        let pay = minimum_payment(&cards[index]).min(left);
        amounts[index] = pay;
        left -= pay;
    }
    if let Some(&target) = order.first() {
        amounts[target] += left;
    }

    cards
        .iter()
        .zip(amounts)
        .enumerate()
        .map(|(index, (card, amount))| PlanSplitItem {
            card_id: card.id.clone(),
            card_name: Some(card.name.clone()),
            amount: round_cents(amount),
            split_type: Some(
                if order.first() == Some(&index) {
                    POWER_PAYMENT
                } else {
                    MINIMUM_PAYMENT
                }
                .to_string(),
            ),
        })
        .collect()
}
