use crate::constants::{BILL_LOOKBACK_DAYS, SAFETY_BUFFER};
use crate::core::models::account::{AccountSnapshot, TransactionSnapshot};
use crate::core::models::payment_context::{SafePaymentContext, UpcomingBill};
use crate::core::money::{round_cents, sum_amounts};
use chrono::{Days, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

const OTHER_BILLS: &str = "Other";

/// Computes how much a user can put toward card payments without dipping into
/// upcoming bills or the safety buffer.
pub fn compute_safe_context(
    accounts: &[AccountSnapshot],
    recent_transactions: &[TransactionSnapshot],
    as_of: NaiveDate,
) -> SafePaymentContext {
    let upcoming_bills = estimate_upcoming_bills(recent_transactions, as_of);
    build_context(accounts, upcoming_bills, Vec::new())
}

/// Same as [`compute_safe_context`] for when transaction history could not be read.
/// Bills count as zero and the reason is surfaced as a warning.
pub fn compute_safe_context_degraded(accounts: &[AccountSnapshot], reason: &str) -> SafePaymentContext {
    warn!("Upcoming bill estimate unavailable, assuming none: {}", reason);
    build_context(
        accounts,
        Vec::new(),
        vec![format!("Upcoming bills could not be estimated: {}", reason)],
    )
}

/// Averages recurring or bill-like spending of the trailing window per merchant.
pub fn estimate_upcoming_bills(transactions: &[TransactionSnapshot], as_of: NaiveDate) -> Vec<UpcomingBill> {
    let window_start = as_of
        .checked_sub_days(Days::new(BILL_LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (Decimal, u32)> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.date >= window_start && tx.date <= as_of)
        .filter(|tx| is_bill_candidate(tx))
    {
        let key = bill_group_key(tx);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (Decimal::ZERO, 0)
        });
        group.0 += tx.amount;
        group.1 += 1;
    }

    order
        .into_iter()
        .filter_map(|name| {
            let (total, count) = groups.remove(&name)?;
            Some(UpcomingBill {
                estimated_amount: round_cents(total / Decimal::from(count)),
                name,
            })
        })
        .collect()
}

fn is_bill_candidate(tx: &TransactionSnapshot) -> bool {
    tx.is_recurring
        || tx
            .category
            .as_deref()
            .is_some_and(|category| category.to_lowercase().contains("bill"))
}

fn bill_group_key(tx: &TransactionSnapshot) -> String {
    [tx.merchant.as_deref(), tx.category.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(OTHER_BILLS)
        .to_string()
}

fn build_context(
    accounts: &[AccountSnapshot],
    upcoming_bills: Vec<UpcomingBill>,
    warnings: Vec<String>,
) -> SafePaymentContext {
    let funding_accounts: Vec<AccountSnapshot> = accounts
        .iter()
        .filter(|acc| acc.account_type.is_funding_eligible())
        .cloned()
        .collect();
    let total_cash = sum_amounts(funding_accounts.iter().map(|acc| &acc.balance));
    let total_upcoming_bills = sum_amounts(upcoming_bills.iter().map(|bill| &bill.estimated_amount));
    let max_safe_payment = round_cents((total_cash - total_upcoming_bills - SAFETY_BUFFER).max(Decimal::ZERO));

    // Ties keep the earlier account.
    let recommended_funding_account_id = funding_accounts
        .iter()
        .fold(None::<&AccountSnapshot>, |best, acc| match best {
            Some(current) if current.balance >= acc.balance => Some(current),
            _ => Some(acc),
        })
        .map(|acc| acc.id.clone());

    debug!(
        "Safe payment context: cash {}, bills {} across {} groups, ceiling {}",
        total_cash,
        total_upcoming_bills,
        upcoming_bills.len(),
        max_safe_payment
    );

    SafePaymentContext {
        max_safe_payment,
        recommended_funding_account_id,
        funding_accounts,
        total_cash,
        total_upcoming_bills,
        upcoming_bills,
        safety_buffer: SAFETY_BUFFER,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::account::AccountType;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn account(id: &str, balance: &str, account_type: AccountType) -> AccountSnapshot {
        AccountSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            institution: None,
            balance: d(balance),
            account_type,
            apr: None,
            credit_limit: None,
            minimum_payment: None,
        }
    }

    fn tx(on: &str, amount: &str, merchant: Option<&str>, category: Option<&str>, recurring: bool) -> TransactionSnapshot {
        TransactionSnapshot {
            date: date(on),
            amount: d(amount),
            merchant: merchant.map(String::from),
            category: category.map(String::from),
            is_recurring: recurring,
        }
    }

    #[test]
    fn test_ceiling_is_cash_minus_bills_minus_buffer() {
        let _ = env_logger::try_init();
        let accounts = vec![
            account("chk", "3000", AccountType::Checking),
            account("sav", "2000", AccountType::Savings),
            account("visa", "1500", AccountType::Credit),
        ];
        let txs = vec![
            tx("2025-03-01", "500", Some("Landlord"), None, true),
            tx("2025-02-01", "500", Some("Landlord"), None, true),
            tx("2025-03-05", "300", None, Some("Utility Bills"), false),
        ];

        let ctx = compute_safe_context(&accounts, &txs, date("2025-03-10"));

        assert_eq!(ctx.total_cash, d("5000"));
        assert_eq!(ctx.total_upcoming_bills, d("800"));
        assert_eq!(ctx.safety_buffer, d("500"));
        assert_eq!(ctx.max_safe_payment, d("3700.00"));
        assert_eq!(ctx.funding_accounts.len(), 2);
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_ceiling_never_negative() {
        let accounts = vec![account("chk", "600", AccountType::Checking)];
        let txs = vec![tx("2025-03-01", "200", Some("Power Co"), None, true)];
        let ctx = compute_safe_context(&accounts, &txs, date("2025-03-10"));
        assert_eq!(ctx.max_safe_payment, Decimal::ZERO);
    }

    #[test]
    fn test_bills_grouped_by_merchant_then_category_then_other() {
        let txs = vec![
            tx("2025-03-01", "100", Some("Netflix"), Some("Subscription"), true),
            tx("2025-02-01", "50", Some("Netflix"), Some("Subscription"), true),
            tx("2025-03-02", "80", None, Some("Phone bill"), false),
            tx("2025-03-03", "40", Some("  "), None, true),
            tx("2025-03-04", "60", None, None, true),
        ];

        let bills = estimate_upcoming_bills(&txs, date("2025-03-10"));

        assert_eq!(
            bills,
            vec![
                UpcomingBill { name: "Netflix".to_string(), estimated_amount: d("75.00") },
                UpcomingBill { name: "Phone bill".to_string(), estimated_amount: d("80.00") },
                UpcomingBill { name: "Other".to_string(), estimated_amount: d("50.00") },
            ]
        );
    }

    #[test]
    fn test_bills_ignore_old_and_non_recurring_spending() {
        let txs = vec![
            tx("2024-12-01", "900", Some("Landlord"), None, true),
            tx("2025-03-01", "45", Some("Grocer"), Some("Food"), false),
            tx("2025-03-02", "30", Some("Gym"), Some("BILLS & fees"), false),
        ];
        let bills = estimate_upcoming_bills(&txs, date("2025-03-10"));
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].name, "Gym");
    }

    #[test]
    fn test_recommended_funding_account_prefers_richest_then_first() {
        let accounts = vec![
            account("visa", "9000", AccountType::Credit),
            account("chk", "1200", AccountType::Checking),
            account("dep", "2500", AccountType::Depository),
            account("sav", "2500", AccountType::Savings),
        ];
        let ctx = compute_safe_context(&accounts, &[], date("2025-03-10"));
        assert_eq!(ctx.recommended_funding_account_id.as_deref(), Some("dep"));
    }

    #[test]
    fn test_empty_accounts_give_zeroed_context() {
        let ctx = compute_safe_context(&[], &[], date("2025-03-10"));
        assert_eq!(ctx.total_cash, Decimal::ZERO);
        assert_eq!(ctx.max_safe_payment, Decimal::ZERO);
        assert_eq!(ctx.recommended_funding_account_id, None);
    }

    #[test]
    fn test_degraded_context_warns_and_skips_bills() {
        let accounts = vec![account("chk", "2000", AccountType::Checking)];
        let ctx = compute_safe_context_degraded(&accounts, "timeout");
        assert_eq!(ctx.total_upcoming_bills, Decimal::ZERO);
        assert_eq!(ctx.max_safe_payment, d("1500"));
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_check_payment_only_warns_above_ceiling() {
        let accounts = vec![account("chk", "2000", AccountType::Checking)];
        let ctx = compute_safe_context(&accounts, &[], date("2025-03-10"));
        assert!(ctx.check_payment(d("1500")).is_none());
        let warning = ctx.check_payment(d("1500.01")).unwrap();
        assert_eq!(warning.max_safe_payment, d("1500"));
    }
}
