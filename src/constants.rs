use rust_decimal::Decimal;

// Action names recorded through the logging service
pub const PAYMENT_CONTEXT_COMPUTED: &str = "PAYMENT_CONTEXT_COMPUTED";
pub const RECOMMENDATION_REQUESTED: &str = "RECOMMENDATION_REQUESTED";
pub const RECOMMENDATION_FALLBACK: &str = "RECOMMENDATION_FALLBACK";
pub const SPLIT_CREATED: &str = "SPLIT_CREATED";
pub const SPLIT_REDISTRIBUTED: &str = "SPLIT_REDISTRIBUTED";
pub const SPLIT_RESET: &str = "SPLIT_RESET";
pub const SPLIT_RE_EXPLAINED: &str = "SPLIT_RE_EXPLAINED";
pub const PAYMENT_EXECUTED: &str = "PAYMENT_EXECUTED";

/// Cash held back from the safe payment ceiling (500.00).
pub const SAFETY_BUFFER: Decimal = Decimal::from_parts(50_000, 0, 0, false, 2);

/// Trailing window, in days, used to spot recurring bills.
pub const BILL_LOOKBACK_DAYS: u64 = 60;

/// How long an account snapshot may be served from cache.
pub const ACCOUNT_CACHE_TTL_SECS: u64 = 1800;

/// Minimum payment assumed for a card that reports none (25.00).
pub const DEFAULT_MINIMUM_PAYMENT: Decimal = Decimal::from_parts(2_500, 0, 0, false, 2);

/// APR assumed for a card that reports none (15.0).
pub const DEFAULT_APR: Decimal = Decimal::from_parts(150, 0, 0, false, 1);

/// Credit limit assumed for a card that reports none.
pub const DEFAULT_CREDIT_LIMIT: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);

pub const AVALANCHE_PLAN: &str = "Avalanche Method";
pub const SCORE_BOOSTER_PLAN: &str = "Credit Score Booster";
pub const GOAL_MAXIMIZE_CREDIT_SCORE: &str = "MAXIMIZE_CREDIT_SCORE";
