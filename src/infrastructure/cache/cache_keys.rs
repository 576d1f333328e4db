pub fn user_accounts_key(user_id: &str) -> String {
    format!("user:{}:accounts", user_id)
}
