use crate::models::Username;

pub const CREDENTIAL_KEY_PREFIX: &str = "user_";
pub const LEDGER_KEY_PREFIX: &str = "financeData_";

pub fn credential_key(username: &Username) -> String {
    format!("{CREDENTIAL_KEY_PREFIX}{username}")
}

pub fn ledger_key(username: &Username) -> String {
    format!("{LEDGER_KEY_PREFIX}{username}")
}
