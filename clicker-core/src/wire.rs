//! Request and response bodies of the balance service.
use serde::{Deserialize, Serialize};

pub const GET_BALANCE_PATH: &str = "/get-balance";
pub const ADD_CLICKS_PATH: &str = "/add-clicks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddClicksRequest {
    pub user_id: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddClicksResponse {
    pub new_balance: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_use_camel_case_keys() {
        let body = serde_json::to_value(AddClicksRequest {
            user_id: "u1".into(),
            clicks: 5,
        })
        .unwrap();
        assert_eq!(body, json!({"userId": "u1", "clicks": 5}));
        let body = serde_json::to_value(BalanceRequest {
            user_id: "u1".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"userId": "u1"}));
    }

    #[test]
    fn responses_ignore_extra_fields() {
        let parsed: AddClicksResponse =
            serde_json::from_str(r#"{"newBalance": 42, "ok": true}"#).unwrap();
        assert_eq!(parsed.new_balance, 42);
    }

    #[test]
    fn negative_or_fractional_balances_are_rejected() {
        assert!(serde_json::from_str::<BalanceResponse>(r#"{"balance": -3}"#).is_err());
        assert!(serde_json::from_str::<BalanceResponse>(r#"{"balance": 1.5}"#).is_err());
    }
}
