use super::*;

fn test_client(base_url: &str) -> InvitesClient {
    InvitesClient::new(base_url, 30).expect("client construction should not fail")
}

#[test]
fn endpoint_appends_to_base_url() {
    let client = test_client("https://invites.example.com");
    let url = client.endpoint("api/validate-invitation");
    assert_eq!(
        url.as_str(),
        "https://invites.example.com/api/validate-invitation"
    );
}

#[test]
fn endpoint_handles_trailing_slash_in_base_url() {
    let client = test_client("https://invites.example.com/");
    let url = client.endpoint("api/mark-responded");
    assert_eq!(url.as_str(), "https://invites.example.com/api/mark-responded");
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = InvitesClient::new("not a url", 30);
    assert!(matches!(result, Err(InviteError::InvalidBaseUrl(_))));
}

#[test]
fn validate_body_omits_absent_fields() {
    let body = ValidateBody {
        token: "tok",
        product_id: None,
        shop: None,
    };
    let json = serde_json::to_value(&body).expect("serialize");
    assert_eq!(json, serde_json::json!({ "token": "tok" }));
}

#[test]
fn validate_body_uses_camel_case_product_id() {
    let body = ValidateBody {
        token: "tok",
        product_id: Some("prod-1"),
        shop: Some("store.example"),
    };
    let json = serde_json::to_value(&body).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({ "token": "tok", "productId": "prod-1", "shop": "store.example" })
    );
}
