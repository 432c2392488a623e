//! crates/expense_tracker_core/src/policy.rs
//!
//! Response-classification rules. The remote API does not guarantee a
//! canonical success shape on every endpoint, so the rules for reading a
//! response live here as ordered predicates, out of the gateway code,
//! where their precedence can be tested in isolation.

use serde_json::Value;

use crate::domain::{Registration, User};
use crate::ports::GatewayResponse;

/// JSON truthiness as the pages judge it: null, false, zero and the empty
/// string are falsy, everything else truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| is_truthy(v))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//=========================================================================================
// Error-message precedence
//=========================================================================================

/// Extracts a user-facing message from a failed response body.
///
/// Precedence: field-level `errors` map (entries joined), then `detail`
/// (prefixed with `title` when present), then `message`, then `error`,
/// then the body itself when it was plain text, then a status fallback.
pub fn error_message(body: Option<&Value>, status: u16) -> String {
    if let Some(body) = body {
        if let Some(Value::Object(map)) = body.get("errors") {
            if !map.is_empty() {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(field, value)| {
                        let joined = match value {
                            Value::Array(items) => items
                                .iter()
                                .map(value_text)
                                .collect::<Vec<_>>()
                                .join(", "),
                            other => value_text(other),
                        };
                        format!("{}: {}", field, joined)
                    })
                    .collect();
                return parts.join(" • ");
            }
        }
        if let Some(detail) = body.get("detail").and_then(Value::as_str) {
            return match body.get("title").and_then(Value::as_str) {
                Some(title) => format!("{} — {}", title, detail),
                None => detail.to_string(),
            };
        }
        if let Some(message) = body.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
        if let Value::String(text) = body {
            if !text.trim().is_empty() {
                return text.clone();
            }
        }
    }
    format!("Request failed ({})", status)
}

//=========================================================================================
// Create and update acceptance
//=========================================================================================

/// Body markers that count as a created record, checked in order.
const CREATE_MARKERS: [&str; 3] = ["id", "success", "created"];

/// Relaxed acceptance for the diagnostics create path: the record counts
/// as created when HTTP succeeded, or when the body carries a truthy
/// marker even though the status says otherwise. Tolerates APIs that
/// signal success through the body rather than a strict status code.
pub fn raw_create_accepted(response: &GatewayResponse) -> bool {
    if response.succeeded {
        return true;
    }
    response
        .body
        .as_ref()
        .map(|body| CREATE_MARKERS.iter().any(|key| truthy_field(body, key).is_some()))
        .unwrap_or(false)
}

/// Outcome of classifying an update response body.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateVerdict {
    Accepted,
    Rejected(String),
}

/// The lenient update policy.
///
/// The update endpoint has no canonical success shape, so a body without
/// an error marker counts as success. Rules, in order:
/// 1. no body at all is rejected,
/// 2. a truthy `id` or `success` is accepted,
/// 3. a truthy `error` is rejected with that text,
/// 4. everything else, ambiguous bodies included, is accepted.
pub fn judge_update_body(body: Option<&Value>) -> UpdateVerdict {
    let Some(body) = body else {
        return UpdateVerdict::Rejected("No response from server.".to_string());
    };
    if truthy_field(body, "id").is_some() || truthy_field(body, "success").is_some() {
        return UpdateVerdict::Accepted;
    }
    if let Some(error) = truthy_field(body, "error") {
        return UpdateVerdict::Rejected(value_text(error));
    }
    UpdateVerdict::Accepted
}

//=========================================================================================
// Auth response classification
//=========================================================================================

/// What an auth response means for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Token and user are available; the caller should open a session.
    LoggedIn { token: String, user: User },
    /// The account was created but the API did not auto-login.
    Registered { message: String },
    /// The request failed; the message is ready for the inline notice.
    Failed { message: String },
}

/// Login succeeds exactly when HTTP succeeded and the body carries a
/// token. A missing user record falls back to a profile holding just the
/// submitted email.
pub fn read_login_response(response: &GatewayResponse, submitted_email: &str) -> AuthOutcome {
    if let Some((token, body)) = token_of(response) {
        let user = user_of(body).unwrap_or(User {
            id: None,
            name: None,
            email: Some(submitted_email.to_string()),
        });
        return AuthOutcome::LoggedIn { token, user };
    }
    AuthOutcome::Failed {
        message: auth_failure_message(response, "Login failed"),
    }
}

/// Registration additionally recognizes the "registered but no
/// auto-login" shape: HTTP success with a message and no token.
pub fn read_register_response(response: &GatewayResponse, submitted: &Registration) -> AuthOutcome {
    if let Some((token, body)) = token_of(response) {
        let user = user_of(body).unwrap_or_else(|| User {
            id: None,
            name: Some(
                body.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(&submitted.name)
                    .to_string(),
            ),
            email: Some(
                body.get("email")
                    .and_then(Value::as_str)
                    .unwrap_or(&submitted.email)
                    .to_string(),
            ),
        });
        return AuthOutcome::LoggedIn { token, user };
    }
    if response.succeeded {
        if let Some(message) = response
            .body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
        {
            return AuthOutcome::Registered {
                message: message.to_string(),
            };
        }
    }
    AuthOutcome::Failed {
        message: auth_failure_message(response, "Registration failed"),
    }
}

/// Returns the token together with the body it came from.
fn token_of(response: &GatewayResponse) -> Option<(String, &Value)> {
    if !response.succeeded {
        return None;
    }
    let body = response.body.as_ref()?;
    let token = truthy_field(body, "token")?.as_str()?;
    Some((token.to_string(), body))
}

fn user_of(body: &Value) -> Option<User> {
    body.get("user")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// Auth failures read `message`, then `error`, then fall back to the
/// operation label with the status.
fn auth_failure_message(response: &GatewayResponse, label: &str) -> String {
    if let Some(body) = &response.body {
        if let Some(message) = body.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
    }
    format!("{} ({})", label, response.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Headers;
    use serde_json::json;

    fn response(succeeded: bool, status: u16, body: Option<Value>) -> GatewayResponse {
        GatewayResponse {
            succeeded,
            status,
            raw: body.as_ref().map(|b| b.to_string()),
            body,
            headers: Headers::new(),
        }
    }

    #[test]
    fn truthiness_matches_the_pages() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(5)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn error_message_precedence() {
        let errors = json!({ "errors": { "amount": ["must be positive", "too small"] }, "message": "ignored" });
        assert_eq!(error_message(Some(&errors), 400), "amount: must be positive, too small");

        let detail = json!({ "title": "Bad Request", "detail": "amount missing" });
        assert_eq!(error_message(Some(&detail), 400), "Bad Request — amount missing");

        let detail_only = json!({ "detail": "amount missing" });
        assert_eq!(error_message(Some(&detail_only), 400), "amount missing");

        let message = json!({ "message": "not found" });
        assert_eq!(error_message(Some(&message), 404), "not found");

        let error = json!({ "error": "boom" });
        assert_eq!(error_message(Some(&error), 500), "boom");

        let text = json!("upstream timeout");
        assert_eq!(error_message(Some(&text), 504), "upstream timeout");

        assert_eq!(error_message(None, 502), "Request failed (502)");
        assert_eq!(error_message(Some(&json!({})), 500), "Request failed (500)");
    }

    #[test]
    fn raw_create_accepts_body_markers_despite_status() {
        let rejected_status = response(false, 422, Some(json!({ "id": 5 })));
        assert!(raw_create_accepted(&rejected_status));

        let created = response(true, 201, Some(json!({ "id": 5 })));
        assert!(raw_create_accepted(&created));

        let falsy_marker = response(false, 400, Some(json!({ "success": false })));
        assert!(!raw_create_accepted(&falsy_marker));

        let no_body = response(false, 500, None);
        assert!(!raw_create_accepted(&no_body));
    }

    #[test]
    fn update_policy_is_lenient() {
        assert_eq!(
            judge_update_body(None),
            UpdateVerdict::Rejected("No response from server.".to_string())
        );
        assert_eq!(judge_update_body(Some(&json!({ "success": true }))), UpdateVerdict::Accepted);
        assert_eq!(judge_update_body(Some(&json!({ "id": 9 }))), UpdateVerdict::Accepted);
        assert_eq!(
            judge_update_body(Some(&json!({ "error": "stale record" }))),
            UpdateVerdict::Rejected("stale record".to_string())
        );
        // Ambiguous bodies classify as success, deliberately.
        assert_eq!(judge_update_body(Some(&json!({}))), UpdateVerdict::Accepted);
        assert_eq!(
            judge_update_body(Some(&json!({ "message": "anything" }))),
            UpdateVerdict::Accepted
        );
        // A falsy id does not rescue a body with a real error.
        assert_eq!(
            judge_update_body(Some(&json!({ "id": 0, "error": "nope" }))),
            UpdateVerdict::Rejected("nope".to_string())
        );
    }

    #[test]
    fn login_requires_ok_and_token() {
        let ok = response(true, 200, Some(json!({ "token": "t", "user": { "id": 3, "email": "a@b.c" } })));
        match read_login_response(&ok, "a@b.c") {
            AuthOutcome::LoggedIn { token, user } => {
                assert_eq!(token, "t");
                assert_eq!(user.id.as_deref(), Some("3"));
            }
            other => panic!("expected LoggedIn, got {:?}", other),
        }

        let missing_user = response(true, 200, Some(json!({ "token": "t" })));
        match read_login_response(&missing_user, "a@b.c") {
            AuthOutcome::LoggedIn { user, .. } => assert_eq!(user.email.as_deref(), Some("a@b.c")),
            other => panic!("expected LoggedIn, got {:?}", other),
        }

        let no_token = response(true, 200, Some(json!({ "message": "mfa required" })));
        assert_eq!(
            read_login_response(&no_token, "a@b.c"),
            AuthOutcome::Failed { message: "mfa required".to_string() }
        );

        let denied = response(false, 401, Some(json!({ "error": "bad credentials" })));
        assert_eq!(
            read_login_response(&denied, "a@b.c"),
            AuthOutcome::Failed { message: "bad credentials".to_string() }
        );

        let opaque = response(false, 500, None);
        assert_eq!(
            read_login_response(&opaque, "a@b.c"),
            AuthOutcome::Failed { message: "Login failed (500)".to_string() }
        );
    }

    #[test]
    fn register_recognizes_message_only_success() {
        let submitted = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };

        let auto_login = response(true, 201, Some(json!({ "token": "t" })));
        match read_register_response(&auto_login, &submitted) {
            AuthOutcome::LoggedIn { user, .. } => {
                assert_eq!(user.name.as_deref(), Some("Ada"));
                assert_eq!(user.email.as_deref(), Some("ada@example.com"));
            }
            other => panic!("expected LoggedIn, got {:?}", other),
        }

        let message_only = response(true, 201, Some(json!({ "message": "check your inbox" })));
        assert_eq!(
            read_register_response(&message_only, &submitted),
            AuthOutcome::Registered { message: "check your inbox".to_string() }
        );

        let rejected = response(false, 409, Some(json!({ "message": "email taken" })));
        assert_eq!(
            read_register_response(&rejected, &submitted),
            AuthOutcome::Failed { message: "email taken".to_string() }
        );

        let opaque = response(false, 500, None);
        assert_eq!(
            read_register_response(&opaque, &submitted),
            AuthOutcome::Failed { message: "Registration failed (500)".to_string() }
        );
    }
}
