//! crates/expense_tracker_core/src/validate.rs
//!
//! Form validation. Checks run in the order the pages present them and
//! short-circuit on the first failure, before anything touches the
//! network. Messages are the exact strings the inline notices render.

use crate::domain::{Category, Credentials, ExpensePayload, Registration, User};

/// Raw form input for the add and modify expense pages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub category: Option<Category>,
    pub date: String,
}

/// Validates the add-expense form: description, then a positive amount,
/// then category, then date. The payload carries the session user's id as
/// the owner, `"0"` when there is none.
pub fn validate_create(draft: &ExpenseDraft, owner: Option<&User>) -> Result<ExpensePayload, String> {
    let description = draft.description.trim();
    if description.is_empty() {
        return Err("Description is required.".to_string());
    }
    let amount: f64 = match draft.amount.trim().parse() {
        Ok(value) if value > 0.0 => value,
        _ => return Err("Please enter a valid amount greater than 0.".to_string()),
    };
    let Some(category) = draft.category else {
        return Err("Please select a category.".to_string());
    };
    if draft.date.trim().is_empty() {
        return Err("Please select a date.".to_string());
    }
    Ok(ExpensePayload {
        description: description.to_string(),
        amount,
        category,
        date: draft.date.clone(),
        owner_id: Some(owner.map(User::owner_id).unwrap_or_else(|| "0".to_string())),
    })
}

/// Validates the modify-expense form. Same order as create, but the
/// amount only has to be non-negative and no owner is attached: update is
/// a full in-place replace.
pub fn validate_update(draft: &ExpenseDraft) -> Result<ExpensePayload, String> {
    let description = draft.description.trim();
    if description.is_empty() {
        return Err("Description is required.".to_string());
    }
    let amount: f64 = match draft.amount.trim().parse() {
        Ok(value) if value >= 0.0 => value,
        _ => return Err("Please enter a valid amount.".to_string()),
    };
    let Some(category) = draft.category else {
        return Err("Please select a category.".to_string());
    };
    if draft.date.trim().is_empty() {
        return Err("Please select a date.".to_string());
    }
    Ok(ExpensePayload {
        description: description.to_string(),
        amount,
        category,
        date: draft.date.clone(),
        owner_id: None,
    })
}

/// The login form only insists that both fields are present.
pub fn validate_login(email: &str, password: &str) -> Result<Credentials, String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Please provide both email and password.".to_string());
    }
    Ok(Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Raw form input for the signup page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agreed_to_terms: bool,
}

/// Validates the signup form: name, then email, then password length,
/// then the confirmation match, then the terms checkbox.
pub fn validate_signup(form: &SignupForm) -> Result<Registration, String> {
    if form.name.trim().is_empty() {
        return Err("Please enter your full name.".to_string());
    }
    if form.email.trim().is_empty() {
        return Err("Please enter your email.".to_string());
    }
    if form.password.chars().count() < 6 {
        return Err("Password should be at least 6 characters long.".to_string());
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    if !form.agreed_to_terms {
        return Err("You must agree to the Terms of Service and Privacy Policy.".to_string());
    }
    Ok(Registration {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    })
}

/// The signup page's strength meter: one point each for a non-empty
/// password, length eight or more, an uppercase letter, a digit and a
/// symbol, capped at four.
pub fn password_strength(password: &str) -> u8 {
    let mut strength = 0;
    if !password.is_empty() {
        strength += 1;
    }
    if password.chars().count() >= 8 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 1;
    }
    strength.min(4)
}
