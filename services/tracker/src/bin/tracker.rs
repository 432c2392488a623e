//! services/tracker/src/bin/tracker.rs

use expense_tracker_core::domain::Category;
use expense_tracker_core::validate::{ExpenseDraft, SignupForm};
use expense_tracker_core::view::CategoryFilter;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::{
    adapters::{FileStorage, HttpAuthGateway, HttpExpenseGateway},
    config::Config,
    coordinator::DeleteOutcome,
    error::ClientError,
    pages::{
        auth::{LoginResult, SignupResult},
        profile, AddPage, AuthPages, DashboardPage, EditorState, ListPage, ModifyPage, Route,
        SubmitResult,
    },
    session::SessionStore,
};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- 2. Build the HTTP Client and the Gateways ---
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|err| ClientError::Internal(err.to_string()))?;
    let auth_gateway = Arc::new(HttpAuthGateway::new(
        client.clone(),
        config.api_base_url.clone(),
    ));
    let expense_gateway = Arc::new(HttpExpenseGateway::new(client, config.api_base_url.clone()));

    // --- 3. Restore the Session ---
    let storage = Arc::new(FileStorage::new(config.session_path.clone()));
    let mut session = SessionStore::new(storage);
    let startup = session.initialize().await?;
    if startup.authenticated {
        let who = startup
            .user
            .as_ref()
            .and_then(|user| user.email.clone())
            .unwrap_or_else(|| "unknown user".to_string());
        info!("session restored for {}", who);
    }

    // --- 4. Dispatch the Subcommand ---
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");
    match command {
        "login" => {
            let pages = AuthPages::new(auth_gateway);
            match pages.login(&mut session, &arg(&args, 1), &arg(&args, 2)).await? {
                LoginResult::LoggedIn { navigate } => {
                    println!("Logged in. Continuing to {}.", route_name(navigate));
                }
                LoginResult::Notice(message) => println!("{}", message),
            }
        }
        "register" => {
            let pages = AuthPages::new(auth_gateway);
            let form = SignupForm {
                name: arg(&args, 1),
                email: arg(&args, 2),
                password: arg(&args, 3),
                confirm_password: arg(&args, 3),
                agreed_to_terms: true,
            };
            match pages.signup(&mut session, &form).await? {
                SignupResult::LoggedIn { navigate } => {
                    println!("Account created. Continuing to {}.", route_name(navigate));
                }
                SignupResult::Registered { message, navigate } => {
                    println!("{} Continuing to {}.", message, route_name(navigate));
                }
                SignupResult::Notice(message) => println!("{}", message),
            }
        }
        "logout" => {
            session.logout().await?;
            println!("Logged out.");
        }
        "dashboard" => {
            let page = DashboardPage::new(expense_gateway);
            let view = page.load(&session).await;
            if let Some(error) = &view.error {
                println!("{}", error);
            } else {
                println!(
                    "Total spent: ${:.2} across {} expenses (average ${:.2})",
                    view.stats.total, view.stats.count, view.stats.average
                );
                for expense in view.recent() {
                    println!(
                        "  {}  {}  [{}]  ${:.2}",
                        expense.date, expense.description, expense.category, expense.amount
                    );
                }
            }
        }
        "list" => {
            let raw_filter = args.get(1).cloned().unwrap_or_else(|| "all".to_string());
            let Some(filter) = CategoryFilter::parse(&raw_filter) else {
                println!("Unknown category '{}'.", raw_filter);
                return Ok(());
            };
            let page = ListPage::new(expense_gateway);
            let mut view = page.load(&session).await;
            view.filter = filter;
            view.search = arg(&args, 2);
            if let Some(error) = &view.error {
                println!("{}", error);
            } else {
                let visible = view.visible();
                if visible.is_empty() {
                    if view.expenses.is_empty() {
                        println!("You don't have any expenses yet.");
                    } else {
                        println!("No expenses match your filters.");
                    }
                }
                for expense in &visible {
                    println!(
                        "  {}  {}  {}  [{}]  ${:.2}",
                        expense.id, expense.date, expense.description, expense.category,
                        expense.amount
                    );
                }
            }
        }
        "add" => {
            let page = AddPage::new(expense_gateway);
            let date = args.get(4).cloned().unwrap_or_else(|| AddPage::default_draft().date);
            let draft = ExpenseDraft {
                description: arg(&args, 1),
                amount: arg(&args, 2),
                category: Category::parse(&arg(&args, 3)),
                date,
            };
            match page.submit(&session, &draft).await {
                SubmitResult::Saved { navigate } => {
                    println!("Expense added successfully. Continuing to {}.", route_name(navigate));
                }
                SubmitResult::Notice(message) => println!("{}", message),
            }
        }
        "update" => {
            let id = arg(&args, 1);
            let page = ModifyPage::new(expense_gateway);
            let buffer = match page.load(&session, &id).await {
                EditorState::Ready(buffer) => buffer,
                EditorState::NotFound => {
                    println!("Expense not found.");
                    return Ok(());
                }
                EditorState::Notice(message) => {
                    println!("{}", message);
                    return Ok(());
                }
            };
            // Positional edits; "-" keeps the stored value.
            let draft = ExpenseDraft {
                description: keep_or(args.get(2), buffer.description),
                amount: keep_or(args.get(3), buffer.amount),
                category: Category::parse(&keep_or(args.get(4), buffer.category)),
                date: keep_or(args.get(5), buffer.date),
            };
            match page.submit(&session, &id, &draft).await {
                SubmitResult::Saved { navigate } => {
                    println!("Expense updated. Continuing to {}.", route_name(navigate));
                }
                SubmitResult::Notice(message) => println!("{}", message),
            }
        }
        "delete" => {
            let id = arg(&args, 1);
            let page = ListPage::new(expense_gateway);
            let mut view = page.load(&session).await;
            if let Some(error) = view.error.take() {
                println!("{}", error);
                return Ok(());
            }
            match page.delete(&mut view, &id, &session).await {
                DeleteOutcome::Deleted => {
                    println!("Expense deleted. {} remaining.", view.expenses.len());
                }
                DeleteOutcome::RolledBack { message } | DeleteOutcome::Resynced { message } => {
                    println!("{}", message);
                }
            }
        }
        "profile" => {
            let view = profile::load(&session);
            println!("({}) {}", view.initial, view.name);
            println!("    {}", view.email);
        }
        _ => usage(),
    }

    Ok(())
}

fn arg(args: &[String], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default()
}

fn keep_or(edit: Option<&String>, current: String) -> String {
    match edit {
        Some(value) if value != "-" => value.clone(),
        _ => current,
    }
}

fn route_name(route: Route) -> &'static str {
    match route {
        Route::Login => "login",
        Route::Dashboard => "dashboard",
        Route::ViewExpenses => "view-expenses",
    }
}

fn usage() {
    println!("Usage: tracker <command> [args]");
    println!();
    println!("  login <email> <password>");
    println!("  register <name> <email> <password>");
    println!("  logout");
    println!("  dashboard");
    println!("  list [category|all] [search]");
    println!("  add <description> <amount> <category> [date]");
    println!("  update <id> [description] [amount] [category] [date]   (\"-\" keeps a value)");
    println!("  delete <id>");
    println!("  profile");
}
