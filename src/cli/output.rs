//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::models::User;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a table of user accounts
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Create one with 'touchline create-admin <username>'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Active").fg(Color::Cyan),
            Cell::new("Last login").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for user in users {
        let active = if user.active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };

        let last_login = user
            .last_login
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        table.add_row(vec![
            Cell::new(&user.username),
            Cell::new(user.role.to_string()),
            active,
            Cell::new(last_login),
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
}
