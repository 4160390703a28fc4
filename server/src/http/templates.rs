//! HTML rendering for the add-ticket page.

use axum::response::Html;
use std::fmt::Write;

use crate::tickets::Game;

/// What the add-ticket page should show above the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddTicketView<'a> {
    pub error: Option<&'a str>,
    pub success: bool,
}

impl<'a> AddTicketView<'a> {
    pub fn error(message: &'a str) -> Self {
        Self {
            error: Some(message),
            success: false,
        }
    }

    pub fn success() -> Self {
        Self {
            error: None,
            success: true,
        }
    }
}

/// Render the add-ticket page.
pub fn render_add_ticket(view: AddTicketView<'_>) -> Html<String> {
    let mut banner = String::new();
    if let Some(message) = view.error {
        let _ = write!(banner, r#"<p class="error">{}</p>"#, escape_html(message));
    }
    if view.success {
        banner.push_str(r#"<p class="success">Ticket saved.</p>"#);
    }

    let mut game_options = String::new();
    for game in [Game::Powerball, Game::MegaMillions] {
        let _ = write!(
            game_options,
            r#"<option value="{0}">{0}</option>"#,
            game.as_str()
        );
    }

    let mut white_inputs = String::new();
    for i in 1..=5 {
        let _ = write!(
            white_inputs,
            r#"<input type="number" name="white{i}" id="white{i}" aria-label="White ball {i}" required>"#
        );
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Add ticket</title>
</head>
<body>
<h1>Add ticket</h1>
{banner}
<form method="post" action="/tickets">
<label for="game">Game</label>
<select name="game" id="game">{game_options}</select>
<label for="draw_date">Draw date</label>
<input type="date" name="draw_date" id="draw_date" required>
<fieldset>
<legend>White balls</legend>
{white_inputs}
</fieldset>
<label for="special">Special ball</label>
<input type="number" name="special" id="special" required>
<button type="submit">Save ticket</button>
</form>
</body>
</html>
"#
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
