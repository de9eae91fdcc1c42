//! Server-rendered HTML pages. Plain string building; every user-supplied
//! value goes through [`escape`].

use std::fmt::Write as _;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use service::{account::domain::Account, track::domain::Track, validation::FieldError};

use crate::csrf::CSRF_FIELD;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn field_errors(errors: &[FieldError], field: &str) -> String {
    let items: String = errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| format!("<li>{}</li>", escape(&e.message)))
        .collect();
    if items.is_empty() { String::new() } else { format!("<ul class=\"errors\">{items}</ul>") }
}

fn input(label: &str, name: &str, kind: &str, errors: &[FieldError]) -> String {
    format!(
        "<p><label for=\"{name}\">{label}</label> <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" required>{}</p>",
        field_errors(errors, name)
    )
}

fn csrf_input(token: &str) -> String {
    format!("<input type=\"hidden\" name=\"{CSRF_FIELD}\" value=\"{}\">", escape(token))
}

pub fn register_page(csrf_token: &str, errors: &[FieldError]) -> String {
    let mut body = String::from("<h1>Register</h1>\n");
    body.push_str(&field_errors(errors, "form"));
    body.push_str("<form method=\"post\" action=\"/register\">");
    body.push_str(&csrf_input(csrf_token));
    body.push_str(&input("Username", "username", "text", errors));
    body.push_str(&input("Email", "email", "email", errors));
    body.push_str(&input("Password", "password", "password", errors));
    body.push_str(&input("Confirm Password", "confirm_password", "password", errors));
    body.push_str("<p><button type=\"submit\">Sign Up</button></p></form>\n");
    body.push_str("<p>Already registered? <a href=\"/login\">Log in</a></p>");
    layout("Register", &body)
}

pub fn login_page(csrf_token: &str, errors: &[FieldError]) -> String {
    let mut body = String::from("<h1>Login</h1>\n");
    body.push_str(&field_errors(errors, "form"));
    body.push_str("<form method=\"post\" action=\"/login\">");
    body.push_str(&csrf_input(csrf_token));
    body.push_str(&input("Email", "email", "email", errors));
    body.push_str(&input("Password", "password", "password", errors));
    body.push_str("<p><button type=\"submit\">Login</button></p></form>\n");
    body.push_str("<p>No account yet? <a href=\"/register\">Register</a></p>");
    layout("Login", &body)
}

pub fn account_page(account: &Account, own: bool) -> String {
    let mut body = format!("<h1>{}</h1>\n<p>Email: {}</p>\n", escape(&account.username), escape(&account.email));
    if let Some(picture) = &account.picture {
        let _ = writeln!(body, "<img alt=\"profile picture\" src=\"data:image/*;base64,{}\">", STANDARD.encode(picture));
    }
    if own {
        body.push_str("<p><a href=\"/logout\">Logout</a></p>");
    }
    layout(&account.username, &body)
}

pub fn index_page() -> String {
    layout("Tracks", "<p>Hello, World!</p>")
}

pub fn track_list_page(tracks: &[Track]) -> String {
    let mut body = String::from("<h1>Tracks</h1>\n<ul>\n");
    for t in tracks {
        let _ = writeln!(body, "<li><a href=\"/tracks/{}\">{} - {} by {}</a></li>", t.id, t.id, escape(&t.name), escape(&t.artist));
    }
    body.push_str("</ul>");
    layout("Tracks", &body)
}

pub fn track_page(track: &Track) -> String {
    let mut body = format!("<h1>{}</h1>\n<p>by {}</p>\n", escape(&track.name), escape(&track.artist));
    if let Some(date) = track.release_date {
        let _ = writeln!(body, "<p>Released {}</p>", date.format("%Y-%m-%d"));
    }
    if let Some(cover) = &track.cover {
        let _ = writeln!(body, "<img alt=\"cover\" src=\"data:image/*;base64,{}\">", STANDARD.encode(cover));
    }
    let _ = write!(body, "<p>{} bytes</p>", track.data.len());
    layout(&track.name, &body)
}

pub fn track_added_page(track: &Track) -> String {
    layout("Added", &format!("<p>Added: {} by {}</p>", escape(&track.name), escape(&track.artist)))
}

pub fn track_deleted_page(track: &Track) -> String {
    layout("Deleted", &format!("<p>Deleted: {} - {} by {}</p>", track.id, escape(&track.name), escape(&track.artist)))
}

pub fn tracks_cleared_page(count: u64) -> String {
    layout("Deleted", &format!("<p>Deleted all tracks ({count})</p>"))
}

pub fn playlist_page() -> String {
    layout("Playlist", "<p>Hello, world!</p>")
}

pub fn error_page(status: StatusCode, title: &str, message: &str) -> String {
    layout(title, &format!("<h1>{} {}</h1>\n<p>{}</p>", status.as_u16(), escape(title), escape(message)))
}
