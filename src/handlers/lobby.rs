// src/handlers/lobby.rs
use crate::storage::memory::ServerStorage;
use crate::utils::html_escape;
use actix_web::{web, HttpResponse};
use log::error;

static LOBBY_HTML: &str = include_str!("../templates/lobby.html");
static DOCS_HTML: &str = include_str!("../templates/docs.html");

/// Human-facing lobby: every online server, grouped by game. Offline
/// records stay hidden here; the JSON listings still carry them.
pub async fn show_lobby(storage: web::Data<ServerStorage>) -> HttpResponse {
    let servers = match storage.get_all() {
        Ok(servers) => servers,
        Err(e) => {
            error!("unable to read the server directory for the lobby: {}", e);
            return lobby_page(
                "<tr><td colspan='2'>Unable to read the server directory.</td></tr>",
            );
        }
    };

    let mut rows = String::new();
    let mut prev_game = "";

    for server in &servers {
        if server.status != "online" {
            continue;
        }

        // records arrive ordered by game, one heading per group
        if server.game != prev_game {
            rows.push_str(&format!(
                "<tr><td colspan='2' class='game'>{}</td></tr>\n",
                html_escape(&server.game)
            ));
            prev_game = &server.game;
        }

        let marker = if server.curplayers > 0 {
            "<span class='players-dot'></span>"
        } else {
            ""
        };
        rows.push_str(&format!(
            "<tr><td class='server'>{}</td><td class='players'>{}/{} {}</td></tr>\n",
            html_escape(&server.serverurl),
            server.curplayers,
            server.maxplayers,
            marker
        ));
    }

    if rows.is_empty() {
        rows = "<tr><td colspan='2'>No servers available.</td></tr>".to_string();
    }

    lobby_page(&rows)
}

fn lobby_page(rows: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LOBBY_HTML.replace("$SERVERS$", rows))
}

/// Static API documentation page.
pub async fn show_docs() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(DOCS_HTML)
}
