//! HTTP request handlers

use super::state::AppState;
use crate::query::Query;
use crate::records::{self, Record};
use axum::{
    extract::{Query as UrlQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;

/// Query parameters for the search form
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text search words
    pub q: Option<String>,
    /// Output format (html is the default; "json" for machine consumption)
    pub format: Option<String>,
}

/// Search results response for JSON format
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub characters: Vec<CharacterResponse>,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub code_point: u32,
    pub character: char,
    pub name: String,
}

/// Search form and results
pub async fn index(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<SearchParams>,
) -> Response {
    let raw = match params.q {
        Some(raw) => raw,
        None => return render_page(&state, Context::new()),
    };

    let query = Query::parse(&raw);
    let mut ctx = Context::new();
    ctx.insert("query", &raw);

    if query.is_empty() {
        ctx.insert("message", "word not found");
        return render_page(&state, ctx);
    }

    let matches: Result<Vec<Record>, _> =
        records::scan_matches(state.database.as_bytes(), query).collect();
    let matches = match matches {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!("database scan failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "database scan failed").into_response();
        }
    };

    if params.format.as_deref() == Some("json") {
        let response = SearchResponse {
            query: raw,
            count: matches.len(),
            characters: matches
                .into_iter()
                .map(|record| CharacterResponse {
                    code_point: record.code_point,
                    character: record.character(),
                    name: record.display_name(),
                })
                .collect(),
        };
        return Json(response).into_response();
    }

    let lines: Vec<String> = matches.iter().map(Record::to_string).collect();
    ctx.insert("summary", &records::match_summary(lines.len()));
    ctx.insert("results", &lines);
    render_page(&state, ctx)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

fn render_page(state: &AppState, ctx: Context) -> Response {
    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}
