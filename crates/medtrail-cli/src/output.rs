//! Rendering of contract responses.

use anyhow::Result;
use colored::Colorize;
use medtrail_audit::{ErrorCode, Event, EventId, Response};
use serde::Serialize;

use crate::theme::Theme;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable, colored.
    Pretty,
    /// `{"ok": ...}` / `{"err": code}` on one line.
    Json,
}

/// Short label for an error code.
pub(crate) fn code_label(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Unauthorized => "unauthorized",
        ErrorCode::NotFound => "not found",
        ErrorCode::InvalidInput => "invalid input",
    }
}

/// Serialize a response as single-line JSON.
pub(crate) fn render_json<T: Serialize>(response: &Response<T>) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

fn render_err(code: ErrorCode) -> String {
    Theme::error(&format!("error {code} ({})", code_label(code)))
}

/// Pretty rendering of a `record` response.
pub(crate) fn render_recorded(response: &Response<EventId>) -> String {
    match response {
        Response::Ok(id) => Theme::success(&format!("recorded event {id}")),
        Response::Err(code) => render_err(*code),
    }
}

/// Pretty rendering of a `fetch` response.
pub(crate) fn render_event(id: EventId, response: &Response<Event>) -> String {
    let event = match response {
        Response::Ok(event) => event,
        Response::Err(code) => return render_err(*code),
    };

    let timestamp = event
        .timestamp
        .to_datetime()
        .map_or_else(|| event.timestamp.to_string(), |dt| dt.to_rfc3339());

    let mut lines = vec![
        Theme::header(&format!("Event {id}")),
        Theme::separator(),
        format!("{:>12}  {}", "type".dimmed(), event.event_type.bold()),
        format!("{:>12}  {}", "resource".dimmed(), event.resource_id),
        format!(
            "{:>12}  {}",
            "actor".dimmed(),
            Theme::principal(event.actor.as_str())
        ),
        format!("{:>12}  {timestamp}", "time".dimmed()),
    ];
    if let Some(detail) = &event.detail {
        lines.push(format!("{:>12}  {detail}", "detail".dimmed()));
    }
    lines.join("\n")
}

/// Pretty rendering of the event count.
pub(crate) fn render_count(count: u64) -> String {
    match count {
        0 => Theme::info("no events recorded"),
        1 => Theme::info("1 event recorded"),
        n => Theme::info(&format!("{n} events recorded")),
    }
}
