use std::fmt::{Display, Write as _};

use chrono::TimeZone;

use crate::{
    api::data::NotificationRecord,
    format::{escape, format_time},
};

pub const EMPTY_STATE: &str = r#"<div class="empty-state">No notifications yet</div>"#;

/// Renders the full content of the list container.
pub fn render_list<Tz>(records: Option<&[NotificationRecord]>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let records = match records {
        Some(records) if !records.is_empty() => records,
        _ => return EMPTY_STATE.to_string(),
    };

    let mut out = String::new();
    for record in records {
        render_item(&mut out, record, tz);
    }
    out
}

fn render_item<Tz>(out: &mut String, record: &NotificationRecord, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let status = escape(&record.status);

    // writing into a String cannot fail
    let _ = write!(
        out,
        concat!(
            r#"<div class="notification-item">"#,
            r#"<div class="notification-header">"#,
            r#"<span class="notification-id">ID: {id}</span>"#,
            r#"<span class="status-badge status-{status}">{status}</span>"#,
            "</div>",
            r#"<div class="notification-message">{message}</div>"#,
            r#"<div class="notification-details">"#,
            r#"<div class="detail-item"><strong>Chat ID:</strong> {chat_id}</div>"#,
        ),
        id = escape(record.id.as_str()),
        status = status,
        message = escape(&record.message),
        chat_id = record.chat_id,
    );

    if !record.time.is_empty() {
        let _ = write!(
            out,
            r#"<div class="detail-item"><strong>Send Time:</strong> {}</div>"#,
            escape(&format_time(&record.time, tz)),
        );
    }

    out.push_str("</div></div>");
}
