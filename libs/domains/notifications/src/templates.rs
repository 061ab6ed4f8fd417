//! Email template rendering engine.
//!
//! Handlebars-based rendering of the ticket email (HTML + plain text).

use crate::error::{NotificationError, NotificationResult};
use crate::models::TicketEmail;
use handlebars::Handlebars;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// HTML body content.
    pub html: String,
    /// Plain text body content.
    pub text: String,
    /// Email subject line.
    pub subject: String,
}

/// Template engine for rendering ticket emails.
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();

        handlebars
            .register_template_string("ticket_html", TICKET_HTML_TEMPLATE)
            .map_err(|e| {
                NotificationError::TemplateError(format!("Failed to register ticket_html: {}", e))
            })?;
        handlebars
            .register_template_string("ticket_text", TICKET_TEXT_TEMPLATE)
            .map_err(|e| {
                NotificationError::TemplateError(format!("Failed to register ticket_text: {}", e))
            })?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    /// Render the ticket email for one recipient.
    pub fn render_ticket(&self, ticket: &TicketEmail) -> NotificationResult<RenderedEmail> {
        debug!(to = %ticket.to_email, event = %ticket.event_title, "Rendering ticket email");

        let data = json!({
            "participant_name": ticket.to_name,
            "event_title": ticket.event_title,
            "event_date": ticket.event_starts_at.format("%B %d, %Y at %H:%M UTC").to_string(),
            "event_location": ticket.event_location,
            "qr_code": ticket.qr_code,
        });

        let html = self.handlebars.render("ticket_html", &data)?;
        let text = self.handlebars.render("ticket_text", &data)?;

        Ok(RenderedEmail {
            html,
            text,
            subject: format!("Your ticket for {}", ticket.event_title),
        })
    }
}

const TICKET_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Your Ticket</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background-color: #f4f4f5;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <tr>
      <td style="background-color: #ffffff; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
        <h1 style="color: #18181b; font-size: 24px; font-weight: 600; margin: 0 0 16px 0; text-align: center;">
          You're in, {{participant_name}}!
        </h1>
        <p style="color: #52525b; font-size: 16px; line-height: 24px; margin: 0 0 24px 0; text-align: center;">
          Here is your ticket for <strong>{{event_title}}</strong>.
        </p>
        <table width="100%" cellspacing="0" cellpadding="0" style="background-color: #fafafa; border-radius: 6px; margin-bottom: 24px;">
          <tr>
            <td style="padding: 16px 24px;">
              <p style="color: #18181b; font-size: 14px; margin: 0 0 4px 0;"><strong>When:</strong> {{event_date}}</p>
              <p style="color: #18181b; font-size: 14px; margin: 0;"><strong>Where:</strong> {{event_location}}</p>
            </td>
          </tr>
        </table>
        <table width="100%" cellspacing="0" cellpadding="0">
          <tr>
            <td style="text-align: center;">
              <img src="cid:ticket-qr" alt="Ticket QR code" width="240" height="240" style="display: inline-block;">
            </td>
          </tr>
        </table>
        <p style="color: #52525b; font-size: 14px; line-height: 20px; margin: 24px 0 0 0; text-align: center;">
          Show this QR code at the door. If the image does not display, quote this code instead:
        </p>
        <p style="color: #18181b; font-family: monospace; font-size: 13px; text-align: center; word-break: break-all; margin: 8px 0 0 0;">
          {{qr_code}}
        </p>
      </td>
    </tr>
    <tr>
      <td style="text-align: center; padding-top: 24px;">
        <p style="color: #a1a1aa; font-size: 12px; margin: 0;">
          This ticket admits one person and is valid for a single entry.
        </p>
      </td>
    </tr>
  </table>
</body>
</html>"#;

const TICKET_TEXT_TEMPLATE: &str = r#"You're in, {{participant_name}}!

Here is your ticket for {{event_title}}.

When:  {{event_date}}
Where: {{event_location}}

Your entry code (show the attached QR image or quote this code at the door):

{{qr_code}}

This ticket admits one person and is valid for a single entry."#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn ticket() -> TicketEmail {
        TicketEmail {
            to_email: "guest@example.com".to_string(),
            to_name: "Ada Lovelace".to_string(),
            ticket_id: Uuid::new_v4(),
            event_title: "RustConf 2026".to_string(),
            event_starts_at: Utc.with_ymd_and_hms(2026, 9, 12, 18, 30, 0).unwrap(),
            event_location: "Portland Convention Center".to_string(),
            qr_code: "QR-PAYLOAD-123".to_string(),
        }
    }

    #[test]
    fn test_render_ticket_contains_fields() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render_ticket(&ticket()).unwrap();

        assert_eq!(rendered.subject, "Your ticket for RustConf 2026");
        assert!(rendered.html.contains("Ada Lovelace"));
        assert!(rendered.html.contains("September 12, 2026 at 18:30 UTC"));
        assert!(rendered.html.contains("Portland Convention Center"));
        assert!(rendered.html.contains("QR-PAYLOAD-123"));
        assert!(rendered.html.contains("cid:ticket-qr"));
    }

    #[test]
    fn test_render_ticket_text_fallback() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render_ticket(&ticket()).unwrap();

        assert!(rendered.text.contains("QR-PAYLOAD-123"));
        assert!(rendered.text.contains("RustConf 2026"));
        assert!(!rendered.text.contains("<html"));
    }

    #[test]
    fn test_render_escapes_html() {
        let engine = TemplateEngine::new().unwrap();
        let mut t = ticket();
        t.to_name = "<script>alert(1)</script>".to_string();

        let rendered = engine.render_ticket(&t).unwrap();
        assert!(!rendered.html.contains("<script>"));
    }
}
