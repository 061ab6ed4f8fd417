//! Transport selection.
//!
//! The deployable set of transports is closed: SendGrid, Resend, SMTP. One of
//! them is picked once at process start by [`select_transport`], a pure
//! precedence function over the present configuration — never per message.

use crate::error::{NotificationError, NotificationResult};
use crate::providers::{
    EmailContent, EmailProvider, ResendConfig, ResendProvider, SendGridConfig, SendGridProvider,
    SentEmail, SmtpConfig, SmtpProvider,
};
use async_trait::async_trait;
use core_config::{env_optional, env_or_default};
use tracing::info;

/// SMTP connection settings (complete when `host` is known).
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

/// Email configuration as found in the environment.
///
/// Each provider block is optional; precedence picks the first complete one.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// Default sender address.
    pub from_email: String,
    /// Default sender display name.
    pub from_name: String,
    /// SendGrid API key, when configured.
    pub sendgrid_api_key: Option<String>,
    /// Resend API key, when configured.
    pub resend_api_key: Option<String>,
    /// SMTP settings, when configured.
    pub smtp: Option<SmtpSettings>,
}

impl EmailSettings {
    /// Load settings from environment variables.
    ///
    /// Recognized variables: `EMAIL_FROM_ADDRESS`, `EMAIL_FROM_NAME`,
    /// `SENDGRID_API_KEY`, `RESEND_API_KEY`, `SMTP_HOST`, `SMTP_PORT`,
    /// `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_USE_TLS`.
    pub fn from_env() -> Self {
        let smtp = env_optional("SMTP_HOST").map(|host| SmtpSettings {
            host,
            port: env_or_default("SMTP_PORT", "587").parse().unwrap_or(587),
            username: env_optional("SMTP_USERNAME"),
            password: env_optional("SMTP_PASSWORD"),
            use_tls: env_or_default("SMTP_USE_TLS", "false")
                .parse()
                .unwrap_or(false),
        });

        Self {
            from_email: env_or_default("EMAIL_FROM_ADDRESS", "tickets@gatepass.local"),
            from_name: env_or_default("EMAIL_FROM_NAME", "Gatepass Tickets"),
            sendgrid_api_key: env_optional("SENDGRID_API_KEY"),
            resend_api_key: env_optional("RESEND_API_KEY"),
            smtp,
        }
    }
}

/// The closed set of deployable transports.
pub enum EmailTransport {
    SendGrid(SendGridProvider),
    Resend(ResendProvider),
    Smtp(SmtpProvider),
}

#[async_trait]
impl EmailProvider for EmailTransport {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        match self {
            EmailTransport::SendGrid(p) => p.send(email).await,
            EmailTransport::Resend(p) => p.send(email).await,
            EmailTransport::Smtp(p) => p.send(email).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            EmailTransport::SendGrid(p) => p.name(),
            EmailTransport::Resend(p) => p.name(),
            EmailTransport::Smtp(p) => p.name(),
        }
    }

    fn batch_size(&self) -> Option<usize> {
        match self {
            EmailTransport::SendGrid(p) => p.batch_size(),
            EmailTransport::Resend(p) => p.batch_size(),
            EmailTransport::Smtp(p) => p.batch_size(),
        }
    }
}

/// Pick the active transport by fixed precedence: SendGrid > Resend > SMTP.
///
/// Returns `Ok(None)` when no provider has complete configuration; the
/// mailer then reports `NoTransportConfigured` per dispatch while ticket
/// issuance itself keeps working.
pub fn select_transport(settings: &EmailSettings) -> NotificationResult<Option<EmailTransport>> {
    if let Some(api_key) = &settings.sendgrid_api_key {
        info!("Email transport selected: SendGrid");
        let config = SendGridConfig::new(
            api_key.clone(),
            settings.from_email.clone(),
            settings.from_name.clone(),
        );
        return Ok(Some(EmailTransport::SendGrid(SendGridProvider::new(config))));
    }

    if let Some(api_key) = &settings.resend_api_key {
        info!("Email transport selected: Resend");
        let config = ResendConfig::new(
            api_key.clone(),
            settings.from_email.clone(),
            settings.from_name.clone(),
        );
        return Ok(Some(EmailTransport::Resend(ResendProvider::new(config))));
    }

    if let Some(smtp) = &settings.smtp {
        info!(host = %smtp.host, port = smtp.port, "Email transport selected: SMTP");
        let mut config = SmtpConfig::new(
            smtp.host.clone(),
            smtp.port,
            settings.from_email.clone(),
            settings.from_name.clone(),
        )
        .with_tls(smtp.use_tls);
        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            config = config.with_credentials(username.clone(), password.clone());
        }
        return Ok(Some(EmailTransport::Smtp(SmtpProvider::new(config)?)));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            from_email: "tickets@example.com".to_string(),
            from_name: "Tickets".to_string(),
            sendgrid_api_key: None,
            resend_api_key: None,
            smtp: None,
        }
    }

    fn smtp_settings() -> SmtpSettings {
        SmtpSettings {
            host: "localhost".to_string(),
            port: 1025,
            username: None,
            password: None,
            use_tls: false,
        }
    }

    #[test]
    fn test_no_transport_configured() {
        let transport = select_transport(&settings()).unwrap();
        assert!(transport.is_none());
    }

    #[test]
    fn test_sendgrid_takes_precedence() {
        let mut s = settings();
        s.sendgrid_api_key = Some("SG.key".to_string());
        s.resend_api_key = Some("re_key".to_string());
        s.smtp = Some(smtp_settings());

        let transport = select_transport(&s).unwrap().unwrap();
        assert_eq!(transport.name(), "SendGrid");
        assert_eq!(transport.batch_size(), Some(100));
    }

    #[test]
    fn test_resend_beats_smtp() {
        let mut s = settings();
        s.resend_api_key = Some("re_key".to_string());
        s.smtp = Some(smtp_settings());

        let transport = select_transport(&s).unwrap().unwrap();
        assert_eq!(transport.name(), "Resend");
    }

    #[test]
    fn test_smtp_as_last_resort() {
        let mut s = settings();
        s.smtp = Some(smtp_settings());

        let transport = select_transport(&s).unwrap().unwrap();
        assert_eq!(transport.name(), "SMTP");
        assert_eq!(transport.batch_size(), None);
    }

    #[test]
    fn test_settings_from_env() {
        temp_env::with_vars(
            [
                ("SENDGRID_API_KEY", Some("SG.env-key")),
                ("RESEND_API_KEY", None),
                ("SMTP_HOST", Some("mail.internal")),
                ("SMTP_PORT", Some("2525")),
                ("EMAIL_FROM_ADDRESS", Some("noreply@example.com")),
            ],
            || {
                let settings = EmailSettings::from_env();
                assert_eq!(settings.sendgrid_api_key, Some("SG.env-key".to_string()));
                assert_eq!(settings.from_email, "noreply@example.com");
                let smtp = settings.smtp.unwrap();
                assert_eq!(smtp.host, "mail.internal");
                assert_eq!(smtp.port, 2525);
            },
        );
    }

    #[test]
    fn test_settings_from_env_empty_key_means_unset() {
        temp_env::with_vars(
            [
                ("SENDGRID_API_KEY", Some("")),
                ("RESEND_API_KEY", None::<&str>),
                ("SMTP_HOST", None),
            ],
            || {
                let settings = EmailSettings::from_env();
                assert!(settings.sendgrid_api_key.is_none());
                assert!(select_transport(&settings).unwrap().is_none());
            },
        );
    }
}
