use crate::config::MailConfig;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build mail message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outcome of a watch check, as reported to the user.
///
/// The display forms are embedded in mail subjects and bodies; their exact
/// wording is part of the user-facing contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchStatus {
    FetchFailed { detail: String },
    NoElements { selector: String },
    NoPreviousState,
    Changed,
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchStatus::FetchFailed { detail } => {
                write!(f, "problem fetching website - {detail}")
            }
            WatchStatus::NoElements { selector } => {
                write!(f, "no elements for selector '{selector}'")
            }
            WatchStatus::NoPreviousState => write!(f, "no previous state"),
            WatchStatus::Changed => write!(f, "change"),
        }
    }
}

pub fn subject(status: &WatchStatus, label: &str) -> String {
    format!("webwatch - {status} - {label}")
}

pub fn body(status: &WatchStatus, label: &str, url: &str) -> String {
    format!("webwatch result - status is '{status}' for '{label}'\nchecked URL: {url}\n")
}

/// The notification channel. One implementation sends mail over SMTP, the
/// other prints the would-be message to stdout (dry-run mode).
pub trait Notify {
    fn notify(&mut self, status: &WatchStatus, label: &str, url: &str) -> Result<(), NotifyError>;
}

/// Sends notifications over SMTP.
///
/// The transport is built once and reused for every notification in a run;
/// it is dropped when the run ends.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    sender: Mailbox,
    receiver: Mailbox,
}

impl SmtpNotifier {
    pub fn new(mail: &MailConfig) -> Result<Self, NotifyError> {
        let sender: Mailbox = mail.sender.parse()?;
        let receiver: Mailbox = mail.receiver.parse()?;

        // Plain SMTP to the configured host, as used for a local relay.
        let transport = SmtpTransport::builder_dangerous(&mail.smtp_host)
            .port(mail.smtp_port)
            .build();

        Ok(SmtpNotifier {
            transport,
            sender,
            receiver,
        })
    }
}

impl Notify for SmtpNotifier {
    fn notify(&mut self, status: &WatchStatus, label: &str, url: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.receiver.clone())
            .subject(subject(status, label))
            .body(body(status, label, url))?;

        self.transport.send(&message)?;
        Ok(())
    }
}

/// Dry-run notifier: prints the would-be mail to stdout instead of sending.
pub struct StdoutNotifier {
    sender: String,
    receiver: String,
}

impl StdoutNotifier {
    pub fn new(mail: &MailConfig) -> Self {
        StdoutNotifier {
            sender: mail.sender.clone(),
            receiver: mail.receiver.clone(),
        }
    }
}

impl Notify for StdoutNotifier {
    fn notify(&mut self, status: &WatchStatus, label: &str, url: &str) -> Result<(), NotifyError> {
        println!("- would send mail -");
        println!("sender: {}", self.sender);
        println!("receiver: {}", self.receiver);
        println!("subject: {}", subject(status, label));
        println!("message:");
        println!("{}", body(status, label, url));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_embeds_status_and_label() {
        assert_eq!(
            subject(&WatchStatus::Changed, "spiegel"),
            "webwatch - change - spiegel"
        );
    }

    #[test]
    fn test_body_names_status_label_and_url() {
        let body = body(
            &WatchStatus::NoPreviousState,
            "spiegel",
            "https://www.spiegel.de/",
        );
        assert_eq!(
            body,
            "webwatch result - status is 'no previous state' for 'spiegel'\n\
             checked URL: https://www.spiegel.de/\n"
        );
    }

    #[test]
    fn test_fetch_failed_status_embeds_detail() {
        let status = WatchStatus::FetchFailed {
            detail: "HTTP status code '503'".to_string(),
        };
        assert_eq!(
            status.to_string(),
            "problem fetching website - HTTP status code '503'"
        );
    }

    #[test]
    fn test_no_elements_status_names_the_selector() {
        let status = WatchStatus::NoElements {
            selector: "div.teaser".to_string(),
        };
        assert_eq!(status.to_string(), "no elements for selector 'div.teaser'");
    }

    #[test]
    fn test_smtp_notifier_rejects_invalid_sender() {
        let mail = MailConfig {
            sender: "not an address".to_string(),
            ..MailConfig::default()
        };

        assert!(matches!(
            SmtpNotifier::new(&mail),
            Err(NotifyError::Address(_))
        ));
    }
}
