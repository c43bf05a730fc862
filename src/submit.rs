use chrono::TimeZone;

use crate::{
    api::data::{Draft, NotificationId},
    format::local_instant,
};

/// Raw values of the creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Form {
    pub chat_id: String,
    pub message: String,
    pub time: String,
}

impl Form {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("chat id must be an integer, got '{0}'")]
    InvalidChatId(String),

    #[error("send time is not a valid date and time: '{0}'")]
    InvalidTime(String),
}

impl Draft {
    pub fn from_form<Tz: TimeZone>(form: &Form, tz: &Tz) -> Result<Self, FormError> {
        let chat_id = form
            .chat_id
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidChatId(form.chat_id.clone()))?;

        let time = match form.time.trim() {
            "" => String::new(),
            time => local_instant(time, tz)
                .ok_or_else(|| FormError::InvalidTime(form.time.clone()))?,
        };

        Ok(Self {
            chat_id,
            message: form.message.clone(),
            time,
        })
    }
}

/// How a single submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Option<NotificationId>),
    /// The API answered with an error status.
    Rejected(String),
    /// No response was obtained.
    Failed(String),
    Invalid(FormError),
}

impl Outcome {
    pub fn notice(&self) -> String {
        match self {
            Self::Created(id) => {
                let id = id.as_ref().map_or("unknown", NotificationId::as_str);
                format!("Notification created successfully! ID: {id}")
            }
            Self::Rejected(error) => format!("Error: {error}"),
            Self::Failed(reason) => format!("Failed to create notification: {reason}"),
            Self::Invalid(err) => format!("Error: {err}"),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Created(..))
    }
}
