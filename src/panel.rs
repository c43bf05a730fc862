use std::sync::Arc;

use crate::{
    api::{self, data::Draft, data::NotificationId},
    config::Config,
    format::Zone,
    notice::Notices,
    page::Page,
    poller::Poller,
    submit::{Form, Outcome},
};

pub struct Panel<P> {
    client: api::Client,
    page: Arc<P>,
    notices: Notices<P>,
    poller: Poller,
    zone: Zone,
}

impl<P: Page> Panel<P> {
    /// Starts polling right away. Must be called within a tokio runtime.
    pub fn start(config: &Config, page: Arc<P>) -> Self {
        let client = api::Client::new(crate::default_http_client(), config.api_url.clone());
        let poller = Poller::spawn(
            client.clone(),
            Arc::clone(&page),
            config.zone,
            config.poll_interval,
        );

        Self {
            client,
            notices: Notices::new(Arc::clone(&page), config.notice_duration),
            page,
            poller,
            zone: config.zone,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub const fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Sends the form as a new notification. The form is cleared only when
    /// the API accepts it.
    pub async fn submit(&self, form: &mut Form) -> Outcome {
        let outcome = match Draft::from_form(form, &self.zone) {
            Ok(draft) => self.create(&draft).await,
            Err(err) => Outcome::Invalid(err),
        };

        if outcome.is_success() {
            self.notices.show_success(&outcome.notice());
            form.reset();
            self.poller.refresh();
        } else {
            self.notices.show_error(&outcome.notice());
        }
        outcome
    }

    pub async fn check_status(&self, id: &NotificationId) {
        match self.client.status(id).await {
            Ok(reply) if reply.is_success() => {
                let status = reply.body.status.unwrap_or_else(|| "unknown".to_string());
                self.notices
                    .show_success(&format!("Notification {id}: {status}"));
            }
            Ok(reply) => self.notices.show_error(&format!(
                "Error: {}",
                Self::server_error(reply.body.error)
            )),
            Err(err) => self
                .notices
                .show_error(&format!("Failed to load notification {id}: {err}")),
        }
    }

    pub async fn cancel(&self, id: &NotificationId) {
        match self.client.cancel(id).await {
            Ok(reply) if reply.is_success() => {
                self.notices
                    .show_success(&format!("Notification {id} cancelled"));
                self.poller.refresh();
            }
            Ok(reply) => self.notices.show_error(&format!(
                "Error: {}",
                Self::server_error(reply.body.error)
            )),
            Err(err) => self
                .notices
                .show_error(&format!("Failed to cancel notification {id}: {err}")),
        }
    }

    pub async fn shutdown(self) {
        self.poller.join().await
    }

    async fn create(&self, draft: &Draft) -> Outcome {
        tracing::debug!(chat_id = draft.chat_id, time = %draft.time, "creating notification");
        match self.client.create(draft).await {
            Ok(reply) if reply.is_success() => Outcome::Created(reply.body.id),
            Ok(reply) => Outcome::Rejected(Self::server_error(reply.body.error)),
            Err(err) => Outcome::Failed(err.to_string()),
        }
    }

    fn server_error(error: Option<String>) -> String {
        error
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
