use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

pub mod data;
use data::{CreateResponse, Draft, NotificationId, NotificationRecord, StatusResponse};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// A decoded response body along with the status it arrived with.
#[derive(Debug)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> Reply<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    base: Url,
}

impl Client {
    const LIST: &'static str = "api/v1/notifications";
    const NOTIFY: &'static str = "api/v1/notify";

    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        // joining relative paths drops the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn list(&self) -> Result<Vec<NotificationRecord>, Error> {
        let resp = self.client.get(self.base.join(Self::LIST)?).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = resp.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let list: Option<Vec<NotificationRecord>> = serde_json::from_slice(&body)?;
        Ok(list.unwrap_or_default())
    }

    pub async fn create(&self, draft: &Draft) -> Result<Reply<CreateResponse>, Error> {
        let req = self.client.post(self.base.join(Self::NOTIFY)?).json(draft);
        Self::reply(req).await
    }

    pub async fn status(&self, id: &NotificationId) -> Result<Reply<StatusResponse>, Error> {
        let req = self.client.get(self.item(id)?);
        Self::reply(req).await
    }

    pub async fn cancel(&self, id: &NotificationId) -> Result<Reply<StatusResponse>, Error> {
        let req = self.client.delete(self.item(id)?);
        Self::reply(req).await
    }

    fn item(&self, id: &NotificationId) -> Result<Url, Error> {
        let mut url = self.base.join(Self::NOTIFY)?;
        url.path_segments_mut()
            .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id.as_str());
        Ok(url)
    }

    // the body is decoded whatever the status; callers branch on `Reply::status`
    async fn reply<T>(req: reqwest::RequestBuilder) -> Result<Reply<T>, Error>
    where
        T: DeserializeOwned,
    {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let body = serde_json::from_slice(&body)?;
        Ok(Reply { status, body })
    }
}
