pub mod api;
pub mod config;
pub mod format;
pub mod notice;
pub mod page;
pub mod poller;
pub mod render;
pub mod submit;

mod panel;
pub use panel::Panel;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub(crate) fn default_http_client() -> reqwest::Client {
    use reqwest::header::{HeaderName, HeaderValue};
    reqwest::ClientBuilder::new()
        .default_headers(
            std::iter::once((
                HeaderName::from_static("user-agent"),
                HeaderValue::from_static(USER_AGENT),
            ))
            .collect(),
        )
        .build()
        .expect("valid client configuration")
}
