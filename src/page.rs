use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::sync::watch;

use crate::{format::escape, notice::NoticeKind};

/// The mount points the client writes into.
pub trait Page: Send + Sync + 'static {
    fn set_list(&self, html: String);

    /// `Some` writes the text and shows the element, `None` hides it.
    fn set_notice(&self, kind: NoticeKind, text: Option<&str>);
}

impl Page for () {
    fn set_list(&self, _html: String) {}
    fn set_notice(&self, _kind: NoticeKind, _text: Option<&str>) {}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeElement {
    pub text: String,
    pub visible: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mounts {
    pub list: String,
    pub success: NoticeElement,
    pub error: NoticeElement,
}

impl Mounts {
    pub const fn notice(&self, kind: NoticeKind) -> &NoticeElement {
        match kind {
            NoticeKind::Success => &self.success,
            NoticeKind::Error => &self.error,
        }
    }

    fn notice_mut(&mut self, kind: NoticeKind) -> &mut NoticeElement {
        match kind {
            NoticeKind::Success => &mut self.success,
            NoticeKind::Error => &mut self.error,
        }
    }
}

#[derive(Default)]
pub struct MemoryPage {
    mounts: Mutex<Mounts>,
}

impl MemoryPage {
    pub fn snapshot(&self) -> Mounts {
        self.lock().clone()
    }

    pub fn list(&self) -> String {
        self.lock().list.clone()
    }

    /// The notice text, if that notice is currently shown.
    pub fn visible_notice(&self, kind: NoticeKind) -> Option<String> {
        let mounts = self.lock();
        let el = mounts.notice(kind);
        el.visible.then(|| el.text.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Mounts> {
        self.mounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn set_list(&self, html: String) {
        self.lock().list = html;
    }

    fn set_notice(&self, kind: NoticeKind, text: Option<&str>) {
        let mut mounts = self.lock();
        let el = mounts.notice_mut(kind);
        match text {
            Some(text) => {
                el.text = text.to_string();
                el.visible = true;
            }
            None => el.visible = false,
        }
    }
}

/// A page that rewrites a standalone HTML document after every change.
///
/// Writes happen on a background task that always picks up the newest
/// document, so updates never block on the filesystem.
pub struct HtmlFile {
    path: PathBuf,
    inner: MemoryPage,
    doc: watch::Sender<String>,
}

impl HtmlFile {
    /// Spawns the writer, so this must be called within a tokio runtime.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (doc, rx) = watch::channel(String::new());
        tokio::spawn(Self::write_documents(path.clone(), rx));

        Self {
            path,
            inner: MemoryPage::default(),
            doc,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) {
        self.doc.send_replace(Self::document(&self.inner.snapshot()));
    }

    // ends once the page is dropped and the last document is written
    async fn write_documents(path: PathBuf, mut doc: watch::Receiver<String>) {
        while doc.changed().await.is_ok() {
            let next = doc.borrow_and_update().clone();
            if let Err(err) = tokio::fs::write(&path, next).await {
                tracing::warn!(path = %path.display(), "cannot write page: {err}");
            }
        }
    }

    fn document(mounts: &Mounts) -> String {
        fn notice(id: &str, el: &NoticeElement) -> String {
            let display = if el.visible { "block" } else { "none" };
            format!(
                r#"<div id="{id}" style="display: {display}">{text}</div>"#,
                text = escape(&el.text)
            )
        }

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html><head><meta charset=\"utf-8\">",
                "<meta http-equiv=\"refresh\" content=\"5\">",
                "<title>Delayed notifications</title></head><body>\n",
                "{success}\n{error}\n",
                "<div id=\"notificationsList\">{list}</div>\n",
                "</body></html>\n"
            ),
            success = notice("successMessage", &mounts.success),
            error = notice("errorMessage", &mounts.error),
            list = mounts.list,
        )
    }
}

impl Page for HtmlFile {
    fn set_list(&self, html: String) {
        self.inner.set_list(html);
        self.flush();
    }

    fn set_notice(&self, kind: NoticeKind, text: Option<&str>) {
        self.inner.set_notice(kind, text);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_notice_keeps_text_but_not_visibility() {
        let page = MemoryPage::default();
        page.set_notice(NoticeKind::Error, Some("boom"));
        assert_eq!(page.visible_notice(NoticeKind::Error).as_deref(), Some("boom"));
        assert_eq!(page.visible_notice(NoticeKind::Success), None);

        page.set_notice(NoticeKind::Error, None);
        assert_eq!(page.visible_notice(NoticeKind::Error), None);
        assert_eq!(page.snapshot().error.text, "boom");
    }

    #[tokio::test]
    async fn html_file_ends_up_with_the_latest_document() {
        let dir = tempfile::tempdir().unwrap();
        let page = HtmlFile::new(dir.path().join("panel.html"));

        page.set_list("<div>first</div>".into());
        page.set_list("<div>second</div>".into());
        page.set_notice(NoticeKind::Success, Some("saved"));

        let mut doc = String::new();
        for _ in 0..200 {
            doc = tokio::fs::read_to_string(page.path()).await.unwrap_or_default();
            if doc.contains("saved") && doc.ends_with("</html>\n") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(doc.contains(r#"<div id="notificationsList"><div>second</div></div>"#), "{doc}");
        assert!(doc.contains(r#"<div id="successMessage" style="display: block">saved</div>"#));
    }

    #[test]
    fn document_escapes_notice_text() {
        let mut mounts = Mounts::default();
        mounts.list = "<div>list</div>".into();
        mounts.success = NoticeElement {
            text: "<i>ok</i>".into(),
            visible: true,
        };

        let doc = HtmlFile::document(&mounts);
        assert!(doc.contains(r#"<div id="successMessage" style="display: block">&lt;i&gt;ok&lt;/i&gt;</div>"#));
        assert!(doc.contains(r#"<div id="errorMessage" style="display: none"></div>"#));
        assert!(doc.contains(r#"<div id="notificationsList"><div>list</div></div>"#));
    }
}
