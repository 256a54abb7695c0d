//! Document theme target

use macrofacts::{Theme, ThemeTarget};

/// Sets `data-theme` on `<html>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTarget;

impl ThemeTarget for DocumentTarget {
    fn apply(&self, theme: Theme) {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }
}

/// `prefers-color-scheme: dark`, read once
pub fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}
