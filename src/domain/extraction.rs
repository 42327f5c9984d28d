/// Result of pulling the monitored region off the page.
#[derive(Debug, Clone)]
pub enum Extraction {
    Found(String),
    Missing(MissingContent),
}

/// The content selector never showed up within the wait.
#[derive(Debug, Clone, Default)]
pub struct MissingContent {
    pub selector: String,
    pub url: String,
    pub screenshot: Option<Vec<u8>>,
    pub markup: Option<String>,
}

impl MissingContent {
    /// Stand-in text that hashes identically on every miss of the same selector.
    pub fn sentinel(&self) -> String {
        format!("__MISSING_SELECTOR__ {} URL={}", self.selector, self.url)
    }
}

impl Extraction {
    /// Raw text to normalize, with the sentinel standing in for a miss.
    pub fn into_content(self) -> String {
        match self {
            Extraction::Found(text) => text,
            Extraction::Missing(missing) => missing.sentinel(),
        }
    }
}
