//! Web-page résumés: fetch over HTTP and reduce the HTML to text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Node};
use tracing::debug;

use super::ExtractionError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; resume-analyzer/0.1)";

/// Given a URL, returns the visible text of the page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError>;
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError> {
        let fetch_error = |message: String| ExtractionError::Fetch {
            url: url.to_string(),
            message,
        };

        let parsed = Url::parse(url).map_err(|e| fetch_error(e.to_string()))?;
        debug!("Fetching URL: {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(fetch_error(format!("status {}", status.as_u16())));
        }

        let html = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
        debug!("HTML content length: {} bytes", html.len());
        Ok(html_to_text(&html))
    }
}

/// Visible text of an HTML document: script/style content dropped, one phrase per line.
///
/// Text nodes are joined as-is, so inline markup stays inside its sentence and
/// only the document's own line breaks and double spaces split phrases.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style" | "noscript"))
                .unwrap_or(false)
        });
        if !hidden {
            raw.push_str(text);
        }
    }

    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Serves a fixed page for one URL and fails for every other.
    pub struct StaticPageFetcher {
        pub url: String,
        pub text: String,
    }

    #[async_trait]
    impl PageFetcher for StaticPageFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError> {
            if url == self.url {
                Ok(self.text.clone())
            } else {
                Err(ExtractionError::Fetch {
                    url: url.to_string(),
                    message: "status 404".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_drops_scripts_and_styles() {
        let html = r#"
            <html><head><title>Jane Doe</title><style>body { color: red; }</style></head>
            <body>
              <h1>Jane Doe</h1>
              <script>var tracking = 1;</script>
              <p>Senior   Rust engineer</p>
              <ul>
                <li>Docker</li>
                <li>Kubernetes</li>
              </ul>
            </body></html>
        "#;
        let text = html_to_text(html);
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Docker\nKubernetes"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_inline_markup_stays_in_its_sentence() {
        let html = "<p>Senior <b>Rust</b> engineer at <a href='#'>Acme</a> shipping services.</p>";
        let text = html_to_text(html);
        assert_eq!(text, "Senior Rust engineer at Acme shipping services.");
        assert_eq!(
            crate::analysis::keywords::split_sentences(&text),
            vec!["Senior Rust engineer at Acme shipping services"]
        );
    }

    #[test]
    fn test_html_to_text_splits_on_double_spaces() {
        let text = html_to_text("<p>Python  Go</p>");
        assert_eq!(text, "Python\nGo");
    }

    #[test]
    fn test_html_to_text_empty_document() {
        assert_eq!(html_to_text("<html><body></body></html>"), "");
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpPageFetcher::new(Duration::from_secs(1));
        let err = fetcher.fetch_text("not a url").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Fetch { .. }));
    }
}
