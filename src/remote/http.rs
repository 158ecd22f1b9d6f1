#[cfg(feature = "network")]
pub use client::HttpArticleService;

#[cfg(not(feature = "network"))]
pub use offline::HttpArticleService;

#[cfg(feature = "network")]
mod client {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};
    use tracing::{debug, instrument};

    use crate::remote::ArticleService;
    use crate::remote::error::{FetchError, SyncError};
    use crate::remote::types::{ArticleBundle, ArticleMode, ProgressState};

    /// Client for the article service's JSON API.
    pub struct HttpArticleService {
        base_url: String,
        auth_token: Option<String>,
        timeout_secs: u64,
        client: reqwest::blocking::Client,
    }

    #[derive(Deserialize, Default)]
    struct ErrorBody {
        #[serde(default)]
        code: String,
        #[serde(default)]
        message: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct CompleteRequest {
        article_id: i64,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ProgressRequest<'a> {
        article_id: i64,
        word: &'a str,
        state: ProgressState,
    }

    impl HttpArticleService {
        pub fn new(
            base_url: &str,
            auth_token: Option<String>,
            timeout: Duration,
        ) -> Result<Self, FetchError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                auth_token: auth_token.filter(|t| !t.is_empty()),
                timeout_secs: timeout.as_secs(),
                client,
            })
        }

        fn url(&self, path: &str) -> String {
            format!("{}{path}", self.base_url)
        }

        fn authorize(
            &self,
            request: reqwest::blocking::RequestBuilder,
        ) -> reqwest::blocking::RequestBuilder {
            match &self.auth_token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        }

        fn network_message(&self, err: &reqwest::Error) -> String {
            if err.is_timeout() {
                format!("request timed out after {}s", self.timeout_secs)
            } else if err.is_connect() {
                format!("article service not reachable at {}", self.base_url)
            } else {
                err.to_string()
            }
        }

        fn post_json<T: Serialize>(&self, endpoint: &'static str, body: &T) -> Result<(), SyncError> {
            let response = self
                .authorize(self.client.post(self.url(endpoint)).json(body))
                .send()
                .map_err(|e| SyncError::Network(self.network_message(&e)))?;
            let status = response.status().as_u16();
            if status >= 400 {
                let body: ErrorBody = response.json().unwrap_or_default();
                return Err(SyncError::Rejected {
                    endpoint,
                    status,
                    message: body.message,
                });
            }
            Ok(())
        }
    }

    impl ArticleService for HttpArticleService {
        #[instrument(skip(self))]
        fn next_article(&self, mode: ArticleMode) -> Result<ArticleBundle, FetchError> {
            let response = self
                .authorize(
                    self.client
                        .get(self.url("/api/article/next"))
                        .query(&[("type", mode.as_str())]),
                )
                .send()
                .map_err(|e| FetchError::Network(self.network_message(&e)))?;

            let status = response.status().as_u16();
            if status >= 400 {
                let text = response.text().unwrap_or_default();
                let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
                debug!(status, code = %body.code, "article request rejected");
                let message = if body.message.is_empty() { text } else { body.message };
                return Err(FetchError::from_code(status, &body.code, &message));
            }

            response
                .json::<ArticleBundle>()
                .map_err(|e| FetchError::InvalidResponse(e.to_string()))
        }

        fn complete_article(&self, article_id: i64) -> Result<(), SyncError> {
            self.post_json("/api/article/complete", &CompleteRequest { article_id })
        }

        fn record_progress(
            &self,
            article_id: i64,
            word: &str,
            state: ProgressState,
        ) -> Result<(), SyncError> {
            self.post_json(
                "/api/article/progress",
                &ProgressRequest {
                    article_id,
                    word,
                    state,
                },
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::remote::error::FailureCategory;
        use wiremock::matchers::{body_json, header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        // The blocking client must not run on the async test runtime.
        async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
            tokio::task::spawn_blocking(f).await.unwrap()
        }

        fn service(uri: String) -> HttpArticleService {
            HttpArticleService::new(&uri, Some("secret".into()), Duration::from_secs(5)).unwrap()
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn fetches_custom_article() {
            let server = MockServer::start().await;
            let body = serde_json::json!({
                "articleId": 12,
                "title": "Focus",
                "content": "Stay [focused,专注的].",
                "wordBank": [{"word": "focused", "meaning": "专注的", "state": "unused"}]
            });
            Mock::given(method("GET"))
                .and(path("/api/article/next"))
                .and(query_param("type", "custom"))
                .and(header("authorization", "Bearer secret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(&body))
                .mount(&server)
                .await;

            let uri = server.uri();
            let bundle = blocking(move || service(uri).next_article(ArticleMode::Custom))
                .await
                .unwrap();
            assert_eq!(bundle.article_id, Some(12));
            assert_eq!(bundle.word_bank[0].word, "focused");
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn maps_locked_error_code() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/article/next"))
                .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                    "code": "ARTICLES_NOT_UNLOCKED",
                    "message": "study more words first"
                })))
                .mount(&server)
                .await;

            let uri = server.uri();
            let err = blocking(move || service(uri).next_article(ArticleMode::Custom))
                .await
                .unwrap_err();
            assert_eq!(err, FetchError::Locked);
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn unknown_error_is_generic() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/article/next"))
                .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
                .mount(&server)
                .await;

            let uri = server.uri();
            let err = blocking(move || service(uri).next_article(ArticleMode::Generic))
                .await
                .unwrap_err();
            assert_eq!(err.category(), FailureCategory::Generic);
            assert!(err.to_string().contains("boom"));
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn malformed_body_is_invalid_response() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/article/next"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            let uri = server.uri();
            let err = blocking(move || service(uri).next_article(ArticleMode::Generic))
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::InvalidResponse(_)));
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn posts_progress_and_completion() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/article/progress"))
                .and(body_json(serde_json::json!({
                    "articleId": 5, "word": "courage", "state": "wrong"
                })))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/api/article/complete"))
                .and(body_json(serde_json::json!({"articleId": 5})))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;

            let uri = server.uri();
            blocking(move || {
                let svc = service(uri);
                svc.record_progress(5, "courage", ProgressState::Wrong).unwrap();
                svc.complete_article(5).unwrap();
            })
            .await;
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn rejected_progress_is_sync_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/article/progress"))
                .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                    "code": "NOT_FOUND", "message": "no such article"
                })))
                .mount(&server)
                .await;

            let uri = server.uri();
            let err = blocking(move || {
                service(uri).record_progress(1, "x", ProgressState::Correct)
            })
            .await
            .unwrap_err();
            assert_eq!(
                err,
                SyncError::Rejected {
                    endpoint: "/api/article/progress",
                    status: 404,
                    message: "no such article".to_string(),
                }
            );
        }

        #[test]
        fn unreachable_server_is_network_error() {
            let svc =
                HttpArticleService::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
            let err = svc.next_article(ArticleMode::Generic).unwrap_err();
            assert!(matches!(err, FetchError::Network(_)));
        }
    }
}

#[cfg(not(feature = "network"))]
mod offline {
    use std::time::Duration;

    use crate::remote::ArticleService;
    use crate::remote::error::{FetchError, SyncError};
    use crate::remote::types::{ArticleBundle, ArticleMode, ProgressState};

    const DISABLED: &str = "built without network support";

    pub struct HttpArticleService;

    impl HttpArticleService {
        pub fn new(
            _base_url: &str,
            _auth_token: Option<String>,
            _timeout: Duration,
        ) -> Result<Self, FetchError> {
            Ok(Self)
        }
    }

    impl ArticleService for HttpArticleService {
        fn next_article(&self, _mode: ArticleMode) -> Result<ArticleBundle, FetchError> {
            Err(FetchError::Network(DISABLED.to_string()))
        }

        fn complete_article(&self, _article_id: i64) -> Result<(), SyncError> {
            Err(SyncError::Network(DISABLED.to_string()))
        }

        fn record_progress(
            &self,
            _article_id: i64,
            _word: &str,
            _state: ProgressState,
        ) -> Result<(), SyncError> {
            Err(SyncError::Network(DISABLED.to_string()))
        }
    }
}
