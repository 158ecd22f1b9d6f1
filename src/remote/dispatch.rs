use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::remote::ArticleService;
use crate::remote::types::{ArticleMode, ProgressState};

enum ArticleJob {
    Fetch { generation: u64, mode: ArticleMode },
    Complete { article_id: i64 },
}

struct ProgressJob {
    article_id: i64,
    word: String,
    state: ProgressState,
}

/// Runs service calls on background workers.
///
/// Fetches and completions share one queue and run in submission order, so
/// a completion reaches the service before the fetch that follows it. Word
/// progress goes through a second queue and never holds up a fetch.
///
/// Fetch results come back as [`AppEvent::ArticleLoaded`]. Progress and
/// completion calls are fire-and-forget: failures are logged and dropped.
pub struct Dispatcher {
    articles: mpsc::Sender<ArticleJob>,
    progress: mpsc::Sender<ProgressJob>,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn ArticleService>, events: mpsc::Sender<AppEvent>) -> Self {
        let (articles, article_rx) = mpsc::channel::<ArticleJob>();
        let (progress, progress_rx) = mpsc::channel::<ProgressJob>();

        let article_service = Arc::clone(&service);
        thread::spawn(move || {
            for job in article_rx {
                match job {
                    ArticleJob::Fetch { generation, mode } => {
                        debug!(generation, %mode, "fetching article");
                        let result = article_service.next_article(mode);
                        let event = AppEvent::ArticleLoaded {
                            generation,
                            mode,
                            result,
                        };
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    ArticleJob::Complete { article_id } => {
                        if let Err(e) = article_service.complete_article(article_id) {
                            warn!(article_id, error = %e, "completion sync failed");
                        }
                    }
                }
            }
        });

        thread::spawn(move || {
            for job in progress_rx {
                let ProgressJob {
                    article_id,
                    word,
                    state,
                } = job;
                if let Err(e) = service.record_progress(article_id, &word, state) {
                    warn!(article_id, %word, state = state.as_str(), error = %e, "progress sync failed");
                }
            }
        });

        Self { articles, progress }
    }

    pub fn fetch(&self, generation: u64, mode: ArticleMode) {
        send(&self.articles, ArticleJob::Fetch { generation, mode });
    }

    pub fn record_progress(&self, article_id: i64, word: String, state: ProgressState) {
        send(
            &self.progress,
            ProgressJob {
                article_id,
                word,
                state,
            },
        );
    }

    pub fn complete(&self, article_id: i64) {
        send(&self.articles, ArticleJob::Complete { article_id });
    }
}

fn send<T>(queue: &mpsc::Sender<T>, job: T) {
    if queue.send(job).is_err() {
        warn!("service worker has stopped; dropping request");
    }
}
