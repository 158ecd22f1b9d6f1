use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::event::AppEvent;
use crate::remote::ArticleService;
use crate::remote::dispatch::Dispatcher;
use crate::remote::error::FetchError;
use crate::remote::types::{ArticleBundle, ArticleMode};
use crate::session::controller::{Effect, FinishedArticle, SessionController, SessionState};
use crate::session::input::KeyInput;
use crate::session::result::ArticleResult;
use crate::store::json_store::JsonStore;
use crate::store::schema::ArticleHistoryData;
use crate::ui::components::menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Exercise,
}

pub struct App {
    pub screen: AppScreen,
    pub menu_selected: usize,
    pub session: SessionController,
    pub config: Config,
    pub theme: Theme,
    pub history: ArticleHistoryData,
    pub should_quit: bool,
    /// Write preference changes back to the config file.
    pub persist_config: bool,
    store: Option<JsonStore>,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(
        config: Config,
        theme: Theme,
        service: Arc<dyn ArticleService>,
        events: Sender<AppEvent>,
        store: Option<JsonStore>,
    ) -> Self {
        let history = store
            .as_ref()
            .map(JsonStore::load_history)
            .unwrap_or_default();
        let session = SessionController::new(config.last_mode, config.session_config());

        Self {
            screen: AppScreen::Menu,
            menu_selected: menu::index_of(config.last_mode),
            session,
            config,
            theme,
            history,
            should_quit: false,
            persist_config: false,
            store,
            dispatcher: Dispatcher::new(service, events),
        }
    }

    /// Open the exercise screen with a fresh article from `mode`.
    pub fn start(&mut self, mode: ArticleMode) {
        info!(%mode, "starting session");
        self.screen = AppScreen::Exercise;
        self.menu_selected = menu::index_of(mode);
        let effect = self.session.switch_mode(mode);
        self.run_effects(vec![effect]);

        if self.config.last_mode != mode {
            self.config.last_mode = mode;
            self.save_config();
        }
    }

    pub fn start_selected(&mut self) {
        self.start(menu::MODES[self.menu_selected.min(menu::MODES.len() - 1)]);
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = menu::next_index(self.menu_selected);
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = menu::prev_index(self.menu_selected);
    }

    pub fn retry(&mut self) {
        if matches!(self.session.state(), SessionState::Failed(_)) {
            let effect = self.session.retry();
            self.run_effects(vec![effect]);
        }
    }

    pub fn on_article_loaded(
        &mut self,
        generation: u64,
        result: Result<ArticleBundle, FetchError>,
    ) {
        self.session.on_article_loaded(generation, result);
    }

    pub fn key(&mut self, key: KeyInput, now: Instant) {
        let effects = self.session.handle_key(key, now);
        self.run_effects(effects);
    }

    pub fn tick(&mut self, now: Instant) {
        let effects = self.session.tick(now);
        self.run_effects(effects);
    }

    pub fn skip_article(&mut self) {
        let effects = self.session.skip_article();
        self.run_effects(effects);
    }

    pub fn focus_next(&mut self) {
        self.session.focus_next();
    }

    pub fn focus_prev(&mut self) {
        self.session.focus_prev();
    }

    pub fn toggle_meaning(&mut self) {
        self.config.show_meaning = !self.config.show_meaning;
        self.session.config.show_meaning = self.config.show_meaning;
        self.save_config();
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchArticle { generation, mode } => self.dispatcher.fetch(generation, mode),
                Effect::RecordProgress {
                    article_id,
                    word,
                    state,
                } => self.dispatcher.record_progress(article_id, word, state),
                Effect::CompleteArticle { article_id } => self.dispatcher.complete(article_id),
                Effect::ArticleFinished(finished) => self.record_history(&finished),
            }
        }
    }

    fn record_history(&mut self, finished: &FinishedArticle) {
        let result = ArticleResult::from_finished(finished);
        match &self.store {
            Some(store) => {
                if let Err(e) = store.record(&mut self.history, result) {
                    warn!(error = %e, "failed to save article history");
                }
            }
            None => self.history.push(result),
        }
    }

    fn save_config(&self) {
        if self.persist_config
            && let Err(e) = self.config.save()
        {
            warn!(error = %e, "failed to save config");
        }
    }
}
