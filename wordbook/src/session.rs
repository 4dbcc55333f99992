use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    service::{DefinitionSource, WordService},
    word::{normalize, WordRecord},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub loading: bool,
    pub result: Option<WordRecord>,
    /// User facing message, kept until [`SearchSession::clear_error`].
    pub error: Option<String>,
}

/// State behind a search screen. Readers either poll [`SearchSession::current`] or wait on a
/// [`SearchSession::subscribe`] receiver.
pub struct SearchSession<D> {
    service: Arc<WordService<D>>,
    state: watch::Sender<SearchState>,
}

impl<D: DefinitionSource> SearchSession<D> {
    pub fn new(service: Arc<WordService<D>>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { service, state }
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub async fn search(&self, query: &str) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        match self.service.lookup(query).await {
            Ok(record) => {
                self.service.record_search(&record.word).await;
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.result = Some(record);
                });
            }
            Err(error) => {
                tracing::debug!(query, %error, "search failed");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(error.to_string());
                });
            }
        }
    }

    /// Toggles the favorite flag and refreshes the shown result if it is the same word.
    pub async fn toggle_favorite(&self, word: &str) -> bool {
        let favorite = self.service.toggle_favorite(word).await;
        let key = normalize(word);
        self.state.send_if_modified(|state| match &mut state.result {
            Some(result) if key.as_deref() == Some(&result.word[..]) => {
                result.is_favorite = favorite;
                true
            }
            _ => false,
        });
        favorite
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub fn clear_result(&self) {
        self.state.send_if_modified(|state| state.result.take().is_some());
    }
}
