//! Application controller
//!
//! Owns screen state, the favorites store and the retry queue, and processes
//! commands from frontends through a single crossbeam channel. Fetches run
//! on worker threads and report back through the same channel, so every
//! state change happens on the controller thread.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::config::ui::POLL_INTERVAL_MS;
use crate::data::favorites::FavoritesStore;
use crate::data::types::{BreedImage, BreedListEntry, BreedName};
use crate::gateway::BreedGateway;
use crate::sync::reconcile;
use crate::sync::{Debouncer, PendingOperation, RetryQueue};

use super::state::{AppCommand, AppEvent, AppSnapshot, Screen, ViewState};

/// Progress of the current screen's data
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Loading,
    Failed(String),
    Ready,
}

pub struct AppController {
    cmd_rx: Receiver<AppCommand>,
    cmd_tx: Sender<AppCommand>,
    event_tx: Sender<AppEvent>,
    shared_state: Arc<Mutex<AppSnapshot>>,
    gateway: Arc<dyn BreedGateway>,
    favorites: FavoritesStore,
    retries: RetryQueue,
    search: Debouncer<String>,
    /// Monotonically increasing counter to discard stale fetch results
    generation: u64,
    screen: Screen,
    phase: Phase,
    /// Sorted breed list from the last successful fetch
    breeds: Vec<BreedListEntry>,
    /// Why the last breed list fetch failed, kept for returning to that screen
    breeds_error: Option<String>,
    /// Sorted images of the current image or favorites screen
    images: Vec<BreedImage>,
    query: String,
    breed_filter: Vec<BreedName>,
}

impl AppController {
    pub fn new(
        cmd_rx: Receiver<AppCommand>,
        cmd_tx: Sender<AppCommand>,
        event_tx: Sender<AppEvent>,
        shared_state: Arc<Mutex<AppSnapshot>>,
        gateway: Arc<dyn BreedGateway>,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            cmd_rx,
            cmd_tx,
            event_tx,
            shared_state,
            gateway,
            favorites,
            retries: RetryQueue::new(),
            search: Debouncer::default(),
            generation: 0,
            screen: Screen::Breeds,
            phase: Phase::Loading,
            breeds: Vec::new(),
            breeds_error: None,
            images: Vec::new(),
            query: String::new(),
            breed_filter: Vec::new(),
        }
    }

    /// Run the controller event loop (blocking, call from a dedicated thread)
    pub fn run(&mut self) {
        info!(gateway = self.gateway.name(), "controller started");
        loop {
            // Block with a timeout so the search debouncer gets polled
            match self.cmd_rx.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS)) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.poll_search(Instant::now());
        }
        info!("controller stopped");
    }

    /// Handle a single command. Returns true if the loop should exit.
    fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Shutdown => return true,

            AppCommand::LoadBreeds => {
                self.enter_screen(Screen::Breeds);
                // The fetch bumps the generation, so in-flight image results go stale
                self.images.clear();
                self.start_fetch(PendingOperation::ListBreeds);
            }
            AppCommand::OpenBreed(breed) => {
                self.enter_screen(Screen::Images {
                    breed: breed.clone(),
                });
                self.images.clear();
                self.start_fetch(PendingOperation::ListImages { breed });
            }
            AppCommand::OpenFavorites => {
                self.enter_screen(Screen::Favorites);
                // Invalidate any in-flight fetch
                self.generation += 1;
                self.images = self
                    .favorites
                    .favorite_breeds()
                    .into_iter()
                    .map(|image| image.with_selected(true))
                    .collect();
                self.phase = Phase::Ready;
            }
            AppCommand::Dismiss => self.dismiss(),

            AppCommand::Search(query) => {
                self.search.push(query, Instant::now());
                return false;
            }
            AppCommand::ToggleFavorite(index) => self.toggle_favorite(index),
            AppCommand::ShowBreedFilter => {
                if self.screen != Screen::Breeds {
                    self.breed_filter = reconcile::unique_breed_names(&self.images);
                }
            }
            AppCommand::SelectBreedFilter(index) => {
                if !reconcile::toggle_single_selection(&mut self.breed_filter, index) {
                    debug!(index, "breed filter index out of range");
                }
            }
            AppCommand::ClearBreedFilter => {
                for name in &mut self.breed_filter {
                    name.selected = false;
                }
            }

            AppCommand::Retry => {
                // Temporarily take ownership of the queue so the fetch can borrow self
                let mut retries = std::mem::take(&mut self.retries);
                let ran = retries.dequeue_and_run(|op| {
                    info!(%op, "retrying");
                    self.start_fetch(op);
                });
                self.retries = retries;
                if !ran {
                    debug!("retry requested with nothing pending");
                }
            }

            AppCommand::InternalBreedsLoaded { generation, result } => {
                self.handle_breeds_loaded(generation, result);
            }
            AppCommand::InternalImagesLoaded {
                generation,
                breed,
                result,
            } => {
                self.handle_images_loaded(generation, breed, result);
            }
        }
        self.publish();
        false
    }

    /// Apply the debounced search query once it has settled
    fn poll_search(&mut self, now: Instant) {
        if let Some(query) = self.search.poll(now) {
            debug!(%query, "applying search");
            self.query = query;
            self.publish();
        }
    }

    /// Switch screens, resetting per-screen state
    ///
    /// Retries queued for other screens are dropped along with that screen.
    fn enter_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            let _ = self.event_tx.send(AppEvent::TitleChanged(screen.title()));
        }
        self.retries.retain(|op| screen.owns(op));
        self.screen = screen;
        self.query.clear();
        self.search.cancel();
        self.breed_filter.clear();
    }

    /// Close an image screen and return to the breed list
    fn dismiss(&mut self) {
        if self.screen == Screen::Breeds {
            return;
        }
        let selected = reconcile::selected_images(&self.images);
        let _ = self.event_tx.send(AppEvent::Dismissed { selected });

        self.enter_screen(Screen::Breeds);
        // In-flight image fetches become stale
        self.generation += 1;
        self.images.clear();
        match self.breeds_error.clone() {
            Some(message) => {
                // The breed screen's retry was dropped when it was left
                if !self.retries.iter().any(|op| *op == PendingOperation::ListBreeds) {
                    self.retries.enqueue(PendingOperation::ListBreeds);
                }
                self.phase = Phase::Failed(message);
            }
            // The breed list was never fetched or its fetch went stale
            None if self.breeds.is_empty() => self.start_fetch(PendingOperation::ListBreeds),
            None => self.phase = Phase::Ready,
        }
    }

    /// Run the fetch on a worker thread, then send the result back.
    ///
    /// Each call increments `generation`; stale results from earlier calls
    /// are discarded when they arrive.
    fn start_fetch(&mut self, op: PendingOperation) {
        self.generation += 1;
        let generation = self.generation;
        self.phase = Phase::Loading;

        let gateway = Arc::clone(&self.gateway);
        let cmd_tx = self.cmd_tx.clone();
        let job = op.clone();

        let spawned = std::thread::Builder::new()
            .name("breeds-fetch".into())
            .spawn(move || {
                let cmd = match job {
                    PendingOperation::ListBreeds => AppCommand::InternalBreedsLoaded {
                        generation,
                        result: gateway.list_breeds().map_err(|e| e.to_string()),
                    },
                    PendingOperation::ListImages { breed } => {
                        let result = gateway.list_images(&breed).map_err(|e| e.to_string());
                        AppCommand::InternalImagesLoaded {
                            generation,
                            breed,
                            result,
                        }
                    }
                };
                let _ = cmd_tx.send(cmd);
            });

        if let Err(e) = spawned {
            self.fail(op, format!("Failed to start request: {e}"));
        }
    }

    fn handle_breeds_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<BreedListEntry>, String>,
    ) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale breed list");
            return;
        }
        match result {
            Ok(entries) => {
                self.breeds = reconcile::project_breeds(entries);
                self.breeds_error = None;
                self.phase = Phase::Ready;
            }
            Err(e) => self.fail(PendingOperation::ListBreeds, e),
        }
    }

    fn handle_images_loaded(
        &mut self,
        generation: u64,
        breed: String,
        result: Result<Vec<String>, String>,
    ) {
        if generation != self.generation {
            debug!(generation, current = self.generation, %breed, "discarding stale image list");
            return;
        }
        match result {
            Ok(urls) => {
                let favorites = self.favorites.snapshot();
                self.images = reconcile::project_images(urls, &breed, &favorites);
                self.phase = Phase::Ready;
            }
            Err(e) => self.fail(PendingOperation::ListImages { breed }, e),
        }
    }

    /// Record a failed fetch: queue its retry and tell the frontend
    fn fail(&mut self, op: PendingOperation, message: String) {
        warn!(%op, "fetch failed: {message}");
        if op == PendingOperation::ListBreeds {
            self.breeds_error = Some(message.clone());
        }
        self.retries.enqueue(op);
        self.phase = Phase::Failed(message.clone());
        let _ = self.event_tx.send(AppEvent::ShowError(message));
    }

    /// Toggle the favorite state of the `index`-th visible image
    fn toggle_favorite(&mut self, index: usize) {
        if self.screen == Screen::Breeds {
            debug!(index, "no images on the breed list");
            return;
        }
        let Some(image) = self.visible_images().into_iter().nth(index) else {
            debug!(index, "favorite index out of range");
            return;
        };

        match self.favorites.toggle(&image) {
            Ok(now_favorite) => {
                if self.screen == Screen::Favorites && !now_favorite {
                    self.images.retain(|i| *i != image);
                } else if let Some(item) = self.images.iter_mut().find(|i| **i == image) {
                    item.selected = now_favorite;
                }
            }
            Err(e) => {
                warn!("failed to save favorite: {e}");
                let _ = self.event_tx.send(AppEvent::ShowError(e.to_string()));
            }
        }
    }

    fn visible_breeds(&self) -> Vec<BreedListEntry> {
        reconcile::filter(&self.breeds, &self.query)
    }

    fn visible_images(&self) -> Vec<BreedImage> {
        let chosen = self.breed_filter.iter().find(|name| name.selected);
        let by_breed = reconcile::filter_by_breed(&self.images, chosen);
        reconcile::filter(&by_breed, &self.query)
    }

    /// Copy controller state into the shared snapshot and notify frontends
    fn publish(&self) {
        let view = match (&self.phase, &self.screen) {
            (Phase::Loading, _) => ViewState::Loading,
            (Phase::Failed(message), _) => ViewState::Error(message.clone()),
            (Phase::Ready, Screen::Breeds) => ViewState::Breeds(self.visible_breeds()),
            (Phase::Ready, _) => ViewState::Images(self.visible_images()),
        };

        {
            let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
            state.screen = self.screen.clone();
            state.view = view;
            state.query = self.query.clone();
            state.breed_filter = self.breed_filter.clone();
            state.pending_retries = self.retries.iter().cloned().collect();
            state.last_error = match &self.phase {
                Phase::Failed(message) => Some(message.clone()),
                _ => None,
            };
        }

        let _ = self.event_tx.send(AppEvent::ViewUpdated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::MemoryStore;
    use crate::error::{AppError, Result};
    use crossbeam_channel::unbounded;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Scripted<T> = Mutex<VecDeque<std::result::Result<T, String>>>;

    /// Gateway answering from per-endpoint scripts; an exhausted script fails
    #[derive(Default)]
    struct ScriptedGateway {
        breeds: Scripted<Vec<BreedListEntry>>,
        images: Scripted<Vec<String>>,
        breed_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn push_breeds(&self, result: std::result::Result<Vec<BreedListEntry>, String>) {
            self.breeds.lock().unwrap().push_back(result);
        }

        fn push_images(&self, result: std::result::Result<Vec<String>, String>) {
            self.images.lock().unwrap().push_back(result);
        }

        fn next<T>(script: &Scripted<T>) -> Result<T> {
            let step = script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("unscripted".to_string()));
            step.map_err(|message| AppError::Server {
                status: 503,
                message: Some(message),
            })
        }
    }

    impl BreedGateway for ScriptedGateway {
        fn name(&self) -> &'static str {
            "Scripted"
        }

        fn list_breeds(&self) -> Result<Vec<BreedListEntry>> {
            self.breed_calls.fetch_add(1, Ordering::SeqCst);
            Self::next(&self.breeds)
        }

        fn list_images(&self, _breed: &str) -> Result<Vec<String>> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            Self::next(&self.images)
        }
    }

    struct Harness {
        ctrl: AppController,
        events: Receiver<AppEvent>,
        state: Arc<Mutex<AppSnapshot>>,
        gateway: Arc<ScriptedGateway>,
        favorites: FavoritesStore,
    }

    impl Harness {
        fn new() -> Self {
            let (cmd_tx, cmd_rx) = unbounded();
            let (event_tx, events) = unbounded();
            let state = Arc::new(Mutex::new(AppSnapshot::default()));
            let gateway = Arc::new(ScriptedGateway::default());
            let favorites = FavoritesStore::new(Arc::new(MemoryStore::new()));
            let ctrl = AppController::new(
                cmd_rx,
                cmd_tx,
                event_tx,
                Arc::clone(&state),
                gateway.clone(),
                favorites.clone(),
            );
            Self {
                ctrl,
                events,
                state,
                gateway,
                favorites,
            }
        }

        fn send(&mut self, cmd: AppCommand) {
            assert!(!self.ctrl.handle_command(cmd));
        }

        /// Deliver the next worker result to the controller
        fn pump(&mut self) {
            let cmd = self
                .ctrl
                .cmd_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("fetch result");
            self.send(cmd);
        }

        fn snapshot(&self) -> AppSnapshot {
            self.state.lock().unwrap().clone()
        }

        fn images(&self) -> Vec<BreedImage> {
            match self.snapshot().view {
                ViewState::Images(images) => images,
                other => panic!("expected images, got {other:?}"),
            }
        }

        fn breed_names(&self) -> Vec<String> {
            match self.snapshot().view {
                ViewState::Breeds(breeds) => breeds.into_iter().map(|b| b.name).collect(),
                other => panic!("expected breeds, got {other:?}"),
            }
        }

        fn drain_events(&self) -> Vec<AppEvent> {
            self.events.try_iter().collect()
        }
    }

    fn entry(name: &str) -> BreedListEntry {
        BreedListEntry::new(name, Vec::new())
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_breeds_sorted() {
        let mut h = Harness::new();
        h.gateway
            .push_breeds(Ok(vec![entry("bulldog"), entry("akita"), entry("boxer")]));

        h.send(AppCommand::LoadBreeds);
        assert!(h.snapshot().is_loading());

        h.pump();
        assert_eq!(h.breed_names(), vec!["akita", "boxer", "bulldog"]);
        assert!(h.snapshot().last_error.is_none());
    }

    #[test]
    fn test_failure_queues_retry_and_reports() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Err("offline".to_string()));

        h.send(AppCommand::LoadBreeds);
        h.pump();

        let snapshot = h.snapshot();
        assert_eq!(snapshot.pending_retries, vec![PendingOperation::ListBreeds]);
        assert!(matches!(snapshot.view, ViewState::Error(_)));
        assert!(snapshot.last_error.unwrap().contains("offline"));
        assert!(h
            .drain_events()
            .iter()
            .any(|e| matches!(e, AppEvent::ShowError(m) if m.contains("offline"))));
    }

    #[test]
    fn test_two_failures_then_one_retry() {
        let mut h = Harness::new();
        for _ in 0..3 {
            h.gateway.push_breeds(Err("offline".to_string()));
        }

        h.send(AppCommand::LoadBreeds);
        h.pump();
        h.send(AppCommand::LoadBreeds);
        h.pump();
        assert_eq!(h.snapshot().pending_retries.len(), 2);

        h.send(AppCommand::Retry);
        assert_eq!(h.snapshot().pending_retries.len(), 1);
        h.pump();

        // Exactly one retry ran, and its failure queued another
        assert_eq!(h.gateway.breed_calls.load(Ordering::SeqCst), 3);
        assert_eq!(h.snapshot().pending_retries.len(), 2);
    }

    #[test]
    fn test_retry_recovers() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Err("offline".to_string()));
        h.gateway.push_breeds(Ok(vec![entry("akita")]));

        h.send(AppCommand::LoadBreeds);
        h.pump();
        h.send(AppCommand::Retry);
        h.pump();

        assert_eq!(h.breed_names(), vec!["akita"]);
        assert!(!h.snapshot().can_retry());
    }

    #[test]
    fn test_retry_with_empty_queue_is_noop() {
        let mut h = Harness::new();
        h.send(AppCommand::Retry);
        assert_eq!(h.gateway.breed_calls.load(Ordering::SeqCst), 0);
        assert!(h.ctrl.cmd_rx.is_empty());
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Ok(vec![entry("akita")]));

        h.send(AppCommand::LoadBreeds);
        // A result tagged with an older generation arrives first
        h.send(AppCommand::InternalBreedsLoaded {
            generation: 0,
            result: Err("late failure".to_string()),
        });
        assert!(h.snapshot().is_loading());
        assert!(!h.snapshot().can_retry());

        h.pump();
        assert_eq!(h.breed_names(), vec!["akita"]);
    }

    #[test]
    fn test_open_breed_tags_favorites() {
        let mut h = Harness::new();
        h.favorites.toggle(&BreedImage::new("boxer", "u2")).unwrap();
        h.gateway.push_images(Ok(urls(&["u3", "u1", "u2"])));

        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();

        let got: Vec<_> = h
            .images()
            .into_iter()
            .map(|i| (i.url, i.selected))
            .collect();
        assert_eq!(
            got,
            vec![
                ("u1".to_string(), false),
                ("u2".to_string(), true),
                ("u3".to_string(), false)
            ]
        );
        assert!(h
            .drain_events()
            .contains(&AppEvent::TitleChanged("Boxer".to_string())));
    }

    #[test]
    fn test_images_error_status_shows_empty_list() {
        let mut h = Harness::new();
        // The gateway maps a non-success status to an empty list
        h.gateway.push_images(Ok(Vec::new()));

        h.send(AppCommand::OpenBreed("unicorn".to_string()));
        h.pump();

        assert!(h.images().is_empty());
        assert!(!h.snapshot().can_retry());
    }

    #[test]
    fn test_toggle_favorite_on_breed_screen() {
        let mut h = Harness::new();
        h.gateway.push_images(Ok(urls(&["u2", "u1"])));
        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();

        h.send(AppCommand::ToggleFavorite(0));
        assert!(h.favorites.contains(&BreedImage::new("boxer", "u1")));
        assert!(h.images()[0].selected);

        h.send(AppCommand::ToggleFavorite(0));
        assert!(h.favorites.is_empty());
        assert!(!h.images()[0].selected);
        // Unliking on a breed screen keeps the image visible
        assert_eq!(h.images().len(), 2);
    }

    #[test]
    fn test_like_ignored_after_reloading_breeds() {
        let mut h = Harness::new();
        h.gateway.push_images(Ok(urls(&["u1", "u2"])));
        h.gateway.push_breeds(Ok(vec![entry("akita")]));

        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();
        h.send(AppCommand::LoadBreeds);
        h.pump();

        h.send(AppCommand::ToggleFavorite(0));
        h.send(AppCommand::ShowBreedFilter);

        assert!(h.favorites.is_empty());
        assert!(h.snapshot().breed_filter.is_empty());
        assert_eq!(h.breed_names(), vec!["akita"]);
    }

    #[test]
    fn test_reload_breeds_discards_in_flight_images() {
        let mut h = Harness::new();
        h.gateway.push_images(Ok(urls(&["u1"])));
        h.gateway.push_breeds(Ok(vec![entry("akita")]));

        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.send(AppCommand::LoadBreeds);
        // Both results arrive; the image list is stale
        h.pump();
        h.pump();

        assert_eq!(h.snapshot().screen, Screen::Breeds);
        assert_eq!(h.breed_names(), vec!["akita"]);
        h.send(AppCommand::ToggleFavorite(0));
        assert!(h.favorites.is_empty());
    }

    #[test]
    fn test_toggle_favorite_out_of_range() {
        let mut h = Harness::new();
        h.send(AppCommand::OpenFavorites);
        h.send(AppCommand::ToggleFavorite(3));
        assert!(h.favorites.is_empty());
    }

    #[test]
    fn test_favorites_screen_removes_unliked() {
        let mut h = Harness::new();
        h.favorites.toggle(&BreedImage::new("boxer", "u1")).unwrap();
        h.favorites.toggle(&BreedImage::new("akita", "a1")).unwrap();

        h.send(AppCommand::OpenFavorites);
        assert_eq!(h.images().len(), 2);
        assert!(h.images().iter().all(|i| i.selected));

        h.send(AppCommand::ToggleFavorite(0));
        assert_eq!(h.images(), vec![BreedImage::new("akita", "a1")]);
        assert_eq!(h.favorites.count(), 1);
        assert_eq!(h.gateway.image_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_breed_filter_on_favorites() {
        let mut h = Harness::new();
        h.favorites.toggle(&BreedImage::new("boxer", "u1")).unwrap();
        h.favorites.toggle(&BreedImage::new("akita", "a1")).unwrap();
        h.favorites.toggle(&BreedImage::new("boxer", "u2")).unwrap();

        h.send(AppCommand::OpenFavorites);
        h.send(AppCommand::ShowBreedFilter);
        let names: Vec<_> = h
            .snapshot()
            .breed_filter
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["Akita", "Boxer"]);

        h.send(AppCommand::SelectBreedFilter(1));
        assert_eq!(h.images().len(), 2);
        assert!(h.images().iter().all(|i| i.breed == "boxer"));

        h.send(AppCommand::SelectBreedFilter(0));
        assert_eq!(h.images(), vec![BreedImage::new("akita", "a1")]);
        assert_eq!(
            h.snapshot().breed_filter.iter().filter(|n| n.selected).count(),
            1
        );

        h.send(AppCommand::ClearBreedFilter);
        assert_eq!(h.images().len(), 3);
    }

    #[test]
    fn test_search_is_debounced() {
        let mut h = Harness::new();
        h.gateway
            .push_breeds(Ok(vec![entry("akita"), entry("boxer"), entry("bulldog")]));
        h.send(AppCommand::LoadBreeds);
        h.pump();

        let start = Instant::now();
        h.send(AppCommand::Search("b".to_string()));
        h.send(AppCommand::Search("BO".to_string()));
        h.ctrl.poll_search(start);
        assert_eq!(h.breed_names().len(), 3);

        h.ctrl.poll_search(start + Duration::from_secs(2));
        assert_eq!(h.snapshot().query, "BO");
        assert_eq!(h.breed_names(), vec!["boxer"]);
    }

    #[test]
    fn test_dismiss_reports_selected_and_drops_image_retries() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Ok(vec![entry("boxer")]));
        h.send(AppCommand::LoadBreeds);
        h.pump();

        h.gateway.push_images(Ok(urls(&["u1", "u2"])));
        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();
        h.send(AppCommand::ToggleFavorite(1));

        h.gateway.push_images(Err("offline".to_string()));
        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();
        assert!(h.snapshot().can_retry());
        h.drain_events();

        h.send(AppCommand::Dismiss);
        let snapshot = h.snapshot();
        assert_eq!(snapshot.screen, Screen::Breeds);
        assert!(!snapshot.can_retry());
        assert_eq!(h.breed_names(), vec!["boxer"]);
        assert!(h
            .drain_events()
            .iter()
            .any(|e| matches!(e, AppEvent::Dismissed { .. })));
    }

    #[test]
    fn test_dismiss_returns_selected_images() {
        let mut h = Harness::new();
        h.gateway.push_images(Ok(urls(&["u1", "u2"])));
        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.pump();
        h.send(AppCommand::ToggleFavorite(1));
        h.drain_events();

        h.send(AppCommand::Dismiss);
        let dismissed = h.drain_events().into_iter().find_map(|e| match e {
            AppEvent::Dismissed { selected } => Some(selected),
            _ => None,
        });
        assert_eq!(dismissed, Some(vec![BreedImage::new("boxer", "u2")]));
    }

    #[test]
    fn test_dismiss_discards_in_flight_images() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Ok(vec![entry("boxer")]));
        h.send(AppCommand::LoadBreeds);
        h.pump();

        h.gateway.push_images(Ok(urls(&["u1"])));
        h.send(AppCommand::OpenBreed("boxer".to_string()));
        h.send(AppCommand::Dismiss);
        h.pump();

        assert_eq!(h.snapshot().screen, Screen::Breeds);
        assert_eq!(h.breed_names(), vec!["boxer"]);
    }

    #[test]
    fn test_dismiss_refetches_missing_breeds() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Ok(vec![entry("akita")]));

        h.send(AppCommand::OpenFavorites);
        h.send(AppCommand::Dismiss);
        assert!(h.snapshot().is_loading());

        h.pump();
        assert_eq!(h.breed_names(), vec!["akita"]);
    }

    #[test]
    fn test_dismiss_restores_breed_error() {
        let mut h = Harness::new();
        h.gateway.push_breeds(Err("offline".to_string()));
        h.send(AppCommand::LoadBreeds);
        h.pump();

        h.send(AppCommand::OpenFavorites);
        assert!(!h.snapshot().can_retry());
        h.send(AppCommand::Dismiss);

        let snapshot = h.snapshot();
        assert!(matches!(snapshot.view, ViewState::Error(ref m) if m.contains("offline")));
        assert_eq!(snapshot.pending_retries, vec![PendingOperation::ListBreeds]);
        assert_eq!(h.gateway.breed_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_until_shutdown() {
        let (cmd_tx, cmd_rx) = unbounded();
        let (event_tx, events) = unbounded();
        let state = Arc::new(Mutex::new(AppSnapshot::default()));
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.push_breeds(Ok(vec![entry("akita")]));
        let favorites = FavoritesStore::new(Arc::new(MemoryStore::new()));

        let mut ctrl = AppController::new(
            cmd_rx,
            cmd_tx.clone(),
            event_tx,
            Arc::clone(&state),
            gateway,
            favorites,
        );
        let handle = std::thread::spawn(move || ctrl.run());

        cmd_tx.send(AppCommand::LoadBreeds).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !matches!(state.lock().unwrap().view, ViewState::Breeds(_)) {
            assert!(Instant::now() < deadline, "breeds never loaded");
            let _ = events.recv_timeout(Duration::from_millis(100));
        }

        cmd_tx.send(AppCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
