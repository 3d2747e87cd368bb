//! End-to-end search flows through the public API.

use std::sync::Mutex;
use std::time::Duration;

use pixgrid::api::{FetchWorker, Job, WorkerEvent};
use pixgrid::gallery::{CardGrid, GalleryRenderer};
use pixgrid::notify::{ToastLevel, ToastQueue};
use pixgrid::prelude::*;
use pixgrid::preview::Lightbox;
use pixgrid::search::messages;

/// Fake API serving `total` matches, `per_page` at a time.
struct FakeApi {
    total: usize,
    per_page: usize,
    seen: Mutex<Vec<(String, u32)>>,
}

impl FakeApi {
    fn new(total: usize, per_page: usize) -> Self {
        Self {
            total,
            per_page,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<(String, u32)> {
        self.seen.lock().unwrap().clone()
    }
}

impl FetchClient for FakeApi {
    fn fetch_gallery(&self, request: &PageRequest) -> Result<ResultPage, FetchError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.query.clone(), request.page));
        if request.query == "offline" {
            return Err(FetchError::Transport("connection refused".to_string()));
        }
        let total = if request.query == "xyzzynomatch" {
            0
        } else {
            self.total
        };
        let start = (request.page as usize - 1) * self.per_page;
        let end = (start + self.per_page).min(total);
        let items = (start..end.max(start))
            .map(|i| ImageResult {
                thumbnail_url: format!("https://cdn.test/{}/{i}_640.jpg", request.query),
                full_image_url: format!("https://cdn.test/{}/{i}_1280.jpg", request.query),
                tags: request.query.clone(),
                ..ImageResult::default()
            })
            .collect();
        Ok(ResultPage {
            items,
            total_matches: total,
        })
    }

    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(url.as_bytes().to_vec())
    }
}

type Controller = SearchController<CardGrid<Lightbox>, ToastQueue>;

fn controller() -> Controller {
    SearchController::new(CardGrid::new(Lightbox::new()), ToastQueue::new(16))
}

fn messages_of(search: &Controller) -> Vec<(ToastLevel, String)> {
    search
        .notifier()
        .iter()
        .map(|t| (t.level, t.message.clone()))
        .collect()
}

#[test]
fn test_scrolling_through_every_page() {
    let api = FakeApi::new(100, 20);
    let mut search = controller();

    let first = search.submit_search("cats").unwrap();
    let outcome = search.run_fetch_cycle(&api, first);
    assert_eq!(
        outcome,
        CycleOutcome::Rendered {
            added: 20,
            shown: 20,
            total: 100
        }
    );
    assert_eq!(search.watcher().target(), Some(19));

    let mut pages = 1;
    while let Some(request) = search.on_visibility(1.0) {
        search.run_fetch_cycle(&api, request);
        pages += 1;
        // Scrolling away re-arms the trigger for the next last card.
        search.on_visibility(0.0);
    }
    assert_eq!(pages, 5);
    assert_eq!(search.renderer().len(), 100);
    assert_eq!(search.phase(), SearchPhase::Exhausted);
    assert!(!search.watcher().is_connected());
    assert_eq!(search.renderer().preview().links().len(), 100);

    let notes = messages_of(&search);
    assert_eq!(
        notes,
        vec![
            (ToastLevel::Success, messages::found(100)),
            (ToastLevel::Info, messages::END_OF_RESULTS.to_string()),
        ]
    );
    let pages_seen: Vec<u32> = api.seen().into_iter().map(|(_, page)| page).collect();
    assert_eq!(pages_seen, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_no_match_query() {
    let api = FakeApi::new(100, 20);
    let mut search = controller();
    let request = search.submit_search("xyzzynomatch").unwrap();
    assert_eq!(search.run_fetch_cycle(&api, request), CycleOutcome::EmptyResult);
    assert!(search.renderer().is_empty());
    assert_eq!(search.watcher().target(), None);
    assert_eq!(
        messages_of(&search),
        vec![(ToastLevel::Error, messages::NO_MATCHES.to_string())]
    );
}

#[test]
fn test_transport_failure_is_reported_not_raised() {
    let api = FakeApi::new(100, 20);
    let mut search = controller();
    let request = search.submit_search("offline").unwrap();
    let outcome = search.run_fetch_cycle(&api, request);
    assert!(matches!(outcome, CycleOutcome::Faulted(FetchError::Transport(_))));
    assert_eq!(search.phase(), SearchPhase::Idle);
    assert_eq!(
        messages_of(&search),
        vec![(ToastLevel::Error, messages::FETCH_FAILED.to_string())]
    );
}

#[test]
fn test_switching_queries_starts_over() {
    let api = FakeApi::new(100, 20);
    let mut search = controller();
    let request = search.submit_search("cats").unwrap();
    search.run_fetch_cycle(&api, request);
    let request = search.on_visibility(1.0).unwrap();
    search.run_fetch_cycle(&api, request);
    assert_eq!(search.renderer().len(), 40);

    let request = search.submit_search("dogs").unwrap();
    assert_eq!(request.page, 1);
    assert!(search.renderer().is_empty());
    search.run_fetch_cycle(&api, request);
    assert_eq!(search.state().shown(), 20);
    assert!(search
        .renderer()
        .cards()
        .iter()
        .all(|card| card.tags == "dogs"));
}

#[test]
fn test_worker_delivers_results_in_order() {
    let worker = FetchWorker::spawn(FakeApi::new(100, 20));
    let mut search = controller();
    let request = search.submit_search("cats").unwrap();
    assert!(worker.submit(Job::Page(request)));
    assert!(worker.submit(Job::Image("https://cdn.test/a.jpg".to_string())));

    let Some(WorkerEvent::Page { request, result }) = worker.next_timeout(Duration::from_secs(5))
    else {
        panic!("expected a page event first");
    };
    let outcome = search.complete_fetch(request, result);
    assert!(matches!(outcome, CycleOutcome::Rendered { added: 20, .. }));

    match worker.next_timeout(Duration::from_secs(5)) {
        Some(WorkerEvent::Image { url, result }) => {
            assert_eq!(url, "https://cdn.test/a.jpg");
            assert_eq!(result.unwrap(), url.as_bytes());
        }
        other => panic!("expected an image event, got {other:?}"),
    }
}
