//! Background thread that runs blocking fetches off the UI thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{FetchClient, FetchError, PageRequest, ResultPage};

/// Work handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Fetch one result page
    Page(PageRequest),
    /// Download a full-size image for the preview
    Image(String),
}

/// Completed work coming back from the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Page {
        request: PageRequest,
        result: Result<ResultPage, FetchError>,
    },
    Image {
        url: String,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// Owns a single fetch thread; jobs run in submission order.
///
/// Dropping the worker closes the job channel, which ends the thread once the
/// current job returns.
pub struct FetchWorker {
    jobs: Sender<Job>,
    events: Receiver<WorkerEvent>,
    _handle: JoinHandle<()>,
}

impl FetchWorker {
    /// Spawn the worker thread around `client`.
    pub fn spawn<C>(client: C) -> Self
    where
        C: FetchClient + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let event = match job {
                    Job::Page(request) => {
                        let result = client.fetch_gallery(&request);
                        WorkerEvent::Page { request, result }
                    }
                    Job::Image(url) => {
                        let result = client.fetch_image(&url);
                        WorkerEvent::Image { url, result }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("fetch worker exiting");
        });

        Self {
            jobs: job_tx,
            events: event_rx,
            _handle: handle,
        }
    }

    /// Queue a job. Returns false if the worker thread is gone.
    pub fn submit(&self, job: Job) -> bool {
        self.jobs.send(job).is_ok()
    }

    /// Take one finished job without blocking.
    pub fn try_next(&self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    /// Wait up to `timeout` for one finished job.
    pub fn next_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ImageResult;

    struct EchoClient;

    impl FetchClient for EchoClient {
        fn fetch_gallery(&self, request: &PageRequest) -> Result<ResultPage, FetchError> {
            if request.query == "offline" {
                return Err(FetchError::Transport("connection refused".to_string()));
            }
            Ok(ResultPage {
                items: vec![ImageResult {
                    thumbnail_url: format!("thumb-{}", request.page),
                    full_image_url: format!("full-{}", request.page),
                    tags: request.query.clone(),
                    likes: 1,
                    views: 2,
                    downloads: 3,
                }],
                total_matches: 10,
            })
        }

        fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    fn request(query: &str, page: u32) -> PageRequest {
        PageRequest {
            generation: 7,
            query: query.to_string(),
            page,
        }
    }

    #[test]
    fn test_page_job_echoes_request_with_result() {
        let worker = FetchWorker::spawn(EchoClient);
        assert!(worker.submit(Job::Page(request("cats", 2))));

        let event = worker.next_timeout(Duration::from_secs(5)).expect("event");
        let WorkerEvent::Page { request: req, result } = event else {
            panic!("expected page event");
        };
        assert_eq!(req, request("cats", 2));
        assert_eq!(result.unwrap().items[0].thumbnail_url, "thumb-2");
    }

    #[test]
    fn test_failures_are_delivered_not_swallowed() {
        let worker = FetchWorker::spawn(EchoClient);
        worker.submit(Job::Page(request("offline", 1)));
        let event = worker.next_timeout(Duration::from_secs(5)).expect("event");
        assert!(matches!(
            event,
            WorkerEvent::Page {
                result: Err(FetchError::Transport(_)),
                ..
            }
        ));
    }

    #[test]
    fn test_jobs_complete_in_submission_order() {
        let worker = FetchWorker::spawn(EchoClient);
        worker.submit(Job::Image("https://cdn.test/one.jpg".to_string()));
        worker.submit(Job::Page(request("dogs", 1)));

        let first = worker.next_timeout(Duration::from_secs(5)).expect("first");
        let second = worker.next_timeout(Duration::from_secs(5)).expect("second");
        assert!(matches!(first, WorkerEvent::Image { ref url, .. } if url.ends_with("one.jpg")));
        assert!(matches!(second, WorkerEvent::Page { .. }));
        assert!(worker.try_next().is_none());
    }
}
