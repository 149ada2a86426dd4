use std::collections::VecDeque;
use std::sync::Mutex;

use super::*;

/// Scripted fetcher: each call takes the next (delay, result) from the
/// queue and records the request it served.
struct ScriptedFetcher {
    script: Mutex<VecDeque<(Duration, Result<String, PreviewError>)>>,
    calls: Mutex<Vec<(String, FlatFields)>>,
}

impl ScriptedFetcher {
    fn new(script: Vec<(Duration, Result<String, PreviewError>)>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into()), calls: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> Vec<(String, FlatFields)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RenderPreview for ScriptedFetcher {
    async fn render(&self, doc_type: &str, fields: &FlatFields) -> Result<String, PreviewError> {
        self.calls
            .lock()
            .unwrap()
            .push((doc_type.to_string(), fields.clone()));
        let (delay, result) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok("<p>unscripted</p>".to_string())));
        tokio::time::sleep(delay).await;
        result
    }
}

fn flat(pairs: &[(&str, &str)]) -> FlatFields {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

async fn wait_for<F>(rx: &mut watch::Receiver<PreviewState>, predicate: F) -> PreviewState
where
    F: Fn(&PreviewState) -> bool,
{
    loop {
        if predicate(&rx.borrow()) {
            return rx.borrow().clone();
        }
        rx.changed().await.expect("pump alive");
    }
}

// =========================================================================
// debounce
// =========================================================================

#[tokio::test(start_paused = true)]
async fn burst_of_updates_issues_one_request_with_final_state() {
    let fetcher = ScriptedFetcher::new(vec![(Duration::ZERO, Ok("<p>v3</p>".to_string()))]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();
    let mut state = pump.state();

    for (i, value) in ["a", "ab", "abc"].iter().enumerate() {
        handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", value)])));
        if i < 2 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    let ready = wait_for(&mut state, |s| matches!(s, PreviewState::Ready(_))).await;
    assert_eq!(ready, PreviewState::Ready("<p>v3</p>".to_string()));

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1, "burst coalesced into one request");
    assert_eq!(calls[0].0, "csa");
    assert_eq!(calls[0].1, flat(&[("providerName", "abc")]), "only the final state is fetched");
}

#[tokio::test(start_paused = true)]
async fn settled_bursts_far_apart_each_fetch() {
    let fetcher = ScriptedFetcher::new(vec![
        (Duration::ZERO, Ok("<p>one</p>".to_string())),
        (Duration::ZERO, Ok("<p>two</p>".to_string())),
    ]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();
    let mut state = pump.state();

    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "Acme")])));
    wait_for(&mut state, |s| *s == PreviewState::Ready("<p>one</p>".to_string())).await;

    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "Beta")])));
    wait_for(&mut state, |s| *s == PreviewState::Ready("<p>two</p>".to_string())).await;

    assert_eq!(fetcher.calls().len(), 2);
}

// =========================================================================
// latest-wins sequencing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn superseded_slow_response_is_dropped() {
    let fetcher = ScriptedFetcher::new(vec![
        (Duration::from_millis(1000), Ok("<p>stale</p>".to_string())),
        (Duration::from_millis(10), Ok("<p>fresh</p>".to_string())),
    ]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();
    let mut state = pump.state();

    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "Old")])));
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "New")])));

    let ready = wait_for(&mut state, |s| matches!(s, PreviewState::Ready(_))).await;
    assert_eq!(ready, PreviewState::Ready("<p>fresh</p>".to_string()));

    // Let the slow first fetch finish; it must not clobber the display.
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(*state.borrow(), PreviewState::Ready("<p>fresh</p>".to_string()));
    assert_eq!(fetcher.calls().len(), 2);
}

// =========================================================================
// failure & placeholders
// =========================================================================

#[tokio::test(start_paused = true)]
async fn fetch_failure_shows_fixed_fallback() {
    let fetcher = ScriptedFetcher::new(vec![(
        Duration::ZERO,
        Err(PreviewError::Request("connection refused".to_string())),
    )]);
    let pump = PreviewPump::spawn(fetcher);
    let handle = pump.handle();
    let mut state = pump.state();

    handle.update("csa", &FieldSet::default());
    let failed = wait_for(&mut state, |s| *s == PreviewState::Unavailable).await;
    assert_eq!(failed.markup(), PREVIEW_FALLBACK_HTML);
}

#[tokio::test(start_paused = true)]
async fn initial_state_is_structured_loading_placeholder() {
    let pump = PreviewPump::spawn(ScriptedFetcher::new(vec![]));
    let state = pump.state();
    assert_eq!(*state.borrow(), PreviewState::Loading);
    assert_eq!(state.borrow().markup(), PREVIEW_LOADING_HTML);
    assert_ne!(PREVIEW_LOADING_HTML, PREVIEW_FALLBACK_HTML);
}

// =========================================================================
// routing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn undetermined_doc_type_never_fetches() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();

    handle.update(docs::UNKNOWN, &FieldSet::from_flat(&flat(&[("purpose", "x")])));
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert!(fetcher.calls().is_empty());
    assert_eq!(*pump.state().borrow(), PreviewState::Loading);
}

#[tokio::test(start_paused = true)]
async fn undetermined_update_cancels_pending_fetch() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();

    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "Acme")])));
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.update(docs::UNKNOWN, &FieldSet::default());
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert!(fetcher.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn undetermined_update_invalidates_in_flight_fetch() {
    let fetcher = ScriptedFetcher::new(vec![(Duration::from_millis(1000), Ok("<p>stale</p>".to_string()))]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();
    let state = pump.state();

    handle.update("csa", &FieldSet::from_flat(&flat(&[("providerName", "Acme")])));
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.update(docs::UNKNOWN, &FieldSet::default());
    tokio::time::sleep(Duration::from_millis(2000)).await;

    assert_eq!(fetcher.calls().len(), 1);
    assert_eq!(*state.borrow(), PreviewState::Loading, "stale markup never surfaces");
}

#[tokio::test(start_paused = true)]
async fn mnda_renders_locally_without_fetching() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let pump = PreviewPump::spawn(fetcher.clone());
    let handle = pump.handle();
    let mut state = pump.state();

    handle.update("mnda", &FieldSet::from_flat(&flat(&[("purpose", "Partner evaluation")])));
    let ready = wait_for(&mut state, |s| matches!(s, PreviewState::Ready(_))).await;

    let PreviewState::Ready(html) = ready else { unreachable!() };
    assert!(html.contains("Mutual Non-Disclosure Agreement"));
    assert!(html.contains("Partner evaluation"));
    assert!(fetcher.calls().is_empty(), "client-rendered type bypasses the endpoint");
}

// =========================================================================
// lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn updates_after_pump_drop_are_ignored() {
    let pump = PreviewPump::spawn(ScriptedFetcher::new(vec![]));
    let handle = pump.handle();
    drop(pump);
    tokio::task::yield_now().await;

    // Send must not panic once the pump (and its receiver) are gone.
    handle.update("csa", &FieldSet::default());
}
