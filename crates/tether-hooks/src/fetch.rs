use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tether_core::*;

#[derive(Clone, Debug, Default, PartialEq)]
struct Snapshot {
    loading: bool,
    error: Option<FetchError>,
    data: Option<Value>,
}

/// Progress of the latest GET.
#[derive(Clone)]
pub struct FetchState {
    pub loading: bool,
    pub error: Option<FetchError>,
    pub data: Option<Value>,
    refetch: Callback,
}

impl FetchState {
    /// Starts a new request. Any request still in flight becomes stale and its
    /// result is discarded.
    pub fn refetch(&self) {
        (self.refetch)()
    }

    pub fn refetcher(&self) -> Callback {
        self.refetch.clone()
    }
}

impl std::fmt::Debug for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchState")
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// GETs `config.url` once after mount and again on every `refetch`.
///
/// Only the most recently started request may settle the state, and nothing
/// is written once the mount is gone.
pub fn use_fetch(config: RequestConfig) -> FetchState {
    let state = remember(|| signal(Snapshot::default()));
    let generation = remember(|| Cell::new(0u64));
    let request = remember(|| RefCell::new(config.clone()));
    *request.borrow_mut() = config;
    let liveness = current_scope().map(|s| s.liveness());
    let platform = platform();

    let start: Callback = {
        let state = (*state).clone();
        Rc::new(move || {
            if liveness.as_ref().is_some_and(|l| !l.is_alive()) {
                log::debug!("use_fetch: refetch after unmount ignored");
                return;
            }
            let mine = generation.get() + 1;
            generation.set(mine);
            state.update(|s| s.loading = true);

            let config = request.borrow().clone();
            log::debug!("use_fetch: GET {} (#{mine})", config.url);

            let state = state.clone();
            let generation = generation.clone();
            let liveness = liveness.clone();
            platform.http_get(
                &config,
                Box::new(move |result| {
                    if liveness.as_ref().is_some_and(|l| !l.is_alive()) {
                        log::debug!("use_fetch: #{mine} finished after unmount; dropped");
                        return;
                    }
                    if generation.get() != mine {
                        log::debug!("use_fetch: #{mine} is stale; dropped");
                        return;
                    }
                    let next = match result {
                        Ok(data) => Snapshot {
                            loading: false,
                            error: None,
                            data: Some(data),
                        },
                        Err(error) => {
                            log::warn!("use_fetch: {error}");
                            Snapshot {
                                loading: false,
                                error: Some(error),
                                data: None,
                            }
                        }
                    };
                    state.set(next);
                }),
            );
        })
    };

    mount_effect({
        let start = start.clone();
        move || {
            start();
            Dispose::noop()
        }
    });

    let snapshot = state.get();
    FetchState {
        loading: snapshot.loading,
        error: snapshot.error,
        data: snapshot.data,
        refetch: start,
    }
}
