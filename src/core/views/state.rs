//! Loading/ready/submitting/errored state shared by all views

use crate::core::error::ApiError;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// A fetch is in flight. Nothing is shown yet.
    Loading,
    Ready(T),
    /// A create action is in flight; inputs should be disabled.
    Submitting(T),
    /// `retained` is only set when a submission failed on top of loaded data.
    Errored { message: String, retained: Option<T> },
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, ApiError>) -> ViewState<T> {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Errored {
                message: e.to_string(),
                retained: None,
            },
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) | ViewState::Submitting(data) => Some(data),
            ViewState::Errored { retained, .. } => retained.as_ref(),
            ViewState::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ViewState::Submitting(_))
    }

    /// Data a new submission may start from: loaded data, or data kept after a
    /// failed submission.
    fn submittable(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            ViewState::Errored {
                retained: Some(data),
                ..
            } => Some(data),
            _ => None,
        }
    }
}

/// Owns a view's current state and broadcasts every transition.
#[derive(Debug)]
pub struct StateCell<T> {
    sender: watch::Sender<ViewState<T>>,
}

impl<T: Clone> Default for StateCell<T> {
    fn default() -> Self {
        StateCell::new()
    }
}

impl<T: Clone> StateCell<T> {
    pub fn new() -> StateCell<T> {
        let (sender, _) = watch::channel(ViewState::Loading);
        StateCell { sender }
    }

    pub fn get(&self) -> ViewState<T> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.sender.subscribe()
    }

    pub fn set(&self, state: ViewState<T>) {
        self.sender.send_replace(state);
    }

    pub fn begin_loading(&self) {
        self.set(ViewState::Loading);
    }

    pub fn finish_loading(&self, result: Result<T, ApiError>) {
        self.set(ViewState::from_result(result));
    }

    /// Moves to `Submitting` and hands out a copy of the data, or returns
    /// `None` if there is nothing loaded to submit against.
    pub fn begin_submitting(&self) -> Option<T> {
        let data = self.sender.borrow().submittable().cloned()?;
        self.set(ViewState::Submitting(data.clone()));
        Some(data)
    }

    pub fn fail_submitting(&self, data: T, error: &ApiError) {
        self.set(ViewState::Errored {
            message: error.to_string(),
            retained: Some(data),
        });
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.sender.borrow().data().map(f)
    }
}
