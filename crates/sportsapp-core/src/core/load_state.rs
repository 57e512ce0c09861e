//! Generic loading state for async views.

use super::failure::{ClassifiedFailure, UiMessage};

/// State of one asynchronously loaded view.
///
/// Every fetch outcome is folded into exactly one of these variants, so a
/// view can never show stale data while a newer request is loading.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Data is being fetched
    Loading,
    /// Data successfully loaded and non-empty
    Loaded(T),
    /// Fetch succeeded but there is nothing to show
    Empty(UiMessage),
    /// Fetch failed
    Error(ClassifiedFailure),
}

impl<T> LoadState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    /// Loaded, empty or failed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoadState::Loaded(_) | LoadState::Empty(_) | LoadState::Error(_)
        )
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ClassifiedFailure> {
        match self {
            LoadState::Error(failure) => Some(failure),
            _ => None,
        }
    }

    /// Message to show for the empty and error variants
    pub fn ui_message(&self) -> Option<UiMessage> {
        match self {
            LoadState::Empty(ui) => Some(*ui),
            LoadState::Error(failure) => Some(failure.ui),
            _ => None,
        }
    }

    /// Fold a fetch result into a state, using `is_empty` to pick `Empty`
    pub fn from_result<E>(
        result: Result<T, E>,
        is_empty: impl FnOnce(&T) -> bool,
        empty: UiMessage,
    ) -> Self
    where
        E: std::error::Error + 'static,
    {
        match result {
            Ok(data) if is_empty(&data) => LoadState::Empty(empty),
            Ok(data) => LoadState::Loaded(data),
            Err(err) => LoadState::Error(ClassifiedFailure::from_error(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::failure::FailureCategory;
    use crate::error::{ApiError, AppError};

    #[test]
    fn test_default_is_idle() {
        let state: LoadState<Vec<u32>> = LoadState::default();
        assert!(state.is_idle());
        assert!(!state.is_terminal());
        assert!(state.data().is_none());
    }

    #[test]
    fn test_from_result_success_and_empty() {
        let state = LoadState::from_result(
            Ok::<_, AppError>(vec![1, 2]),
            |v: &Vec<i32>| v.is_empty(),
            UiMessage::NO_RESULTS,
        );
        assert_eq!(state.data(), Some(&vec![1, 2]));

        let state = LoadState::from_result(
            Ok::<_, AppError>(Vec::<i32>::new()),
            |v| v.is_empty(),
            UiMessage::NO_RESULTS,
        );
        assert_eq!(state, LoadState::Empty(UiMessage::NO_RESULTS));
        assert_eq!(state.ui_message(), Some(UiMessage::NO_RESULTS));
    }

    #[test]
    fn test_from_result_error_is_classified() {
        let err = AppError::Api(ApiError::Http {
            status: 429,
            endpoint: "/searchteams.php".to_string(),
            message: "slow down".to_string(),
        });
        let state: LoadState<Vec<i32>> =
            LoadState::from_result(Err(err), |v| v.is_empty(), UiMessage::NO_RESULTS);

        let failure = state.failure().expect("should be an error state");
        assert_eq!(failure.category, FailureCategory::RateLimited);
        assert!(state.is_terminal());
    }
}
