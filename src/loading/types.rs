//! Loading state type

/// State of an asynchronous operation
///
/// Transitions flow `Initial -> Loading -> {Success, Failure}`. A terminal
/// state is only replaced by a fresh `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingState<S, F> {
    /// Nothing started yet
    Initial,
    /// Operation in flight
    Loading,
    /// Operation finished with a value
    Success(S),
    /// Operation finished with an error
    Failure(F),
}

impl<S, F> Default for LoadingState<S, F> {
    fn default() -> Self {
        Self::Initial
    }
}

impl<S, F> LoadingState<S, F> {
    /// Check if nothing has started
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }

    /// Check if the operation is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the operation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Check if the operation failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Check if the operation reached a terminal state
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failure(_))
    }

    /// Success payload, if any
    pub fn value(&self) -> Option<&S> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Failure payload, if any
    pub fn error(&self) -> Option<&F> {
        match self {
            Self::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// Borrow the payloads
    pub fn as_ref(&self) -> LoadingState<&S, &F> {
        match self {
            Self::Initial => LoadingState::Initial,
            Self::Loading => LoadingState::Loading,
            Self::Success(value) => LoadingState::Success(value),
            Self::Failure(error) => LoadingState::Failure(error),
        }
    }

    /// Transform the success payload, keeping the variant
    pub fn map<T, M>(self, f: M) -> LoadingState<T, F>
    where
        M: FnOnce(S) -> T,
    {
        match self {
            Self::Initial => LoadingState::Initial,
            Self::Loading => LoadingState::Loading,
            Self::Success(value) => LoadingState::Success(f(value)),
            Self::Failure(error) => LoadingState::Failure(error),
        }
    }

    /// Transform the failure payload, keeping the variant
    pub fn map_err<G, M>(self, f: M) -> LoadingState<S, G>
    where
        M: FnOnce(F) -> G,
    {
        match self {
            Self::Initial => LoadingState::Initial,
            Self::Loading => LoadingState::Loading,
            Self::Success(value) => LoadingState::Success(value),
            Self::Failure(error) => LoadingState::Failure(f(error)),
        }
    }

    /// Convert a terminal state into a `Result`; `None` while not finished
    pub fn into_result(self) -> Option<Result<S, F>> {
        match self {
            Self::Success(value) => Some(Ok(value)),
            Self::Failure(error) => Some(Err(error)),
            Self::Initial | Self::Loading => None,
        }
    }
}

impl<S, F> From<Result<S, F>> for LoadingState<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}
