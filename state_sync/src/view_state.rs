use shared_kernel::failure::Failure;

/// The four states a feature screen can be in. Controllers drive
/// `Idle -> Loading -> {Success | Error}` on `load()` and re-enter
/// `Loading` on `refresh()`.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Error(Failure),
}

impl<T> ViewState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ViewState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ViewState::Error(failure) => Some(failure),
            _ => None,
        }
    }
}
