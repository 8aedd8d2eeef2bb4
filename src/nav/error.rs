use crate::api::ApiFailure;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("This user role is not configured for the dashboard: {0}")]
    UnknownRole(String),
    #[error("navigation menu not loaded")]
    MenuNotLoaded,
    #[error("navigation menu has no items")]
    EmptyMenu,
    #[error("no view registered for `{0}`")]
    UnknownView(String),
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Api(#[from] ApiFailure),
}
