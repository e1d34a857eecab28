//! Route-subsystem error type.

use thiserror::Error;

use nav_graph::GraphError;

/// Errors produced by `nav-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Snap, reachability, or provider failure underneath the planner.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A structural invariant of [`RouteMeta`][crate::RouteMeta] is broken.
    #[error("malformed route: {0}")]
    MalformedRoute(&'static str),
}

pub type RouteResult<T> = Result<T, RouteError>;
