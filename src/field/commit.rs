use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tracing::warn;

use super::error::FieldError;
use crate::host::HostFuture;

/// Which write a command issued to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// The full list was written.
    Set { len: usize },
    /// The list became empty and the stored value was removed.
    Remove,
}

/// Completion of a commit that has already been issued.
///
/// The local state is updated before this value exists. Awaiting it reports
/// whether the host accepted the write; dropping it does not cancel the write.
#[must_use = "a commit only reports failures when awaited"]
pub struct Commit {
    kind: Option<CommitKind>,
    write: Option<HostFuture>,
}

impl Commit {
    pub(crate) fn issued(kind: CommitKind, write: HostFuture) -> Self {
        Self {
            kind: Some(kind),
            write: Some(write),
        }
    }

    /// A command that changed nothing and wrote nothing.
    pub(crate) fn none() -> Self {
        Self {
            kind: None,
            write: None,
        }
    }

    pub fn kind(&self) -> Option<CommitKind> {
        self.kind
    }

    pub fn is_none(&self) -> bool {
        self.kind.is_none()
    }
}

impl Future for Commit {
    type Output = Result<(), FieldError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(write) = self.write.as_mut() else {
            return Poll::Ready(Ok(()));
        };
        let result = std::task::ready!(write.poll_unpin(cx));
        self.write = None;
        let kind = self.kind;
        Poll::Ready(result.map_err(|err| {
            warn!(?kind, error = %err, "field commit failed");
            FieldError::Commit(err)
        }))
    }
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("kind", &self.kind)
            .field("pending", &self.write.is_some())
            .finish()
    }
}
