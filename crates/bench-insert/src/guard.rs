//! Scoped bulk-insert guard.

use crate::error::InsertError;
use crate::store::BulkInsertSession;
use bench_core::Document;
use tracing::{debug, error};

/// Owns a [`BulkInsertSession`] and flushes it when released.
///
/// Call [`finish`](BulkInsert::finish) to flush and observe the result.
/// If the guard is dropped without `finish` (an insert failed and the
/// caller returned early), buffered documents are still flushed and a flush
/// failure is logged.
pub struct BulkInsert<S: BulkInsertSession> {
    session: Option<S>,
}

impl<S: BulkInsertSession> BulkInsert<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Store one document through the session.
    pub fn store<D: Document>(&mut self, document: &mut D) -> Result<(), InsertError> {
        match self.session.as_mut() {
            Some(session) => session.store(document),
            None => unreachable!("session is only taken by finish or drop"),
        }
    }

    /// Documents accepted so far.
    pub fn stored(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.stored())
    }

    /// Flush remaining documents and close the session.
    ///
    /// Returns the number of documents stored through this session.
    pub fn finish(mut self) -> Result<u64, InsertError> {
        match self.session.take() {
            Some(mut session) => {
                session.flush()?;
                Ok(session.stored())
            }
            None => Ok(0),
        }
    }
}

impl<S: BulkInsertSession> Drop for BulkInsert<S> {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        let pending = session.buffered();
        debug!("Releasing bulk insert session with {} buffered documents", pending);

        if let Err(e) = session.flush() {
            error!("Failed to flush {} buffered documents on release: {}", pending, e);
        }
    }
}
