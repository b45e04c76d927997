//! Session repositories
//!
//! The session controller persists its snapshot through [`SessionRepository`]
//! and never touches storage directly. Two bindings are provided:
//! - [`SqliteSessionStore`]: the on-disk store used by the CLI
//! - [`MemorySessionStore`]: an in-process store for tests and embedding

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use crate::error::Result;
use crate::session::SessionSnapshot;

/// Storage for the single in-progress session snapshot.
pub trait SessionRepository {
    /// Overwrite the stored snapshot.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// The stored snapshot, if any.
    ///
    /// Content that no longer parses is reported as an error; callers decide
    /// whether to ignore it.
    fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Remove the stored snapshot. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

impl<T: SessionRepository + ?Sized> SessionRepository for &T {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        (**self).load()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

impl<T: SessionRepository + ?Sized> SessionRepository for Box<T> {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        (**self).load()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
