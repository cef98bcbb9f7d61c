mod category;
mod entry;
mod ids;
mod student;

pub use category::{Category, CategoryError};
pub use entry::{EntryDraft, EntryError, ProgressEntry};
pub use ids::{EntryId, ParseIdError};
pub use student::{StudentName, StudentNameError};
