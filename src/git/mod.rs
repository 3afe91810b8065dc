mod commit;
mod diff;
mod repository;

pub use diff::CommitDiff;
pub use repository::Repository;

#[cfg(test)]
pub(crate) use repository::fixture;
