pub mod user_locks;

pub use user_locks::UserLocks;
