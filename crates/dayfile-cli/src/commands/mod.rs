//! Command implementations.

pub mod check;
pub mod list;
pub mod organize;
pub mod reclaim;
pub mod run;

pub use self::check::execute_check;
pub use self::list::execute_list;
pub use self::organize::execute_organize;
pub use self::reclaim::execute_reclaim;
pub use self::run::execute_run;
