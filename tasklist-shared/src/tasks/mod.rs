/// Task groups and tasks of a user
///
/// - `board`: in-memory hierarchy rules (uniqueness, dense 1-based ordering)
/// - `service`: persists board changes through a `UserStore`

pub mod board;
pub mod service;

pub use board::TaskBoard;
pub use service::TaskService;
