pub mod pull_request;
pub mod reassignment;
pub mod reviewer_selector;
pub mod team;
pub mod user;

pub use pull_request::PullRequestService;
pub use reassignment::ReassignmentService;
pub use reviewer_selector::{RandomSelector, ReviewerSelector, SeededSelector};
pub use team::TeamService;
pub use user::UserService;
