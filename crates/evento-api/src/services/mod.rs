// Services layer for business logic
// Services own validation and side-effect orchestration, calling storage
// directly; the capacity/waitlist transitions stay in the core engine.

pub mod attendance;
pub mod coordinator;
pub mod event;
pub mod notification;
pub mod registration;
pub mod stats;
pub mod student;

pub use attendance::AttendanceService;
pub use coordinator::CoordinatorService;
pub use event::EventService;
pub use notification::NotificationService;
pub use registration::RegistrationService;
pub use stats::StatsService;
pub use student::StudentService;
