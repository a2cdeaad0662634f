pub mod enrollments;
pub mod invite_codes;

pub use enrollments::EnrollmentManager;
pub use invite_codes::InviteCodeRegistry;
