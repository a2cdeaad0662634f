pub mod enrollments;
pub mod invite_codes;
