mod submission_controller;

pub use submission_controller::{PendingSubmission, SubmissionController, SubmissionOutcome};
