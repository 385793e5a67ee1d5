pub mod study_permit;
