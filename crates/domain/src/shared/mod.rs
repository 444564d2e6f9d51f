pub mod entity;
pub mod metadata;
pub mod recurrence;
