pub mod contact;
pub mod email;
pub mod group;
pub mod name;
pub mod phone;

pub use contact::{ContactRecord, EmailEntry, EmailLabel, PhoneEntry, PhoneLabel};
pub use email::normalize_email;
pub use group::{validate_batch_size, validate_group_label, DEFAULT_BATCH_SIZE, DEFAULT_GROUP};
pub use name::normalize_name;
pub use phone::{normalize_phone_for_match, PHONE_MATCH_DIGITS};
