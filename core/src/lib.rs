pub mod checkup;
pub mod error;
pub mod outreach;
