pub mod checkup;
pub mod health;
pub mod outreach;
