pub mod db;
pub mod question;
pub mod session;
pub mod stats;
