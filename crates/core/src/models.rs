pub mod alarm;
pub mod friends;
pub mod message;
pub mod volunteer;
