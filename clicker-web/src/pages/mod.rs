pub mod friends;
pub mod home;
pub mod loading;
pub mod not_found;
pub mod swap;
pub mod tasks;
