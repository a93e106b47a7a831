pub mod audio;
pub mod client;
pub mod panel;
pub mod worker;
