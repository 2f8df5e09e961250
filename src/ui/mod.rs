pub mod charts;
pub mod login;
pub mod panels;
