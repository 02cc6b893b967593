pub mod alert;
pub mod banner;
