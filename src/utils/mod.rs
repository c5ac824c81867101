pub mod auth;
pub mod midtrans;
