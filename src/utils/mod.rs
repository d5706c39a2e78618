pub mod file;
pub mod network;
pub mod qrcode;
