pub mod clock;
pub mod identity_service;
pub mod module_service;
pub mod otp_sender;
pub mod otp_service;
