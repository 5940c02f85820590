pub mod application;
pub(crate) mod document_id;
pub mod notification;
pub mod payment;
pub mod task;
pub mod ticket;
pub mod user;
