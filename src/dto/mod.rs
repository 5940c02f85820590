pub mod application_dto;
pub mod auth_dto;
pub mod payment_dto;
pub mod task_dto;
pub mod ticket_dto;
pub mod upload_dto;
