pub mod application_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod notification_service;
pub mod partner_service;
pub mod payment_service;
pub mod task_service;
pub mod ticket_service;
pub mod user_service;
