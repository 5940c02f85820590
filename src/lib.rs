pub mod assignment;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::forms::registration::{RegistrationForm, RoleDetails};
use crate::forms::FormPolicy;
use crate::lifecycle::LifecycleView;
use crate::models::application::Application;
use crate::models::payment::Payment;
use crate::models::task::Task;
use crate::models::ticket::Ticket;
use crate::models::user::User;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    dashboard_service::DashboardService, directory_service::DirectoryService,
    notification_service::NotificationService, partner_service::PartnerService,
    payment_service::PaymentService, task_service::TaskService, ticket_service::TicketService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct Portal {
    pub client: ApiClient,
    pub policy: FormPolicy,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub partner_service: PartnerService,
    pub directory_service: DirectoryService,
    pub ticket_service: TicketService,
    pub task_service: TaskService,
    pub application_service: ApplicationService,
    pub payment_service: PaymentService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    applications_page_size: u32,
}

impl Portal {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self::from_client(
            client,
            FormPolicy::from_config(config),
            config.applications_page_size,
        ))
    }

    pub fn from_client(client: ApiClient, policy: FormPolicy, applications_page_size: u32) -> Self {
        let auth_service = AuthService::new(client.clone(), policy);
        let user_service = UserService::new(client.clone());
        let partner_service = PartnerService::new(client.clone(), policy);
        let directory_service = DirectoryService::new(client.clone());
        let ticket_service = TicketService::new(client.clone());
        let task_service = TaskService::new(client.clone());
        let application_service = ApplicationService::new(client.clone(), applications_page_size);
        let payment_service = PaymentService::new(client.clone());
        let notification_service = NotificationService::new(client.clone());
        let dashboard_service = DashboardService::new(
            task_service.clone(),
            directory_service.clone(),
            application_service.clone(),
        );

        Self {
            client,
            policy,
            auth_service,
            user_service,
            partner_service,
            directory_service,
            ticket_service,
            task_service,
            application_service,
            payment_service,
            notification_service,
            dashboard_service,
            applications_page_size,
        }
    }

    /// Services for one page. Closing the page cancels its requests
    /// without touching other pages.
    pub fn page(&self) -> Self {
        Self::from_client(self.client.scoped(), self.policy, self.applications_page_size)
    }

    pub fn close(&self) {
        self.client.cancel();
    }

    pub fn tickets(&self) -> LifecycleView<Ticket, TicketService> {
        LifecycleView::with_scope(self.ticket_service.clone(), self.client.scope().child_token())
    }

    pub fn tasks(&self) -> LifecycleView<Task, TaskService> {
        LifecycleView::with_scope(self.task_service.clone(), self.client.scope().child_token())
    }

    pub fn my_tasks(&self) -> LifecycleView<Task, TaskService> {
        LifecycleView::with_scope(self.task_service.mine(), self.client.scope().child_token())
    }

    pub fn applications(&self) -> LifecycleView<Application, ApplicationService> {
        LifecycleView::with_scope(
            self.application_service.clone(),
            self.client.scope().child_token(),
        )
    }

    pub fn payments(&self) -> LifecycleView<Payment, PaymentService> {
        LifecycleView::with_scope(self.payment_service.clone(), self.client.scope().child_token())
    }

    /// Creates an account from the add-user form; partners are registered
    /// with their documents.
    pub async fn add_user(&self, form: RegistrationForm) -> Result<User> {
        match form.details {
            RoleDetails::Partner(_) => self.partner_service.register(form).await,
            _ => self.auth_service.create_user(&form).await,
        }
    }
}
