use ops_portal::{
    config::{get_config, init_config},
    lifecycle::{Entity, Status},
    models::{notification::unread_count, user::Role},
    services::dashboard_service::{overdue_tasks, status_counts},
    session::Session,
    utils::time::now,
    Portal,
};
use std::collections::BTreeMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    init_config()?;
    let config = get_config()?;

    let portal = Portal::new(config)?;
    let mut session = Session::new();

    match (&config.operator_email, &config.operator_password) {
        (Some(email), Some(password)) => {
            if let Err(err) = session.login(&portal.auth_service, email, password).await {
                anyhow::bail!("Login failed: {}", err.user_message());
            }
        }
        _ => {
            if session.load(&portal.auth_service).await?.is_none() {
                anyhow::bail!("Not authenticated. Set PORTAL_EMAIL and PORTAL_PASSWORD.");
            }
        }
    }

    let Some(user) = session.current() else {
        anyhow::bail!("Not authenticated");
    };
    info!(user = %user.name, role = %user.role, home = session.home_path(), "Signed in");
    println!("{} ({})", user.name, user.role);

    let page = portal.page();
    let role = user.role;
    match role {
        Role::Admin => {
            let mut tickets = page.tickets();
            tickets.refresh().await?;
            print_counts("Tickets", tickets.items());

            let mut applications = page.applications();
            applications.refresh().await?;
            print_counts("Applications", applications.items());

            let mut payments = page.payments();
            payments.refresh().await?;
            println!("Payments awaiting verification: {}", payments.items().len());
        }
        Role::Employee => {
            let mut tasks = page.my_tasks();
            tasks.refresh().await?;
            print_counts("My tasks", tasks.items());
            let overdue = overdue_tasks(tasks.items(), now());
            if !overdue.is_empty() {
                println!("Overdue:");
                for task in overdue {
                    println!("  - {}", task.title);
                }
            }
        }
        Role::Partner => {
            let mut applications = page.applications();
            applications.refresh().await?;
            print_counts("Applications", applications.items());
        }
        Role::Client => {
            let payments = page.payment_service.for_client().await?;
            for payment in &payments {
                println!(
                    "Payment {} ({}): {} outstanding{}",
                    payment.id,
                    payment.status.as_str(),
                    payment.outstanding(),
                    if payment.status.accepts_receipt() {
                        ", receipt needed"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    match page.notification_service.list().await {
        Ok(notifications) => println!("Unread notifications: {}", unread_count(&notifications)),
        Err(err) => warn!(error = %err, "Could not load notifications"),
    }

    page.close();
    Ok(())
}

// PORTAL_LOG_FORMAT=json switches to one JSON object per line.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("PORTAL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn print_counts<E: Entity>(title: &str, items: &[E]) {
    let counts: BTreeMap<&'static str, usize> = status_counts(items);
    println!("{} ({}):", title, items.len());
    for (status, count) in counts {
        println!("  {:<14} {}", status, count);
    }
}
