use super::reports::{print_dashboard, print_history, print_invoice, print_json, print_pending, print_revenue};
use super::formatter::{format_money, CliFormatter};
use super::{BankAction, Cli, ClientAction, Commands, ConfigAction, InvoiceAction, JobAction, SettingsAction};
use crate::billing::{current_sequence, normalize_phone_to_whatsapp_url, unbilled_total};
use crate::db::Database;
use crate::models::{Config, SettingsField, WorkStatus};
use crate::services::{
    ClientService, DashboardService, InvoiceService, NewJob, SettingsService, WorkService,
};
use crate::utils::config::save_config_to;
use crate::utils::paths::get_backup_dir;
use crate::utils::validation::{parse_cost, parse_date};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use std::path::PathBuf;

/// Resolved locations and settings for one invocation.
pub struct AppContext {
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

/// The local wall clock. Every date-sensitive command reads it from here.
fn now() -> DateTime<FixedOffset> {
    let now = Local::now();
    now.with_timezone(now.offset())
}

fn today() -> NaiveDate {
    now().date_naive()
}

pub async fn handle_command(cli: Cli, ctx: AppContext) -> Result<()> {
    match cli.command {
        Commands::Client { action } => handle_client_action(action, &ctx).await,

        Commands::Job { action } => handle_job_action(action, &ctx).await,

        Commands::Dashboard => {
            let dashboard = DashboardService::new(ctx.db_path.clone(), &ctx.config)
                .dashboard(today())
                .await?;
            print_dashboard(&dashboard, &ctx.config.currency);
            Ok(())
        }

        Commands::Revenue { json } => {
            let summary = DashboardService::new(ctx.db_path.clone(), &ctx.config)
                .revenue(now())
                .await?;
            if json {
                print_json(&summary)
            } else {
                print_revenue(&summary, &ctx.config.currency);
                Ok(())
            }
        }

        Commands::Invoice { action } => handle_invoice_action(action, &ctx).await,

        Commands::Settings { action } => handle_settings_action(action, &ctx).await,

        Commands::Bank { action } => handle_bank_action(action, &ctx).await,

        Commands::Config { action } => handle_config_action(action, ctx),

        Commands::Backup { path } => {
            let path = match path {
                Some(path) => path,
                None => get_backup_dir()?
                    .join(format!("folio-{}.db", Local::now().format("%Y%m%d-%H%M%S"))),
            };
            let db_path = ctx.db_path.clone();
            let target = path.clone();
            tokio::task::spawn_blocking(move || -> Result<()> {
                Database::new(&db_path)?.backup_to(&target)
            })
            .await?
            .with_context(|| format!("Failed to back up database to {:?}", path))?;

            CliFormatter::print_success(&format!("Database copied to {}", path.display()));
            Ok(())
        }

        Commands::Completions { shell } => {
            Cli::generate_completions(shell);
            Ok(())
        }
    }
}

async fn handle_client_action(action: ClientAction, ctx: &AppContext) -> Result<()> {
    let service = ClientService::new(ctx.db_path.clone());
    let currency = &ctx.config.currency;

    match action {
        ClientAction::Add { name, phone, package } => {
            let package_price = package
                .as_deref()
                .map(parse_cost)
                .transpose()
                .context("Invalid package price")?;

            let client = service.create_client(name, phone, package_price).await?;
            CliFormatter::print_success(&format!(
                "Added {} client '{}' (ID {})",
                client.category.to_string().to_lowercase(),
                client.name,
                client.id.unwrap_or_default()
            ));
            Ok(())
        }

        ClientAction::List => {
            let clients = service.list_clients().await?;
            CliFormatter::print_section_header("Clients");
            if clients.is_empty() {
                CliFormatter::print_empty_state("No clients yet. Add one with 'folio client add <name>'");
                return Ok(());
            }

            for client in &clients {
                let detail = match client.package_price {
                    Some(price) if client.is_package() => {
                        format!("package {}", format_money(price, currency))
                    }
                    _ => client.phone.clone().unwrap_or_default(),
                };
                CliFormatter::print_client_entry(client.id, &client.name, &detail);
            }
            Ok(())
        }

        ClientAction::Show { id } => {
            let client = service
                .get_client(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Client with ID {} not found", id))?;
            let jobs = WorkService::new(ctx.db_path.clone())
                .list_jobs(None, Some(id))
                .await?;

            CliFormatter::print_section_header(&client.name);
            CliFormatter::print_field("Category", &client.category.to_string(), None);
            if let Some(phone) = &client.phone {
                CliFormatter::print_field("Phone", phone, None);
                if let Some(link) = normalize_phone_to_whatsapp_url(phone, &ctx.config.country_code) {
                    CliFormatter::print_field("WhatsApp", &link, Some("cyan"));
                }
            }
            if let Some(price) = client.package_price {
                CliFormatter::print_field("Package", &format_money(price, currency), None);
            }
            CliFormatter::print_amount("Unbilled", unbilled_total(&jobs), currency);

            CliFormatter::print_section_header("Work");
            if jobs.is_empty() {
                CliFormatter::print_empty_state("No work recorded");
            }
            for job in &jobs {
                CliFormatter::print_work_item(job, currency);
            }
            Ok(())
        }

        ClientAction::Delete { id } => {
            service.delete_client(id).await?;
            CliFormatter::print_success(&format!("Deleted client {}", id));
            Ok(())
        }
    }
}

async fn handle_job_action(action: JobAction, ctx: &AppContext) -> Result<()> {
    let service = WorkService::new(ctx.db_path.clone());
    let currency = &ctx.config.currency;

    match action {
        JobAction::Add { client, description, cost, due, split } => {
            let cost = cost.as_deref().map(parse_cost).transpose()?;
            let due_date = due.as_deref().map(parse_date).transpose()?;
            let advance_percent =
                split.map(|percent| percent.unwrap_or(ctx.config.default_advance_percent));

            let items = service
                .add_job(NewJob {
                    client_id: client,
                    description,
                    cost,
                    due_date,
                    advance_percent,
                })
                .await?;

            CliFormatter::print_success(&format!("Recorded {} work item(s)", items.len()));
            for item in &items {
                CliFormatter::print_work_item(item, currency);
            }
            Ok(())
        }

        JobAction::List { status, client } => {
            let jobs = service.list_jobs(status.map(WorkStatus::from), client).await?;
            CliFormatter::print_section_header("Jobs");
            if jobs.is_empty() {
                CliFormatter::print_empty_state("No matching jobs");
                return Ok(());
            }

            for job in &jobs {
                CliFormatter::print_work_item(job, currency);
            }
            Ok(())
        }

        JobAction::Status { id, status } => {
            let item = service.set_status(id, status.into()).await?;
            CliFormatter::print_success(&format!("Work item {} is now {}", id, item.status));
            Ok(())
        }

        JobAction::Delete { id } => {
            service.delete_job(id).await?;
            CliFormatter::print_success(&format!("Deleted work item {}", id));
            Ok(())
        }
    }
}

async fn handle_invoice_action(action: InvoiceAction, ctx: &AppContext) -> Result<()> {
    let service = InvoiceService::new(ctx.db_path.clone(), ctx.config.country_code.clone());
    let currency = &ctx.config.currency;

    match action {
        InvoiceAction::Pending => {
            let groups = service.pending().await?;
            print_pending(&groups, currency);
            Ok(())
        }

        InvoiceAction::Show { client, json } => {
            let draft = service.draft(client, today()).await?;
            if json {
                print_json(&draft)
            } else {
                print_invoice(&draft, currency);
                Ok(())
            }
        }

        InvoiceAction::Bill { client } => {
            let count = service.bill(client).await?;
            CliFormatter::print_success(&format!("Marked {} item(s) as billed", count));
            Ok(())
        }

        InvoiceAction::Pay { client } => {
            let receipt = service.pay(client, today()).await?;
            CliFormatter::print_success(&format!(
                "Invoice {} settled: {} item(s), {}",
                receipt.invoice_id,
                receipt.items_paid,
                format_money(receipt.total, currency)
            ));
            Ok(())
        }

        InvoiceAction::History { limit } => {
            let entries = service
                .history(limit.unwrap_or(ctx.config.history_limit))
                .await?;
            print_history(&entries, currency);
            Ok(())
        }
    }
}

async fn handle_settings_action(action: SettingsAction, ctx: &AppContext) -> Result<()> {
    let service = SettingsService::new(ctx.db_path.clone());

    match action {
        SettingsAction::Show => {
            let settings = service.get().await?;
            let sequence = current_sequence(settings.invoice_sequence);

            CliFormatter::print_section_header("Company");
            let fields = [
                ("Name", &settings.company_name),
                ("Slogan", &settings.company_slogan),
                ("Address", &settings.company_address),
                ("Email", &settings.company_email),
                ("Phone", &settings.company_phone),
                ("Footer", &settings.company_footer),
            ];
            for (label, value) in fields {
                CliFormatter::print_field(label, value.as_deref().unwrap_or("-"), None);
            }
            CliFormatter::print_field_bold("Next invoice", &sequence.to_string(), Some("cyan"));
            Ok(())
        }

        SettingsAction::Set { field, value } => {
            let field: SettingsField = field.parse()?;
            service.set_field(field, &value).await?;
            CliFormatter::print_success(&format!("Updated {}", field.column()));
            Ok(())
        }
    }
}

async fn handle_bank_action(action: BankAction, ctx: &AppContext) -> Result<()> {
    let service = SettingsService::new(ctx.db_path.clone());

    match action {
        BankAction::Add { bank, account_number, branch, holder } => {
            let account = service
                .add_bank_account(&bank, &account_number, branch.as_deref(), holder.as_deref())
                .await?;
            CliFormatter::print_success(&format!(
                "Added {} account {} (ID {})",
                account.bank_name,
                account.account_number,
                account.id.unwrap_or_default()
            ));
            Ok(())
        }

        BankAction::List => {
            let accounts = service.list_bank_accounts().await?;
            CliFormatter::print_section_header("Bank accounts");
            if accounts.is_empty() {
                CliFormatter::print_empty_state("No bank accounts");
                return Ok(());
            }

            for account in &accounts {
                let detail = [account.branch_name.as_deref(), account.account_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ");
                CliFormatter::print_client_entry(
                    account.id,
                    &format!("{} {}", account.bank_name, account.account_number),
                    &detail,
                );
            }
            Ok(())
        }

        BankAction::Remove { id } => {
            service.remove_bank_account(id).await?;
            CliFormatter::print_success(&format!("Removed bank account {}", id));
            Ok(())
        }
    }
}

fn handle_config_action(action: ConfigAction, ctx: AppContext) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = &ctx.config;
            CliFormatter::print_section_header("Configuration");
            CliFormatter::print_field("File", &ctx.config_path.display().to_string(), None);
            CliFormatter::print_field("Database", &ctx.db_path.display().to_string(), None);
            CliFormatter::print_field("currency", &config.currency, None);
            CliFormatter::print_field("country_code", &config.country_code, None);
            CliFormatter::print_field("urgent_window_days", &config.urgent_window_days.to_string(), None);
            CliFormatter::print_field("upcoming_limit", &config.upcoming_limit.to_string(), None);
            CliFormatter::print_field(
                "default_advance_percent",
                &config.default_advance_percent.to_string(),
                None,
            );
            CliFormatter::print_field("history_limit", &config.history_limit.to_string(), None);
            CliFormatter::print_field("log_level", &config.log_level, None);
            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let mut config = ctx.config;
            config.set_value(&key, &value)?;
            save_config_to(&config, &ctx.config_path)?;
            CliFormatter::print_success(&format!("Set {} = {}", key, value));
            Ok(())
        }
    }
}
