//! Client commands.

use super::{get_database, or_dash, resolve_client_ref};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use recruta_core::{Client, ClientUpdate};

/// Optional client fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct ClientFields {
    /// Registered legal name (razão social)
    #[arg(long)]
    pub legal_name: Option<String>,

    /// Tax id (CNPJ)
    #[arg(long)]
    pub tax_id: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// Contact person
    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl ClientFields {
    fn into_update(self, name: Option<String>) -> ClientUpdate {
        ClientUpdate {
            name,
            legal_name: self.legal_name,
            tax_id: self.tax_id,
            city: self.city,
            contact: self.contact,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
        }
    }

    fn is_empty(&self) -> bool {
        self.legal_name.is_none()
            && self.tax_id.is_none()
            && self.city.is_none()
            && self.contact.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.notes.is_none()
    }
}

pub fn add(name: &str, fields: ClientFields) -> Result<()> {
    let db = get_database()?;

    let mut client = Client::new(name);
    fields.into_update(None).apply(&mut client);

    let id = db.create_client(&client)?;

    println!("{} Client added: {}", "✓".green(), name.trim().white().bold());
    println!("  ID: {}", id.to_string().dimmed());

    Ok(())
}

pub fn list() -> Result<()> {
    let db = get_database()?;
    let clients = db.list_clients()?;

    if clients.is_empty() {
        println!(
            "{}",
            "No clients found. Use 'recruta client add <name>' to add one.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Clients".cyan().bold());
    println!("{}", "─".repeat(70));

    for client in clients {
        println!(
            "{} {} {}",
            format!("[{}]", client.id).dimmed(),
            client.name.white(),
            or_dash(&client.city).dimmed()
        );
    }

    Ok(())
}

pub fn show(reference: &str) -> Result<()> {
    let db = get_database()?;

    let id = resolve_client_ref(&db, reference)?;
    let client = db.get_client(id)?;

    println!("{}", client.name.cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  ID: {}", client.id);
    println!("  Legal name: {}", or_dash(&client.legal_name));
    println!("  Tax id: {}", or_dash(&client.tax_id));
    println!("  City: {}", or_dash(&client.city));
    println!("  Contact: {}", or_dash(&client.contact));
    println!("  Phone: {}", or_dash(&client.phone));
    println!("  Email: {}", or_dash(&client.email));
    if let Some(ref notes) = client.notes {
        println!("  Notes: {}", notes);
    }

    let jobs = db.list_jobs(None, Some(id))?;
    if !jobs.is_empty() {
        println!();
        println!("{}", "Jobs".white().bold());
        for job in jobs {
            println!(
                "  {} {} ({})",
                format!("[{}]", job.id).dimmed(),
                job.title,
                job.status
            );
        }
    }

    Ok(())
}

pub fn edit(reference: &str, name: Option<String>, fields: ClientFields) -> Result<()> {
    let db = get_database()?;

    let id = resolve_client_ref(&db, reference)?;
    if name.is_none() && fields.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field, e.g. --contact or --email.");
    }

    let client = db.update_client(id, &fields.into_update(name))?;
    println!("{} Client updated: {}", "✓".green(), client.name.white().bold());

    Ok(())
}
