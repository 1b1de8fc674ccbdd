//! Record company CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::commands::open_catalog;
use crate::cli::output::{format_date, list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Album, Config, RecordCompany};
use crate::services::{AddCompanyInput, EditCompanyInput};

#[derive(Args, Debug)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub command: CompanyCommands,
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// Add a new record company
    Add {
        /// Company name (letters and spaces only)
        #[arg(short, long)]
        name: String,
        /// Year founded (1900-2024)
        #[arg(short, long)]
        founded_year: i32,
        /// Country of origin
        #[arg(short, long)]
        country: String,
    },
    /// Edit a record company; omitted fields are left unchanged
    Edit {
        /// Record company ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        founded_year: Option<i32>,
        #[arg(short, long)]
        country: Option<String>,
    },
    /// Remove a record company and every album it published
    Remove {
        /// Record company ID
        id: String,
    },
    /// Show record company details with albums
    Show {
        /// Record company ID
        id: String,
    },
    /// List all record companies
    List,
    /// List companies founded within an inclusive year range
    Founded {
        /// Earliest founding year
        min: i32,
        /// Latest founding year
        max: i32,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailOutput {
    pub id: Uuid,
    pub name: String,
    pub founded_year: i32,
    pub country: String,
    pub num_of_albums: u64,
    pub albums: Vec<Album>,
}

impl CommandOutput for CompanyDetailOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Record company: {}", self.name),
            format!("ID: {}", self.id),
            format!("Founded: {}", self.founded_year),
            format!("Country: {}", self.country),
            format!("Albums: {}", self.num_of_albums),
        ];
        for album in &self.albums {
            lines.push(format!("  - {} ({})", album.title, format_date(album.release_date)));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListOutput {
    pub record_companies: Vec<RecordCompany>,
    pub total: usize,
}

impl CommandOutput for CompanyListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "founded", "country", "albums"]);
        for company in &self.record_companies {
            table.add_row(vec![
                company.id.to_string(),
                truncate(&company.name, 30),
                company.founded_year.to_string(),
                truncate(&company.country, 20),
                company.albums.len().to_string(),
            ]);
        }
        render_list("record company", "record companies", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyActionOutput {
    pub message: String,
    pub record_company: RecordCompany,
}

impl CommandOutput for CompanyActionOutput {
    fn to_human(&self) -> String {
        format!("{} ({})", self.message, self.record_company.id)
    }
}

pub async fn execute(args: CompanyArgs, config: &Config, json_mode: bool) -> Result<()> {
    let catalog = open_catalog(config).await?;

    match args.command {
        CompanyCommands::Add { name, founded_year, country } => {
            let record_company = catalog
                .pipeline
                .add_company(AddCompanyInput { name, founded_year, country })
                .await?;
            let message = format!("Added record company {}", record_company.name);
            output(&CompanyActionOutput { message, record_company }, json_mode);
        }
        CompanyCommands::Edit { id, name, founded_year, country } => {
            let record_company = catalog
                .pipeline
                .edit_company(EditCompanyInput { id, name, founded_year, country })
                .await?;
            let message = format!("Updated record company {}", record_company.name);
            output(&CompanyActionOutput { message, record_company }, json_mode);
        }
        CompanyCommands::Remove { id } => {
            let record_company = catalog.pipeline.remove_company(&id).await?;
            let message = format!("Removed record company {}", record_company.name);
            output(&CompanyActionOutput { message, record_company }, json_mode);
        }
        CompanyCommands::Show { id } => {
            let company = catalog.resolver.get_company_by_id(&id).await?;
            let albums = catalog.resolver.company_albums(&company).await?;
            let num_of_albums = catalog.resolver.company_num_of_albums(&company).await?;
            let detail = CompanyDetailOutput {
                id: company.id,
                name: company.name,
                founded_year: company.founded_year,
                country: company.country,
                num_of_albums,
                albums,
            };
            output(&detail, json_mode);
        }
        CompanyCommands::List => {
            let record_companies = catalog.resolver.record_companies().await?;
            let total = record_companies.len();
            output(&CompanyListOutput { record_companies, total }, json_mode);
        }
        CompanyCommands::Founded { min, max } => {
            let record_companies = catalog.resolver.company_by_founded_year(min, max).await?;
            let total = record_companies.len();
            output(&CompanyListOutput { record_companies, total }, json_mode);
        }
    }

    Ok(())
}
