use colored::*;
use quickfilings::{
    core::{config::QuickFilingsConfig, SearchRequest},
    edgar::FilerIdentity,
    init,
};
use std::sync::Arc;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "quickfilings", about = "Search SEC filings by ticker")]
enum Command {
    /// List the filings matching the requested categories
    Search {
        ticker: String,
        /// quarterlyAnnual, form8k, earnings, presentations
        #[structopt(short, long = "types", default_value = "quarterlyAnnual")]
        types: Vec<String>,
        #[structopt(short, long = "quarters", default_value = "6")]
        quarters_back: u32,
        #[structopt(short, long = "annuals", default_value = "5")]
        annuals_back: u32,
        #[structopt(short, long, default_value = "auto")]
        exchange: String,
    },
    /// Show the resolved company
    Company { ticker: String },
}

fn print_company(company: &FilerIdentity) {
    println!(
        "{} ({}) CIK {} [{}]",
        company.name.bold(),
        company.ticker.cyan(),
        company.cik,
        company.exchange
    );
    if let Some(industry) = &company.industry {
        println!(
            "  {}",
            format!("{} {}", company.sector.as_deref().unwrap_or(""), industry).dimmed()
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = QuickFilingsConfig::from_env()?;
    let state = init::initialize_app_state(&config)?;
    let service = Arc::clone(&state.service);

    match Command::from_args() {
        Command::Search {
            ticker,
            types,
            quarters_back,
            annuals_back,
            exchange,
        } => {
            let request = SearchRequest {
                ticker,
                file_types: types,
                quarters_back,
                annuals_back,
                exchange,
            };
            let result = service.search(&request).await?;
            print_company(&result.company);
            println!();
            for file in &result.files {
                println!(
                    "{}  {:<28} {:<18} {}",
                    file.date.to_string().green(),
                    file.name,
                    file.label.yellow(),
                    file.url.dimmed()
                );
            }
            println!("\n{} files", result.total_files.to_string().bold());
        }
        Command::Company { ticker } => {
            let company = service.company(&ticker).await?;
            print_company(&company);
        }
    }

    Ok(())
}
