//! Job board CLI - operator client for the job board daemon

mod rpc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rpc::RpcClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9640";

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "JOBBOARD_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Bearer token sent with every call
    #[arg(long, env = "JOBBOARD_TOKEN")]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search publicly visible jobs
    Search {
        /// Matches title, description or a skill
        #[arg(short, long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// FULL_TIME, PART_TIME, CONTRACT, INTERNSHIP, FREELANCE
        #[arg(long)]
        employment_type: Option<String>,
        /// ON_SITE, REMOTE, HYBRID
        #[arg(long)]
        work_mode: Option<String>,
        #[arg(long)]
        min_salary: Option<f64>,
        /// Only featured jobs
        #[arg(long)]
        featured: bool,
        /// newest, oldest or salary_desc
        #[arg(long)]
        sort: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Featured jobs shown on the landing page
    Featured {
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show one visible job (counts as a view)
    Show { job_id: String },

    /// Post a job from a JSON file
    Create {
        /// File holding the job object
        file: PathBuf,
    },

    /// Update a job from a JSON file (only the given fields change)
    Update { job_id: String, file: PathBuf },

    /// Close a job
    Close { job_id: String },

    /// Delete a job
    Delete { job_id: String },

    /// Toggle the featured flag (admin)
    Feature { job_id: String },

    /// Apply to a job (job seeker)
    Apply {
        job_id: String,
        #[arg(long)]
        cover_letter: Option<String>,
        #[arg(long)]
        resume_path: Option<String>,
    },

    /// List applications for a job
    Applications { job_id: String },

    /// Company operations
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Admin operations
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// Create a company owned by the caller
    Create { name: String },
    /// Delete a company and all of its jobs
    Delete { company_id: String },
    /// Visible jobs of a company
    Jobs {
        company_id: String,
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Every stored job, whatever its status or deadline
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// One job without visibility rules
    Show { job_id: String },
    /// Close every open job whose deadline has passed
    Expire,
    /// Job counts by status
    Stats,
}

#[derive(Deserialize)]
struct JobSummary {
    id: String,
    title: String,
    company_id: String,
    status: String,
    location: LocationSummary,
    salary: SalarySummary,
    featured: bool,
    application_deadline: Option<i64>,
    views: i64,
    applications_count: i64,
}

#[derive(Deserialize)]
struct LocationSummary {
    city: String,
}

#[derive(Deserialize)]
struct SalarySummary {
    min: f64,
    max: f64,
    currency: String,
}

#[derive(Tabled)]
struct JobRow {
    id: String,
    title: String,
    company: String,
    status: String,
    city: String,
    salary: String,
    deadline: String,
    featured: String,
    views: i64,
    applications: i64,
}

impl From<JobSummary> for JobRow {
    fn from(job: JobSummary) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company: job.company_id,
            status: job.status,
            city: job.location.city,
            salary: format_salary(&job.salary),
            deadline: job
                .application_deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            featured: if job.featured { "★".to_string() } else { String::new() },
            views: job.views,
            applications: job.applications_count,
        }
    }
}

#[derive(Deserialize, Tabled)]
struct ApplicationRow {
    id: String,
    job_id: String,
    applicant_id: String,
    #[tabled(display_with = "display_opt")]
    resume_path: Option<String>,
    created_at: i64,
}

fn display_opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn format_salary(salary: &SalarySummary) -> String {
    format!("{:.0}-{:.0} {}", salary.min, salary.max, salary.currency)
}

/// Insert the `Some` entries of `fields` into a params object
fn params(fields: Vec<(&str, Option<Value>)>) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();
    Value::Object(map)
}

fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    match serde_json::from_str(&raw).context("Invalid JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{} must hold a JSON object", path.display()),
    }
}

fn print_jobs(jobs: Vec<JobSummary>) {
    if jobs.is_empty() {
        println!("{}", "No jobs found".yellow());
        return;
    }
    let rows: Vec<JobRow> = jobs.into_iter().map(JobRow::from).collect();
    println!("{}", Table::new(rows));
}

fn print_page(result: Value) -> Result<()> {
    let total = result["total"].as_i64().unwrap_or(0);
    let page = result["page"].as_u64().unwrap_or(1);
    let total_pages = result["total_pages"].as_u64().unwrap_or(0);
    let jobs: Vec<JobSummary> = serde_json::from_value(result["items"].clone())?;

    print_jobs(jobs);
    println!(
        "{} {} jobs, page {}/{}",
        "Total:".bold(),
        total,
        page,
        total_pages.max(1)
    );
    Ok(())
}

fn print_job(result: Value) -> Result<()> {
    let job: JobSummary = serde_json::from_value(result.clone())?;
    print_jobs(vec![job]);
    if let Some(description) = result["description"].as_str() {
        println!();
        println!("{}", description);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(cli.rpc_url.clone(), cli.token.clone());

    match cli.command {
        Commands::Search {
            keyword,
            category,
            city,
            employment_type,
            work_mode,
            min_salary,
            featured,
            sort,
            page,
            limit,
        } => {
            let params = params(vec![
                ("keyword", keyword.map(Value::from)),
                ("category", category.map(Value::from)),
                ("city", city.map(Value::from)),
                ("employment_type", employment_type.map(Value::from)),
                ("work_mode", work_mode.map(Value::from)),
                ("min_salary", min_salary.map(Value::from)),
                ("featured", featured.then_some(Value::Bool(true))),
                ("sort", sort.map(Value::from)),
                ("page", page.map(Value::from)),
                ("limit", limit.map(Value::from)),
            ]);
            let result = client.call("jobs.search.v1", params).await?;
            print_page(result)?;
        }

        Commands::Featured { limit } => {
            let result = client
                .call("jobs.featured.v1", params(vec![("limit", limit.map(Value::from))]))
                .await?;
            let jobs: Vec<JobSummary> = serde_json::from_value(result)?;
            println!("{}", "Featured jobs".cyan().bold());
            print_jobs(jobs);
        }

        Commands::Show { job_id } => {
            let result = client.call("jobs.get.v1", json!({ "job_id": job_id })).await?;
            print_job(result)?;
        }

        Commands::Create { file } => {
            let job = read_json_object(&file)?;
            let result = client.call("jobs.create.v1", Value::Object(job)).await?;
            println!("{}", "✓ Job posted".green().bold());
            print_job(result)?;
        }

        Commands::Update { job_id, file } => {
            let mut patch = read_json_object(&file)?;
            patch.insert("job_id".to_string(), Value::String(job_id));
            let result = client.call("jobs.update.v1", Value::Object(patch)).await?;
            println!("{}", "✓ Job updated".green().bold());
            print_job(result)?;
        }

        Commands::Close { job_id } => {
            client.call("jobs.close.v1", json!({ "job_id": job_id })).await?;
            println!("{}", format!("✓ Job {} closed", job_id).green().bold());
        }

        Commands::Delete { job_id } => {
            client.call("jobs.delete.v1", json!({ "job_id": job_id })).await?;
            println!("{}", format!("✓ Job {} deleted", job_id).green().bold());
        }

        Commands::Feature { job_id } => {
            let result = client
                .call("jobs.feature.toggle.v1", json!({ "job_id": job_id }))
                .await?;
            if result["featured"].as_bool().unwrap_or(false) {
                println!("{}", format!("★ Job {} is now featured", job_id).green().bold());
            } else {
                println!("{}", format!("○ Job {} is no longer featured", job_id).bold());
            }
        }

        Commands::Apply {
            job_id,
            cover_letter,
            resume_path,
        } => {
            let params = params(vec![
                ("job_id", Some(Value::from(job_id))),
                ("cover_letter", cover_letter.map(Value::from)),
                ("resume_path", resume_path.map(Value::from)),
            ]);
            let result = client.call("applications.apply.v1", params).await?;
            println!("{}", "✓ Application submitted".green().bold());
            let application: ApplicationRow = serde_json::from_value(result)?;
            println!("{}", Table::new(vec![application]));
        }

        Commands::Applications { job_id } => {
            let result = client
                .call("applications.list.v1", json!({ "job_id": job_id }))
                .await?;
            let applications: Vec<ApplicationRow> = serde_json::from_value(result)?;
            if applications.is_empty() {
                println!("{}", "No applications yet".yellow());
            } else {
                println!("{}", Table::new(applications));
            }
        }

        Commands::Company { command } => match command {
            CompanyCommands::Create { name } => {
                let result = client.call("companies.create.v1", json!({ "name": name })).await?;
                println!("{}", "✓ Company created".green().bold());
                println!("  {} {}", "ID:".bold(), result["id"]);
                println!("  {} {}", "Owner:".bold(), result["owner_id"]);
            }
            CompanyCommands::Delete { company_id } => {
                let result = client
                    .call("companies.delete.v1", json!({ "company_id": company_id }))
                    .await?;
                println!(
                    "{}",
                    format!(
                        "✓ Company {} deleted ({} jobs removed)",
                        company_id, result["jobs_removed"]
                    )
                    .green()
                    .bold()
                );
            }
            CompanyCommands::Jobs {
                company_id,
                page,
                limit,
            } => {
                let params = params(vec![
                    ("company_id", Some(Value::from(company_id))),
                    ("page", page.map(Value::from)),
                    ("limit", limit.map(Value::from)),
                ]);
                let result = client.call("companies.jobs.v1", params).await?;
                print_page(result)?;
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::List {
                status,
                page,
                limit,
            } => {
                let params = params(vec![
                    ("status", status.map(Value::from)),
                    ("page", page.map(Value::from)),
                    ("limit", limit.map(Value::from)),
                ]);
                let result = client.call("admin.jobs.list.v1", params).await?;
                print_page(result)?;
            }
            AdminCommands::Show { job_id } => {
                let result = client
                    .call("admin.jobs.get.v1", json!({ "job_id": job_id }))
                    .await?;
                print_job(result)?;
            }
            AdminCommands::Expire => {
                let result = client.call("admin.expire.v1", json!({})).await?;
                println!(
                    "  {} {} overdue jobs closed",
                    "✓".green(),
                    result["closed"]
                );
            }
            AdminCommands::Stats => {
                println!("{}", "Job Board Status".cyan().bold());
                println!();

                match client.call("admin.stats.v1", json!({})).await {
                    Ok(stats) => {
                        println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                        println!("  {} {}", "Status:".bold(), "ONLINE".green());
                        println!();
                        println!("  {} {}", "Total Jobs:".bold(), stats["total"]);
                        println!("  {} {}", "Open:".bold(), stats["open"]);
                        println!("  {} {}", "Closed:".bold(), stats["closed"]);
                        println!("  {} {}", "On Hold:".bold(), stats["on_hold"]);
                        println!("  {} {}", "Featured:".bold(), stats["featured"]);
                        println!("  {} {}", "Visible:".bold(), stats["visible"]);
                        println!(
                            "  {} {}",
                            "Awaiting Expiry:".bold(),
                            stats["awaiting_expiry"]
                        );
                    }
                    Err(e) => {
                        println!("  {} {}", "Status:".bold(), "ERROR".red());
                        println!("  {} {}", "Error:".bold(), e);
                    }
                }
            }
        },
    }

    Ok(())
}
