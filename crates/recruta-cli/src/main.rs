//! Recruta CLI - Back office for a recruiting agency.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::assessment::NarrativeArgs;
use commands::candidate::CandidateFields;
use commands::client::ClientFields;
use recruta_core::AccessStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Recruta - Candidates, jobs, pipeline and pareceres in one place
#[derive(Parser)]
#[command(name = "recruta")]
#[command(version)]
#[command(about = "Back office for a recruiting agency", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Recruta (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show registry statistics
    Stats,

    /// Import parecer PDFs into the assessment log
    Import {
        /// File or directory to import (default: configured directories or the inbox)
        path: Option<String>,

        /// Re-import files that already have an assessment
        #[arg(long)]
        replace: bool,

        /// Show what would be extracted without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage candidates
    #[command(subcommand)]
    Candidate(CandidateCommands),

    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommands),

    /// Manage job openings
    #[command(subcommand)]
    Job(JobCommands),

    /// Link a candidate to a job
    Link {
        /// Job ID
        job: i64,

        /// Candidate ID or exact name
        candidate: String,

        /// Note kept on the link
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Remove a candidate from a job
    Unlink {
        /// Job ID
        job: i64,

        /// Candidate ID or exact name
        candidate: String,
    },

    /// Move a linked candidate to a pipeline stage
    Stage {
        /// Job ID
        job: i64,

        /// Candidate ID or exact name
        candidate: String,

        /// in_review, screening, interview, finalist, dropped
        stage: String,
    },

    /// Record the hiring outcome for a linked candidate
    Outcome {
        /// Job ID
        job: i64,

        /// Candidate ID or exact name
        candidate: String,

        /// pending, hired, rejected, withdrew
        outcome: String,

        /// Why the candidate was declined or withdrew
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Show the hiring pipeline
    Pipeline {
        /// Restrict to one job
        #[arg(short, long)]
        job: Option<i64>,
    },

    /// Manage pareceres
    #[command(subcommand)]
    Assessment(AssessmentCommands),

    /// Manage access to client systems
    #[command(subcommand)]
    Access(AccessCommands),

    /// Manage service orders, quotes and invoices
    #[command(subcommand)]
    Finance(FinanceCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config in editor
    Edit,

    /// Add a directory scanned by `recruta import`
    AddDir {
        /// Directory path
        path: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., generator.model)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Subcommand)]
enum CandidateCommands {
    /// Register a candidate
    Add {
        /// Full name
        name: String,

        #[command(flatten)]
        fields: CandidateFields,
    },

    /// List candidates
    List {
        /// Only names containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of candidates to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Show a candidate with their jobs and pareceres
    Show {
        /// Candidate ID or exact name
        candidate: String,
    },

    /// Change candidate fields
    Edit {
        /// Candidate ID or exact name
        candidate: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: CandidateFields,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Add a client company
    Add {
        /// Display name
        name: String,

        #[command(flatten)]
        fields: ClientFields,
    },

    /// List clients
    List,

    /// Show a client with its jobs
    Show {
        /// Client ID or exact name
        client: String,
    },

    /// Change client fields
    Edit {
        /// Client ID or exact name
        client: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ClientFields,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Open a job
    Add {
        /// Job title
        title: String,

        /// Client ID or exact name
        #[arg(short, long)]
        client: Option<String>,

        /// On-site, hybrid, remote...
        #[arg(short, long)]
        modality: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Opening date (YYYY-MM-DD, default today)
        #[arg(long)]
        opened: Option<String>,
    },

    /// List jobs
    List {
        /// open, in_progress, closed, recovered
        #[arg(short, long)]
        status: Option<String>,

        /// Client ID or exact name
        #[arg(short, long)]
        client: Option<String>,
    },

    /// Show a job with its candidates
    Show {
        /// Job ID
        id: i64,
    },

    /// Change job fields
    Edit {
        /// Job ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        /// Client ID or exact name
        #[arg(short, long)]
        client: Option<String>,

        #[arg(short, long)]
        modality: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Opening date (YYYY-MM-DD)
        #[arg(long)]
        opened: Option<String>,

        /// Closing date (YYYY-MM-DD)
        #[arg(long)]
        closed: Option<String>,
    },

    /// Change job status
    Status {
        /// Job ID
        id: i64,

        /// open, in_progress, closed, recovered
        status: String,
    },
}

#[derive(Subcommand)]
enum AssessmentCommands {
    /// Record a parecer by hand, optionally drafting the narrative
    New {
        /// Candidate ID or exact name
        candidate: String,

        /// Job ID
        #[arg(short, long)]
        job: Option<i64>,

        /// Draft empty sections with the text generator
        #[arg(long)]
        draft: bool,

        /// Interview notes used for drafting
        #[arg(long, conflicts_with = "notes_file")]
        notes: Option<String>,

        /// File with interview notes used for drafting
        #[arg(long)]
        notes_file: Option<String>,

        /// Resumo profissional
        #[arg(long)]
        summary: Option<String>,

        /// Análise de perfil
        #[arg(long)]
        analysis: Option<String>,

        /// Conclusão
        #[arg(long)]
        conclusion: Option<String>,
    },

    /// List pareceres, newest first
    List {
        /// Candidate ID or exact name
        #[arg(short, long)]
        candidate: Option<String>,

        /// Job ID
        #[arg(short, long)]
        job: Option<i64>,
    },

    /// Show a parecer
    Show {
        /// Parecer ID
        id: i64,
    },

    /// Change the stage or outcome recorded on a parecer
    Status {
        /// Parecer ID
        id: i64,

        #[arg(short, long)]
        stage: Option<String>,

        #[arg(short, long)]
        outcome: Option<String>,

        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Delete a parecer
    Delete {
        /// Parecer ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum AccessCommands {
    /// Request access to a client system for a candidate
    Grant {
        /// Client ID or exact name
        client: String,

        /// Candidate ID or exact name
        candidate: String,

        /// System name (SAP, TOTVS, GitHub, VPN...)
        system: String,

        /// Profile or permission level
        #[arg(short = 't', long)]
        access_type: Option<String>,

        /// Start date (YYYY-MM-DD, default today)
        #[arg(long)]
        starts: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List access grants
    List {
        /// Client ID or exact name
        #[arg(long)]
        client: Option<String>,

        /// Candidate ID or exact name
        #[arg(long)]
        candidate: Option<String>,
    },

    /// Mark a grant as active
    Activate {
        /// Grant ID
        id: i64,
    },

    /// Revoke a grant
    Revoke {
        /// Grant ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum FinanceCommands {
    /// Record a service order, quote or invoice
    Add {
        /// service_order (os), quote, invoice
        kind: String,

        /// Client ID or exact name
        client: String,

        /// Amount as written, e.g. 3.500,00
        amount: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Issue date (YYYY-MM-DD, default today)
        #[arg(long)]
        issued: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List financial records
    List {
        /// service_order (os), quote, invoice
        #[arg(short, long)]
        kind: Option<String>,

        /// Client ID or exact name
        #[arg(short, long)]
        client: Option<String>,
    },

    /// Change a record's status
    Status {
        /// Record ID
        id: i64,

        /// open, approved, paid, cancelled
        status: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recruta=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recruta=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Ok(config) = commands::get_config() {
        if !config.ui.color {
            colored::control::set_override(false);
        }
    }

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Edit => commands::config::edit(),
            ConfigCommands::AddDir { path } => commands::config::add_dir(&path),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Stats => commands::stats::run(),
        Commands::Import {
            path,
            replace,
            dry_run,
        } => commands::import::run(path.as_deref(), replace, dry_run),
        Commands::Candidate(cmd) => match cmd {
            CandidateCommands::Add { name, fields } => commands::candidate::add(&name, fields),
            CandidateCommands::List { search, limit } => {
                commands::candidate::list(search.as_deref(), limit)
            }
            CandidateCommands::Show { candidate } => commands::candidate::show(&candidate),
            CandidateCommands::Edit {
                candidate,
                name,
                fields,
            } => commands::candidate::edit(&candidate, name, fields),
        },
        Commands::Client(cmd) => match cmd {
            ClientCommands::Add { name, fields } => commands::client::add(&name, fields),
            ClientCommands::List => commands::client::list(),
            ClientCommands::Show { client } => commands::client::show(&client),
            ClientCommands::Edit {
                client,
                name,
                fields,
            } => commands::client::edit(&client, name, fields),
        },
        Commands::Job(cmd) => match cmd {
            JobCommands::Add {
                title,
                client,
                modality,
                description,
                opened,
            } => commands::job::add(
                &title,
                client.as_deref(),
                modality,
                description,
                opened.as_deref(),
            ),
            JobCommands::List { status, client } => {
                commands::job::list(status.as_deref(), client.as_deref())
            }
            JobCommands::Show { id } => commands::job::show(id),
            JobCommands::Edit {
                id,
                title,
                client,
                modality,
                description,
                opened,
                closed,
            } => commands::job::edit(
                id,
                title,
                client.as_deref(),
                modality,
                description,
                opened.as_deref(),
                closed.as_deref(),
            ),
            JobCommands::Status { id, status } => commands::job::set_status(id, &status),
        },
        Commands::Link {
            job,
            candidate,
            note,
        } => commands::pipeline::link(job, &candidate, note.as_deref()),
        Commands::Unlink { job, candidate } => commands::pipeline::unlink(job, &candidate),
        Commands::Stage {
            job,
            candidate,
            stage,
        } => commands::pipeline::stage(job, &candidate, &stage),
        Commands::Outcome {
            job,
            candidate,
            outcome,
            reason,
        } => commands::pipeline::outcome(job, &candidate, &outcome, reason.as_deref()),
        Commands::Pipeline { job } => commands::pipeline::report(job),
        Commands::Assessment(cmd) => match cmd {
            AssessmentCommands::New {
                candidate,
                job,
                draft,
                notes,
                notes_file,
                summary,
                analysis,
                conclusion,
            } => commands::assessment::new(
                &candidate,
                job,
                NarrativeArgs {
                    summary,
                    analysis,
                    conclusion,
                    notes,
                    notes_file,
                },
                draft,
            ),
            AssessmentCommands::List { candidate, job } => {
                commands::assessment::list(candidate.as_deref(), job)
            }
            AssessmentCommands::Show { id } => commands::assessment::show(id),
            AssessmentCommands::Status {
                id,
                stage,
                outcome,
                reason,
            } => commands::assessment::set_status(
                id,
                stage.as_deref(),
                outcome.as_deref(),
                reason.as_deref(),
            ),
            AssessmentCommands::Delete { id } => commands::assessment::delete(id),
        },
        Commands::Access(cmd) => match cmd {
            AccessCommands::Grant {
                client,
                candidate,
                system,
                access_type,
                starts,
                notes,
            } => commands::access::grant(
                &client,
                &candidate,
                &system,
                access_type,
                starts.as_deref(),
                notes,
            ),
            AccessCommands::List { client, candidate } => {
                commands::access::list(client.as_deref(), candidate.as_deref())
            }
            AccessCommands::Activate { id } => {
                commands::access::set_status(id, AccessStatus::Active)
            }
            AccessCommands::Revoke { id } => commands::access::set_status(id, AccessStatus::Revoked),
        },
        Commands::Finance(cmd) => match cmd {
            FinanceCommands::Add {
                kind,
                client,
                amount,
                description,
                issued,
                due,
                notes,
            } => commands::finance::add(
                &kind,
                &client,
                &amount,
                description,
                issued.as_deref(),
                due.as_deref(),
                notes,
            ),
            FinanceCommands::List { kind, client } => {
                commands::finance::list(kind.as_deref(), client.as_deref())
            }
            FinanceCommands::Status { id, status } => commands::finance::set_status(id, &status),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_flags() {
        let cli = Cli::parse_from(["recruta", "import", "~/pareceres", "--replace"]);
        match cli.command {
            Commands::Import {
                path,
                replace,
                dry_run,
            } => {
                assert_eq!(path.as_deref(), Some("~/pareceres"));
                assert!(replace);
                assert!(!dry_run);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_parse_candidate_edit_fields() {
        let cli = Cli::parse_from([
            "recruta", "candidate", "edit", "Maria Silva", "--city", "Curitiba", "--age", "31",
        ]);
        match cli.command {
            Commands::Candidate(CandidateCommands::Edit {
                candidate, fields, ..
            }) => {
                assert_eq!(candidate, "Maria Silva");
                assert_eq!(fields.city.as_deref(), Some("Curitiba"));
                assert_eq!(fields.age, Some(31));
            }
            _ => panic!("expected candidate edit"),
        }
    }
}
