//! DevMatch CLI - match developers to projects

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devmatch_core::application::errors::{ValidationError, ValidationErrors};
use devmatch_core::application::validators::{DeveloperValidator, ProjectValidator};
use devmatch_core::config::Config;
use devmatch_core::domain::developers::DeveloperView;
use devmatch_core::domain::matching::{MatchCandidate, MatchResultRepository, ProjectMatch};
use devmatch_core::domain::projects::ProjectView;
use devmatch_core::prelude::*;
use devmatch_core::storage::{DatabaseConfig, default_database_path, seed_if_empty};
use serde::Serialize;
use tracing::warn;

#[derive(Parser)]
#[command(name = "devmatch")]
#[command(
    author,
    version,
    about = "Match developers to projects by skills and experience",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and load the demo dataset if it is empty
    Init,

    /// Manage technologies
    Technologies {
        #[command(subcommand)]
        action: TechnologyAction,
    },

    /// Manage developers
    Developers {
        #[command(subcommand)]
        action: DeveloperAction,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Rank developers for a project, projects for a developer, or every project
    #[command(group(
        clap::ArgGroup::new("target")
            .required(true)
            .args(["project", "developer", "all"])
    ))]
    Match {
        /// Project ID, ID prefix, or name
        project: Option<String>,
        /// Rank projects for this developer (ID, ID prefix, or name)
        #[arg(long)]
        developer: Option<String>,
        /// Rank developers for every project
        #[arg(long)]
        all: bool,
        /// Show at most this many candidates
        #[arg(short, long)]
        limit: Option<usize>,
        /// Hide candidates below this technical match percentage (0 to 100)
        #[arg(long, allow_negative_numbers = true)]
        min_score: Option<f64>,
        /// Store the ranking as match results
        #[arg(long)]
        record: bool,
    },

    /// Show recorded match results for a project
    Results {
        /// Project ID, ID prefix, or name
        project: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum TechnologyAction {
    /// List all technologies
    List,
    /// Add a technology
    Add {
        name: String,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a technology no developer or project uses
    Delete { name: String },
}

#[derive(Subcommand)]
enum DeveloperAction {
    /// List all developers
    List,
    /// Show developer details
    Show { id: String },
    /// Add a developer
    Add {
        name: String,
        #[arg(short, long)]
        email: Option<String>,
        /// Beginner, Intermediate, or Advanced
        #[arg(short, long)]
        level: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        github: Option<String>,
        /// Technology name (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,
    },
    /// Delete a developer with its experiences
    Delete { id: String },
    /// Add a skill to a developer
    AddSkill { id: String, technology: String },
    /// Remove a skill from a developer
    RemoveSkill { id: String, technology: String },
    /// Add an experience to a developer
    AddExperience {
        id: String,
        description: String,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove an experience from a developer
    RemoveExperience { id: String, experience: String },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List {
        /// Open, In Progress, or Closed
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show project details
    Show { id: String },
    /// Add a project
    Add {
        name: String,
        #[arg(short, long)]
        description: String,
        /// Beginner, Intermediate, or Advanced
        #[arg(short, long)]
        level: String,
        /// Web, Mobile, or Desktop
        #[arg(short = 't', long = "type")]
        project_type: String,
        /// Required technology name (repeatable)
        #[arg(short, long = "require")]
        requires: Vec<String>,
    },
    /// Change a project's status
    SetStatus { id: String, status: String },
    /// Delete a project
    Delete { id: String },
    /// Add a required technology
    Require { id: String, technology: String },
    /// Remove a required technology
    Unrequire { id: String, technology: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// Output settings shared by every command
#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `value` as JSON, or run `text` in text mode
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    /// Confirmation line, suppressed by --quiet and in JSON mode
    fn note(&self, message: impl AsRef<str>) {
        if !self.quiet && !self.is_json() {
            println!("{}", message.as_ref());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("devmatch=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    let Some(core) = err.downcast_ref::<Error>() else {
        eprintln!("error: {:#}", err);
        return;
    };

    if let Error::Validation(errors) = core {
        eprintln!("error[{}]: validation failed", core.code());
        for error in errors.iter() {
            eprintln!("  - {}: {}", error.field, error.message);
        }
    } else {
        eprintln!("error[{}]: {}", core.code(), core);
    }
    if let Some(suggestion) = core.suggestion() {
        eprintln!("  hint: {}", suggestion);
    }
}

/// Resolve configuration and the database path
fn settings(database: Option<PathBuf>) -> anyhow::Result<(Config, PathBuf)> {
    let config = Config::load()?;
    let path = database
        .or_else(|| config.database.path.clone())
        .unwrap_or_else(default_database_path);
    Ok((config, path))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Config { action } => cmd_config(action, out),
        Commands::Doctor => {
            let (config, path) = settings(cli.database)?;
            cmd_doctor(&config, path, out).await
        }
        command => {
            let (config, path) = settings(cli.database)?;
            let db = Database::new(
                DatabaseConfig::with_path(path).max_connections(config.database.max_connections),
            )
            .await?;
            let result = dispatch(&db, &config, command, out).await;
            db.close().await;
            result
        }
    }
}

async fn dispatch(
    db: &Database,
    config: &Config,
    command: Commands,
    out: Output,
) -> anyhow::Result<()> {
    match command {
        Commands::Init => cmd_init(db, out).await,
        Commands::Technologies { action } => cmd_technologies(db, action, out).await,
        Commands::Developers { action } => cmd_developers(db, action, out).await,
        Commands::Projects { action } => cmd_projects(db, action, out).await,
        Commands::Match {
            project,
            developer,
            all,
            limit,
            min_score,
            record,
        } => {
            let options = MatchOptions {
                min_score: min_score.or(config.matching.min_score),
                limit: limit.or(config.matching.limit),
            };
            options.validate().map_err(Error::from)?;
            match (project, developer, all) {
                (Some(project), _, _) => cmd_match(db, &project, options, record, out).await,
                (None, Some(developer), _) => {
                    cmd_match_developer(db, &developer, options, record, out).await
                }
                (None, None, true) => cmd_match_all(db, options, record, out).await,
                (None, None, false) => Err(anyhow::anyhow!(
                    "give a project, --developer <id>, or --all"
                )),
            }
        }
        Commands::Results { project } => cmd_results(db, &project, out).await,
        Commands::Config { .. } | Commands::Doctor => Ok(()),
    }
}

// ============================================================================
// Lookup helpers
// ============================================================================

fn invalid(error: ValidationError) -> Error {
    Error::from(ValidationErrors::from(error))
}

/// Full id, unique id prefix, or exact name
fn matches_query(id: &str, name: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }
    (query.len() >= 4 && id.starts_with(&query.to_lowercase()))
        || name.to_lowercase() == query.to_lowercase()
}

fn single<T>(mut found: Vec<T>, query: &str, not_found: impl FnOnce() -> Error) -> Result<T> {
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(not_found()),
        n => Err(Error::InvalidInput(format!(
            "'{}' matches {} records; use a longer id",
            query, n
        ))),
    }
}

async fn find_developer(db: &Database, query: &str) -> Result<Developer> {
    let repo = DeveloperRepository::new(db);
    if let Ok(id) = query.parse::<DeveloperId>() {
        return repo
            .get(id)
            .await?
            .ok_or_else(|| Error::DeveloperNotFound(query.to_string()));
    }

    let found: Vec<_> = repo
        .list()
        .await?
        .into_iter()
        .filter(|d| matches_query(&d.id().to_string(), d.name(), query))
        .collect();
    single(found, query, || Error::DeveloperNotFound(query.to_string()))
}

async fn find_project(db: &Database, query: &str) -> Result<Project> {
    let repo = ProjectRepository::new(db);
    if let Ok(id) = query.parse::<ProjectId>() {
        return repo
            .get(id)
            .await?
            .ok_or_else(|| Error::ProjectNotFound(query.to_string()));
    }

    let found: Vec<_> = repo
        .list(None)
        .await?
        .into_iter()
        .filter(|p| matches_query(&p.id().to_string(), p.name(), query))
        .collect();
    single(found, query, || Error::ProjectNotFound(query.to_string()))
}

async fn find_technology(db: &Database, name: &str) -> Result<Technology> {
    TechnologyRepository::new(db)
        .get_by_name(name)
        .await?
        .ok_or_else(|| Error::TechnologyNotFound(name.to_string()))
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_init(db: &Database, out: Output) -> anyhow::Result<()> {
    let report = seed_if_empty(db).await?;

    out.emit(&report, || {
        if out.quiet {
            return;
        }
        println!("Database ready: {}", db.path().display());
        if report.skipped {
            println!("Existing data found, demo dataset not loaded.");
        } else {
            println!(
                "Loaded {} technologies, {} projects, {} developers ({} experiences).",
                report.technologies, report.projects, report.developers, report.experiences
            );
        }
    })
}

async fn cmd_technologies(
    db: &Database,
    action: TechnologyAction,
    out: Output,
) -> anyhow::Result<()> {
    let repo = TechnologyRepository::new(db);

    match action {
        TechnologyAction::List => {
            let views: Vec<_> = repo.list().await?.iter().map(Technology::to_view).collect();
            out.emit(&views, || {
                if views.is_empty() {
                    if !out.quiet {
                        println!("No technologies found.");
                        println!("\nAdd one with: devmatch technologies add <name>");
                    }
                    return;
                }
                for t in &views {
                    match &t.category {
                        Some(category) => {
                            println!("  {} - {} ({})", t.id.short(), t.name, category)
                        }
                        None => println!("  {} - {}", t.id.short(), t.name),
                    }
                }
            })
        }
        TechnologyAction::Add { name, category } => {
            let mut technology = Technology::new(name);
            technology.set_category(category);
            repo.create(&technology).await?;

            out.note(format!("Technology '{}' added.", technology.name()));
            out.emit(&technology.to_view(), || {
                if !out.quiet {
                    println!("  ID: {}", technology.id());
                }
            })
        }
        TechnologyAction::Delete { name } => {
            let technology = find_technology(db, &name).await?;
            repo.delete(technology.id()).await?;
            out.note(format!("Technology '{}' deleted.", technology.name()));
            Ok(())
        }
    }
}

fn print_developer(view: &DeveloperView) {
    println!("Developer: {}", view.name);
    println!("  ID: {}", view.id);
    if let Some(email) = &view.email {
        println!("  Email: {}", email);
    }
    if let Some(level) = view.experience_level {
        println!("  Level: {}", level);
    }
    if let Some(location) = &view.location {
        println!("  Location: {}", location);
    }
    if let Some(github) = &view.github_profile {
        println!("  GitHub: {}", github);
    }
    if let Some(bio) = &view.bio {
        println!("  Bio: {}", bio);
    }
    if !view.skills.is_empty() {
        println!("  Skills: {}", view.skills.join(", "));
    }
    if !view.experiences.is_empty() {
        println!("  Experiences:");
        for e in &view.experiences {
            match &e.category {
                Some(category) => println!("    {} [{}] {}", e.id.short(), category, e.description),
                None => println!("    {} {}", e.id.short(), e.description),
            }
        }
    }
}

async fn cmd_developers(db: &Database, action: DeveloperAction, out: Output) -> anyhow::Result<()> {
    let repo = DeveloperRepository::new(db);
    let technologies = TechnologyRepository::new(db);

    match action {
        DeveloperAction::List => {
            let catalog = technologies.catalog().await?;
            let views: Vec<_> = repo.list().await?.iter().map(|d| d.to_view(&catalog)).collect();
            out.emit(&views, || {
                if views.is_empty() {
                    if !out.quiet {
                        println!("No developers found.");
                        println!("\nAdd one with: devmatch developers add <name>");
                    }
                    return;
                }
                if !out.quiet {
                    println!("Developers:");
                }
                for d in &views {
                    let level = d.experience_level.map(|l| l.to_string()).unwrap_or_default();
                    println!("  {} - {} {} [{}]", d.id.short(), d.name, level, d.skills.join(", "));
                }
            })?;
        }
        DeveloperAction::Show { id } => {
            let developer = find_developer(db, &id).await?;
            let view = developer.to_view(&technologies.catalog().await?);
            out.emit(&view, || print_developer(&view))?;
        }
        DeveloperAction::Add {
            name,
            email,
            level,
            bio,
            location,
            github,
            skills,
        } => {
            let mut developer = Developer::new(name);
            developer.set_email(email);
            developer.set_bio(bio);
            developer.set_location(location);
            developer.set_github_profile(github);
            if let Some(level) = level {
                let level = DeveloperValidator::parse_experience_level(&level).map_err(invalid)?;
                developer.set_experience_level(Some(level));
            }
            for skill in &skills {
                developer.add_skill(find_technology(db, skill).await?.id());
            }
            repo.create(&developer).await?;

            out.note(format!("Developer '{}' added.", developer.name()));
            let view = developer.to_view(&technologies.catalog().await?);
            out.emit(&view, || {
                if !out.quiet {
                    println!("  ID: {}", view.id);
                }
            })?;
        }
        DeveloperAction::Delete { id } => {
            let developer = find_developer(db, &id).await?;
            repo.delete(developer.id()).await?;
            out.note(format!(
                "Developer '{}' deleted with {} experience(s).",
                developer.name(),
                developer.experience_count()
            ));
        }
        DeveloperAction::AddSkill { id, technology } => {
            let mut developer = find_developer(db, &id).await?;
            let technology = find_technology(db, &technology).await?;
            if developer.add_skill(technology.id()) {
                repo.update(&developer).await?;
                out.note(format!("Added {} to {}.", technology.name(), developer.name()));
            } else {
                out.note(format!("{} already has {}.", developer.name(), technology.name()));
            }
        }
        DeveloperAction::RemoveSkill { id, technology } => {
            let mut developer = find_developer(db, &id).await?;
            let technology = find_technology(db, &technology).await?;
            if developer.remove_skill(&technology.id()) {
                repo.update(&developer).await?;
                out.note(format!("Removed {} from {}.", technology.name(), developer.name()));
            } else {
                out.note(format!("{} does not have {}.", developer.name(), technology.name()));
            }
        }
        DeveloperAction::AddExperience {
            id,
            description,
            category,
        } => {
            let mut developer = find_developer(db, &id).await?;
            let mut experience = Experience::new(description);
            experience.set_category(category);
            let experience_id = experience.id();
            developer.add_experience(experience);
            repo.update(&developer).await?;

            out.note(format!("Experience added to {}.", developer.name()));
            if let Some(experience) = developer.experience(&experience_id) {
                out.emit(&experience.to_view(), || {
                    if !out.quiet {
                        println!("  ID: {}", experience_id);
                    }
                })?;
            }
        }
        DeveloperAction::RemoveExperience { id, experience } => {
            let mut developer = find_developer(db, &id).await?;
            let experience_id: Vec<_> = developer
                .experiences()
                .map(|e| e.id())
                .filter(|eid| matches_query(&eid.to_string(), "", &experience))
                .collect();
            let experience_id = single(experience_id, &experience, || {
                Error::ExperienceNotFound(experience.clone())
            })?;

            if developer.remove_experience(&experience_id).is_some() {
                repo.update(&developer).await?;
            }
            out.note(format!("Experience removed from {}.", developer.name()));
        }
    }
    Ok(())
}

fn print_project(view: &ProjectView) {
    println!("Project: {}", view.name);
    println!("  ID: {}", view.id);
    println!("  Status: {}", view.status);
    println!("  Type: {}", view.project_type);
    println!("  Level: {}", view.experience_level);
    println!("  Description: {}", view.description);
    if !view.required_technologies.is_empty() {
        println!("  Requires: {}", view.required_technologies.join(", "));
    }
}

async fn cmd_projects(db: &Database, action: ProjectAction, out: Output) -> anyhow::Result<()> {
    let repo = ProjectRepository::new(db);
    let technologies = TechnologyRepository::new(db);

    match action {
        ProjectAction::List { status } => {
            let status = status
                .as_deref()
                .map(ProjectValidator::parse_status)
                .transpose()
                .map_err(invalid)?;
            let catalog = technologies.catalog().await?;
            let views: Vec<_> = repo
                .list(status)
                .await?
                .iter()
                .map(|p| p.to_view(&catalog))
                .collect();
            out.emit(&views, || {
                if views.is_empty() {
                    if !out.quiet {
                        println!("No projects found.");
                        println!(
                            "\nAdd one with: devmatch projects add <name> \
                             -d <description> -l <level> -t <type>"
                        );
                    }
                    return;
                }
                if !out.quiet {
                    println!("Projects:");
                }
                for p in &views {
                    let status_indicator = match p.status {
                        ProjectStatus::Open => String::new(),
                        other => format!(" [{}]", other),
                    };
                    println!(
                        "  {} - {} ({}, {}){}",
                        p.id.short(),
                        p.name,
                        p.project_type,
                        p.experience_level,
                        status_indicator
                    );
                }
            })?;
        }
        ProjectAction::Show { id } => {
            let project = find_project(db, &id).await?;
            let view = project.to_view(&technologies.catalog().await?);
            out.emit(&view, || print_project(&view))?;
        }
        ProjectAction::Add {
            name,
            description,
            level,
            project_type,
            requires,
        } => {
            let (level, project_type) =
                ProjectValidator::parse_create(&name, &description, &level, &project_type)
                    .map_err(Error::from)?;
            let mut project = Project::new(name, description, level, project_type);
            for technology in &requires {
                project.add_required_technology(find_technology(db, technology).await?.id());
            }
            repo.create(&project).await?;

            out.note(format!("Project '{}' added.", project.name()));
            let view = project.to_view(&technologies.catalog().await?);
            out.emit(&view, || {
                if !out.quiet {
                    println!("  ID: {}", view.id);
                }
            })?;
        }
        ProjectAction::SetStatus { id, status } => {
            let status = ProjectValidator::parse_status(&status).map_err(invalid)?;
            let project = find_project(db, &id).await?;
            repo.set_status(project.id(), status).await?;
            out.note(format!("Project '{}' is now {}.", project.name(), status));
        }
        ProjectAction::Delete { id } => {
            let project = find_project(db, &id).await?;
            repo.delete(project.id()).await?;
            out.note(format!("Project '{}' deleted.", project.name()));
        }
        ProjectAction::Require { id, technology } => {
            let mut project = find_project(db, &id).await?;
            let technology = find_technology(db, &technology).await?;
            if project.add_required_technology(technology.id()) {
                repo.update(&project).await?;
                out.note(format!("{} now requires {}.", project.name(), technology.name()));
            } else {
                out.note(format!("{} already requires {}.", project.name(), technology.name()));
            }
        }
        ProjectAction::Unrequire { id, technology } => {
            let mut project = find_project(db, &id).await?;
            let technology = find_technology(db, &technology).await?;
            if project.remove_required_technology(&technology.id()) {
                repo.update(&project).await?;
                out.note(format!("{} no longer requires {}.", project.name(), technology.name()));
            } else {
                out.note(format!("{} does not require {}.", project.name(), technology.name()));
            }
        }
    }
    Ok(())
}

fn print_candidates(candidates: &[MatchCandidate]) {
    if candidates.is_empty() {
        println!("  No developers matched.");
        return;
    }
    for (rank, c) in candidates.iter().enumerate() {
        println!(
            "  {}. {} - {:.1}% (level: {})",
            rank + 1,
            c.developer_name,
            c.technical_match,
            c.fit
        );
        if !c.matched.is_empty() {
            println!("       has: {}", c.matched.join(", "));
        }
        if !c.missing.is_empty() {
            println!("       missing: {}", c.missing.join(", "));
        }
    }
}

async fn cmd_match(
    db: &Database,
    project: &str,
    options: MatchOptions,
    record: bool,
    out: Output,
) -> anyhow::Result<()> {
    let project = find_project(db, project).await?;
    if project.required_technologies().is_empty() {
        warn!(project = %project.id(), "Project requires no technologies; every score is 0");
    }

    let service = MatchingService::new(db);
    let candidates = service.candidates(project.id(), options).await?;

    out.emit(&candidates, || {
        println!("Matches for '{}' ({}):", project.name(), project.experience_level());
        print_candidates(&candidates);
    })?;

    if record {
        let results = service.record(project.id(), &candidates).await?;
        out.note(format!("Recorded {} match result(s).", results.len()));
    }
    Ok(())
}

fn print_project_matches(developer: &Developer, matches: &[ProjectMatch]) {
    match developer.experience_level() {
        Some(level) => println!("Projects for '{}' ({}):", developer.name(), level),
        None => println!("Projects for '{}':", developer.name()),
    }
    if matches.is_empty() {
        println!("  No projects matched.");
        return;
    }
    for (rank, m) in matches.iter().enumerate() {
        println!(
            "  {}. {} - {:.1}% (level: {}, {})",
            rank + 1,
            m.project_name,
            m.technical_match,
            m.fit,
            m.status
        );
        if !m.matched.is_empty() {
            println!("       has: {}", m.matched.join(", "));
        }
        if !m.missing.is_empty() {
            println!("       missing: {}", m.missing.join(", "));
        }
    }
}

async fn cmd_match_developer(
    db: &Database,
    developer: &str,
    options: MatchOptions,
    record: bool,
    out: Output,
) -> anyhow::Result<()> {
    let developer = find_developer(db, developer).await?;
    let service = MatchingService::new(db);
    let matches = service.projects_for(developer.id(), options).await?;

    out.emit(&matches, || print_project_matches(&developer, &matches))?;

    if record {
        let results: Vec<MatchResult> = matches
            .iter()
            .map(|m| MatchResult::new(m.project_id, developer.id(), m.technical_match))
            .collect();
        service.store(&results).await?;
        out.note(format!("Recorded {} match result(s).", results.len()));
    }
    Ok(())
}

async fn cmd_match_all(
    db: &Database,
    options: MatchOptions,
    record: bool,
    out: Output,
) -> anyhow::Result<()> {
    let service = MatchingService::new(db);
    let rankings = service.rank_all(options).await?;

    out.emit(&rankings, || {
        for (i, ranking) in rankings.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("Matches for '{}':", ranking.project_name);
            print_candidates(&ranking.candidates);
        }
    })?;

    if record {
        let results: Vec<MatchResult> = rankings
            .iter()
            .flat_map(|r| {
                r.candidates
                    .iter()
                    .map(move |c| MatchResult::new(r.project_id, c.developer_id, c.technical_match))
            })
            .collect();
        service.store(&results).await?;
        out.note(format!("Recorded {} match result(s).", results.len()));
    }
    Ok(())
}

async fn cmd_results(db: &Database, project: &str, out: Output) -> anyhow::Result<()> {
    let project = find_project(db, project).await?;
    let results = MatchResultRepository::new(db)
        .list_for_project(project.id())
        .await?;
    let names: std::collections::HashMap<DeveloperId, String> = DeveloperRepository::new(db)
        .list()
        .await?
        .into_iter()
        .map(|d| (d.id(), d.name().to_string()))
        .collect();

    out.emit(&results, || {
        if results.is_empty() {
            if !out.quiet {
                println!("No results recorded for '{}'.", project.name());
                println!("\nRecord some with: devmatch match <project> --record");
            }
            return;
        }
        println!("Results for '{}':", project.name());
        for r in &results {
            let name = names.get(&r.developer_id).map_or("?", String::as_str);
            print!(
                "  {} - {:.1} combined, {:.1}% technical ({})",
                name,
                r.combined_score(),
                r.technical_match,
                r.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            match &r.ai {
                Some(ai) => println!(" ai avg {:.0}", ai.average()),
                None => println!(),
            }
        }
    })
}

fn cmd_config(action: ConfigAction, out: Output) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            out.note(format!("Set {} = {}", key, value));
        }
        ConfigAction::List => {
            let config = Config::load()?;
            if out.is_json() {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.list()? {
                    println!("{} = {}", key, value);
                }
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            out.note("Configuration reset to defaults.");
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(config: &Config, path: PathBuf, out: Output) -> anyhow::Result<()> {
    let quiet = out.quiet;
    if !quiet {
        println!("DevMatch Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    // Configuration was already loaded and validated
    if !quiet {
        match Config::config_path() {
            Ok(config_path) if config_path.exists() => {
                println!("[OK] Config file: {}", config_path.display());
            }
            Ok(config_path) => {
                println!("[--] Config file: {} (using defaults)", config_path.display());
            }
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }
    }

    match Database::new(
        DatabaseConfig::with_path(path).max_connections(config.database.max_connections),
    )
    .await
    {
        Ok(db) => {
            match db.health_check().await {
                Ok(()) => {
                    if !quiet {
                        println!("[OK] Database: Connected");
                        println!("     Path: {}", db.path().display());
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Database: Health check failed - {}", e);
                    }
                }
            }

            match db.migration_status().await {
                Ok(status) if status.needs_migration => {
                    all_ok = false;
                    if !quiet {
                        println!(
                            "[!!] Database: Migrations pending (v{} -> v{})",
                            status.current_version, status.target_version
                        );
                    }
                }
                Ok(status) => {
                    if !quiet {
                        println!("[OK] Database: Schema v{}", status.current_version);
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Database: Migration check failed - {}", e);
                    }
                }
            }

            if !quiet {
                let technologies = TechnologyRepository::new(&db).count().await.unwrap_or_default();
                let developers = DeveloperRepository::new(&db).count().await.unwrap_or_default();
                let projects = ProjectRepository::new(&db).count().await.unwrap_or_default();
                println!(
                    "     Technologies: {}, Developers: {}, Projects: {}",
                    technologies, developers, projects
                );
            }
            db.close().await;
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Database: Failed to initialize - {:#}", e);
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    if all_ok {
        Ok(())
    } else {
        Err(anyhow::anyhow!("health check failed"))
    }
}
