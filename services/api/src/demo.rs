use crate::infra::{build_service, FixtureFile, InMemorySubmissionStore};
use clap::Args;
use govbid::config::AppConfig;
use govbid::error::AppError;
use govbid::storage::SqliteSubmissionStore;
use govbid::workflows::submission::{
    PackageOutcome, ProposalId, ReadinessResult, SubmissionService, SubmissionStore,
    PACKAGE_READINESS_GATE,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// SQLite database to create or update
    #[arg(long)]
    pub(crate) database: PathBuf,
    /// JSON file with a top-level `proposals` array
    #[arg(long)]
    pub(crate) fixture: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ReadinessArgs {
    /// SQLite database holding the proposal
    #[arg(long)]
    pub(crate) database: PathBuf,
    /// Proposal identifier
    #[arg(long)]
    pub(crate) proposal: String,
}

#[derive(Args, Debug)]
pub(crate) struct PackageArgs {
    /// SQLite database holding the proposal
    #[arg(long)]
    pub(crate) database: PathBuf,
    /// Proposal identifier
    #[arg(long)]
    pub(crate) proposal: String,
    /// Destination file or directory (defaults to the package name in the working directory)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Replace the bundled demo proposals with a JSON fixture.
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Number of checklist items to tick off per proposal before packaging.
    #[arg(long, default_value_t = 9)]
    pub(crate) complete_items: usize,
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let fixture = FixtureFile::read(&args.fixture)?;
    let store = SqliteSubmissionStore::open(&args.database)?;
    let imported = fixture.import_into(&store)?;

    println!(
        "Imported {imported} proposal(s) into {}",
        args.database.display()
    );
    Ok(())
}

pub(crate) fn run_readiness(args: ReadinessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(SqliteSubmissionStore::open(&args.database)?);
    let service = build_service(store, &config.llm)?;

    let result = service.readiness(&ProposalId(args.proposal.clone()))?;
    println!("Readiness for proposal {}", args.proposal);
    render_readiness(&result);
    Ok(())
}

pub(crate) async fn run_package(args: PackageArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(SqliteSubmissionStore::open(&args.database)?);
    let service = build_service(store, &config.llm)?;

    match service.package(&ProposalId(args.proposal)).await? {
        PackageOutcome::Archive(archive) => {
            let destination = match args.output {
                Some(path) if path.is_dir() => path.join(&archive.file_name),
                Some(path) => path,
                None => PathBuf::from(&archive.file_name),
            };
            std::fs::write(&destination, &archive.bytes)?;
            println!(
                "Wrote {} ({} bytes, readiness {}/100)",
                destination.display(),
                archive.bytes.len(),
                archive.manifest.readiness_score
            );
            for entry in &archive.manifest.files {
                println!("  - {} ({} bytes)", entry.name, entry.size_bytes);
            }
        }
        PackageOutcome::Rejected(rejection) => {
            println!("{}", rejection.message());
            render_readiness(&rejection.readiness);
        }
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fixture,
        complete_items,
    } = args;

    let fixture = match fixture {
        Some(path) => FixtureFile::read(&path)?,
        None => FixtureFile::demo()?,
    };
    let store = Arc::new(InMemorySubmissionStore::default());
    fixture.load_into_memory(&store)?;
    let service = SubmissionService::with_defaults(store, None);

    println!("Submission readiness demo (package gate {PACKAGE_READINESS_GATE}/100)");
    for proposal in &fixture.proposals {
        let id = &proposal.proposal.id;
        println!("\n{} [{}]", proposal.proposal.title, id);

        let before = service.readiness(id)?;
        println!("  Starting readiness: {}/100 ({})", before.score, before.status.label());

        work_checklist(&service, id, complete_items)?;
        let after = service.readiness(id)?;
        render_readiness(&after);

        match service.package(id).await? {
            PackageOutcome::Archive(archive) => {
                println!(
                    "  Package {} assembled ({} bytes):",
                    archive.file_name,
                    archive.bytes.len()
                );
                for entry in &archive.manifest.files {
                    println!("    - {} [{}]", entry.name, entry.media_type);
                }
            }
            PackageOutcome::Rejected(rejection) => {
                println!("  {}", rejection.message());
            }
        }
    }

    Ok(())
}

fn work_checklist<S>(
    service: &SubmissionService<S>,
    proposal_id: &ProposalId,
    complete_items: usize,
) -> Result<(), AppError>
where
    S: SubmissionStore + 'static,
{
    let seeded = service.seed_checklist(proposal_id)?;
    for item in seeded.items.iter().take(complete_items) {
        service.update_checklist_item(&item.id, true)?;
    }

    let overview = service.checklist(proposal_id)?;
    println!(
        "  Checklist: {} of {} items complete ({}%)",
        overview.progress.completed, overview.progress.total, overview.progress.progress
    );
    Ok(())
}

fn render_readiness(result: &ReadinessResult) {
    let breakdown = &result.breakdown;
    println!(
        "  Score {}/{} - {} ({})",
        result.score,
        result.max_score,
        result.status.label(),
        result.recommendation
    );
    println!(
        "    - Sections: {}/{} ({} of {} drafted)",
        breakdown.sections.score,
        breakdown.sections.max,
        breakdown.sections.with_content,
        breakdown.sections.total
    );
    println!(
        "    - Compliance: {}/{} ({} addressed, {} partial, {} not addressed)",
        breakdown.compliance.score,
        breakdown.compliance.max,
        breakdown.compliance.addressed,
        breakdown.compliance.partial,
        breakdown.compliance.not_addressed
    );
    println!(
        "    - Checklist: {}/{} ({} of {} complete)",
        breakdown.checklist.score,
        breakdown.checklist.max,
        breakdown.checklist.completed,
        breakdown.checklist.total
    );
    println!(
        "    - Metadata: {}/{} ({} of {} checks)",
        breakdown.metadata.score,
        breakdown.metadata.max,
        breakdown.metadata.checks_passed,
        breakdown.metadata.total_checks
    );
}
