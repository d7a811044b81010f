use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use admission::catalog::{
    resolver, seed_from_reader, CatalogService, CreateExamDateRequest, CreateFacultyRequest,
    Program,
};
use admission::config::PagingConfig;
use admission::context::AuditContext;
use admission::error::AppError;
use admission::intake::{
    ApplicationSubmission, EnglishCertType, Gender, IntakeService, PaymentStatus,
};
use admission::selection::SelectionChain;
use chrono::{Duration, Utc};
use clap::Args;

use crate::infra::{InMemoryApplicationRepository, InMemoryCatalogStore};

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Catalog seed CSV (Program,Faculty,Exam Date,Available Spots)
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog seed CSV; a built-in sample catalog is used otherwise
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Skip the application intake portion of the demo
    #[arg(long)]
    pub(crate) skip_intake: bool,
}

pub(crate) fn run_seed_preview(args: SeedArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryCatalogStore::default());
    let catalog = CatalogService::new(store);
    let ctx = AuditContext::at_wall_clock("seed-preview");

    let file = File::open(&args.path)?;
    let report = seed_from_reader(file, &catalog, &ctx)?;
    println!(
        "Seeded {} faculties and {} exam dates from {}",
        report.faculties,
        report.exam_dates,
        args.path.display()
    );

    print_catalog(&catalog)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryCatalogStore::default());
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let catalog = CatalogService::new(store.clone());
    let intake = IntakeService::new(store, repository, PagingConfig::default());
    let ctx = AuditContext::at_wall_clock("demo");

    println!("Admission service demo");
    match args.seed {
        Some(path) => {
            let file = File::open(&path)?;
            let report = seed_from_reader(file, &catalog, &ctx)?;
            println!(
                "Loaded {} faculties and {} exam dates from {}",
                report.faculties,
                report.exam_dates,
                path.display()
            );
        }
        None => seed_sample_catalog(&catalog, &ctx)?,
    }

    print_catalog(&catalog)?;

    if args.skip_intake {
        return Ok(());
    }

    // Walk the dependent-selection chain the way the public form does.
    let groups = catalog.load_all()?;
    let faculties = resolver::faculties_for_program(Program::Bachelor, &groups);
    let Some(faculty) = faculties.first() else {
        println!("\nNo bachelor faculties available; skipping intake walkthrough");
        return Ok(());
    };

    let mut chain = SelectionChain::new();
    chain.set_program(Program::Bachelor);
    chain.set_faculty(faculty.id);
    let slots = catalog.exam_dates(chain.faculty())?;
    let Some(slot) = slots.first() else {
        println!("\nNo exam dates linked to {}; skipping intake", faculty.name);
        return Ok(());
    };
    chain.set_exam_date(slot.id);

    println!(
        "\nSelection chain: {} -> {} -> {} ({} spots shown)",
        Program::Bachelor.display_label(),
        faculty.name,
        slot.date.format("%Y-%m-%d %H:%M"),
        resolver::remaining_spots(slot),
    );

    let submission = ApplicationSubmission {
        first_name: "Aziza".to_string(),
        last_name: "Karimova".to_string(),
        middle_name: None,
        gender: Gender::Female,
        phone: "+998901234567".to_string(),
        school: "Tashkent School 110".to_string(),
        program_degree: Program::Bachelor,
        faculty_id: faculty.id,
        exam_date_id: slot.id,
        has_english_cert: true,
        english_cert_type: Some(EnglishCertType::Ielts),
        cert_score: Some(7),
        documents: Vec::new(),
        terms_accepted: true,
    };

    let stored = intake.submit(submission, &ctx)?;
    println!(
        "Application {} submitted for {} (payment {})",
        stored.id,
        faculty.name,
        stored.payment_status.label()
    );

    intake.set_payment_status(stored.id, PaymentStatus::Processing, &ctx)?;
    let paid = intake.set_payment_status(stored.id, PaymentStatus::Paid, &ctx)?;
    println!("Payment settled: {}", paid.payment_status.label());

    let view = intake.view(stored.id)?;
    println!(
        "Assignment: faculty={} exam_date={} consistent={}",
        view.assignment
            .faculty_name
            .as_deref()
            .unwrap_or("unavailable"),
        view.assignment
            .exam_date
            .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unavailable".to_string()),
        view.assignment.is_consistent(),
    );

    Ok(())
}

fn seed_sample_catalog(
    catalog: &CatalogService<InMemoryCatalogStore>,
    ctx: &AuditContext,
) -> Result<(), AppError> {
    let exam_day = Utc::now() + Duration::days(30);
    let later_exam_day = exam_day + Duration::days(14);

    let physics = catalog.create_faculty(
        CreateFacultyRequest {
            name: "Physics".to_string(),
            program: "bachelor".to_string(),
        },
        ctx,
    )?;
    let chemistry = catalog.create_faculty(
        CreateFacultyRequest {
            name: "Chemistry".to_string(),
            program: "bachelor".to_string(),
        },
        ctx,
    )?;
    let data_science = catalog.create_faculty(
        CreateFacultyRequest {
            name: "Data Science".to_string(),
            program: "master".to_string(),
        },
        ctx,
    )?;

    catalog.create_exam_date(
        CreateExamDateRequest {
            date: exam_day,
            available_spots: 50,
            faculty_ids: vec![physics.id, chemistry.id],
            faculty_ids_str: format!("{},{}", physics.id, chemistry.id),
        },
        ctx,
    )?;
    catalog.create_exam_date(
        CreateExamDateRequest {
            date: later_exam_day,
            available_spots: 30,
            faculty_ids: vec![data_science.id],
            faculty_ids_str: data_science.id.to_string(),
        },
        ctx,
    )?;

    println!("Loaded the built-in sample catalog");
    Ok(())
}

fn print_catalog(catalog: &CatalogService<InMemoryCatalogStore>) -> Result<(), AppError> {
    let groups = catalog.load_all()?;
    for group in &groups {
        println!("\n{}", group.program.display_label());
        if group.faculty_list.is_empty() {
            println!("  (no faculties)");
            continue;
        }
        for faculty in &group.faculty_list {
            println!("  {}", faculty.name);
            if faculty.exam_dates.is_empty() {
                println!("    no exam dates");
            }
            for slot in &faculty.exam_dates {
                println!(
                    "    {} - {} spots{}",
                    slot.date.format("%Y-%m-%d %H:%M"),
                    slot.available_spots,
                    if slot.is_active { "" } else { " (inactive)" },
                );
            }
        }
    }
    Ok(())
}
