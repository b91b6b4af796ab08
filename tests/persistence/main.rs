//! Integration tests for record files
//!
//! Verifies catalogs and the application ledger survive a save and reload
//! through real files, with and without header lines, and that the command
//! handlers leave the data directory in a consistent state.

use std::fs;

use internship_tracker::app::*;
use internship_tracker::cli::{
    handle_applications, handle_jobs, handle_students, ApplicationsAction, ApplicationsArgs,
    JobsAction, JobsArgs, StudentsAction, StudentsArgs, Workspace,
};
use internship_tracker::config::AppConfig;
use internship_tracker::errors::{AppError, CodecError, LedgerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

fn random_students(rng: &mut StdRng, count: usize) -> Vec<Student> {
    (0..count)
        .map(|i| {
            let hundredths = rng.gen_range(0..=400u32);
            Student::new(
                format!("{}", 2024000000 + i),
                format!("Student {}", i),
                format!("s{}@example.com", i),
                hundredths as f32 / 100.0,
                if i % 2 == 0 { "IT" } else { "Business" },
                "Rust, SQL",
            )
        })
        .collect()
}

#[test]
fn test_student_file_round_trip_with_headers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.txt");
    let mut rng = StdRng::seed_from_u64(11);
    let students = random_students(&mut rng, 40);

    let mut catalog = Catalog::<Student>::with_capacity(100).unwrap();
    for student in &students {
        catalog.insert(student.clone()).unwrap();
    }
    assert_eq!(catalog.save_file(&path, 2).unwrap(), 40);

    let content = fs::read_to_string(&path).unwrap();
    let first_record = content.lines().nth(2).unwrap();
    assert_eq!(first_record.split('|').count(), 6);

    let mut reloaded = Catalog::<Student>::with_capacity(100).unwrap();
    let report = reloaded.load_file(&path, 2).unwrap();
    assert_eq!(report.stats.header_lines, 2);
    assert_eq!(report.loaded(), 40);
    assert!(report.is_clean());

    let reloaded: Vec<Student> = reloaded.records().cloned().collect();
    assert_eq!(reloaded, students);
}

#[test]
fn test_lenient_gpa_and_legacy_headers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.txt");
    fs::write(
        &path,
        "Name|Student ID|Email|CGPA|Diploma|Skills\n\
         ----|----|----|----|----|----\n\
         A|1001|a@x.com|abc|IT|skills\n\
         B|1002|b@x.com|3.10|Biz|skills\n",
    )
    .unwrap();

    let mut catalog = Catalog::<Student>::with_capacity(10).unwrap();
    let report = catalog.load_file(&path, 2).unwrap();

    assert_eq!(report.loaded(), 2);
    assert_eq!(catalog.get("1001").unwrap().gpa, 0.0);
    assert_eq!(catalog.get("1002").unwrap().gpa, 3.1);
}

#[test]
fn test_duplicates_in_file_are_skipped() {
    let mut jobs = Catalog::<Job>::with_capacity(10).unwrap();
    let report = jobs
        .load_str(
            "J01|Intern|Acme|2025-06-30|SQL\n\
             J02|Analyst|Initech|2025-07-01|Excel\n\
             J01|Other|Umbrella|2025-08-01|None\n",
            0,
        )
        .unwrap();

    assert_eq!(report.loaded(), 2);
    assert_eq!(report.stats.rejected, 1);
    assert_eq!(report.diagnostics[0].line, 3);
    assert_eq!(jobs.get("J01").unwrap().company, "Acme");
}

#[test]
fn test_capacity_stops_loading() {
    let text: String = (0..8)
        .map(|i| format!("J{}|Intern|Acme|2025-06-30|\n", i))
        .collect();

    let mut jobs = Catalog::<Job>::with_capacity(5).unwrap();
    let report = jobs.load_str(&text, 0).unwrap();

    assert_eq!(jobs.len(), 5);
    assert!(report.stopped_at_capacity);
    assert!(jobs.contains("J4"));
    assert!(!jobs.contains("J5"));
}

#[test]
fn test_non_utf8_line_skipped_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.txt");
    let mut bytes = b"Ann|1001|ann@x.com|3.5|IT|Rust\r\n".to_vec();
    bytes.extend_from_slice(b"Jos\xe9|1002|jose@x.com|3.1|IT|SQL\r\n");
    bytes.extend_from_slice(b"Cara|1003|cara@x.com|2.8|Biz|Excel\r\n");
    fs::write(&path, &bytes).unwrap();

    let mut students = Catalog::<Student>::with_capacity(10).unwrap();
    let report = students.load_file(&path, 0).unwrap();

    assert_eq!(report.loaded(), 2);
    assert_eq!(report.stats.malformed, 1);
    assert_eq!(report.diagnostics[0].line, 2);
    assert!(!report.is_clean());
    assert_eq!(students.len(), 2);
    assert!(!students.contains("1002"));
    assert_eq!(students.get("1003").unwrap().skills, "Excel");
}

#[test]
fn test_handlers_refuse_to_overwrite_non_utf8_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::default().with_data_dir(Some(temp_dir.path().to_path_buf()));
    let path = config.files.students_path();
    let mut bytes = b"Ann|2024000001|ann@x.com|3.5|IT|Rust\n".to_vec();
    bytes.extend_from_slice(b"Jos\xe9|2024000002|jose@x.com|3.1|IT|SQL\n");
    fs::write(&path, &bytes).unwrap();

    let result = handle_students(
        StudentsArgs {
            force: false,
            action: StudentsAction::Remove {
                id: "2024000001".to_string(),
            },
        },
        &config,
    );
    assert!(matches!(
        result,
        Err(AppError::Codec(CodecError::WouldDropLines { skipped: 1, .. }))
    ));
    assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_missing_file_reports_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.txt");

    let mut students = Catalog::<Student>::with_capacity(10).unwrap();
    let result = students.load_file(&path, 0);
    assert!(matches!(result, Err(CodecError::NotFound { .. })));
    assert!(students.is_empty());
}

#[test]
fn test_ledger_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("applications.txt");
    let jobs = [
        Job::new("J01", "Data Intern", "Acme", "2025-06-30", ""),
        Job::new("J02", "QA Intern", "Initech", "2025-07-15", ""),
    ];

    let mut ledger = ApplicationLedger::new(50);
    for student_id in ["1001", "1002", "1003"] {
        for job in &jobs {
            ledger.apply(Application::for_job(student_id, job)).unwrap();
        }
    }
    ledger
        .set_status("1002", "J02", ApplicationStatus::Rejected)
        .unwrap();
    assert_eq!(
        ledger.apply(Application::for_job("1001", &jobs[0])),
        Err(LedgerError::DuplicateApplication {
            student_id: "1001".to_string(),
            job_id: "J01".to_string(),
        })
    );
    ledger.save_file(&path, 1).unwrap();

    let mut reloaded = ApplicationLedger::new(50);
    let report = reloaded.load_file(&path, 1).unwrap();
    assert_eq!(report.loaded(), 6);

    let original: Vec<&Application> = ledger.iter().collect();
    let restored: Vec<&Application> = reloaded.iter().collect();
    assert_eq!(original, restored);
    assert_eq!(
        reloaded.get("1002", "J02").unwrap().status,
        ApplicationStatus::Rejected
    );
}

#[test]
fn test_handlers_keep_data_directory_consistent() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::default().with_data_dir(Some(temp_dir.path().to_path_buf()));

    for (id, email) in [("2024000001", "ann@x.com"), ("2024000002", "bob@x.com")] {
        handle_students(
            StudentsArgs {
                force: false,
                action: StudentsAction::Add {
                    id: id.to_string(),
                    name: "Student".to_string(),
                    email: email.to_string(),
                    gpa: 3.0,
                    diploma: "IT".to_string(),
                    skills: "Rust".to_string(),
                },
            },
            &config,
        )
        .unwrap();
    }

    let duplicate_email = handle_students(
        StudentsArgs {
            force: false,
            action: StudentsAction::Add {
                id: "2024000003".to_string(),
                name: "Copy".to_string(),
                email: "ANN@x.com".to_string(),
                gpa: 3.0,
                diploma: "IT".to_string(),
                skills: String::new(),
            },
        },
        &config,
    );
    assert!(matches!(duplicate_email, Err(AppError::Validation(_))));

    handle_jobs(
        JobsArgs {
            force: false,
            action: JobsAction::Add {
                id: "J01".to_string(),
                title: "Data Intern".to_string(),
                company: "Acme".to_string(),
                deadline: "2025-06-30".to_string(),
                requirements: String::new(),
            },
        },
        &config,
    )
    .unwrap();

    handle_applications(
        ApplicationsArgs {
            force: false,
            action: ApplicationsAction::Apply {
                student_id: "2024000002".to_string(),
                job_id: "J01".to_string(),
            },
        },
        &config,
    )
    .unwrap();

    handle_students(
        StudentsArgs {
            force: false,
            action: StudentsAction::Remove {
                id: "2024000001".to_string(),
            },
        },
        &config,
    )
    .unwrap();

    handle_applications(
        ApplicationsArgs {
            force: false,
            action: ApplicationsAction::Summary {
                student_id: "2024000002".to_string(),
                save: true,
            },
        },
        &config,
    )
    .unwrap();

    handle_students(
        StudentsArgs {
            force: false,
            action: StudentsAction::Diploma {
                diploma: "it".to_string(),
            },
        },
        &config,
    )
    .unwrap();

    let workspace = Workspace::open(&config).unwrap();
    assert!(workspace.missing.is_empty());
    assert_eq!(workspace.students.len(), 1);
    assert!(workspace.students.contains("2024000002"));
    assert!(workspace.students.verify().is_empty());
    assert_eq!(workspace.applications.len(), 1);

    let summary =
        fs::read_to_string(temp_dir.path().join("student_summary_2024000002.txt")).unwrap();
    assert!(summary.contains("Total Applications: 1"));
    assert!(summary.contains("Pending: 1"));
}
