//! Command handlers for the internship tracker CLI
//!
//! Each handler loads the record files it needs, runs one operation against
//! the in-memory collections and, for mutating commands, writes the affected
//! file back.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::search;
use crate::app::validation::{validate_new_job, validate_new_student};
use crate::app::{
    Application, ApplicationLedger, ApplicationSummary, ByCompany, ByDeadline, ByGpaAscending,
    ByGpaDescending, ById, ByName, ByTitle, Catalog, EntityKind, Job, LoadReport, Record,
    SortAlgorithm, SortKey, StatsReport, Student,
};
use crate::cli::{
    ApplicationsAction, ApplicationsArgs, ConfigAction, ConfigArgs, JobOrder, JobsAction, JobsArgs,
    LookupMethod, StudentOrder, StudentsAction, StudentsArgs,
};
use crate::config::AppConfig;
use crate::errors::{AppError, CodecError, CodecResult, Result, StoreError};

/// Every collection loaded from the configured data directory
pub struct Workspace {
    pub config: AppConfig,
    pub students: Catalog<Student>,
    pub jobs: Catalog<Job>,
    pub applications: ApplicationLedger,
    /// Load report per file that existed
    pub reports: Vec<(EntityKind, LoadReport)>,
    /// Files that were missing; their collections start empty
    pub missing: Vec<PathBuf>,
    /// Save files even when lines skipped on load would be dropped
    pub force: bool,
}

impl Workspace {
    /// Load all three record files
    ///
    /// A missing file leaves its collection empty and is listed in `missing`.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let policy = config.index.policy();
        let files = &config.files;

        let mut workspace = Self {
            config: config.clone(),
            students: Catalog::new(config.store.max_students, policy)?,
            jobs: Catalog::new(config.store.max_jobs, policy)?,
            applications: ApplicationLedger::new(config.store.max_applications),
            reports: Vec::new(),
            missing: Vec::new(),
            force: false,
        };

        let loaded = workspace
            .students
            .load_file(&files.students_path(), files.student_header_lines);
        workspace.record(EntityKind::Student, loaded)?;

        let loaded = workspace
            .jobs
            .load_file(&files.jobs_path(), files.job_header_lines);
        workspace.record(EntityKind::Job, loaded)?;

        let loaded = workspace
            .applications
            .load_file(&files.applications_path(), files.application_header_lines);
        workspace.record(EntityKind::Application, loaded)?;

        Ok(workspace)
    }

    fn record(&mut self, kind: EntityKind, loaded: CodecResult<LoadReport>) -> Result<()> {
        match loaded {
            Ok(report) => self.reports.push((kind, report)),
            Err(CodecError::NotFound { path }) => {
                warn!("{} file {} not found; starting empty", kind, path.display());
                self.missing.push(path);
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Refuse to rewrite the `kind` file if its load skipped any line
    fn ensure_lossless(&self, kind: EntityKind, path: PathBuf) -> Result<()> {
        let Some((_, report)) = self.reports.iter().find(|(k, _)| *k == kind) else {
            return Ok(());
        };
        if report.is_clean() {
            return Ok(());
        }

        let skipped = report.skipped();
        if self.force {
            warn!(
                "Rewriting {} drops {} line(s) skipped on load",
                path.display(),
                skipped
            );
            return Ok(());
        }
        Err(CodecError::WouldDropLines { path, skipped }.into())
    }

    pub fn save_students(&self) -> Result<()> {
        let files = &self.config.files;
        self.ensure_lossless(EntityKind::Student, files.students_path())?;
        self.students
            .save_file(&files.students_path(), files.student_header_lines)?;
        Ok(())
    }

    pub fn save_jobs(&self) -> Result<()> {
        let files = &self.config.files;
        self.ensure_lossless(EntityKind::Job, files.jobs_path())?;
        self.jobs
            .save_file(&files.jobs_path(), files.job_header_lines)?;
        Ok(())
    }

    pub fn save_applications(&self) -> Result<()> {
        let files = &self.config.files;
        self.ensure_lossless(EntityKind::Application, files.applications_path())?;
        self.applications
            .save_file(&files.applications_path(), files.application_header_lines)?;
        Ok(())
    }
}

/// Sort a catalog by `K` and collect the ordered records
fn sorted_records<T, K>(
    catalog: &mut Catalog<T>,
    algorithm: Option<SortAlgorithm>,
) -> Result<Vec<&T>>
where
    T: Record,
    K: SortKey<T>,
{
    let view = match algorithm {
        Some(algorithm) => catalog.sorted_with::<K>(algorithm)?,
        None => catalog.sorted::<K>()?,
    };
    Ok(view.records().to_vec())
}

/// Look a record up by id with the chosen method
fn lookup<'a, T: Record>(
    catalog: &'a mut Catalog<T>,
    id: &str,
    method: LookupMethod,
) -> Result<Option<&'a T>> {
    let found = match method {
        LookupMethod::Hash => catalog.get(id),
        LookupMethod::Binary => catalog.sorted::<ById>()?.find(id),
        LookupMethod::Fibonacci => {
            let view = catalog.sorted::<ById>()?;
            view.fibonacci_search(id).and_then(|position| view.get(position))
        }
    };
    Ok(found)
}

fn print_students(students: &[&Student]) {
    if students.is_empty() {
        println!("No students found.");
        return;
    }

    println!(
        "{:<12} {:<20} {:<25} {:>5}  {:<12} {}",
        "Student ID", "Name", "Email", "CGPA", "Diploma", "Skills"
    );
    println!("{}", "-".repeat(90));
    for student in students {
        println!(
            "{:<12} {:<20} {:<25} {:>5.2}  {:<12} {}",
            student.id, student.name, student.email, student.gpa, student.diploma, student.skills
        );
    }
    println!("\n{} student(s)", students.len());
}

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }

    println!(
        "{:<8} {:<25} {:<20} {:<12} {}",
        "Job ID", "Title", "Company", "Deadline", "Requirements"
    );
    println!("{}", "-".repeat(85));
    for job in jobs {
        println!(
            "{:<8} {:<25} {:<20} {:<12} {}",
            job.id, job.title, job.company, job.deadline, job.requirements
        );
    }
    println!("\n{} job(s)", jobs.len());
}

fn print_applications<'a>(applications: impl Iterator<Item = &'a Application>) {
    println!(
        "{:<12} {:<8} {:<25} {:<20} {:<12}",
        "Student ID", "Job ID", "Job Title", "Company", "Status"
    );
    println!("{}", "-".repeat(77));

    let mut count = 0;
    for application in applications {
        println!(
            "{:<12} {:<8} {:<25} {:<20} {:<12}",
            application.student_id,
            application.job_id,
            application.job_title,
            application.company,
            application.status
        );
        count += 1;
    }
    println!("\n{} application(s)", count);
}

/// Handle the students command group
pub fn handle_students(args: StudentsArgs, config: &AppConfig) -> Result<()> {
    let mut workspace = Workspace::open(config)?;
    workspace.force = args.force;
    let students = &mut workspace.students;

    match args.action {
        StudentsAction::List { sort, algorithm } => {
            let records = match sort {
                None => students.records().collect(),
                Some(StudentOrder::Id) => sorted_records::<_, ById>(students, algorithm)?,
                Some(StudentOrder::Name) => sorted_records::<_, ByName>(students, algorithm)?,
                Some(StudentOrder::GpaDesc) => {
                    sorted_records::<_, ByGpaDescending>(students, algorithm)?
                }
                Some(StudentOrder::GpaAsc) => {
                    sorted_records::<_, ByGpaAscending>(students, algorithm)?
                }
            };
            print_students(&records);
        }

        StudentsAction::Find { id, method } => match lookup(students, &id, method)? {
            Some(student) => print_students(&[student]),
            None => println!("No student with ID {}", id),
        },

        StudentsAction::Search { skill } => {
            print_students(&search::students_with_skill(students.store(), &skill));
        }

        StudentsAction::Diploma { diploma } => {
            print_students(&search::students_with_diploma(students.store(), &diploma));
        }

        StudentsAction::Range { min, max } => {
            if min > max {
                return Err(AppError::generic(format!(
                    "Minimum GPA {} is greater than maximum {}",
                    min, max
                )));
            }
            print_students(&search::students_in_gpa_range(students.store(), min, max));
        }

        StudentsAction::Gpa { gpa } => {
            let view = students.sorted::<ByGpaAscending>()?;
            match view.interpolation_search(gpa).and_then(|p| view.get(p)) {
                Some(student) => print_students(&[student]),
                None => println!("No student with GPA {:.2}", gpa),
            }
        }

        StudentsAction::Add {
            id,
            name,
            email,
            gpa,
            diploma,
            skills,
        } => {
            let student = Student::new(id, name, email, gpa, diploma, skills);
            validate_new_student(&student, students.store())?;
            let summary = student.to_string();
            students.insert(student)?;
            workspace.save_students()?;
            println!("✅ Registered {}", summary);
        }

        StudentsAction::Remove { id } => {
            let removed = students.remove(&id)?;
            students.compact()?;
            workspace.save_students()?;

            let dangling = workspace.applications.for_student(&id).count();
            println!("🗑️  Removed {} ({})", removed.name, removed.id);
            if dangling > 0 {
                println!(
                    "   {} application(s) still reference this student",
                    dangling
                );
            }
        }
    }
    Ok(())
}

/// Handle the jobs command group
pub fn handle_jobs(args: JobsArgs, config: &AppConfig) -> Result<()> {
    let mut workspace = Workspace::open(config)?;
    workspace.force = args.force;
    let jobs = &mut workspace.jobs;

    match args.action {
        JobsAction::List { sort, algorithm } => {
            let records = match sort {
                None => jobs.records().collect(),
                Some(JobOrder::Id) => sorted_records::<_, ById>(jobs, algorithm)?,
                Some(JobOrder::Deadline) => sorted_records::<_, ByDeadline>(jobs, algorithm)?,
                Some(JobOrder::Title) => sorted_records::<_, ByTitle>(jobs, algorithm)?,
                Some(JobOrder::Company) => sorted_records::<_, ByCompany>(jobs, algorithm)?,
            };
            print_jobs(&records);
        }

        JobsAction::Find { id, method } => match lookup(jobs, &id, method)? {
            Some(job) => print_jobs(&[job]),
            None => println!("No job with ID {}", id),
        },

        JobsAction::Search { keyword, company } => {
            let found = if company {
                search::jobs_by_company(jobs.store(), &keyword)
            } else {
                search::jobs_matching(jobs.store(), &keyword)
            };
            print_jobs(&found);
        }

        JobsAction::Add {
            id,
            title,
            company,
            deadline,
            requirements,
        } => {
            let job = Job::new(id, title, company, deadline, requirements);
            validate_new_job(&job)?;
            let summary = job.to_string();
            jobs.insert(job)?;
            workspace.save_jobs()?;
            println!("✅ Published {}", summary);
        }

        JobsAction::Remove { id } => {
            let removed = jobs.remove(&id)?;
            jobs.compact()?;
            workspace.save_jobs()?;

            let dangling = workspace.applications.for_job(&id).count();
            println!("🗑️  Removed {} ({})", removed.title, removed.id);
            if dangling > 0 {
                println!("   {} application(s) still reference this job", dangling);
            }
        }
    }
    Ok(())
}

/// Handle the applications command group
pub fn handle_applications(args: ApplicationsArgs, config: &AppConfig) -> Result<()> {
    let mut workspace = Workspace::open(config)?;
    workspace.force = args.force;

    match args.action {
        ApplicationsAction::List { student, job } => {
            let matching = workspace.applications.iter().filter(|app| {
                student.as_deref().map_or(true, |id| app.student_id == id)
                    && job.as_deref().map_or(true, |id| app.job_id == id)
            });
            print_applications(matching);
        }

        ApplicationsAction::Apply { student_id, job_id } => {
            if !workspace.students.contains(&student_id) {
                return Err(StoreError::UnknownIdentifier { id: student_id }.into());
            }
            let job = workspace
                .jobs
                .get(&job_id)
                .ok_or_else(|| StoreError::UnknownIdentifier { id: job_id.clone() })?;

            workspace.applications.apply_to(student_id.as_str(), job)?;
            workspace.save_applications()?;
            if let Some(application) = workspace.applications.get(&student_id, &job_id) {
                println!("✅ Application recorded: {}", application);
            }
        }

        ApplicationsAction::SetStatus {
            student_id,
            job_id,
            status,
        } => {
            let previous = workspace
                .applications
                .set_status(&student_id, &job_id, status)?;
            workspace.save_applications()?;
            println!(
                "✅ Application {} -> {}: {} → {}",
                student_id, job_id, previous, status
            );
        }

        ApplicationsAction::Summary { student_id, save } => {
            let summary = ApplicationSummary::for_student(&workspace.applications, &student_id);
            println!("\n=== Application Summary ===");
            println!("{}", summary);

            if save {
                let path = workspace.config.files.data_dir.join(summary.file_name());
                fs::write(&path, format!("{}\n", summary))?;
                info!("Wrote summary to {}", path.display());
                println!("\nSummary saved to {}", path.display());
            }
        }
    }
    Ok(())
}

/// Handle the check command
///
/// Fails if any collection's index disagrees with its store; skipped lines
/// are reported but do not fail the check.
pub fn handle_check(config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(config)?;

    println!("📋 Record File Check");
    println!("====================");

    for path in &workspace.missing {
        println!("⚠️  Missing: {}", path.display());
    }

    for (kind, report) in &workspace.reports {
        let path = report
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!(
            "\n{} ({}): {} loaded, {} skipped",
            kind.plural(),
            path,
            report.loaded(),
            report.skipped()
        );
        for diagnostic in &report.diagnostics {
            println!("   line {}: {}", diagnostic.line, diagnostic.reason);
        }
        if report.stopped_at_capacity {
            println!("   ⚠️  stopped early: capacity reached");
        }
    }

    let mut problems = workspace.students.verify();
    problems.extend(workspace.jobs.verify());
    if !problems.is_empty() {
        for problem in &problems {
            println!("❌ {}", problem);
        }
        return Err(AppError::generic(format!(
            "{} index inconsistencies found",
            problems.len()
        )));
    }

    println!("\n✅ Indexes consistent with stores");
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(config: &AppConfig, json: bool) -> Result<()> {
    let workspace = Workspace::open(config)?;
    let report = StatsReport::collect(
        &workspace.students,
        &workspace.jobs,
        &workspace.applications,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📊 Store Statistics");
        println!("{}", report);
    }
    Ok(())
}

/// Handle the config command group
pub fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::get_default_config_path()?,
            };
            AppConfig::write_default(&path, force)?;
            println!("📁 Created default configuration file:");
            println!("   {}", path.display());
        }
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig::default().with_data_dir(Some(dir.path().to_path_buf()))
    }

    #[test]
    fn test_workspace_with_missing_files() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::open(&config_in(&dir)).unwrap();

        assert!(workspace.students.is_empty());
        assert_eq!(workspace.missing.len(), 3);
        assert!(workspace.reports.is_empty());
    }

    #[test]
    fn test_add_apply_and_set_status_persist() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        handle_students(
            StudentsArgs {
                force: false,
                action: StudentsAction::Add {
                    id: "2024000001".to_string(),
                    name: "Ann Lee".to_string(),
                    email: "ann@x.com".to_string(),
                    gpa: 3.4,
                    diploma: "IT".to_string(),
                    skills: "Rust".to_string(),
                },
            },
            &config,
        )
        .unwrap();

        handle_jobs(
            JobsArgs {
                force: false,
                action: JobsAction::Add {
                    id: "J01".to_string(),
                    title: "Data Intern".to_string(),
                    company: "Acme".to_string(),
                    deadline: "2025-06-30".to_string(),
                    requirements: "SQL".to_string(),
                },
            },
            &config,
        )
        .unwrap();

        let apply = || ApplicationsArgs {
            force: false,
            action: ApplicationsAction::Apply {
                student_id: "2024000001".to_string(),
                job_id: "J01".to_string(),
            },
        };
        handle_applications(apply(), &config).unwrap();
        assert!(handle_applications(apply(), &config).is_err());

        handle_applications(
            ApplicationsArgs {
                force: false,
                action: ApplicationsAction::SetStatus {
                    student_id: "2024000001".to_string(),
                    job_id: "J01".to_string(),
                    status: crate::app::ApplicationStatus::Approved,
                },
            },
            &config,
        )
        .unwrap();

        let workspace = Workspace::open(&config).unwrap();
        assert_eq!(workspace.students.len(), 1);
        assert_eq!(workspace.jobs.get("J01").unwrap().company, "Acme");
        let summary = ApplicationSummary::for_student(&workspace.applications, "2024000001");
        assert_eq!(summary.approved, 1);
        assert!(workspace.missing.is_empty());
    }

    #[test]
    fn test_invalid_registration_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let result = handle_students(
            StudentsArgs {
                force: false,
                action: StudentsAction::Add {
                    id: "1001".to_string(),
                    name: "Short Id".to_string(),
                    email: "s@x.com".to_string(),
                    gpa: 3.0,
                    diploma: "IT".to_string(),
                    skills: String::new(),
                },
            },
            &config,
        );

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(!config.files.students_path().exists());
    }

    #[test]
    fn test_apply_requires_known_student_and_job() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(config.files.jobs_path(), "J01|Intern|Acme|2025-06-30|\n").unwrap();

        let result = handle_applications(
            ApplicationsArgs {
                force: false,
                action: ApplicationsAction::Apply {
                    student_id: "2024000001".to_string(),
                    job_id: "J01".to_string(),
                },
            },
            &config,
        );
        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::UnknownIdentifier { .. }))
        ));
    }

    #[test]
    fn test_mutation_refuses_to_drop_skipped_lines() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let original = "J01|Intern|Acme|2025-06-30|\nJ02|Analyst|Initech|2025-07-01\nJ03|QA|Umbrella|2025-08-01|\n";
        fs::write(config.files.jobs_path(), original).unwrap();

        let add = |force| JobsArgs {
            force,
            action: JobsAction::Add {
                id: "J04".to_string(),
                title: "Web Intern".to_string(),
                company: "Globex".to_string(),
                deadline: "2025-09-01".to_string(),
                requirements: String::new(),
            },
        };

        let refused = handle_jobs(add(false), &config);
        assert!(matches!(
            refused,
            Err(AppError::Codec(CodecError::WouldDropLines { skipped: 1, .. }))
        ));
        assert_eq!(fs::read_to_string(config.files.jobs_path()).unwrap(), original);

        handle_jobs(add(true), &config).unwrap();
        let workspace = Workspace::open(&config).unwrap();
        assert!(workspace.jobs.contains("J04"));
        assert!(!workspace.jobs.contains("J02"));
        assert!(workspace.reports.iter().all(|(_, report)| report.is_clean()));
    }

    #[test]
    fn test_clean_student_file_unaffected_by_dirty_job_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(config.files.jobs_path(), "J01|Intern|Acme\n").unwrap();

        handle_students(
            StudentsArgs {
                force: false,
                action: StudentsAction::Add {
                    id: "2024000009".to_string(),
                    name: "Ann Lee".to_string(),
                    email: "ann@x.com".to_string(),
                    gpa: 3.4,
                    diploma: "IT".to_string(),
                    skills: String::new(),
                },
            },
            &config,
        )
        .unwrap();
        assert!(config.files.students_path().exists());
    }

    #[test]
    fn test_check_reports_skipped_lines() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(
            config.files.students_path(),
            "A|1001|a@x.com|3.5|IT|skills\nB|1002|b@x.com|3.1\n",
        )
        .unwrap();

        handle_check(&config).unwrap();

        let workspace = Workspace::open(&config).unwrap();
        let (kind, report) = &workspace.reports[0];
        assert_eq!(*kind, EntityKind::Student);
        assert_eq!(report.diagnostics[0].line, 2);
    }
}
