//! Summaries and statistics over loaded records

use std::fmt;

use serde::Serialize;

use crate::app::catalog::{Catalog, CatalogStats};
use crate::app::ledger::ApplicationLedger;
use crate::app::models::{Application, ApplicationStatus, Job, Student};
use crate::app::ordering::{ByGpaDescending, SortAlgorithm, SortKey};
use crate::app::store::RecordStore;
use crate::constants::report::{GRADE_A_MIN, GRADE_B_MIN, GRADE_C_MIN, TOP_STUDENTS};

/// Application counts for one student
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub student_id: String,
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
}

impl ApplicationSummary {
    /// Count the applications `student_id` has made
    pub fn for_student(ledger: &ApplicationLedger, student_id: &str) -> Self {
        Self::tally(student_id, ledger.for_student(student_id))
    }

    /// Count `applications` by status, attributing them to `student_id`
    pub fn tally<'a, I>(student_id: &str, applications: I) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut summary = Self {
            student_id: student_id.to_string(),
            ..Self::default()
        };
        for application in applications {
            summary.total += 1;
            match application.status {
                ApplicationStatus::Approved => summary.approved += 1,
                ApplicationStatus::Rejected => summary.rejected += 1,
                ApplicationStatus::Pending => summary.pending += 1,
            }
        }
        summary
    }

    /// File name the summary is saved under
    pub fn file_name(&self) -> String {
        format!("student_summary_{}.txt", self.student_id)
    }
}

impl fmt::Display for ApplicationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application Summary for Student ID: {}", self.student_id)?;
        writeln!(f, "Total Applications: {}", self.total)?;
        writeln!(f, "Approved: {}", self.approved)?;
        writeln!(f, "Rejected: {}", self.rejected)?;
        write!(f, "Pending: {}", self.pending)
    }
}

/// GPA band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn for_gpa(gpa: f32) -> Self {
        if gpa >= GRADE_A_MIN {
            Grade::A
        } else if gpa >= GRADE_B_MIN {
            Grade::B
        } else if gpa >= GRADE_C_MIN {
            Grade::C
        } else {
            Grade::D
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Student counts per GPA band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

impl GradeDistribution {
    fn add(&mut self, grade: Grade) {
        match grade {
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::D => self.d += 1,
        }
    }
}

/// One row of the top performers table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStudent {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub gpa: f32,
    pub grade: Grade,
}

/// GPA statistics over the loaded students
///
/// The extremes and average are `None` when no student is loaded. The top
/// table is ranked by GPA descending with selection sort over a copy of the
/// record handles, so the store order is left alone; ties keep file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpaSummary {
    pub count: usize,
    pub average: Option<f32>,
    pub highest: Option<f32>,
    pub lowest: Option<f32>,
    pub grades: GradeDistribution,
    pub top: Vec<RankedStudent>,
}

impl GpaSummary {
    /// Summarise `store`, ranking at most `top_n` students
    pub fn collect(store: &RecordStore<Student>, top_n: usize) -> Self {
        let mut ranked: Vec<&Student> = store.records().collect();
        if ranked.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            count: ranked.len(),
            ..Self::default()
        };
        let mut total = 0.0f64;
        let (mut highest, mut lowest) = (f32::MIN, f32::MAX);
        for student in &ranked {
            total += f64::from(student.gpa);
            highest = highest.max(student.gpa);
            lowest = lowest.min(student.gpa);
            summary.grades.add(Grade::for_gpa(student.gpa));
        }
        summary.average = Some((total / ranked.len() as f64) as f32);
        summary.highest = Some(highest);
        summary.lowest = Some(lowest);

        SortAlgorithm::Selection.sort_by(&mut ranked, |a, b| {
            <ByGpaDescending as SortKey<Student>>::compare(a, b)
        });
        summary.top = ranked
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, student)| RankedStudent {
                rank: i + 1,
                id: student.id.clone(),
                name: student.name.clone(),
                gpa: student.gpa,
                grade: Grade::for_gpa(student.gpa),
            })
            .collect();
        summary
    }
}

impl fmt::Display for GpaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(average), Some(highest), Some(lowest)) = (self.average, self.highest, self.lowest)
        else {
            return write!(f, "GPA: no students loaded");
        };

        writeln!(
            f,
            "GPA over {} students: average {:.2}, highest {:.2}, lowest {:.2}",
            self.count, average, highest, lowest
        )?;
        write!(
            f,
            "Grades: A {}  B {}  C {}  D {}",
            self.grades.a, self.grades.b, self.grades.c, self.grades.d
        )?;
        if !self.top.is_empty() {
            write!(f, "\nTop {} by GPA:", self.top.len())?;
            for row in &self.top {
                write!(
                    f,
                    "\n{:>4}. {:<12} {:<24} {:.2} ({})",
                    row.rank, row.id, row.name, row.gpa, row.grade
                )?;
            }
        }
        Ok(())
    }
}

/// Ledger occupancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub count: usize,
    pub capacity: usize,
}

/// Statistics for every collection
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub students: CatalogStats,
    pub jobs: CatalogStats,
    pub applications: LedgerStats,
    pub gpa: GpaSummary,
}

impl StatsReport {
    pub fn collect(
        students: &Catalog<Student>,
        jobs: &Catalog<Job>,
        applications: &ApplicationLedger,
    ) -> Self {
        Self {
            students: students.stats(),
            jobs: jobs.stats(),
            applications: LedgerStats {
                count: applications.len(),
                capacity: applications.capacity(),
            },
            gpa: GpaSummary::collect(students.store(), TOP_STUDENTS),
        }
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, stats) in [("Students", &self.students), ("Jobs", &self.jobs)] {
            writeln!(
                f,
                "{:<13} {:>4}/{:<4} ({:.1}% full, {} holes) index: {} buckets, load {:.2}, {} tombstones",
                label,
                stats.store.count,
                stats.store.capacity,
                stats.store.utilization(),
                stats.store.holes,
                stats.index.size,
                stats.index.load_factor,
                stats.index.tombstones
            )?;
        }
        writeln!(
            f,
            "{:<13} {:>4}/{:<4}",
            "Applications", self.applications.count, self.applications.capacity
        )?;
        write!(f, "{}", self.gpa)
    }
}
