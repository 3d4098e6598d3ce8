//! Narrative report collaborator. The store knows nothing about this; it
//! only reads the resolved student and grade lines handed to it. Any
//! text-generation backend can sit behind `ReportBackend`.

use std::fmt::Write;

use crate::model::{GradeLine, StudentStatus, StudentView};

/// Shown instead of an error envelope when a backend fails; the view is
/// never crashed by report generation.
pub const REPORT_UNAVAILABLE: &str =
    "The report could not be generated right now. Please try again later.";

pub struct ReportInput {
    pub student: StudentView,
    pub grades: Vec<GradeLine>,
}

pub trait ReportBackend {
    fn generate(&self, input: &ReportInput) -> anyhow::Result<String>;
}

/// Deterministic offline composer covering the same three sections the
/// dashboard asks a coordinator for: performance, strengths, attention
/// points.
pub struct NarrativeBackend;

impl ReportBackend for NarrativeBackend {
    fn generate(&self, input: &ReportInput) -> anyhow::Result<String> {
        let student = &input.student;
        let mut out = String::new();

        writeln!(out, "# Pedagogical report: {}", student.student.name)?;
        writeln!(out)?;
        writeln!(
            out,
            "Class: {} · Status: {} · Enrolled: {}",
            student.class_name,
            status_label(student.student.status),
            student.student.enrollment_date
        )?;
        writeln!(out)?;

        writeln!(out, "## Academic performance")?;
        if input.grades.is_empty() {
            writeln!(
                out,
                "No grades have been recorded yet, so there is no performance \
                 picture to analyze. Recording at least one assessment per \
                 course will make the next report meaningful."
            )?;
        } else {
            let sum: u64 = input.grades.iter().map(|g| u64::from(g.value)).sum();
            let average = (sum as f64 / input.grades.len() as f64).round() as u32;
            writeln!(
                out,
                "{} has {} recorded grade(s) with an average of {}. {}",
                student.student.name,
                input.grades.len(),
                average,
                average_comment(average)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## Strengths")?;
        if let Some(best) = input.grades.iter().max_by_key(|g| g.value) {
            writeln!(
                out,
                "Strongest result so far is {} in {}.",
                best.value, best.course_name
            )?;
        } else {
            writeln!(out, "Strengths will emerge once grades are recorded.")?;
        }
        if !student.student.notes.trim().is_empty() {
            writeln!(out, "Teacher notes: {}", student.student.notes.trim())?;
        }
        writeln!(out)?;

        writeln!(out, "## Attention points")?;
        let weak: Vec<&GradeLine> = input.grades.iter().filter(|g| g.value < 70).collect();
        if weak.is_empty() {
            writeln!(
                out,
                "No course currently sits below 70; keep the current pace."
            )?;
        } else {
            for g in weak {
                writeln!(
                    out,
                    "- {} ({}): consider targeted reinforcement.",
                    g.course_name, g.value
                )?;
            }
        }
        if student.student.status != StudentStatus::Active {
            writeln!(
                out,
                "- Enrollment status is {}; follow up with the family.",
                status_label(student.student.status)
            )?;
        }

        Ok(out)
    }
}

fn status_label(status: StudentStatus) -> &'static str {
    match status {
        StudentStatus::Active => "Active",
        StudentStatus::Inactive => "Inactive",
        StudentStatus::Pending => "Pending",
    }
}

fn average_comment(average: u32) -> &'static str {
    match average {
        90..=100 => "An excellent overall standing.",
        75..=89 => "A solid overall standing.",
        60..=74 => "A passing standing with room to grow.",
        _ => "Below the passing threshold; an intervention plan is advised.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Student;

    fn sample_student() -> StudentView {
        StudentView {
            student: Student {
                id: "s1".into(),
                name: "Ana Silva".into(),
                email: "ana@exemplo.com".into(),
                age: 16,
                class_id: "c2".into(),
                enrollment_date: "2024-02-15".into(),
                status: StudentStatus::Active,
                notes: "Interested in biology.".into(),
                avatar_url: String::new(),
            },
            class_name: "2º Ano EM - B".into(),
        }
    }

    #[test]
    fn report_names_student_courses_and_sections() {
        let input = ReportInput {
            student: sample_student(),
            grades: vec![
                GradeLine {
                    course_name: "Matemática Avançada".into(),
                    value: 85,
                },
                GradeLine {
                    course_name: "Física".into(),
                    value: 62,
                },
            ],
        };
        let text = NarrativeBackend.generate(&input).expect("generate");
        assert!(text.contains("Ana Silva"));
        assert!(text.contains("## Academic performance"));
        assert!(text.contains("## Strengths"));
        assert!(text.contains("## Attention points"));
        assert!(text.contains("Matemática Avançada"));
        // 62 < 70 lands in attention points.
        assert!(text.contains("Física (62)"));
    }

    #[test]
    fn report_handles_empty_grades() {
        let input = ReportInput {
            student: sample_student(),
            grades: vec![],
        };
        let text = NarrativeBackend.generate(&input).expect("generate");
        assert!(text.contains("No grades have been recorded yet"));
    }
}
