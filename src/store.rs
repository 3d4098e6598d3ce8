//! In-memory relational layer over the five entity collections.
//!
//! `SchoolDb` is the single authority over entity state. Foreign keys are
//! weak string references: never validated at write time, resolved to
//! sentinel display values at read time. Every mutation is followed by a
//! full snapshot of all five collections to the workspace slots.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    ClassPatch, Course, CoursePatch, CourseView, DashboardStats, Grade, GradeLine, GradePatch,
    NewClass, NewCourse, NewGrade, NewStudent, NewTeacher, SchoolClass, Student, StudentPatch,
    StudentStatus, StudentView, Teacher, TeacherPatch,
};
use crate::seed;
use crate::storage;

pub const NO_CLASS: &str = "No Class";
pub const NO_TEACHER: &str = "No Teacher";
pub const UNKNOWN_COURSE: &str = "Unknown Course";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// A slot write failed. The in-memory mutation is kept; the next
    /// successful mutation rewrites all five slots.
    #[error("snapshot persistence failed: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Common shape shared by all five collections, so every entity type gets
/// the same list/create/update/delete capability set.
trait Entity: Clone {
    const KIND: &'static str;
    fn id(&self) -> &str;
}

impl Entity for SchoolClass {
    const KIND: &'static str = "class";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Teacher {
    const KIND: &'static str = "teacher";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Student {
    const KIND: &'static str = "student";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Course {
    const KIND: &'static str = "course";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Grade {
    const KIND: &'static str = "grade";
    fn id(&self) -> &str {
        &self.id
    }
}

fn patch_entity<T: Entity>(
    items: &mut [T],
    id: &str,
    apply: impl FnOnce(&mut T),
) -> Result<T, StoreError> {
    let Some(item) = items.iter_mut().find(|e| e.id() == id) else {
        return Err(StoreError::NotFound {
            entity: T::KIND,
            id: id.to_string(),
        });
    };
    apply(item);
    Ok(item.clone())
}

// Delete is a no-op when the id is absent, not an error.
fn remove_entity<T: Entity>(items: &mut Vec<T>, id: &str) {
    items.retain(|e| e.id() != id);
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub struct SchoolDb {
    workspace: PathBuf,
    classes: Vec<SchoolClass>,
    teachers: Vec<Teacher>,
    students: Vec<Student>,
    courses: Vec<Course>,
    grades: Vec<Grade>,
}

impl SchoolDb {
    /// Load each collection from its workspace slot, falling back to the
    /// seed fixture for any slot that is absent or unparsable. Happens once,
    /// synchronously, before any operation is accepted.
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        storage::ensure_workspace(workspace)?;
        Ok(Self {
            workspace: workspace.to_path_buf(),
            classes: storage::load_slot(workspace, storage::SLOT_CLASSES)
                .unwrap_or_else(seed::classes),
            teachers: storage::load_slot(workspace, storage::SLOT_TEACHERS)
                .unwrap_or_else(seed::teachers),
            students: storage::load_slot(workspace, storage::SLOT_STUDENTS)
                .unwrap_or_else(seed::students),
            courses: storage::load_slot(workspace, storage::SLOT_COURSES)
                .unwrap_or_else(seed::courses),
            grades: storage::load_slot(workspace, storage::SLOT_GRADES)
                .unwrap_or_else(seed::grades),
        })
    }

    /// Snapshot all five collections, each under its own slot. There is no
    /// cross-slot atomicity: a failure may leave earlier slots written.
    pub fn persist(&self) -> Result<(), StoreError> {
        storage::save_slot(&self.workspace, storage::SLOT_CLASSES, &self.classes)
            .map_err(StoreError::Persistence)?;
        storage::save_slot(&self.workspace, storage::SLOT_TEACHERS, &self.teachers)
            .map_err(StoreError::Persistence)?;
        storage::save_slot(&self.workspace, storage::SLOT_STUDENTS, &self.students)
            .map_err(StoreError::Persistence)?;
        storage::save_slot(&self.workspace, storage::SLOT_COURSES, &self.courses)
            .map_err(StoreError::Persistence)?;
        storage::save_slot(&self.workspace, storage::SLOT_GRADES, &self.grades)
            .map_err(StoreError::Persistence)?;
        Ok(())
    }

    // --- Resolution (read-time join, derived fields never stored) ---

    fn resolve_student(&self, student: &Student) -> StudentView {
        let class_name = self
            .classes
            .iter()
            .find(|c| c.id == student.class_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| NO_CLASS.to_string());
        StudentView {
            student: student.clone(),
            class_name,
        }
    }

    fn resolve_course(&self, course: &Course) -> CourseView {
        let teacher_name = self
            .teachers
            .iter()
            .find(|t| t.id == course.teacher_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| NO_TEACHER.to_string());
        CourseView {
            course: course.clone(),
            teacher_name,
        }
    }

    // --- Classes ---

    pub fn list_classes(&self) -> Vec<SchoolClass> {
        self.classes.clone()
    }

    pub fn add_class(&mut self, new: NewClass) -> Result<SchoolClass, StoreError> {
        let class = SchoolClass {
            id: new_id(),
            name: new.name,
            year: new.year,
        };
        self.classes.push(class.clone());
        self.persist()?;
        Ok(class)
    }

    pub fn update_class(&mut self, id: &str, patch: ClassPatch) -> Result<SchoolClass, StoreError> {
        let updated = patch_entity(&mut self.classes, id, |c| {
            if let Some(name) = patch.name {
                c.name = name;
            }
            if let Some(year) = patch.year {
                c.year = year;
            }
        })?;
        self.persist()?;
        Ok(updated)
    }

    /// Does not cascade: students keep their (now dangling) class id and
    /// resolve to the sentinel on the next read.
    pub fn delete_class(&mut self, id: &str) -> Result<(), StoreError> {
        remove_entity(&mut self.classes, id);
        self.persist()
    }

    // --- Teachers ---

    pub fn list_teachers(&self) -> Vec<Teacher> {
        self.teachers.clone()
    }

    pub fn add_teacher(&mut self, new: NewTeacher) -> Result<Teacher, StoreError> {
        let teacher = Teacher {
            id: new_id(),
            name: new.name,
            email: new.email,
            specialty: new.specialty,
        };
        self.teachers.push(teacher.clone());
        self.persist()?;
        Ok(teacher)
    }

    pub fn update_teacher(&mut self, id: &str, patch: TeacherPatch) -> Result<Teacher, StoreError> {
        let updated = patch_entity(&mut self.teachers, id, |t| {
            if let Some(name) = patch.name {
                t.name = name;
            }
            if let Some(email) = patch.email {
                t.email = email;
            }
            if let Some(specialty) = patch.specialty {
                t.specialty = specialty;
            }
        })?;
        self.persist()?;
        Ok(updated)
    }

    /// Does not cascade: courses keep their dangling teacher id.
    pub fn delete_teacher(&mut self, id: &str) -> Result<(), StoreError> {
        remove_entity(&mut self.teachers, id);
        self.persist()
    }

    // --- Students ---

    pub fn list_students(&self) -> Vec<StudentView> {
        self.students
            .iter()
            .map(|s| self.resolve_student(s))
            .collect()
    }

    pub fn add_student(&mut self, new: NewStudent) -> Result<StudentView, StoreError> {
        let id = new_id();
        let student = Student {
            avatar_url: format!("https://picsum.photos/seed/{id}/200"),
            id,
            name: new.name,
            email: new.email,
            age: new.age,
            class_id: new.class_id,
            enrollment_date: new.enrollment_date.unwrap_or_else(today),
            status: new.status,
            notes: new.notes,
        };
        self.students.push(student.clone());
        self.persist()?;
        Ok(self.resolve_student(&student))
    }

    pub fn update_student(
        &mut self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<StudentView, StoreError> {
        let updated = patch_entity(&mut self.students, id, |s| {
            if let Some(name) = patch.name {
                s.name = name;
            }
            if let Some(email) = patch.email {
                s.email = email;
            }
            if let Some(age) = patch.age {
                s.age = age;
            }
            if let Some(class_id) = patch.class_id {
                s.class_id = class_id;
            }
            if let Some(enrollment_date) = patch.enrollment_date {
                s.enrollment_date = enrollment_date;
            }
            if let Some(status) = patch.status {
                s.status = status;
            }
            if let Some(notes) = patch.notes {
                s.notes = notes;
            }
            if let Some(avatar_url) = patch.avatar_url {
                s.avatar_url = avatar_url;
            }
        })?;
        self.persist()?;
        Ok(self.resolve_student(&updated))
    }

    /// Cascades: every grade referencing the student goes with it.
    pub fn delete_student(&mut self, id: &str) -> Result<(), StoreError> {
        remove_entity(&mut self.students, id);
        self.grades.retain(|g| g.student_id != id);
        self.persist()
    }

    // --- Courses ---

    pub fn list_courses(&self) -> Vec<CourseView> {
        self.courses
            .iter()
            .map(|c| self.resolve_course(c))
            .collect()
    }

    pub fn add_course(&mut self, new: NewCourse) -> Result<CourseView, StoreError> {
        let course = Course {
            id: new_id(),
            name: new.name,
            teacher_id: new.teacher_id,
            schedule: new.schedule,
        };
        self.courses.push(course.clone());
        self.persist()?;
        Ok(self.resolve_course(&course))
    }

    pub fn update_course(&mut self, id: &str, patch: CoursePatch) -> Result<CourseView, StoreError> {
        let updated = patch_entity(&mut self.courses, id, |c| {
            if let Some(name) = patch.name {
                c.name = name;
            }
            if let Some(teacher_id) = patch.teacher_id {
                c.teacher_id = teacher_id;
            }
            if let Some(schedule) = patch.schedule {
                c.schedule = schedule;
            }
        })?;
        self.persist()?;
        Ok(self.resolve_course(&updated))
    }

    /// Cascades: every grade referencing the course goes with it.
    pub fn delete_course(&mut self, id: &str) -> Result<(), StoreError> {
        remove_entity(&mut self.courses, id);
        self.grades.retain(|g| g.course_id != id);
        self.persist()
    }

    // --- Grades ---

    pub fn list_grades(&self) -> Vec<Grade> {
        self.grades.clone()
    }

    pub fn add_grade(&mut self, new: NewGrade) -> Result<Grade, StoreError> {
        let grade = Grade {
            id: new_id(),
            student_id: new.student_id,
            course_id: new.course_id,
            value: new.value,
            date: new.date.unwrap_or_else(today),
        };
        self.grades.push(grade.clone());
        self.persist()?;
        Ok(grade)
    }

    pub fn update_grade(&mut self, id: &str, patch: GradePatch) -> Result<Grade, StoreError> {
        let updated = patch_entity(&mut self.grades, id, |g| {
            if let Some(student_id) = patch.student_id {
                g.student_id = student_id;
            }
            if let Some(course_id) = patch.course_id {
                g.course_id = course_id;
            }
            if let Some(value) = patch.value {
                g.value = value;
            }
            if let Some(date) = patch.date {
                g.date = date;
            }
        })?;
        self.persist()?;
        Ok(updated)
    }

    pub fn delete_grade(&mut self, id: &str) -> Result<(), StoreError> {
        remove_entity(&mut self.grades, id);
        self.persist()
    }

    /// Grades for one student in collection iteration order, each resolved
    /// to its course name (sentinel when the course no longer exists).
    pub fn student_grades(&self, student_id: &str) -> Vec<GradeLine> {
        self.grades
            .iter()
            .filter(|g| g.student_id == student_id)
            .map(|g| {
                let course_name = self
                    .courses
                    .iter()
                    .find(|c| c.id == g.course_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_COURSE.to_string());
                GradeLine {
                    course_name,
                    value: g.value,
                }
            })
            .collect()
    }

    pub fn find_student(&self, id: &str) -> Option<StudentView> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .map(|s| self.resolve_student(s))
    }

    /// Computed on demand, never cached. Average is 0 when no grades exist.
    pub fn dashboard_stats(&self) -> DashboardStats {
        let average_grade = if self.grades.is_empty() {
            0
        } else {
            let sum: u64 = self.grades.iter().map(|g| u64::from(g.value)).sum();
            (sum as f64 / self.grades.len() as f64).round() as u32
        };
        DashboardStats {
            total_students: self.students.len(),
            active_students: self
                .students
                .iter()
                .filter(|s| s.status == StudentStatus::Active)
                .count(),
            average_grade,
            total_courses: self.courses.len(),
            total_teachers: self.teachers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_workspace(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn seeded_db(prefix: &str) -> SchoolDb {
        SchoolDb::open(&temp_workspace(prefix)).expect("open db")
    }

    #[test]
    fn seed_stats_match_fixture() {
        let db = seeded_db("schoold-seed-stats");
        let stats = db.dashboard_stats();
        assert_eq!(
            stats,
            DashboardStats {
                total_students: 4,
                active_students: 3,
                average_grade: 80, // round((85+92+65+78)/4)
                total_courses: 4,
                total_teachers: 4,
            }
        );
    }

    #[test]
    fn average_grade_is_zero_without_grades() {
        let mut db = seeded_db("schoold-avg-empty");
        for id in ["g1", "g2", "g3", "g4"] {
            db.delete_grade(id).expect("delete grade");
        }
        assert_eq!(db.dashboard_stats().average_grade, 0);
    }

    #[test]
    fn add_class_generates_fresh_unique_id() {
        let mut db = seeded_db("schoold-add-class");
        let before = db.list_classes().len();
        let class = db
            .add_class(NewClass {
                name: "3º Ano B".into(),
                year: 2024,
            })
            .expect("add class");
        assert!(!class.id.is_empty());
        let classes = db.list_classes();
        assert_eq!(classes.len(), before + 1);
        assert_eq!(
            classes.iter().filter(|c| c.id == class.id).count(),
            1,
            "id must be unique in the collection"
        );
    }

    #[test]
    fn delete_student_cascades_only_its_grades() {
        let mut db = seeded_db("schoold-del-student");
        db.delete_student("s1").expect("delete student");
        assert!(db.find_student("s1").is_none());
        let grades = db.list_grades();
        assert!(grades.iter().all(|g| g.student_id != "s1"));
        // s2 and s4 grades survive.
        assert_eq!(grades.len(), 2);
    }

    #[test]
    fn delete_course_cascades_only_its_grades() {
        let mut db = seeded_db("schoold-del-course");
        db.delete_course("101").expect("delete course");
        let grades = db.list_grades();
        assert!(grades.iter().all(|g| g.course_id != "101"));
        assert_eq!(grades.len(), 2);
    }

    #[test]
    fn delete_class_leaves_students_with_sentinel() {
        let mut db = seeded_db("schoold-del-class");
        db.delete_class("c2").expect("delete class");
        assert_eq!(db.list_students().len(), 4, "students must survive");
        let ana = db.find_student("s1").expect("s1 present");
        assert_eq!(ana.class_name, NO_CLASS);
    }

    #[test]
    fn delete_teacher_leaves_courses_with_sentinel() {
        let mut db = seeded_db("schoold-del-teacher");
        db.delete_teacher("t1").expect("delete teacher");
        let courses = db.list_courses();
        assert_eq!(courses.len(), 4);
        let math = courses
            .iter()
            .find(|c| c.course.id == "101")
            .expect("course 101");
        assert_eq!(math.teacher_name, NO_TEACHER);
    }

    #[test]
    fn update_missing_student_is_not_found_and_changes_nothing() {
        let mut db = seeded_db("schoold-update-missing");
        let before = db.list_students();
        let err = db
            .update_student("nope", StudentPatch::default())
            .expect_err("must fail");
        assert!(matches!(err, StoreError::NotFound { entity: "student", .. }));
        let after = db.list_students();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.student, a.student);
        }
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut db = seeded_db("schoold-update-merge");
        let updated = db
            .update_student(
                "s1",
                StudentPatch {
                    notes: Some("New note".into()),
                    ..StudentPatch::default()
                },
            )
            .expect("update");
        assert_eq!(updated.student.notes, "New note");
        assert_eq!(updated.student.name, "Ana Silva");
        assert_eq!(updated.student.age, 16);
    }

    #[test]
    fn student_grades_resolve_course_names_in_order() {
        let db = seeded_db("schoold-grades-order");
        let lines = db.student_grades("s1");
        assert_eq!(
            lines,
            vec![
                GradeLine {
                    course_name: "Matemática Avançada".into(),
                    value: 85
                },
                GradeLine {
                    course_name: "Literatura Portuguesa".into(),
                    value: 92
                },
            ]
        );
    }

    #[test]
    fn student_grades_use_sentinel_for_deleted_course() {
        let mut db = seeded_db("schoold-grades-sentinel");
        // Re-point a grade at a course that never existed.
        db.update_grade(
            "g4",
            GradePatch {
                course_id: Some("ghost".into()),
                ..GradePatch::default()
            },
        )
        .expect("update grade");
        let lines = db.student_grades("s4");
        assert_eq!(lines[0].course_name, UNKNOWN_COURSE);
    }

    #[test]
    fn reopen_round_trips_all_collections() {
        let workspace = temp_workspace("schoold-roundtrip");
        let mut db = SchoolDb::open(&workspace).expect("open");
        db.add_teacher(NewTeacher {
            name: "Prof. Nuno".into(),
            email: "nuno@escola.com".into(),
            specialty: "História".into(),
        })
        .expect("add teacher");
        db.delete_student("s3").expect("delete student");

        let reopened = SchoolDb::open(&workspace).expect("reopen");
        assert_eq!(db.classes, reopened.classes);
        assert_eq!(db.teachers, reopened.teachers);
        assert_eq!(db.students, reopened.students);
        assert_eq!(db.courses, reopened.courses);
        assert_eq!(db.grades, reopened.grades);
    }

    #[test]
    fn unparsable_slot_falls_back_to_seed() {
        let workspace = temp_workspace("schoold-bad-slot");
        std::fs::write(
            storage::slot_path(&workspace, storage::SLOT_STUDENTS),
            "not json at all",
        )
        .expect("write junk");
        let db = SchoolDb::open(&workspace).expect("open");
        assert_eq!(db.list_students().len(), 4);
    }
}
