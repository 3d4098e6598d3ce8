//! Built-in fixture used when a workspace has no persisted slot for a
//! collection. Every foreign key here resolves to another seed record.

use crate::model::{Course, Grade, SchoolClass, Student, StudentStatus, Teacher};

pub fn classes() -> Vec<SchoolClass> {
    vec![
        SchoolClass {
            id: "c1".into(),
            name: "1º Ano EM - A".into(),
            year: 2024,
        },
        SchoolClass {
            id: "c2".into(),
            name: "2º Ano EM - B".into(),
            year: 2024,
        },
        SchoolClass {
            id: "c3".into(),
            name: "3º Ano EM - C".into(),
            year: 2024,
        },
    ]
}

pub fn teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "t1".into(),
            name: "Prof. Mendes".into(),
            email: "mendes@escola.com".into(),
            specialty: "Matemática".into(),
        },
        Teacher {
            id: "t2".into(),
            name: "Profa. Clara".into(),
            email: "clara@escola.com".into(),
            specialty: "Português".into(),
        },
        Teacher {
            id: "t3".into(),
            name: "Prof. Alberto".into(),
            email: "alberto@escola.com".into(),
            specialty: "Física".into(),
        },
        Teacher {
            id: "t4".into(),
            name: "Profa. Helena".into(),
            email: "helena@escola.com".into(),
            specialty: "Biologia".into(),
        },
    ]
}

pub fn students() -> Vec<Student> {
    vec![
        Student {
            id: "s1".into(),
            name: "Ana Silva".into(),
            email: "ana.silva@exemplo.com".into(),
            age: 16,
            class_id: "c2".into(),
            enrollment_date: "2024-02-15".into(),
            status: StudentStatus::Active,
            notes: "Dedicated student, interested in biology.".into(),
            avatar_url: "https://picsum.photos/200".into(),
        },
        Student {
            id: "s2".into(),
            name: "Bruno Santos".into(),
            email: "bruno.s@exemplo.com".into(),
            age: 17,
            class_id: "c3".into(),
            enrollment_date: "2024-01-20".into(),
            status: StudentStatus::Active,
            notes: "Needs extra support in mathematics.".into(),
            avatar_url: "https://picsum.photos/201".into(),
        },
        Student {
            id: "s3".into(),
            name: "Carla Dias".into(),
            email: "carla.d@exemplo.com".into(),
            age: 15,
            class_id: "c1".into(),
            enrollment_date: "2024-03-01".into(),
            status: StudentStatus::Inactive,
            notes: "Transferred out.".into(),
            avatar_url: "https://picsum.photos/202".into(),
        },
        Student {
            id: "s4".into(),
            name: "Daniel Costa".into(),
            email: "daniel.c@exemplo.com".into(),
            age: 16,
            class_id: "c2".into(),
            enrollment_date: "2024-02-10".into(),
            status: StudentStatus::Active,
            notes: "Class representative.".into(),
            avatar_url: "https://picsum.photos/203".into(),
        },
    ]
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: "101".into(),
            name: "Matemática Avançada".into(),
            teacher_id: "t1".into(),
            schedule: "Mon/Wed 08:00".into(),
        },
        Course {
            id: "102".into(),
            name: "Literatura Portuguesa".into(),
            teacher_id: "t2".into(),
            schedule: "Tue/Thu 10:00".into(),
        },
        Course {
            id: "103".into(),
            name: "Física".into(),
            teacher_id: "t3".into(),
            schedule: "Fri 09:00".into(),
        },
        Course {
            id: "104".into(),
            name: "Biologia".into(),
            teacher_id: "t4".into(),
            schedule: "Mon 10:00".into(),
        },
    ]
}

pub fn grades() -> Vec<Grade> {
    vec![
        Grade {
            id: "g1".into(),
            student_id: "s1".into(),
            course_id: "101".into(),
            value: 85,
            date: "2024-04-10".into(),
        },
        Grade {
            id: "g2".into(),
            student_id: "s1".into(),
            course_id: "102".into(),
            value: 92,
            date: "2024-04-12".into(),
        },
        Grade {
            id: "g3".into(),
            student_id: "s2".into(),
            course_id: "101".into(),
            value: 65,
            date: "2024-04-10".into(),
        },
        Grade {
            id: "g4".into(),
            student_id: "s4".into(),
            course_id: "103".into(),
            value: 78,
            date: "2024-04-15".into(),
        },
    ]
}
