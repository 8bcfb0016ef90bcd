// Student service

use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{CreateStudentRequest, Student, StudentEvents};
use evento_core::{EventoError, Result};
use evento_storage::{
    models::{CreateStudent, StudentRow},
    Database,
};

use super::event::event_dto;

fn student_dto(row: &StudentRow) -> Student {
    Student {
        id: row.id,
        name: row.name.clone(),
        email: row.email.clone(),
        register_no: row.register_no.clone(),
        department: row.department.clone(),
        year: row.year.clone(),
        registered_events: row.registered_events.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub struct StudentService {
    db: Arc<Database>,
}

impl StudentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateStudentRequest) -> Result<Student> {
        if req.email.trim().is_empty() || !req.email.contains('@') {
            return Err(EventoError::validation("a valid email is required"));
        }
        let row = self
            .db
            .create_student(CreateStudent {
                name: req.name,
                email: req.email,
                register_no: req.register_no,
                department: req.department,
                year: req.year,
            })
            .await?;
        Ok(student_dto(&row))
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        let rows = self.db.list_students().await?;
        Ok(rows.iter().map(student_dto).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Student> {
        let row = self
            .db
            .get_student(id)
            .await?
            .ok_or(EventoError::StudentNotFound(id))?;
        Ok(student_dto(&row))
    }

    /// Both sides of a student's event involvement: confirmed seats from
    /// the mirrored id list, waitlist positions from the events that hold
    /// the student in their waitlist
    pub async fn events(&self, id: Uuid) -> Result<StudentEvents> {
        let student = self
            .db
            .get_student(id)
            .await?
            .ok_or(EventoError::StudentNotFound(id))?;

        let registered = self
            .db
            .list_events_by_ids(&student.registered_events)
            .await?;
        let waitlisted = self.db.list_events_waitlisting(id).await?;

        Ok(StudentEvents {
            registered: registered.iter().map(event_dto).collect(),
            waitlisted: waitlisted.iter().map(event_dto).collect(),
        })
    }
}
