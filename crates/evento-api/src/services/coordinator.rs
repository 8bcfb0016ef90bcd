// Coordinator service

use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{Coordinator, CreateCoordinatorRequest};
use evento_core::{EventoError, Result};
use evento_storage::{
    models::{CoordinatorRow, CreateCoordinator},
    Database,
};

fn coordinator_dto(row: &CoordinatorRow) -> Coordinator {
    Coordinator {
        id: row.id,
        name: row.name.clone(),
        email: row.email.clone(),
        department: row.department.clone(),
        club_name: row.club_name.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub struct CoordinatorService {
    db: Arc<Database>,
}

impl CoordinatorService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateCoordinatorRequest) -> Result<Coordinator> {
        if req.email.trim().is_empty() || !req.email.contains('@') {
            return Err(EventoError::validation("a valid email is required"));
        }
        let row = self
            .db
            .create_coordinator(CreateCoordinator {
                name: req.name,
                email: req.email,
                department: req.department,
                club_name: req.club_name,
            })
            .await?;
        Ok(coordinator_dto(&row))
    }

    pub async fn list(&self) -> Result<Vec<Coordinator>> {
        let rows = self.db.list_coordinators().await?;
        Ok(rows.iter().map(coordinator_dto).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Coordinator> {
        let row = self
            .db
            .get_coordinator(id)
            .await?
            .ok_or(EventoError::CoordinatorNotFound(id))?;
        Ok(coordinator_dto(&row))
    }

    /// Exists-check before listing, so an unknown coordinator is a 404
    /// rather than an empty list
    pub async fn ensure_exists(&self, id: Uuid) -> Result<()> {
        self.db
            .get_coordinator(id)
            .await?
            .ok_or(EventoError::CoordinatorNotFound(id))?;
        Ok(())
    }
}
