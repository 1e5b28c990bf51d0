use std::collections::HashMap;

use async_trait::async_trait;
use clinicavet_application::PetRepository;
use clinicavet_common::{DomainError, Page, messages};
use clinicavet_domain::{
    DewormerApplication, NewPet, Pet, PetListQuery, PetPatch, PetSortBy, Reminder,
    VaccineApplication,
};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::rows::{
    DewormerApplicationRow, PET_COLUMNS, PetRow, ReminderRow, VaccineApplicationRow,
};

#[derive(Clone)]
pub struct PostgresPetRepository {
    pool: PgPool,
}

impl PostgresPetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads the child collections of `rows` with one query per collection.
    async fn hydrate(&self, rows: Vec<PetRow>) -> Result<Vec<Pet>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids = rows.iter().map(|row| row.pet_id).collect::<Vec<_>>();

        let mut vaccines = group_by_pet(
            sqlx::query_as::<_, VaccineApplicationRow>(
                r#"
                SELECT id, pet_id, vaccine_name, applied_on, next_dose_on, batch_number,
                       veterinarian, created_at
                FROM vaccine_applications
                WHERE pet_id = ANY($1)
                ORDER BY created_at, id
                "#,
            )
            .bind(ids.as_slice())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?,
        );

        let mut dewormers = group_by_pet(
            sqlx::query_as::<_, DewormerApplicationRow>(
                r#"
                SELECT id, pet_id, product_name, applied_on, next_application_on, dosage,
                       created_at
                FROM dewormer_applications
                WHERE pet_id = ANY($1)
                ORDER BY created_at, id
                "#,
            )
            .bind(ids.as_slice())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?,
        );

        let mut reminders = group_by_pet(
            sqlx::query_as::<_, ReminderRow>(
                r#"
                SELECT id, pet_id, title, notes, remind_on, created_at
                FROM reminders
                WHERE pet_id = ANY($1)
                ORDER BY created_at, id
                "#,
            )
            .bind(ids.as_slice())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?,
        );

        rows.into_iter()
            .map(|row| {
                let mut pet = row.into_pet()?;
                pet.vaccine_applications = vaccines.remove(&pet.id).unwrap_or_default();
                pet.dewormer_applications = dewormers.remove(&pet.id).unwrap_or_default();
                pet.reminders = reminders.remove(&pet.id).unwrap_or_default();
                Ok(pet)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<PetRow>) -> Result<Option<Pet>, DomainError> {
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    /// Bumps the pet's version inside `tx`. Returns false when the pet is gone.
    async fn bump_version(
        tx: &mut Transaction<'_, Postgres>,
        pet_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE pets SET version = version + 1, updated_at = NOW() WHERE pet_id = $1",
        )
        .bind(pet_id)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl PetRepository for PostgresPetRepository {
    async fn create(&self, pet: NewPet) -> Result<Pet, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO pets (pet_id, guardian_id, name, birth_date, breed, sex, is_castrated,
                              microchip_number, history, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PET_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(pet.id)
            .bind(pet.guardian_id)
            .bind(pet.name)
            .bind(pet.birth_date)
            .bind(pet.breed)
            .bind(pet.sex.as_str())
            .bind(pet.is_castrated)
            .bind(pet.microchip_number)
            .bind(pet.history)
            .bind(pet.version)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.into_pet()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pet>, DomainError> {
        let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE pet_id = $1");
        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.hydrate_one(row).await
    }

    async fn find_by_microchip(&self, microchip_number: &str) -> Result<Option<Pet>, DomainError> {
        let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE microchip_number = $1");
        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(microchip_number.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.hydrate_one(row).await
    }

    async fn list(&self, query: PetListQuery) -> Result<Page<Pet>, DomainError> {
        let offset = i64::try_from(query.offset())
            .map_err(|_| DomainError::validation("offset is too large"))?;

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*)::BIGINT AS count FROM pets");
        let mut has_where = false;
        push_list_filters(&mut count_builder, &mut has_where, &query);

        let (total_raw,): (i64,) = count_builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut select_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {PET_COLUMNS} FROM pets"));
        let mut has_where = false;
        push_list_filters(&mut select_builder, &mut has_where, &query);

        // Mirrors PetListQuery::compare.
        select_builder.push(" ORDER BY ");
        select_builder.push(sort_column(query.sort_by));
        select_builder.push(" ");
        select_builder.push(query.sort_order.as_sql());
        select_builder.push(", created_at ASC, pet_id ASC");

        select_builder
            .push(" LIMIT ")
            .push_bind(i64::from(query.per_page))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = select_builder
            .build_query_as::<PetRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let items = self.hydrate(rows).await?;
        let total = u64::try_from(total_raw).unwrap_or(0);
        Ok(Page::new(items, query.page, query.per_page, total))
    }

    async fn list_by_guardian(&self, guardian_id: Uuid) -> Result<Vec<Pet>, DomainError> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE guardian_id = $1 ORDER BY created_at, pet_id"
        );
        let rows = sqlx::query_as::<_, PetRow>(&sql)
            .bind(guardian_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.hydrate(rows).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: PetPatch,
        expected_version: Option<i64>,
    ) -> Result<Option<Pet>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE pets SET ");
        let mut separated = builder.separated(", ");

        if let Some(breed) = patch.breed {
            separated.push("breed = ").push_bind_unseparated(breed);
        }
        if let Some(microchip_number) = patch.microchip_number {
            separated
                .push("microchip_number = ")
                .push_bind_unseparated(microchip_number);
        }
        if let Some(history) = patch.history {
            separated.push("history = ").push_bind_unseparated(history);
        }
        separated.push("version = version + 1");
        separated.push("updated_at = NOW()");

        builder.push(" WHERE pet_id = ").push_bind(id);
        if let Some(expected_version) = expected_version {
            builder.push(" AND version = ").push_bind(expected_version);
        }
        builder.push(format!(" RETURNING {PET_COLUMNS}"));

        let row = builder
            .build_query_as::<PetRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.hydrate_one(row).await
    }

    async fn delete(&self, id: Uuid, expected_version: Option<i64>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM pets WHERE pet_id = $1 AND ($2::BIGINT IS NULL OR version = $2)",
        )
        .bind(id)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_vaccine_application(
        &self,
        pet_id: Uuid,
        application: VaccineApplication,
    ) -> Result<Option<Pet>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        if !Self::bump_version(&mut tx, pet_id).await? {
            return Ok(None);
        }

        sqlx::query(
            r#"
            INSERT INTO vaccine_applications
                (id, pet_id, vaccine_name, applied_on, next_dose_on, batch_number, veterinarian,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(application.id)
        .bind(pet_id)
        .bind(application.vaccine_name)
        .bind(application.applied_on)
        .bind(application.next_dose_on)
        .bind(application.batch_number)
        .bind(application.veterinarian)
        .bind(application.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        self.get_by_id(pet_id).await
    }

    async fn add_dewormer_application(
        &self,
        pet_id: Uuid,
        application: DewormerApplication,
    ) -> Result<Option<Pet>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        if !Self::bump_version(&mut tx, pet_id).await? {
            return Ok(None);
        }

        sqlx::query(
            r#"
            INSERT INTO dewormer_applications
                (id, pet_id, product_name, applied_on, next_application_on, dosage, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(application.id)
        .bind(pet_id)
        .bind(application.product_name)
        .bind(application.applied_on)
        .bind(application.next_application_on)
        .bind(application.dosage)
        .bind(application.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        self.get_by_id(pet_id).await
    }

    async fn add_reminder(
        &self,
        pet_id: Uuid,
        reminder: Reminder,
    ) -> Result<Option<Pet>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        if !Self::bump_version(&mut tx, pet_id).await? {
            return Ok(None);
        }

        sqlx::query(
            r#"
            INSERT INTO reminders (id, pet_id, title, notes, remind_on, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reminder.id)
        .bind(pet_id)
        .bind(reminder.title)
        .bind(reminder.notes)
        .bind(reminder.remind_on)
        .bind(reminder.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        self.get_by_id(pet_id).await
    }
}

fn group_by_pet<R, T>(rows: Vec<R>) -> HashMap<Uuid, Vec<T>>
where
    R: Into<(Uuid, T)>,
{
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        let (pet_id, item) = row.into();
        grouped.entry(pet_id).or_default().push(item);
    }
    grouped
}

fn push_list_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    has_where: &mut bool,
    query: &PetListQuery,
) {
    if let Some(guardian_id) = query.guardian_id {
        push_where_prefix(builder, has_where);
        builder.push("guardian_id = ").push_bind(guardian_id);
    }

    if let Some(sex) = query.sex {
        push_where_prefix(builder, has_where);
        builder.push("sex = ").push_bind(sex.as_str());
    }

    if let Some(name_contains) = query.name_contains.as_deref() {
        push_where_prefix(builder, has_where);
        builder
            .push("name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name_contains)));
    }
}

fn push_where_prefix(builder: &mut QueryBuilder<'_, Postgres>, has_where: &mut bool) {
    if !*has_where {
        builder.push(" WHERE ");
        *has_where = true;
    } else {
        builder.push(" AND ");
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn sort_column(sort_by: PetSortBy) -> &'static str {
    match sort_by {
        PetSortBy::CreatedAt => "created_at",
        PetSortBy::Name => "LOWER(name) COLLATE \"C\"",
        PetSortBy::BirthDate => "birth_date",
    }
}

fn map_sqlx_error(error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::Database(db_error) => {
            if db_error.code().as_deref() == Some("23505") {
                DomainError::conflict(messages::PET_MICROCHIP_ALREADY_REGISTERED)
            } else {
                DomainError::storage(db_error.to_string())
            }
        }
        other => DomainError::storage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_mapping_is_safe() {
        assert_eq!(sort_column(PetSortBy::BirthDate), "birth_date");
        assert_eq!(sort_column(PetSortBy::Name), "LOWER(name) COLLATE \"C\"");
    }

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
