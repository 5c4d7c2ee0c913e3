use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub struct Employer {
    pub id: i32,
    pub name: String,
    pub hh_id: String,
}

/// One row of the vacancies-per-employer report.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployerVacancyCount {
    pub name: String,
    pub vacancies: i64,
}

impl Employer {
    /// Insert-if-absent keyed by `hh_id`. Returns the freshly inserted row,
    /// or `None` when an employer with this `hh_id` already exists (in which
    /// case nothing is written).
    pub async fn insert_if_absent(
        pool: &PgPool,
        name: &str,
        hh_id: &str,
    ) -> Result<Option<Employer>, AppError> {
        let employer = sqlx::query_as::<_, Employer>(
            "INSERT INTO employers (name, hh_id) VALUES ($1, $2) ON CONFLICT (hh_id) DO NOTHING RETURNING id, name, hh_id",
        )
        .bind(name)
        .bind(hh_id)
        .fetch_optional(pool)
        .await?;
        Ok(employer)
    }

    /// Vacancy count for every employer, zero-vacancy employers included,
    /// most vacancies first.
    pub async fn vacancy_counts(pool: &PgPool) -> Result<Vec<EmployerVacancyCount>, AppError> {
        let rows = sqlx::query_as::<_, EmployerVacancyCount>(
            "SELECT e.name AS name, COUNT(v.id) AS vacancies
             FROM employers e
             LEFT JOIN vacancies v ON e.id = v.employer_id
             GROUP BY e.id, e.name
             ORDER BY COUNT(v.id) DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
