use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::error::AppError;

/// Salary range as the HH API reports it; stored verbatim as jsonb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug)]
pub struct CreateVacancy {
    pub name: String,
    pub employer_id: i32,
    pub salary: Option<Salary>,
    pub url: String,
    pub requirement: String,
    pub responsibility: String,
}

/// One row of the salary and keyword reports.
#[derive(Debug, sqlx::FromRow)]
pub struct VacancyReportRow {
    pub name: String,
    pub employer_name: String,
    pub salary: Option<Json<Salary>>,
    pub url: Option<String>,
}

pub struct Vacancy;

impl Vacancy {
    /// Append a vacancy row. No dedup: re-running ingestion stores the same
    /// vacancy again.
    pub async fn create(pool: &PgPool, input: CreateVacancy) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO vacancies (name, employer_id, salary, url, requirement, responsibility) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(input.name)
        .bind(input.employer_id)
        .bind(input.salary.map(Json))
        .bind(input.url)
        .bind(input.requirement)
        .bind(input.responsibility)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vacancies")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Mean of the salary "from" field across vacancies that have one;
    /// `None` when no stored vacancy carries a salary floor.
    pub async fn average_salary_floor(pool: &PgPool) -> Result<Option<f64>, AppError> {
        let row: (Option<f64>,) = sqlx::query_as(
            "SELECT AVG((salary->>'from')::int)::float8
             FROM vacancies
             WHERE salary->>'from' IS NOT NULL",
        )
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Vacancies whose salary floor strictly exceeds the average floor.
    /// Vacancies without a floor take part in neither the average nor the
    /// result set.
    pub async fn above_average_salary(pool: &PgPool) -> Result<Vec<VacancyReportRow>, AppError> {
        let rows = sqlx::query_as::<_, VacancyReportRow>(
            "WITH avg_floor AS (
                SELECT AVG((salary->>'from')::int) AS avg
                FROM vacancies
                WHERE salary->>'from' IS NOT NULL
            )
            SELECT v.name AS name, e.name AS employer_name, v.salary, v.url
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.id
            WHERE (v.salary->>'from')::int > (SELECT avg FROM avg_floor)",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match against the vacancy name or its
    /// requirement text.
    pub async fn matching_keyword(
        pool: &PgPool,
        keyword: &str,
    ) -> Result<Vec<VacancyReportRow>, AppError> {
        let rows = sqlx::query_as::<_, VacancyReportRow>(
            "SELECT v.name AS name, e.name AS employer_name, v.salary, v.url
             FROM vacancies v
             JOIN employers e ON v.employer_id = e.id
             WHERE v.name ILIKE '%' || $1 || '%' OR v.requirement ILIKE '%' || $1 || '%'",
        )
        .bind(keyword)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
