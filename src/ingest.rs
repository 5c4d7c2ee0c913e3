use sqlx::PgPool;

use crate::config::EmployerSpec;
use crate::error::AppError;
use crate::hh::VacancySource;
use crate::models::employer::Employer;
use crate::models::vacancy::{CreateVacancy, Salary, Vacancy, VacancyReportRow};

/// Ingest every configured employer: insert the employer row, then pull its
/// vacancies from the source and append them. An employer that is already
/// present is skipped entirely.
pub async fn run(
    pool: &PgPool,
    source: &dyn VacancySource,
    employers: &[EmployerSpec],
) -> Result<(), AppError> {
    for spec in employers {
        tracing::info!("Scanning employer '{}' (hh_id {})", spec.name, spec.hh_id);

        let Some(employer) = Employer::insert_if_absent(pool, &spec.name, &spec.hh_id).await?
        else {
            tracing::info!("Employer '{}' already present, skipping fetch", spec.name);
            continue;
        };

        let items = source.fetch_all(&spec.hh_id).await;
        tracing::info!(
            "Fetched {} vacancies for '{}' from {}",
            items.len(),
            employer.name,
            source.name()
        );

        for item in items {
            let input = CreateVacancy {
                name: item.name,
                employer_id: employer.id,
                salary: item.salary,
                url: item.alternate_url,
                requirement: item.snippet.requirement.unwrap_or_default(),
                responsibility: item.snippet.responsibility.unwrap_or_default(),
            };
            Vacancy::create(pool, input).await?;
        }
    }

    let total = Vacancy::count(pool).await?;
    tracing::info!("Ingestion finished, {total} vacancies stored");
    Ok(())
}

/// Render the four reports to stdout. The two vacancy lists are capped at
/// five rows each.
pub async fn print_reports(pool: &PgPool, keyword: &str) -> Result<(), AppError> {
    println!("\nVacancy counts per employer:");
    for row in Employer::vacancy_counts(pool).await? {
        println!("{}: {} vacancies", row.name, row.vacancies);
    }

    println!("\nAverage salary floor:");
    match Vacancy::average_salary_floor(pool).await? {
        Some(avg) => println!("{avg:.2} RUB"),
        None => println!("no vacancy reports a salary floor"),
    }

    println!("\nVacancies above the average salary floor:");
    for row in Vacancy::above_average_salary(pool).await?.iter().take(5) {
        println!("{}", format_report_row(row));
    }

    println!("\nVacancies matching '{keyword}':");
    for row in Vacancy::matching_keyword(pool, keyword).await?.iter().take(5) {
        println!("{}", format_report_row(row));
    }

    Ok(())
}

fn format_report_row(row: &VacancyReportRow) -> String {
    let salary = row
        .salary
        .as_ref()
        .map(|s| format_salary(&s.0))
        .unwrap_or_else(|| "not specified".to_string());
    format!(
        "{} at {}, salary: {salary}, URL: {}",
        row.name,
        row.employer_name,
        row.url.as_deref().unwrap_or("-")
    )
}

fn format_salary(salary: &Salary) -> String {
    let currency = salary.currency.as_deref().unwrap_or("");
    let range = match (salary.from, salary.to) {
        (Some(from), Some(to)) => format!("{from}-{to}"),
        (Some(from), None) => format!("from {from}"),
        (None, Some(to)) => format!("up to {to}"),
        (None, None) => return "not specified".to_string(),
    };
    format!("{range} {currency}").trim_end().to_string()
}
