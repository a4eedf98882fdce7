use crate::config::ExpenseConfig;
use crate::domain::expense::Expense;
use crate::domain::money;
use crate::domain::month::MonthId;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::services::month_resolver::MonthResolver;
use crate::storage::expense_repo::ExpenseRepository;
use chrono::Utc;
use opentelemetry::{global, metrics::Counter};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Metrics {
    created_total: Counter<u64>,
    deleted_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("budget-server");
        Self {
            created_total: meter
                .u64_counter("expenses_created_total")
                .with_description("Total number of expenses created")
                .build(),
            deleted_total: meter
                .u64_counter("expenses_deleted_total")
                .with_description("Total number of expenses deleted")
                .build(),
        }
    }
}

/// One month of expenses with its exact decimal totals, ready to render.
#[derive(Debug, Clone)]
pub struct MonthOverview {
    pub month: MonthId,
    pub title: String,
    pub total: Decimal,
    pub budget: Decimal,
    pub remaining: Decimal,
    pub items: Vec<Expense>,
}

/// One entry in the month sidebar.
#[derive(Debug, Clone)]
pub struct MonthLink {
    pub id: MonthId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ExpenseService {
    limits: ExpenseConfig,
    resolver: MonthResolver,
    expense_repo: ExpenseRepository,
    metrics: Metrics,
}

impl ExpenseService {
    #[must_use]
    pub fn new(limits: ExpenseConfig, resolver: MonthResolver, expense_repo: ExpenseRepository) -> Self {
        Self { limits, resolver, expense_repo, metrics: Metrics::new() }
    }

    #[must_use]
    pub const fn resolver(&self) -> &MonthResolver {
        &self.resolver
    }

    /// Validates and records an expense stamped with the current instant.
    /// Both inputs are checked before anything touches the database, so an
    /// invalid amount can never create a row.
    #[tracing::instrument(err, skip(self, raw_amount, raw_note), fields(user_id = %user_id))]
    pub async fn create_expense(&self, user_id: Uuid, raw_amount: &str, raw_note: Option<&str>) -> Result<Expense> {
        let amount = money::parse_amount(raw_amount, Decimal::from(self.limits.max_amount))
            .map_err(AppError::BadRequest)?;
        let note = validate_note(raw_note, self.limits.max_note_chars)?;

        let expense = self.expense_repo.create(user_id, amount, note.as_deref(), Utc::now()).await?;
        self.metrics.created_total.add(1, &[]);
        Ok(expense)
    }

    /// Deletes an expense the user owns. Targeting someone else's expense
    /// or one already gone reports `NotFound` rather than silently
    /// succeeding.
    #[tracing::instrument(err, skip(self), fields(user_id = %user_id, expense_id = %id))]
    pub async fn delete_expense(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.expense_repo.delete_owned(id, user_id).await? == 0 {
            return Err(AppError::NotFound);
        }
        self.metrics.deleted_total.add(1, &[]);
        Ok(())
    }

    /// The user's expenses for one calendar month with an exact total and
    /// the remaining budget. An absent or unparseable `month` parameter
    /// falls back to the current month rather than erroring, matching how
    /// the overview is reached from bookmarked links.
    #[tracing::instrument(err, skip(self, user), fields(user_id = %user.id))]
    pub async fn month_overview(&self, user: &User, month_param: Option<&str>) -> Result<MonthOverview> {
        let month = month_param
            .and_then(|raw| raw.parse::<MonthId>().ok())
            .unwrap_or_else(|| self.resolver.month_of(Utc::now()));

        let (start, end) = self.resolver.month_range(month)?;
        let items = self.expense_repo.find_in_range(user.id, start, end).await?;

        let total: Decimal = items.iter().map(|e| e.amount).sum();
        let budget = user.current_budget;

        Ok(MonthOverview {
            month,
            title: self.resolver.month_title(&month.to_string()),
            total,
            remaining: budget - total,
            budget,
            items,
        })
    }

    /// Distinct months that contain expenses, newest first. The current
    /// month is always present so a fresh account still has somewhere to
    /// land, and a validly requested month shows up even when empty.
    #[tracing::instrument(err, skip(self), fields(user_id = %user_id))]
    pub async fn month_index(&self, user_id: Uuid, requested: Option<MonthId>) -> Result<Vec<MonthLink>> {
        let occurrences = self.expense_repo.list_occurrences(user_id).await?;

        let mut months: Vec<MonthId> = occurrences.into_iter().map(|at| self.resolver.month_of(at)).collect();
        months.push(self.resolver.month_of(Utc::now()));
        if let Some(month) = requested {
            months.push(month);
        }

        months.sort_unstable_by(|a, b| b.cmp(a));
        months.dedup();

        Ok(months
            .into_iter()
            .map(|id| MonthLink { id, label: self.resolver.month_title(&id.to_string()) })
            .collect())
    }
}

fn validate_note(raw: Option<&str>, max_chars: usize) -> Result<Option<String>> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::BadRequest(format!("Keep notes under {max_chars} characters")));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_validation_trims_and_drops_empty() {
        assert_eq!(validate_note(None, 160).expect("none"), None);
        assert_eq!(validate_note(Some("   "), 160).expect("blank"), None);
        assert_eq!(validate_note(Some("  coffee  "), 160).expect("trim"), Some("coffee".to_string()));
    }

    #[test]
    fn note_validation_enforces_length_in_chars() {
        let ascii = "x".repeat(160);
        assert!(validate_note(Some(&ascii), 160).is_ok());

        let too_long = "x".repeat(161);
        assert!(validate_note(Some(&too_long), 160).is_err());

        // Multi-byte characters count once each.
        let emoji = "🍄".repeat(160);
        assert!(validate_note(Some(&emoji), 160).is_ok());
    }
}
