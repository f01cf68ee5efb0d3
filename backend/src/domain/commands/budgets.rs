use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct CreateBudgetCommand {
    pub category_id: String,
    pub name: String,
    pub min_goal: f64,
    pub max_goal: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetCommand {
    pub budget_id: String,
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub min_goal: Option<f64>,
    pub max_goal: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
