#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub color: i64,
    pub icon: String,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryCommand {
    pub category_id: String,
    pub name: Option<String>,
    pub color: Option<i64>,
    pub icon: Option<String>,
}
