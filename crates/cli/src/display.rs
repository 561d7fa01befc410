//! Plain-text rendering of expenses and statistics.

use std::collections::BTreeMap;

use engine::{Amount, BudgetStatus, Category, Expense, Summary};

const DESCRIPTION_WIDTH: usize = 28;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn expense_row(expense: &Expense) -> String {
    format!(
        "{:>5} {} {:16} {:>12} {}",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        truncate(&expense.category, 16),
        expense.amount,
        truncate(&expense.description, DESCRIPTION_WIDTH)
    )
}

pub fn expense_table(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = format!(
        "{:>5} {:10} {:16} {:>12} {}\n",
        "Id", "Date", "Category", "Amount", "Description"
    );
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for expense in expenses {
        output.push_str(&expense_row(expense));
        output.push('\n');
    }
    output
}

pub fn expense_details(expense: &Expense) -> String {
    let description = if expense.description.is_empty() {
        "(none)"
    } else {
        expense.description.as_str()
    };

    format!(
        "Expense:     {}\nDate:        {}\nCategory:    {}\nAmount:      {}\nDescription: {}\n",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        expense.category,
        expense.amount,
        description
    )
}

pub fn summary(summary: &Summary) -> String {
    let mut output = format!(
        "Count:   {}\nTotal:   {}\nAverage: {}\n",
        summary.count, summary.total, summary.average
    );
    if let (Some(min), Some(max)) = (summary.min, summary.max) {
        output.push_str(&format!("Min:     {min}\nMax:     {max}\n"));
    }

    if !summary.by_category.is_empty() {
        output.push_str("\nBy category:\n");
        for (category, amount) in &summary.by_category {
            output.push_str(&format!("  {category:16} {amount:>12}\n"));
        }
    }
    if !summary.by_month.is_empty() {
        output.push_str("\nBy month:\n");
        for (month, amount) in &summary.by_month {
            output.push_str(&format!("  {month:16} {amount:>12}\n"));
        }
    }
    output
}

fn optional(amount: Option<Amount>) -> String {
    amount.map_or_else(|| "-".to_string(), |a| a.to_string())
}

pub fn category_table(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No category records.\n".to_string();
    }

    let mut output = format!("{:16} {:>12} {:>12} {}\n", "Category", "Budget", "Monthly", "Description");
    for category in categories {
        output.push_str(&format!(
            "{:16} {:>12} {:>12} {}\n",
            truncate(&category.name, 16),
            optional(category.budget_limit),
            optional(category.monthly_budget),
            truncate(&category.description, DESCRIPTION_WIDTH)
        ));
    }
    output
}

pub fn budget_report(report: &[BudgetStatus]) -> String {
    let Some(month) = report.first().map(|status| status.month.as_str()) else {
        return "No category records.\n".to_string();
    };

    let mut output = format!(
        "{:16} {:>12} {:>12} {:>12} {:>12}\n",
        "Category", "Spent", "Left", month, "Left (month)"
    );
    for status in report {
        let flag = if status.over_budget { "  OVER" } else { "" };
        output.push_str(&format!(
            "{:16} {:>12} {:>12} {:>12} {:>12}{flag}\n",
            truncate(&status.category, 16),
            status.spent,
            optional(status.remaining),
            status.spent_in_month,
            optional(status.remaining_in_month),
        ));
    }
    output
}

pub fn custom_statistics(values: &BTreeMap<String, serde_json::Value>) -> String {
    values
        .iter()
        .map(|(name, value)| format!("{name:16} {value}\n"))
        .collect()
}
