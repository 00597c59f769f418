//! Server-rendered HTML pages. Every user-provided string goes through
//! [`escape`] before it reaches the markup.

use crate::core::DashboardSummary;
use crate::models::{Expense, LIFETIME, MonthFilter, YearMonth};
use crate::utils::date::today_str;
use crate::utils::formatting::money;
use crate::web::session::Flash;
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
table{border-collapse:collapse;width:100%}th,td{border-bottom:1px solid #ddd;padding:.4em;text-align:left}\
.flash{padding:.6em;margin:.4em 0;border-radius:4px}.success{background:#e6f4ea}\
.warning{background:#fff4e5}.danger{background:#fdecea}.insight{margin:.2em 0}\
nav a{margin-right:1em}form.inline{display:inline}";

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let mut flash_html = String::new();
    for f in flashes {
        let _ = write!(
            flash_html,
            "<div class=\"flash {}\">{}</div>",
            escape(&f.category),
            escape(&f.message)
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{flash_html}\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

pub fn index_page() -> String {
    layout(
        "Expense Tracker",
        &[],
        "<h1>Expense Tracker</h1>\n<p>Track what you spend, month by month.</p>\n\
         <nav><a href=\"/login\">Log in</a><a href=\"/register\">Register</a></nav>",
    )
}

fn credentials_form(action: &str, button: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <p><label>Username <input name=\"username\" required></label></p>\n\
         <p><label>Password <input name=\"password\" type=\"password\" required></label></p>\n\
         <p><button type=\"submit\">{button}</button></p>\n</form>"
    )
}

pub fn register_page(flashes: &[Flash]) -> String {
    let body = format!(
        "<h1>Register</h1>\n{}\n<p>Already registered? <a href=\"/login\">Log in</a></p>",
        credentials_form("/register", "Register")
    );
    layout("Register", flashes, &body)
}

pub fn login_page(flashes: &[Flash]) -> String {
    let body = format!(
        "<h1>Log in</h1>\n{}\n<p>No account yet? <a href=\"/register\">Register</a></p>",
        credentials_form("/login", "Log in")
    );
    layout("Log in", flashes, &body)
}

/// Add form when `expense` is `None`, pre-filled edit form otherwise.
pub fn expense_form_page(expense: Option<&Expense>) -> String {
    let (heading, action, title, category, amount, date) = match expense {
        Some(e) => (
            "Edit expense",
            format!("/edit_expense/{}", e.id),
            escape(&e.title),
            escape(&e.category),
            e.amount.to_string(),
            escape(&e.date),
        ),
        None => (
            "Add expense",
            "/add_expense".to_string(),
            String::new(),
            String::new(),
            String::new(),
            today_str(),
        ),
    };

    let body = format!(
        "<h1>{heading}</h1>\n<form method=\"post\" action=\"{action}\">\n\
         <p><label>Title <input name=\"title\" value=\"{title}\"></label></p>\n\
         <p><label>Category <input name=\"category\" value=\"{category}\"></label></p>\n\
         <p><label>Amount <input name=\"amount\" type=\"number\" step=\"any\" value=\"{amount}\"></label></p>\n\
         <p><label>Date <input name=\"date\" type=\"date\" value=\"{date}\"></label></p>\n\
         <p><button type=\"submit\">Save</button> <a href=\"/dashboard\">Cancel</a></p>\n</form>"
    );
    layout(heading, &[], &body)
}

fn month_picker(filter: &MonthFilter) -> String {
    let value = filter
        .month()
        .map(|m| m.to_string())
        .unwrap_or_default();
    format!(
        "<form method=\"get\" action=\"/dashboard\" class=\"inline\">\n\
         <label>Month <input name=\"month\" type=\"month\" value=\"{value}\"></label>\n\
         <button type=\"submit\">Show</button>\n</form>\n\
         <a href=\"/dashboard?month={LIFETIME}\">Lifetime</a>"
    )
}

fn goal_form(filter: &MonthFilter, goal: Option<f64>) -> String {
    let month = filter.month().unwrap_or_else(YearMonth::current);
    let value = goal.map(|g| g.to_string()).unwrap_or_default();
    format!(
        "<form method=\"post\" action=\"/set_goal\">\n\
         <input type=\"hidden\" name=\"month\" value=\"{month}\">\n\
         <label>Goal for {} <input name=\"goal_amount\" type=\"number\" step=\"any\" value=\"{value}\"></label>\n\
         <button type=\"submit\">Set goal</button>\n</form>",
        escape(&month.label())
    )
}

fn expense_table(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "<p>No expenses recorded for this period.</p>".to_string();
    }

    let mut rows = String::new();
    for e in expenses {
        let _ = write!(
            rows,
            "<tr><td><input type=\"checkbox\" name=\"expense_ids\" value=\"{id}\"></td>\
             <td>{date}</td><td>{title}</td><td>{category}</td><td>{amount}</td>\
             <td><a href=\"/edit_expense/{id}\">Edit</a> <a href=\"/delete_expense/{id}\">Delete</a></td></tr>\n",
            id = e.id,
            date = escape(&e.date),
            title = escape(&e.title),
            category = escape(&e.category),
            amount = escape(&money(currency, e.amount)),
        );
    }

    format!(
        "<form method=\"post\" action=\"/delete_multiple_expenses\">\n<table>\n\
         <tr><th></th><th>Date</th><th>Title</th><th>Category</th><th>Amount</th><th></th></tr>\n\
         {rows}</table>\n<p><button type=\"submit\">Delete selected</button></p>\n</form>"
    )
}

fn category_table(summary: &DashboardSummary, currency: &str) -> String {
    if summary.category_totals.is_empty() {
        return String::new();
    }
    let mut rows = String::new();
    for (category, total) in &summary.category_totals {
        let label = if category.is_empty() {
            "(none)".to_string()
        } else {
            escape(category)
        };
        let _ = write!(
            rows,
            "<tr><td>{label}</td><td>{}</td></tr>\n",
            escape(&money(currency, *total))
        );
    }
    format!(
        "<h2>By category</h2>\n<table>\n<tr><th>Category</th><th>Total</th></tr>\n{rows}</table>"
    )
}

pub fn dashboard_page(summary: &DashboardSummary, flashes: &[Flash], currency: &str) -> String {
    let period = match summary.filter {
        MonthFilter::Lifetime => "All time".to_string(),
        MonthFilter::Month(ym) => ym.label(),
    };

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Dashboard</h1>\n<nav><a href=\"/add_expense\">Add expense</a>\
         <a href=\"/export/csv\">Export CSV</a><a href=\"/export/excel\">Export Excel</a>\
         <a href=\"/export/pdf\">Export PDF</a><a href=\"/download_template\">Import template</a>\
         <a href=\"/logout\">Log out</a></nav>\n{}\n",
        month_picker(&summary.filter)
    );

    let _ = write!(
        body,
        "<h2>{}</h2>\n<p>Total spent: <strong>{}</strong></p>\n",
        escape(&period),
        escape(&money(currency, summary.total_spent))
    );

    if let Some(goal) = summary.goal_amount {
        let _ = writeln!(body, "<p>Goal: {}</p>", escape(&money(currency, goal)));
    }
    if let (Some(prev), Some(change)) = (summary.previous_total, summary.change_label()) {
        let _ = writeln!(
            body,
            "<p>Previous month: {} ({change})</p>",
            escape(&money(currency, prev))
        );
    }
    for insight in &summary.insights {
        let _ = writeln!(body, "<p class=\"insight\">{}</p>", escape(insight));
    }

    if matches!(summary.filter, MonthFilter::Month(_)) {
        body.push_str(&goal_form(&summary.filter, summary.goal_amount));
        body.push('\n');
    }

    body.push_str(&category_table(summary, currency));
    body.push_str("\n<h2>Expenses</h2>\n");
    body.push_str(&expense_table(&summary.expenses, currency));
    body.push_str(
        "\n<h2>Import</h2>\n<form method=\"post\" action=\"/import_excel\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"excel_file\" accept=\".xlsx,.xls,.csv\">\n\
         <button type=\"submit\">Import</button>\n</form>",
    );

    layout("Dashboard", flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DashboardLogic;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn dashboard_lists_escaped_expenses_and_flashes() {
        let ym = YearMonth::new(2025, 10).unwrap();
        let expenses = vec![Expense {
            id: 3,
            user_id: 1,
            title: "<script>".into(),
            amount: 12.5,
            category: "Food".into(),
            date: "2025-10-27".into(),
        }];
        let summary =
            DashboardLogic::summarize(MonthFilter::Month(ym), expenses, Some(100.0), None, "$");
        let flashes = vec![Flash {
            category: "success".into(),
            message: "Imported 1 expenses successfully!".into(),
        }];

        let html = dashboard_page(&summary, &flashes, "$");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("name=\"expense_ids\" value=\"3\""));
        assert!(html.contains("Imported 1 expenses successfully!"));
        assert!(html.contains("October 2025"));
        assert!(html.contains("$12.50"));
    }
}
