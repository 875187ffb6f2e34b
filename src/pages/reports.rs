use std::rc::Rc;

use chrono::{Local, TimeZone};
use futures::future::try_join3;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::crud::{currency_cell, date_cell, Lookup};
use crate::api::expense_type::list_expense_types;
use crate::api::reports::{budget_vs_executed, movements, BudgetVsExecuted, Movement};
use crate::components::layout::{error_banner, loading_placeholder, page_shell};
use crate::components::table::{Align, CellValue, Column, DataTable};
use crate::format::{format_currency, month_bounds, zoned_end_of_day, zoned_start_of_day};

pub const INVALID_RANGE: &str = "Choose a start date on or before the end date";

/// Budgeted against executed spending for one expense type.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub expense_type_id: String,
    pub expense_type_name: String,
    pub budgeted: f64,
    pub executed: f64,
}

impl ComparisonRow {
    pub fn difference(&self) -> f64 {
        self.budgeted - self.executed
    }

    /// Share of the budget already spent, or `None` without a budget.
    pub fn percent_used(&self) -> Option<f64> {
        (self.budgeted > 0.0).then(|| self.executed / self.budgeted * 100.0)
    }
}

/// One row per expense type, budgets summed across the months in range.
/// Types with spending but no budget are listed after the budgeted ones.
pub fn budget_comparison(report: &BudgetVsExecuted, expense_types: &Lookup) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = Vec::new();
    let entry = |rows: &mut Vec<ComparisonRow>, id: &str| -> usize {
        match rows.iter().position(|row| row.expense_type_id == id) {
            Some(index) => index,
            None => {
                rows.push(ComparisonRow {
                    expense_type_id: id.to_string(),
                    expense_type_name: expense_types.name(id),
                    budgeted: 0.0,
                    executed: 0.0,
                });
                rows.len() - 1
            }
        }
    };
    for budget in &report.budgets {
        let index = entry(&mut rows, &budget.expense_type_id);
        rows[index].budgeted += budget.amount;
    }
    for executed in &report.executed {
        let index = entry(&mut rows, &executed.expense_type_id);
        rows[index].executed += executed.executed;
    }
    rows
}

/// Query bounds in the browser's time zone: start of the first day through end of the last.
pub fn report_range(start: &str, end: &str) -> Result<(String, String), &'static str> {
    report_range_in(start, end, &Local)
}

pub fn report_range_in<Tz: TimeZone>(
    start: &str,
    end: &str,
    zone: &Tz,
) -> Result<(String, String), &'static str> {
    let from = zoned_start_of_day(start, zone).ok_or(INVALID_RANGE)?;
    let to = zoned_end_of_day(end, zone).ok_or(INVALID_RANGE)?;
    if from > to {
        return Err(INVALID_RANGE);
    }
    Ok((from, to))
}

fn default_range() -> (String, String) {
    let (first, last) = month_bounds(Local::now().date_naive());
    (first.to_string(), last.to_string())
}

fn movement_columns() -> Vec<Column<Movement>> {
    vec![
        Column::new("date", "Date", |row: &Movement| CellValue::from(row.date.as_str())).format(date_cell),
        Column::new("type", "Type", |row: &Movement| CellValue::from(row.kind.label())),
        Column::new("description", "Description", |row: &Movement| {
            CellValue::from(row.description.clone())
        }),
        Column::new("amount", "Amount", |row: &Movement| CellValue::from(row.amount))
            .align(Align::Right)
            .format(currency_cell),
    ]
}

fn comparison_table(rows: &[ComparisonRow]) -> Html {
    if rows.is_empty() {
        return html! {
            <p class="text-sm opacity-70">{"No budgets or expenses in this range."}</p>
        };
    }
    html! {
        <div class="rounded-[10px] border border-border overflow-auto" style="background-color: var(--color-paper);">
            <table class="w-full text-sm">
                <thead style="background-color: var(--color-primary); color: #FFFFFF;">
                    <tr>
                        <th class="px-4 py-3 text-left">{"Expense Type"}</th>
                        <th class="px-4 py-3 text-right">{"Budgeted"}</th>
                        <th class="px-4 py-3 text-right">{"Executed"}</th>
                        <th class="px-4 py-3 text-right">{"Difference"}</th>
                        <th class="px-4 py-3 text-left min-w-[160px]">{"Used"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().map(|row| {
                        let percent = row.percent_used();
                        let width = percent.unwrap_or(100.0).clamp(0.0, 100.0);
                        let over = row.difference() < 0.0;
                        let bar = if over { "bg-red-500" } else { "bg-emerald-500" };
                        html! {
                            <tr key={row.expense_type_id.clone()} class="border-t border-border">
                                <td class="px-4 py-2">{ row.expense_type_name.clone() }</td>
                                <td class="px-4 py-2 text-right">{ format_currency(row.budgeted) }</td>
                                <td class="px-4 py-2 text-right">{ format_currency(row.executed) }</td>
                                <td class={classes!("px-4", "py-2", "text-right", over.then_some("text-red-500"))}>{ format_currency(row.difference()) }</td>
                                <td class="px-4 py-2">
                                    <div class="h-2 w-full rounded-full overflow-hidden" style="background-color: var(--color-background);">
                                        <div class={classes!("h-full", bar)} style={format!("width: {}%", width as i32)}></div>
                                    </div>
                                    <span class="text-xs opacity-70">
                                        { percent.map(|p| format!("{}%", p.round() as i64)).unwrap_or_else(|| "No budget".to_string()) }
                                    </span>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReportsPageProps {
    pub user_id: String,
}

#[function_component(ReportsPage)]
pub fn reports_page(props: &ReportsPageProps) -> Html {
    let range = use_state(default_range);
    let query = use_state(|| 0u32);
    let movement_rows = use_state(|| Rc::new(Vec::<Movement>::new()));
    let comparison = use_state(Vec::<ComparisonRow>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let columns = use_memo(|_| movement_columns(), ());

    {
        let range = range.clone();
        let movement_rows = movement_rows.clone();
        let comparison = comparison.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                match report_range(&range.0, &range.1) {
                    Err(message) => {
                        error.set(Some(message.to_string()));
                        loading.set(false);
                    }
                    Ok((start, end)) => {
                        loading.set(true);
                        spawn_local(async move {
                            let joined = try_join3(
                                movements(&user_id, &start, &end),
                                budget_vs_executed(&user_id, &start, &end),
                                list_expense_types(&user_id),
                            )
                            .await;
                            match joined {
                                Ok((list, report, types)) => {
                                    let lookup = Lookup::new(types.into_iter().map(|kind| (kind.id, kind.name)));
                                    log::debug!("report {}..{}: {} movements", start, end, list.len());
                                    movement_rows.set(Rc::new(list));
                                    comparison.set(budget_comparison(&report, &lookup));
                                    error.set(None);
                                }
                                Err(err) => {
                                    log::error!("reports load failed: {}", err);
                                    error.set(Some(err.message));
                                }
                            }
                            loading.set(false);
                        });
                    }
                }
                || ()
            },
            (props.user_id.clone(), *query),
        );
    }

    let on_start = {
        let range = range.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            range.set((input.value(), range.1.clone()));
        })
    };
    let on_end = {
        let range = range.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            range.set((range.0.clone(), input.value()));
        })
    };
    let on_query = {
        let query = query.clone();
        Callback::from(move |_| query.set(query.wrapping_add(1)))
    };

    page_shell(
        "Queries & Reports",
        html! {},
        html! {
            <>
                <div class="flex flex-wrap items-end gap-4">
                    <label class="flex flex-col text-sm gap-1">
                        {"From"}
                        <input type="date" value={range.0.clone()} oninput={on_start}
                            class="px-3 py-2 bg-transparent border border-border rounded-lg" />
                    </label>
                    <label class="flex flex-col text-sm gap-1">
                        {"To"}
                        <input type="date" value={range.1.clone()} oninput={on_end}
                            class="px-3 py-2 bg-transparent border border-border rounded-lg" />
                    </label>
                    <button type="button" onclick={on_query} disabled={*loading}
                        class="px-4 py-2 rounded-lg text-white font-semibold disabled:opacity-50" style="background-color: var(--color-primary-light);">
                        {"Query"}
                    </button>
                </div>
                { error_banner(&error) }
                if *loading && movement_rows.is_empty() {
                    { loading_placeholder("Loading reports...") }
                } else {
                    <>
                    <section class="space-y-3">
                        <h2 class="text-lg font-bold">{"Movements (Expenses and Deposits)"}</h2>
                        <DataTable<Movement> columns={columns.clone()} rows={(*movement_rows).clone()}
                            empty_message={"No movements in this range."} />
                    </section>
                    <section class="space-y-3">
                        <h2 class="text-lg font-bold">{"Budget vs Executed"}</h2>
                        { comparison_table(&comparison) }
                    </section>
                    </>
                }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use crate::api::budget::Budget;
    use crate::api::reports::ExecutedAmount;

    fn budget(expense_type_id: &str, month: u32, amount: f64) -> Budget {
        Budget {
            id: format!("{}-{}", expense_type_id, month),
            user_id: "u1".into(),
            expense_type_id: expense_type_id.into(),
            month,
            year: 2025,
            amount,
        }
    }

    #[test]
    fn comparison_sums_per_expense_type() {
        let report = BudgetVsExecuted {
            budgets: vec![budget("t1", 5, 100.0), budget("t2", 5, 50.0), budget("t1", 6, 100.0)],
            executed: vec![
                ExecutedAmount { expense_type_id: "t1".into(), executed: 250.0 },
                ExecutedAmount { expense_type_id: "t3".into(), executed: 10.0 },
            ],
        };
        let lookup = Lookup::new(vec![
            ("t1".to_string(), "Food".to_string()),
            ("t2".to_string(), "Rent".to_string()),
        ]);
        let rows = budget_comparison(&report, &lookup);
        let ids: Vec<_> = rows.iter().map(|row| row.expense_type_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);

        assert_eq!(rows[0].budgeted, 200.0);
        assert_eq!(rows[0].executed, 250.0);
        assert_eq!(rows[0].difference(), -50.0);
        assert_eq!(rows[0].percent_used(), Some(125.0));

        assert_eq!(rows[1].executed, 0.0);
        assert_eq!(rows[2].expense_type_name, "Unknown");
        assert_eq!(rows[2].percent_used(), None);
    }

    #[test]
    fn range_covers_whole_days() {
        assert_eq!(
            report_range_in("2025-06-01", "2025-06-30", &Utc),
            Ok((
                "2025-06-01T00:00:00.000Z".to_string(),
                "2025-06-30T23:59:59.999Z".to_string()
            ))
        );
        assert_eq!(report_range("2025-06-01", "2025-06-01").map(|_| ()), Ok(()));
    }

    #[test]
    fn range_follows_the_local_zone() {
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            report_range_in("2025-06-01", "2025-06-30", &bogota),
            Ok((
                "2025-06-01T05:00:00.000Z".to_string(),
                "2025-07-01T04:59:59.999Z".to_string()
            ))
        );
    }

    #[test]
    fn inverted_or_blank_range_is_refused() {
        assert_eq!(report_range("2025-07-01", "2025-06-30"), Err(INVALID_RANGE));
        assert_eq!(report_range("", "2025-06-30"), Err(INVALID_RANGE));
    }
}
