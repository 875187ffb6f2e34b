use std::rc::Rc;

use futures::future::try_join;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::crud::{currency_cell, delete_message, use_crud, Lookup, ModalMode};
use crate::api::budget::{
    create_budget, delete_budget, list_budgets, update_budget, Budget, CreateBudgetRequest,
    UpdateBudgetRequest,
};
use crate::api::expense_type::list_expense_types;
use crate::components::icons::{icon_delete, icon_edit, icon_plus};
use crate::components::layout::{error_banner, loading_placeholder};
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome, SelectOption};
use crate::components::table::{Align, CellValue, Column, DataTable, RowAction};
use crate::format::{month_year_label, MONTH_NAMES};

const INVALID_MONTH: &str = "Select a month between 1 and 12";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BudgetField {
    Month,
    Year,
    ExpenseType,
    Amount,
}

/// A budget with its expense type name resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetRow {
    pub budget: Budget,
    pub expense_type_name: String,
}

impl BudgetRow {
    pub fn join(budgets: Vec<Budget>, expense_types: &Lookup) -> Vec<BudgetRow> {
        budgets
            .into_iter()
            .map(|budget| BudgetRow {
                expense_type_name: expense_types.name(&budget.expense_type_id),
                budget,
            })
            .collect()
    }

    pub fn delete_message(&self) -> String {
        delete_message(&format!(
            "{} {}/{}",
            self.expense_type_name, self.budget.month, self.budget.year
        ))
    }
}

fn fields(expense_types: &Lookup) -> Vec<FieldDef<BudgetField>> {
    let months = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| SelectOption::new((index + 1).to_string(), *name))
        .collect();
    vec![
        FieldDef::select(BudgetField::Month, "Month", months).required(),
        FieldDef::number(BudgetField::Year, "Year").required(),
        FieldDef::select(BudgetField::ExpenseType, "Expense Type", expense_types.options()).required(),
        FieldDef::number(BudgetField::Amount, "Amount").required(),
    ]
}

fn columns() -> Vec<Column<BudgetRow>> {
    vec![
        Column::new("period", "Month/Year", |row: &BudgetRow| {
            CellValue::from(month_year_label(row.budget.month, row.budget.year))
        }),
        Column::new("expenseType", "Expense Type", |row: &BudgetRow| {
            CellValue::from(row.expense_type_name.as_str())
        }),
        Column::new("amount", "Budgeted Amount", |row: &BudgetRow| CellValue::from(row.budget.amount))
            .align(Align::Right)
            .format(currency_cell),
    ]
}

fn initial_values(budget: &Budget) -> FormValues<BudgetField> {
    FormValues::new()
        .with(BudgetField::Month, budget.month.to_string())
        .with(BudgetField::Year, f64::from(budget.year))
        .with(BudgetField::ExpenseType, budget.expense_type_id.as_str())
        .with(BudgetField::Amount, budget.amount)
}

fn period(values: &FormValues<BudgetField>) -> Result<(u32, i32), &'static str> {
    let month = values
        .text(BudgetField::Month)
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or(INVALID_MONTH)?;
    Ok((month, values.number(BudgetField::Year) as i32))
}

pub fn create_request(
    user_id: &str,
    values: &FormValues<BudgetField>,
) -> Result<CreateBudgetRequest, &'static str> {
    let (month, year) = period(values)?;
    Ok(CreateBudgetRequest {
        user_id: user_id.to_string(),
        expense_type_id: values.text(BudgetField::ExpenseType),
        month,
        year,
        amount: values.number(BudgetField::Amount),
    })
}

pub fn update_request(id: &str, values: &FormValues<BudgetField>) -> Result<UpdateBudgetRequest, &'static str> {
    let (month, year) = period(values)?;
    Ok(UpdateBudgetRequest {
        id: id.to_string(),
        expense_type_id: values.text(BudgetField::ExpenseType),
        month,
        year,
        amount: values.number(BudgetField::Amount),
    })
}

#[derive(Properties, PartialEq)]
pub struct BudgetsPageProps {
    pub user_id: String,
}

#[function_component(BudgetsPage)]
pub fn budgets_page(props: &BudgetsPageProps) -> Html {
    let rows = use_state(|| Rc::new(Vec::<BudgetRow>::new()));
    let expense_types = use_state(Lookup::default);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let crud = use_crud::<BudgetRow>();
    let fields = use_memo(|lookup: &Lookup| fields(lookup), (*expense_types).clone());
    let columns = use_memo(|_| columns(), ());

    {
        let rows = rows.clone();
        let expense_types = expense_types.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                loading.set(true);
                spawn_local(async move {
                    match try_join(list_budgets(&user_id), list_expense_types(&user_id)).await {
                        Ok((budgets, types)) => {
                            let lookup = Lookup::new(types.into_iter().map(|kind| (kind.id, kind.name)));
                            rows.set(Rc::new(BudgetRow::join(budgets, &lookup)));
                            expense_types.set(lookup);
                            load_error.set(None);
                        }
                        Err(err) => {
                            log::error!("budgets load failed: {}", err);
                            load_error.set(Some(err.message));
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            (props.user_id.clone(), *crud.reload),
        );
    }

    let on_submit = {
        let crud = crud.clone();
        let user_id = props.user_id.clone();
        Callback::from(move |outcome: ModalOutcome<BudgetField>| match (&*crud.mode, outcome) {
            (ModalMode::Create, ModalOutcome::Saved(values)) => match create_request(&user_id, &values) {
                Ok(request) => crud.mutate("create budget", async move {
                    create_budget(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Edit(row), ModalOutcome::Saved(values)) => match update_request(&row.budget.id, &values) {
                Ok(request) => crud.mutate("update budget", async move {
                    update_budget(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Delete(row), ModalOutcome::Confirmed) => {
                let id = row.budget.id.clone();
                crud.mutate("delete budget", async move { delete_budget(&id).await });
            }
            _ => {}
        })
    };

    let actions = vec![
        RowAction::new("Edit", icon_edit, crud.opener(ModalMode::Edit)),
        RowAction::new("Delete", icon_delete, crud.opener(ModalMode::Delete)),
    ];

    let mode = &*crud.mode;
    let initial = match mode {
        ModalMode::Edit(row) => Some(Rc::new(initial_values(&row.budget))),
        _ => None,
    };
    let confirm_message = mode.record().map(BudgetRow::delete_message);
    let modal_key = mode
        .record()
        .map(|row| row.budget.id.clone())
        .unwrap_or_else(|| "new".to_string());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-bold">{"Budgets"}</h2>
                <button type="button" onclick={crud.open_create()} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                    { icon_plus() }{"New"}
                </button>
            </div>
            { error_banner(&load_error) }
            if *loading && rows.is_empty() {
                { loading_placeholder("Loading budgets...") }
            } else {
                <DataTable<BudgetRow> columns={columns.clone()} rows={(*rows).clone()} {actions} />
            }
            <FormModal<BudgetField>
                key={modal_key}
                open={mode.is_open()}
                title={mode.title("Budget")}
                fields={fields.clone()}
                {initial}
                confirm_only={mode.is_delete()}
                {confirm_message}
                busy={*crud.busy}
                error={(*crud.error).clone()}
                on_close={crud.close()}
                {on_submit}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> Budget {
        Budget {
            id: "b1".into(),
            user_id: "u1".into(),
            expense_type_id: "t1".into(),
            month: 6,
            year: 2025,
            amount: 300.0,
        }
    }

    #[test]
    fn delete_message_names_type_and_period() {
        let lookup = Lookup::new(vec![("t1".to_string(), "Food".to_string())]);
        let rows = BudgetRow::join(vec![budget()], &lookup);
        assert_eq!(
            rows[0].delete_message(),
            "Are you sure you want to delete \"Food 6/2025\"?"
        );
    }

    #[test]
    fn unresolved_type_shows_unknown() {
        let rows = BudgetRow::join(vec![budget()], &Lookup::default());
        assert_eq!(rows[0].expense_type_name, "Unknown");
    }

    #[test]
    fn request_round_trips_the_form() {
        let values = initial_values(&budget());
        let request = create_request("u1", &values).unwrap();
        assert_eq!(request.month, 6);
        assert_eq!(request.year, 2025);
        assert_eq!(request.expense_type_id, "t1");
        assert_eq!(request.amount, 300.0);
    }

    #[test]
    fn month_out_of_range_is_refused() {
        let values = FormValues::new()
            .with(BudgetField::Month, "13")
            .with(BudgetField::Year, 2025.0);
        assert_eq!(update_request("b1", &values), Err(INVALID_MONTH));
    }
}
