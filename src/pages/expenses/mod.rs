pub mod line_items;

use std::rc::Rc;

use futures::future::try_join3;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use self::line_items::{LineItems, LineItemsEditor, RefreshTicket};
use super::crud::{currency_cell, date_cell, delete_message, use_crud, Lookup, ModalMode};
use super::deposits::INVALID_DATE;
use crate::api::expense::{
    create_expense, delete_expense, get_expense, list_expenses, update_expense,
    CreateExpenseRequest, DocumentType, ExpenseHeader, UpdateExpenseRequest,
};
use crate::api::expense_type::list_expense_types;
use crate::api::monetary_fund::list_monetary_funds;
use crate::components::icons::{icon_delete, icon_edit, icon_plus};
use crate::components::layout::{error_banner, loading_placeholder};
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome, SelectOption};
use crate::components::table::{Align, CellValue, Column, DataTable, RowAction};
use crate::format::{date_input_value, to_iso_start_of_day};

const INVALID_DOCUMENT: &str = "Select a document type";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpenseField {
    Date,
    Fund,
    Commerce,
    DocumentType,
    Observations,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseRow {
    pub expense: ExpenseHeader,
    pub fund_name: String,
}

impl ExpenseRow {
    pub fn join(expenses: Vec<ExpenseHeader>, funds: &Lookup) -> Vec<ExpenseRow> {
        expenses
            .into_iter()
            .map(|expense| ExpenseRow {
                fund_name: funds.name(&expense.monetary_fund_id),
                expense,
            })
            .collect()
    }
}

/// The form's select lists, loaded alongside the expenses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseLookups {
    pub funds: Lookup,
    pub expense_types: Lookup,
}

fn fields(lookups: &ExpenseLookups) -> Vec<FieldDef<ExpenseField>> {
    let documents = DocumentType::ALL
        .iter()
        .map(|kind| SelectOption::new(kind.as_str(), kind.as_str()))
        .collect();
    vec![
        FieldDef::date(ExpenseField::Date, "Date").required(),
        FieldDef::select(ExpenseField::Fund, "Monetary Fund", lookups.funds.options()).required(),
        FieldDef::text(ExpenseField::Commerce, "Commerce").required(),
        FieldDef::select(ExpenseField::DocumentType, "Document Type", documents).required(),
        FieldDef::text(ExpenseField::Observations, "Observations"),
    ]
}

fn columns() -> Vec<Column<ExpenseRow>> {
    vec![
        Column::new("date", "Date", |row: &ExpenseRow| CellValue::from(row.expense.date.as_str())).format(date_cell),
        Column::new("commerce", "Commerce", |row: &ExpenseRow| {
            CellValue::from(row.expense.commerce_name.as_str())
        }),
        Column::new("fund", "Fund", |row: &ExpenseRow| CellValue::from(row.fund_name.as_str())),
        Column::new("documentType", "Document Type", |row: &ExpenseRow| {
            CellValue::from(row.expense.document_type.as_str())
        }),
        Column::new("total", "Total", |row: &ExpenseRow| CellValue::from(row.expense.total_amount))
            .align(Align::Right)
            .format(currency_cell),
    ]
}

fn initial_values(expense: &ExpenseHeader) -> FormValues<ExpenseField> {
    FormValues::new()
        .with(ExpenseField::Date, date_input_value(&expense.date))
        .with(ExpenseField::Fund, expense.monetary_fund_id.as_str())
        .with(ExpenseField::Commerce, expense.commerce_name.as_str())
        .with(ExpenseField::DocumentType, expense.document_type.as_str())
        .with(
            ExpenseField::Observations,
            expense.observations.clone().unwrap_or_default(),
        )
}

struct HeaderFields {
    date: String,
    monetary_fund_id: String,
    commerce_name: String,
    document_type: DocumentType,
    observations: Option<String>,
}

fn header_fields(values: &FormValues<ExpenseField>) -> Result<HeaderFields, &'static str> {
    Ok(HeaderFields {
        date: to_iso_start_of_day(&values.text(ExpenseField::Date)).ok_or(INVALID_DATE)?,
        monetary_fund_id: values.text(ExpenseField::Fund),
        commerce_name: values.text(ExpenseField::Commerce).trim().to_string(),
        document_type: DocumentType::parse(values.text(ExpenseField::DocumentType).trim())
            .ok_or(INVALID_DOCUMENT)?,
        observations: values.optional_text(ExpenseField::Observations),
    })
}

pub fn create_request(
    user_id: &str,
    values: &FormValues<ExpenseField>,
    items: &LineItems,
) -> Result<CreateExpenseRequest, &'static str> {
    let details = items.to_details()?;
    let header = header_fields(values)?;
    Ok(CreateExpenseRequest {
        user_id: user_id.to_string(),
        date: header.date,
        monetary_fund_id: header.monetary_fund_id,
        commerce_name: header.commerce_name,
        document_type: header.document_type,
        observations: header.observations,
        details,
    })
}

pub fn update_request(
    id: &str,
    values: &FormValues<ExpenseField>,
    items: &LineItems,
) -> Result<UpdateExpenseRequest, &'static str> {
    let details = items.to_details()?;
    let header = header_fields(values)?;
    Ok(UpdateExpenseRequest {
        id: id.to_string(),
        date: header.date,
        monetary_fund_id: header.monetary_fund_id,
        commerce_name: header.commerce_name,
        document_type: header.document_type,
        observations: header.observations,
        details,
    })
}

#[derive(Properties, PartialEq)]
pub struct ExpensesPageProps {
    pub user_id: String,
}

#[function_component(ExpensesPage)]
pub fn expenses_page(props: &ExpensesPageProps) -> Html {
    let rows = use_state(|| Rc::new(Vec::<ExpenseRow>::new()));
    let lookups = use_state(ExpenseLookups::default);
    let line_items = use_state(LineItems::default);
    let refresh = use_mut_ref(RefreshTicket::idle);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let crud = use_crud::<ExpenseRow>();
    let fields = use_memo(|lookups: &ExpenseLookups| fields(lookups), (*lookups).clone());
    let columns = use_memo(|_| columns(), ());

    {
        let rows = rows.clone();
        let lookups = lookups.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                loading.set(true);
                spawn_local(async move {
                    let joined = try_join3(
                        list_expenses(&user_id),
                        list_monetary_funds(&user_id),
                        list_expense_types(&user_id),
                    )
                    .await;
                    match joined {
                        Ok((expenses, funds, types)) => {
                            let next = ExpenseLookups {
                                funds: Lookup::new(funds.into_iter().map(|fund| (fund.id, fund.name))),
                                expense_types: Lookup::new(types.into_iter().map(|kind| (kind.id, kind.name))),
                            };
                            rows.set(Rc::new(ExpenseRow::join(expenses, &next.funds)));
                            lookups.set(next);
                            load_error.set(None);
                        }
                        Err(err) => {
                            log::error!("expenses load failed: {}", err);
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

    // Line items follow the modal: blank for a new expense, the stored details
    // (refreshed from the server) when editing.
    {
        let line_items = line_items.clone();
        let refresh = refresh.clone();
        let error = crud.error.clone();
        use_effect_with_deps(
            move |mode: &ModalMode<ExpenseRow>| {
                let ticket = match mode {
                    ModalMode::Edit(row) => RefreshTicket::for_expense(&row.expense.id),
                    _ => RefreshTicket::idle(),
                };
                *refresh.borrow_mut() = ticket.clone();

                match mode {
                    ModalMode::Create => line_items.set(LineItems::default()),
                    ModalMode::Edit(row) => {
                        line_items.set(LineItems::from_details(&row.expense.expense_details));
                        let id = row.expense.id.clone();
                        let ticket = ticket.clone();
                        spawn_local(async move {
                            match get_expense(&id).await {
                                Ok(expense) => {
                                    if let Some(items) = ticket.accept(&expense) {
                                        line_items.set(items);
                                    }
                                }
                                Err(err) if ticket.is_live() => {
                                    log::warn!("could not refresh expense {}: {}", id, err);
                                    error.set(Some(err.message));
                                }
                                Err(err) => log::debug!("dropped stale refresh of {}: {}", id, err),
                            }
                        });
                    }
                    _ => {}
                }
                move || ticket.revoke()
            },
            (*crud.mode).clone(),
        );
    }

    let on_submit = {
        let crud = crud.clone();
        let line_items = line_items.clone();
        let user_id = props.user_id.clone();
        Callback::from(move |outcome: ModalOutcome<ExpenseField>| match (&*crud.mode, outcome) {
            (ModalMode::Create, ModalOutcome::Saved(values)) => {
                match create_request(&user_id, &values, &line_items) {
                    Ok(request) => crud.mutate("create expense", async move {
                        create_expense(&request).await.map(|_| ())
                    }),
                    Err(message) => crud.refuse(message),
                }
            }
            (ModalMode::Edit(row), ModalOutcome::Saved(values)) => {
                match update_request(&row.expense.id, &values, &line_items) {
                    Ok(request) => crud.mutate("update expense", async move {
                        update_expense(&request).await.map(|_| ())
                    }),
                    Err(message) => crud.refuse(message),
                }
            }
            (ModalMode::Delete(row), ModalOutcome::Confirmed) => {
                let id = row.expense.id.clone();
                crud.mutate("delete expense", async move { delete_expense(&id).await });
            }
            _ => {}
        })
    };

    let on_items_change = {
        let line_items = line_items.clone();
        let refresh = refresh.clone();
        Callback::from(move |items: LineItems| {
            refresh.borrow().revoke();
            line_items.set(items);
        })
    };

    let actions = vec![
        RowAction::new("Edit", icon_edit, crud.opener(ModalMode::Edit)),
        RowAction::new("Delete", icon_delete, crud.opener(ModalMode::Delete)),
    ];

    let mode = &*crud.mode;
    let initial = match mode {
        ModalMode::Edit(row) => Some(Rc::new(initial_values(&row.expense))),
        _ => None,
    };
    let confirm_message = mode.record().map(|row| delete_message(&row.expense.commerce_name));
    let modal_key = mode
        .record()
        .map(|row| row.expense.id.clone())
        .unwrap_or_else(|| "new".to_string());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-bold">{"Expenses"}</h2>
                <button type="button" onclick={crud.open_create()} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                    { icon_plus() }{"New"}
                </button>
            </div>
            { error_banner(&load_error) }
            if *loading && rows.is_empty() {
                { loading_placeholder("Loading expenses...") }
            } else {
                <DataTable<ExpenseRow> columns={columns.clone()} rows={(*rows).clone()} {actions} />
            }
            <FormModal<ExpenseField>
                key={modal_key}
                open={mode.is_open()}
                title={mode.title("Expense")}
                fields={fields.clone()}
                {initial}
                confirm_only={mode.is_delete()}
                {confirm_message}
                busy={*crud.busy}
                error={(*crud.error).clone()}
                on_close={crud.close()}
                {on_submit}
            >
                <LineItemsEditor
                    items={(*line_items).clone()}
                    expense_types={lookups.expense_types.clone()}
                    on_change={on_items_change}
                />
            </FormModal<ExpenseField>>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormValues<ExpenseField> {
        FormValues::new()
            .with(ExpenseField::Date, "2025-06-02")
            .with(ExpenseField::Fund, "f1")
            .with(ExpenseField::Commerce, "Market")
            .with(ExpenseField::DocumentType, "Factura")
            .with(ExpenseField::Observations, "")
    }

    #[test]
    fn incomplete_line_items_are_dropped_from_the_body() {
        let mut items = LineItems::default();
        items.set_expense_type(0, "t1".into());
        items.set_amount(0, 12.5);
        items.add();
        items.set_amount(1, 99.0);

        let body = serde_json::to_value(create_request("u1", &form(), &items).unwrap()).unwrap();
        assert_eq!(
            body["details"],
            serde_json::json!([{"expenseTypeId": "t1", "amount": 12.5}])
        );
        assert_eq!(body["documentType"], "Factura");
        assert_eq!(body["date"], "2025-06-02T00:00:00Z");
        assert!(body.get("observations").is_none());
    }

    #[test]
    fn no_valid_items_is_refused() {
        let items = LineItems::default();
        assert_eq!(
            update_request("e1", &form(), &items),
            Err(line_items::NO_VALID_ITEMS)
        );
    }

    #[test]
    fn unknown_document_type_is_refused() {
        let mut items = LineItems::default();
        items.set_expense_type(0, "t1".into());
        items.set_amount(0, 1.0);
        let values = form().with(ExpenseField::DocumentType, "Recibo");
        assert_eq!(create_request("u1", &values, &items), Err(INVALID_DOCUMENT));
    }
}
