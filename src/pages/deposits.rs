use std::rc::Rc;

use futures::future::try_join;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::crud::{currency_cell, date_cell, delete_message, use_crud, Lookup, ModalMode};
use crate::api::deposit::{
    create_deposit, delete_deposit, list_deposits, update_deposit, CreateDepositRequest, Deposit,
    UpdateDepositRequest,
};
use crate::api::monetary_fund::list_monetary_funds;
use crate::components::icons::{icon_delete, icon_edit, icon_plus};
use crate::components::layout::{error_banner, loading_placeholder};
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome};
use crate::components::table::{Align, CellValue, Column, DataTable, RowAction};
use crate::format::{date_input_value, display_date, format_currency, to_iso_start_of_day};

pub const INVALID_DATE: &str = "Enter a valid date";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepositField {
    Date,
    Fund,
    Amount,
    Description,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepositRow {
    pub deposit: Deposit,
    pub fund_name: String,
}

impl DepositRow {
    pub fn join(deposits: Vec<Deposit>, funds: &Lookup) -> Vec<DepositRow> {
        deposits
            .into_iter()
            .map(|deposit| DepositRow {
                fund_name: funds.name(&deposit.monetary_fund_id),
                deposit,
            })
            .collect()
    }

    fn label(&self) -> String {
        format!(
            "{} {}",
            display_date(&self.deposit.date),
            format_currency(self.deposit.amount)
        )
    }
}

fn fields(funds: &Lookup) -> Vec<FieldDef<DepositField>> {
    vec![
        FieldDef::date(DepositField::Date, "Date").required(),
        FieldDef::select(DepositField::Fund, "Monetary Fund", funds.options()).required(),
        FieldDef::number(DepositField::Amount, "Amount").required(),
        FieldDef::text(DepositField::Description, "Description"),
    ]
}

fn columns() -> Vec<Column<DepositRow>> {
    vec![
        Column::new("date", "Date", |row: &DepositRow| CellValue::from(row.deposit.date.as_str())).format(date_cell),
        Column::new("fund", "Fund", |row: &DepositRow| CellValue::from(row.fund_name.as_str())),
        Column::new("amount", "Amount", |row: &DepositRow| CellValue::from(row.deposit.amount))
            .align(Align::Right)
            .format(currency_cell),
        Column::new("description", "Description", |row: &DepositRow| {
            CellValue::from(row.deposit.description.clone())
        }),
    ]
}

fn initial_values(deposit: &Deposit) -> FormValues<DepositField> {
    FormValues::new()
        .with(DepositField::Date, date_input_value(&deposit.date))
        .with(DepositField::Fund, deposit.monetary_fund_id.as_str())
        .with(DepositField::Amount, deposit.amount)
        .with(DepositField::Description, deposit.description.clone().unwrap_or_default())
}

pub fn create_request(
    user_id: &str,
    values: &FormValues<DepositField>,
) -> Result<CreateDepositRequest, &'static str> {
    Ok(CreateDepositRequest {
        user_id: user_id.to_string(),
        date: to_iso_start_of_day(&values.text(DepositField::Date)).ok_or(INVALID_DATE)?,
        monetary_fund_id: values.text(DepositField::Fund),
        amount: values.number(DepositField::Amount),
        description: values.optional_text(DepositField::Description),
    })
}

pub fn update_request(id: &str, values: &FormValues<DepositField>) -> Result<UpdateDepositRequest, &'static str> {
    Ok(UpdateDepositRequest {
        id: id.to_string(),
        date: to_iso_start_of_day(&values.text(DepositField::Date)).ok_or(INVALID_DATE)?,
        monetary_fund_id: values.text(DepositField::Fund),
        amount: values.number(DepositField::Amount),
        description: values.optional_text(DepositField::Description),
    })
}

#[derive(Properties, PartialEq)]
pub struct DepositsPageProps {
    pub user_id: String,
}

#[function_component(DepositsPage)]
pub fn deposits_page(props: &DepositsPageProps) -> Html {
    let rows = use_state(|| Rc::new(Vec::<DepositRow>::new()));
    let funds = use_state(Lookup::default);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let crud = use_crud::<DepositRow>();
    let fields = use_memo(|funds: &Lookup| fields(funds), (*funds).clone());
    let columns = use_memo(|_| columns(), ());

    {
        let rows = rows.clone();
        let funds = funds.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                loading.set(true);
                spawn_local(async move {
                    match try_join(list_deposits(&user_id), list_monetary_funds(&user_id)).await {
                        Ok((deposits, fund_list)) => {
                            let lookup = Lookup::new(fund_list.into_iter().map(|fund| (fund.id, fund.name)));
                            rows.set(Rc::new(DepositRow::join(deposits, &lookup)));
                            funds.set(lookup);
                            load_error.set(None);
                        }
                        Err(err) => {
                            log::error!("deposits load failed: {}", err);
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
        Callback::from(move |outcome: ModalOutcome<DepositField>| match (&*crud.mode, outcome) {
            (ModalMode::Create, ModalOutcome::Saved(values)) => match create_request(&user_id, &values) {
                Ok(request) => crud.mutate("create deposit", async move {
                    create_deposit(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Edit(row), ModalOutcome::Saved(values)) => match update_request(&row.deposit.id, &values) {
                Ok(request) => crud.mutate("update deposit", async move {
                    update_deposit(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Delete(row), ModalOutcome::Confirmed) => {
                let id = row.deposit.id.clone();
                crud.mutate("delete deposit", async move { delete_deposit(&id).await });
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
        ModalMode::Edit(row) => Some(Rc::new(initial_values(&row.deposit))),
        _ => None,
    };
    let confirm_message = mode.record().map(|row| delete_message(&row.label()));
    let modal_key = mode
        .record()
        .map(|row| row.deposit.id.clone())
        .unwrap_or_else(|| "new".to_string());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-bold">{"Deposits"}</h2>
                <button type="button" onclick={crud.open_create()} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                    { icon_plus() }{"New"}
                </button>
            </div>
            { error_banner(&load_error) }
            if *loading && rows.is_empty() {
                { loading_placeholder("Loading deposits...") }
            } else {
                <DataTable<DepositRow> columns={columns.clone()} rows={(*rows).clone()} {actions} />
            }
            <FormModal<DepositField>
                key={modal_key}
                open={mode.is_open()}
                title={mode.title("Deposit")}
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

    fn deposit() -> Deposit {
        Deposit {
            id: "d1".into(),
            user_id: "u1".into(),
            date: "2025-06-02T00:00:00Z".into(),
            monetary_fund_id: "f1".into(),
            amount: 1200.0,
            description: None,
        }
    }

    #[test]
    fn date_goes_out_as_midnight_utc() {
        let values = initial_values(&deposit());
        assert_eq!(values.text(DepositField::Date), "2025-06-02");
        let body = serde_json::to_value(create_request("u1", &values).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "userId": "u1",
                "date": "2025-06-02T00:00:00Z",
                "monetaryFundId": "f1",
                "amount": 1200.0
            })
        );
    }

    #[test]
    fn missing_date_is_refused() {
        let values = FormValues::new().with(DepositField::Fund, "f1");
        assert_eq!(update_request("d1", &values), Err(INVALID_DATE));
    }

    #[test]
    fn rows_carry_fund_names() {
        let funds = Lookup::new(vec![("f1".to_string(), "Main".to_string())]);
        let rows = DepositRow::join(vec![deposit()], &funds);
        assert_eq!(rows[0].fund_name, "Main");
        assert_eq!(rows[0].label(), "02/06/2025 $1,200.00");
    }
}
