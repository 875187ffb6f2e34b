use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::crud::{currency_cell, delete_message, use_crud, ModalMode};
use crate::api::monetary_fund::{
    create_monetary_fund, delete_monetary_fund, list_monetary_funds, update_monetary_fund,
    CreateMonetaryFundRequest, FundType, MonetaryFund, UpdateMonetaryFundRequest,
};
use crate::components::icons::{icon_delete, icon_edit, icon_plus};
use crate::components::layout::{error_banner, loading_placeholder};
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome, SelectOption};
use crate::components::table::{Align, CellValue, Column, DataTable, RowAction};

const INVALID_TYPE: &str = "Select a valid fund type";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FundField {
    Name,
    Type,
    InitialBalance,
    Notes,
}

fn fields() -> Vec<FieldDef<FundField>> {
    let types = FundType::ALL
        .iter()
        .map(|kind| SelectOption::new(kind.code().to_string(), kind.label()))
        .collect();
    vec![
        FieldDef::text(FundField::Name, "Name").required(),
        FieldDef::select(FundField::Type, "Type", types).required(),
        FieldDef::number(FundField::InitialBalance, "Initial Balance").required(),
        FieldDef::text(FundField::Notes, "Notes"),
    ]
}

fn columns() -> Vec<Column<MonetaryFund>> {
    vec![
        Column::new("name", "Name", |row: &MonetaryFund| CellValue::from(row.name.as_str())),
        Column::new("type", "Type", |row: &MonetaryFund| CellValue::from(row.fund_type.label())),
        Column::new("initialBalance", "Initial Balance", |row: &MonetaryFund| {
            CellValue::from(row.initial_balance)
        })
        .align(Align::Right)
        .format(currency_cell),
        Column::new("currentBalance", "Current Balance", |row: &MonetaryFund| {
            CellValue::from(row.current_balance)
        })
        .align(Align::Right)
        .format(currency_cell),
        Column::new("notes", "Notes", |row: &MonetaryFund| CellValue::from(row.notes.clone())),
    ]
}

fn initial_values(fund: &MonetaryFund) -> FormValues<FundField> {
    FormValues::new()
        .with(FundField::Name, fund.name.as_str())
        .with(FundField::Type, fund.fund_type.code().to_string())
        .with(FundField::InitialBalance, fund.initial_balance)
        .with(FundField::Notes, fund.notes.clone().unwrap_or_default())
}

fn fund_type(values: &FormValues<FundField>) -> Option<FundType> {
    let code = values.text(FundField::Type).trim().parse::<u8>().ok()?;
    FundType::try_from(code).ok()
}

pub fn create_request(
    user_id: &str,
    values: &FormValues<FundField>,
) -> Result<CreateMonetaryFundRequest, &'static str> {
    Ok(CreateMonetaryFundRequest {
        user_id: user_id.to_string(),
        name: values.text(FundField::Name).trim().to_string(),
        fund_type: fund_type(values).ok_or(INVALID_TYPE)?,
        initial_balance: values.number(FundField::InitialBalance),
        notes: values.optional_text(FundField::Notes),
    })
}

/// The balance is fixed once the fund exists; only descriptive fields change.
pub fn update_request(
    id: &str,
    values: &FormValues<FundField>,
) -> Result<UpdateMonetaryFundRequest, &'static str> {
    Ok(UpdateMonetaryFundRequest {
        id: id.to_string(),
        name: values.text(FundField::Name).trim().to_string(),
        fund_type: fund_type(values).ok_or(INVALID_TYPE)?,
        notes: values.optional_text(FundField::Notes),
    })
}

#[derive(Properties, PartialEq)]
pub struct MonetaryFundsPageProps {
    pub user_id: String,
}

#[function_component(MonetaryFundsPage)]
pub fn monetary_funds_page(props: &MonetaryFundsPageProps) -> Html {
    let rows = use_state(|| Rc::new(Vec::<MonetaryFund>::new()));
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let crud = use_crud::<MonetaryFund>();
    let fields = use_memo(|_| fields(), ());
    let columns = use_memo(|_| columns(), ());

    {
        let rows = rows.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                loading.set(true);
                spawn_local(async move {
                    match list_monetary_funds(&user_id).await {
                        Ok(list) => {
                            rows.set(Rc::new(list));
                            load_error.set(None);
                        }
                        Err(err) => {
                            log::error!("monetary funds load failed: {}", err);
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
        Callback::from(move |outcome: ModalOutcome<FundField>| match (&*crud.mode, outcome) {
            (ModalMode::Create, ModalOutcome::Saved(values)) => match create_request(&user_id, &values) {
                Ok(request) => crud.mutate("create monetary fund", async move {
                    create_monetary_fund(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Edit(fund), ModalOutcome::Saved(values)) => match update_request(&fund.id, &values) {
                Ok(request) => crud.mutate("update monetary fund", async move {
                    update_monetary_fund(&request).await.map(|_| ())
                }),
                Err(message) => crud.refuse(message),
            },
            (ModalMode::Delete(fund), ModalOutcome::Confirmed) => {
                let id = fund.id.clone();
                crud.mutate("delete monetary fund", async move { delete_monetary_fund(&id).await });
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
        ModalMode::Edit(fund) => Some(Rc::new(initial_values(fund))),
        _ => None,
    };
    let confirm_message = mode.record().map(|fund| delete_message(&fund.name));
    let modal_key = mode.record().map(|fund| fund.id.clone()).unwrap_or_else(|| "new".to_string());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-bold">{"Monetary Funds"}</h2>
                <button type="button" onclick={crud.open_create()} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                    { icon_plus() }{"New"}
                </button>
            </div>
            { error_banner(&load_error) }
            if *loading && rows.is_empty() {
                { loading_placeholder("Loading funds...") }
            } else {
                <DataTable<MonetaryFund> columns={columns.clone()} rows={(*rows).clone()} {actions} />
            }
            <FormModal<FundField>
                key={modal_key}
                open={mode.is_open()}
                title={mode.title("Monetary Fund")}
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

    #[test]
    fn petty_cash_fund_creation_body() {
        let values = FormValues::new()
            .with(FundField::Name, "Caja Chica")
            .with(FundField::Type, "1")
            .with(FundField::InitialBalance, 100000.0)
            .with(FundField::Notes, "");
        let body = serde_json::to_value(create_request("u1", &values).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "userId": "u1",
                "name": "Caja Chica",
                "type": 1,
                "initialBalance": 100000.0
            })
        );
    }

    #[test]
    fn unknown_type_is_refused() {
        let values = FormValues::new()
            .with(FundField::Name, "Main")
            .with(FundField::Type, "9");
        assert_eq!(create_request("u1", &values), Err(INVALID_TYPE));
        assert_eq!(update_request("f1", &values), Err(INVALID_TYPE));
    }

    #[test]
    fn edit_prefills_type_code() {
        let fund = MonetaryFund {
            id: "f1".into(),
            user_id: "u1".into(),
            name: "Main".into(),
            fund_type: FundType::BankAccount,
            initial_balance: 50.0,
            current_balance: 75.0,
            notes: Some("payroll".into()),
        };
        let values = initial_values(&fund);
        assert_eq!(values.text(FundField::Type), "0");
        assert_eq!(values.number(FundField::InitialBalance), 50.0);
        let request = update_request(&fund.id, &values).unwrap();
        assert_eq!(request.fund_type, FundType::BankAccount);
        assert_eq!(request.notes.as_deref(), Some("payroll"));
    }
}
