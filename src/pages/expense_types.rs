use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::crud::{delete_message, use_crud, ModalMode};
use crate::api::expense_type::{
    create_expense_type, delete_expense_type, list_expense_types, update_expense_type,
    CreateExpenseTypeRequest, ExpenseType, UpdateExpenseTypeRequest,
};
use crate::components::icons::{icon_delete, icon_edit, icon_plus};
use crate::components::layout::{error_banner, loading_placeholder};
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome};
use crate::components::table::{CellValue, Column, DataTable, RowAction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpenseTypeField {
    Name,
    Description,
}

fn fields() -> Vec<FieldDef<ExpenseTypeField>> {
    vec![
        FieldDef::text(ExpenseTypeField::Name, "Name").required(),
        FieldDef::text(ExpenseTypeField::Description, "Description"),
    ]
}

fn columns() -> Vec<Column<ExpenseType>> {
    vec![
        Column::new("code", "Code", |row: &ExpenseType| CellValue::from(row.code.as_str())),
        Column::new("name", "Name", |row: &ExpenseType| CellValue::from(row.name.as_str())),
        Column::new("description", "Description", |row: &ExpenseType| {
            CellValue::from(row.description.clone())
        }),
    ]
}

fn initial_values(record: &ExpenseType) -> FormValues<ExpenseTypeField> {
    FormValues::new()
        .with(ExpenseTypeField::Name, record.name.as_str())
        .with(
            ExpenseTypeField::Description,
            record.description.clone().unwrap_or_default(),
        )
}

pub fn create_request(user_id: &str, values: &FormValues<ExpenseTypeField>) -> CreateExpenseTypeRequest {
    CreateExpenseTypeRequest {
        user_id: user_id.to_string(),
        name: values.text(ExpenseTypeField::Name).trim().to_string(),
        description: values.optional_text(ExpenseTypeField::Description),
    }
}

pub fn update_request(id: &str, values: &FormValues<ExpenseTypeField>) -> UpdateExpenseTypeRequest {
    UpdateExpenseTypeRequest {
        id: id.to_string(),
        name: values.text(ExpenseTypeField::Name).trim().to_string(),
        description: values.optional_text(ExpenseTypeField::Description),
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpenseTypesPageProps {
    pub user_id: String,
}

#[function_component(ExpenseTypesPage)]
pub fn expense_types_page(props: &ExpenseTypesPageProps) -> Html {
    let rows = use_state(|| Rc::new(Vec::<ExpenseType>::new()));
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let crud = use_crud::<ExpenseType>();
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
                    match list_expense_types(&user_id).await {
                        Ok(list) => {
                            rows.set(Rc::new(list));
                            load_error.set(None);
                        }
                        Err(err) => {
                            log::error!("expense types load failed: {}", err);
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
        Callback::from(move |outcome: ModalOutcome<ExpenseTypeField>| {
            match (&*crud.mode, outcome) {
                (ModalMode::Create, ModalOutcome::Saved(values)) => {
                    let request = create_request(&user_id, &values);
                    crud.mutate("create expense type", async move {
                        create_expense_type(&request).await.map(|_| ())
                    });
                }
                (ModalMode::Edit(record), ModalOutcome::Saved(values)) => {
                    let request = update_request(&record.id, &values);
                    crud.mutate("update expense type", async move {
                        update_expense_type(&request).await.map(|_| ())
                    });
                }
                (ModalMode::Delete(record), ModalOutcome::Confirmed) => {
                    let id = record.id.clone();
                    crud.mutate("delete expense type", async move { delete_expense_type(&id).await });
                }
                _ => {}
            }
        })
    };

    let actions = vec![
        RowAction::new("Edit", icon_edit, crud.opener(ModalMode::Edit)),
        RowAction::new("Delete", icon_delete, crud.opener(ModalMode::Delete)),
    ];

    let mode = &*crud.mode;
    let initial = match mode {
        ModalMode::Edit(record) => Some(Rc::new(initial_values(record))),
        _ => None,
    };
    let confirm_message = mode.record().map(|record| delete_message(&record.name));
    let modal_key = mode.record().map(|record| record.id.clone()).unwrap_or_else(|| "new".to_string());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-lg font-bold">{"Expense Types"}</h2>
                <button type="button" onclick={crud.open_create()} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                    { icon_plus() }{"New"}
                </button>
            </div>
            { error_banner(&load_error) }
            if *loading && rows.is_empty() {
                { loading_placeholder("Loading expense types...") }
            } else {
                <DataTable<ExpenseType> columns={columns.clone()} rows={(*rows).clone()} {actions} />
            }
            <FormModal<ExpenseTypeField>
                key={modal_key}
                open={mode.is_open()}
                title={mode.title("Expense Type")}
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
    fn blank_description_is_omitted() {
        let values = FormValues::new()
            .with(ExpenseTypeField::Name, " Food ")
            .with(ExpenseTypeField::Description, "   ");
        let body = serde_json::to_value(create_request("u1", &values)).unwrap();
        assert_eq!(body, serde_json::json!({"userId": "u1", "name": "Food"}));
    }

    #[test]
    fn edit_prefills_from_record() {
        let record = ExpenseType {
            id: "t1".into(),
            code: "ET-1".into(),
            name: "Food".into(),
            description: None,
            user_id: "u1".into(),
        };
        let values = initial_values(&record);
        assert_eq!(values.text(ExpenseTypeField::Name), "Food");
        assert_eq!(values.text(ExpenseTypeField::Description), "");
        assert_eq!(update_request(&record.id, &values).id, "t1");
    }
}
