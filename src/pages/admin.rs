use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::user::{create_user, CreateUserRequest, User};
use crate::components::icons::icon_plus;
use crate::components::layout::page_shell;
use crate::components::modal::{FieldDef, FormModal, FormValues, ModalOutcome, SelectOption};
use crate::components::table::{CellValue, Column, DataTable};

const INVALID_USER_TYPE: &str = "Select a user type";

/// Known user types; the backend stores the numeric id.
const USER_TYPES: [(i64, &str); 2] = [(1, "Administrator"), (2, "User")];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserField {
    UserName,
    Password,
    UserType,
}

fn fields() -> Vec<FieldDef<UserField>> {
    let types = USER_TYPES
        .iter()
        .map(|(id, label)| SelectOption::new(id.to_string(), *label))
        .collect();
    vec![
        FieldDef::text(UserField::UserName, "User name").required(),
        FieldDef::password(UserField::Password, "Password").required(),
        FieldDef::select(UserField::UserType, "User type", types).required(),
    ]
}

fn user_type_label(id: i64) -> String {
    USER_TYPES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| id.to_string())
}

fn columns() -> Vec<Column<User>> {
    vec![
        Column::new("userName", "User name", |user: &User| CellValue::from(user.user_name.as_str())),
        Column::new("userType", "User type", |user: &User| {
            CellValue::from(user_type_label(user.user_type_id))
        }),
    ]
}

pub fn create_request(values: &FormValues<UserField>) -> Result<CreateUserRequest, &'static str> {
    let user_type_id = values
        .text(UserField::UserType)
        .trim()
        .parse::<i64>()
        .map_err(|_| INVALID_USER_TYPE)?;
    Ok(CreateUserRequest {
        user_name: values.text(UserField::UserName).trim().to_string(),
        password: values.text(UserField::Password),
        user_type_id,
    })
}

/// Creates accounts; users added during this visit are listed below the form.
#[function_component(AdminPage)]
pub fn admin_page() -> Html {
    let created = use_state(|| Rc::new(Vec::<User>::new()));
    let open = use_state(|| false);
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);
    let fields = use_memo(|_| fields(), ());
    let columns = use_memo(|_| columns(), ());

    let on_open = {
        let open = open.clone();
        let error = error.clone();
        Callback::from(move |_| {
            error.set(None);
            open.set(true);
        })
    };

    let on_close = {
        let open = open.clone();
        let busy = busy.clone();
        Callback::from(move |_| {
            if !*busy {
                open.set(false);
            }
        })
    };

    let on_submit = {
        let created = created.clone();
        let open = open.clone();
        let busy = busy.clone();
        let error = error.clone();
        Callback::from(move |outcome: ModalOutcome<UserField>| {
            let ModalOutcome::Saved(values) = outcome else {
                return;
            };
            let request = match create_request(&values) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message.to_string()));
                    return;
                }
            };
            if *busy {
                return;
            }
            busy.set(true);
            let created = created.clone();
            let open = open.clone();
            let busy = busy.clone();
            let error = error.clone();
            spawn_local(async move {
                match create_user(&request).await {
                    Ok(user) => {
                        log::info!("created user {}", user.user_name);
                        let mut next = (**created).clone();
                        next.push(user);
                        created.set(Rc::new(next));
                        open.set(false);
                    }
                    Err(err) => {
                        log::error!("create user failed: {}", err);
                        error.set(Some(err.message));
                    }
                }
                busy.set(false);
            });
        })
    };

    page_shell(
        "Administration",
        html! {
            <button type="button" onclick={on_open} class="flex items-center gap-2 px-4 py-2 rounded-lg text-white font-semibold" style="background-color: var(--color-primary-light);">
                { icon_plus() }{"New User"}
            </button>
        },
        html! {
            <>
                <DataTable<User> columns={columns.clone()} rows={(*created).clone()}
                    empty_message={"No users created yet."} />
                <FormModal<UserField>
                    open={*open}
                    title={"New User".to_string()}
                    fields={fields.clone()}
                    busy={*busy}
                    error={(*error).clone()}
                    {on_close}
                    {on_submit}
                />
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_travels_as_a_number() {
        let values = FormValues::new()
            .with(UserField::UserName, " admin ")
            .with(UserField::Password, "s3cret")
            .with(UserField::UserType, "1");
        let body = serde_json::to_value(create_request(&values).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"userName": "admin", "password": "s3cret", "userTypeId": 1})
        );
    }

    #[test]
    fn missing_user_type_is_refused() {
        let values = FormValues::new().with(UserField::UserName, "admin");
        assert_eq!(create_request(&values), Err(INVALID_USER_TYPE));
    }

    #[test]
    fn unknown_type_ids_show_the_number() {
        assert_eq!(user_type_label(2), "User");
        assert_eq!(user_type_label(7), "7");
    }
}
