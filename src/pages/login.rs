use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::user::{login, LoginRequest};
use crate::config::config;
use crate::session::{Session, SessionStore};

pub const MISSING_CREDENTIALS: &str = "User name and password are required";

pub fn login_request(user_name: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let user_name = user_name.trim();
    if user_name.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok(LoginRequest {
        user_name: user_name.to_string(),
        password: password.to_string(),
    })
}

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub on_login: Callback<Session>,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let user_name = use_state(String::new);
    let password = use_state(String::new);
    let remember = use_state(|| false);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let user_name = user_name.clone();
        let password = password.clone();
        let remember = remember.clone();
        let error = error.clone();
        let loading = loading.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            let request = match login_request(&user_name, &password) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message.to_string()));
                    return;
                }
            };

            loading.set(true);
            error.set(None);
            let remember = *remember;
            let error = error.clone();
            let loading = loading.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                match login(&request).await {
                    Ok(user) => {
                        let session = Session::start(&user, remember, Utc::now(), config().session_ttl);
                        SessionStore::browser().save(&session);
                        log::info!("signed in as {}", session.user_name);
                        loading.set(false);
                        on_login.emit(session);
                    }
                    Err(err) => {
                        log::warn!("login failed: {}", err);
                        error.set(Some(err.message));
                        loading.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="w-full max-w-md border border-border rounded-2xl shadow-lg p-8" style="background-color: var(--color-paper);">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold">{"Welcome back"}</h1>
                    <p class="text-sm opacity-70 mt-2">{"Sign in to manage your funds."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium">{"User name"}</label>
                        <input
                            type="text"
                            class="w-full px-4 py-2 bg-transparent border border-border rounded-lg focus:outline-none focus:ring-2"
                            value={(*user_name).clone()}
                            oninput={{
                                let user_name = user_name.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    user_name.set(input.value());
                                })
                            }}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium">{"Password"}</label>
                        <input
                            type="password"
                            class="w-full px-4 py-2 bg-transparent border border-border rounded-lg focus:outline-none focus:ring-2"
                            value={(*password).clone()}
                            oninput={{
                                let password = password.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    password.set(input.value());
                                })
                            }}
                        />
                    </div>
                    <label class="flex items-center gap-2 text-sm">
                        <input
                            type="checkbox"
                            checked={*remember}
                            onchange={{
                                let remember = remember.clone();
                                Callback::from(move |e: Event| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    remember.set(input.checked());
                                })
                            }}
                        />
                        {"Remember me"}
                    </label>

                    if let Some(message) = (*error).clone() {
                        <div class="text-sm text-red-500">{ message }</div>
                    }

                    <button
                        type="submit"
                        class="w-full py-2 rounded-lg text-white font-semibold disabled:opacity-50"
                        style="background-color: var(--color-primary-light);"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else { "Sign in" } }
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_required() {
        assert_eq!(login_request("  ", "secret"), Err(MISSING_CREDENTIALS));
        assert_eq!(login_request("ana", ""), Err(MISSING_CREDENTIALS));
    }

    #[test]
    fn user_name_is_trimmed_password_is_not() {
        let request = login_request(" ana ", " pw ").unwrap();
        assert_eq!(request.user_name, "ana");
        assert_eq!(request.password, " pw ");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"userName": "ana", "password": " pw "})
        );
    }
}
