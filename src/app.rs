use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::layout::{loading_placeholder, DashboardLayout};
use crate::config::config;
use crate::pages::admin::AdminPage;
use crate::pages::login::LoginPage;
use crate::pages::user_home::UserHomePage;
use crate::routes::{redirect_for, Route};
use crate::session::{validate, AuthState, Session, SessionStore};
use crate::storage::BrowserStorage;
use crate::theme::{apply_to_document, load_theme, toggle_theme, Theme};

/// Everything a route needs from the shell, passed down explicitly.
#[derive(Clone, PartialEq)]
struct ShellContext {
    auth: AuthState,
    theme: Theme,
    on_login: Callback<Session>,
    on_logout: Callback<()>,
    on_toggle_theme: Callback<()>,
}

fn switch(route: Route, shell: &ShellContext) -> Html {
    if shell.auth == AuthState::Checking {
        return loading_placeholder("Checking session...");
    }
    if let Some(target) = redirect_for(&route, &shell.auth) {
        log::debug!("redirecting {} to {}", route.to_path(), target.to_path());
        return html! { <Redirect<Route> to={target} /> };
    }

    let Some(session) = shell.auth.session() else {
        return html! { <LoginPage on_login={shell.on_login.clone()} /> };
    };

    let content = match &route {
        Route::Admin => html! { <AdminPage /> },
        Route::Dashboard => return html! { <Redirect<Route> to={Route::UserHome} /> },
        _ => html! { <UserHomePage user_id={session.user_id.clone()} section={route.section()} /> },
    };

    html! {
        <DashboardLayout
            route={route}
            user_name={session.user_name.clone()}
            theme={shell.theme}
            on_toggle_theme={shell.on_toggle_theme.clone()}
            on_logout={shell.on_logout.clone()}
        >
            { content }
        </DashboardLayout>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let theme = use_state(|| load_theme(&BrowserStorage::persistent()));
    let auth = use_state(|| AuthState::Checking);

    use_effect_with_deps(
        |theme: &Theme| {
            apply_to_document(*theme);
            || ()
        },
        *theme,
    );

    {
        let auth = auth.clone();
        use_effect_with_deps(
            move |_| {
                let store = SessionStore::browser();
                match store.restore(Utc::now()) {
                    None => auth.set(AuthState::Anonymous),
                    Some(session) => spawn_local(async move {
                        match validate(session, config().session_ttl).await {
                            Ok(session) => {
                                log::info!("session restored for {}", session.user_name);
                                store.save(&session);
                                auth.set(AuthState::Authenticated(session));
                            }
                            Err(err) => {
                                log::warn!("stored session rejected: {}", err);
                                store.clear();
                                auth.set(AuthState::Anonymous);
                            }
                        }
                    }),
                }
                || ()
            },
            (),
        );
    }

    let on_login = {
        let auth = auth.clone();
        Callback::from(move |session: Session| auth.set(AuthState::Authenticated(session)))
    };

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_| {
            SessionStore::browser().clear();
            log::info!("signed out");
            auth.set(AuthState::Anonymous);
        })
    };

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| theme.set(toggle_theme(&BrowserStorage::persistent(), *theme)))
    };

    let shell = ShellContext {
        auth: (*auth).clone(),
        theme: *theme,
        on_login,
        on_logout,
        on_toggle_theme,
    };

    html! {
        <div class="min-h-screen" style={theme.palette().style()}>
            <BrowserRouter>
                <Switch<Route> render={move |route: Route| switch(route, &shell)} />
            </BrowserRouter>
        </div>
    }
}
