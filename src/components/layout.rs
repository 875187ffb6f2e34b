use yew::prelude::*;
use yew_router::prelude::*;

use super::icons::{icon_log_out, icon_moon, icon_sun};
use crate::routes::{Route, Section};
use crate::theme::Theme;

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

/// Inline banner for load and mutation failures.
pub fn error_banner(error: &Option<String>) -> Html {
    match error {
        Some(message) => html! {
            <div class="rounded-lg border border-red-400 bg-red-500/10 px-4 py-3 text-sm text-red-500">
                { message.clone() }
            </div>
        },
        None => html! {},
    }
}

pub fn loading_placeholder(message: &'static str) -> Html {
    html! {
        <div class="flex items-center justify-center py-12 opacity-70">{ message }</div>
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Crumb {
    pub label: &'static str,
    pub route: Option<Route>,
}

/// Dashboard / User / current section (or Dashboard / Admin); the last crumb
/// is not a link.
pub fn breadcrumb_trail(route: &Route) -> Vec<Crumb> {
    let mut trail = vec![Crumb {
        label: "Dashboard",
        route: Some(Route::UserHome),
    }];
    if *route == Route::Admin {
        trail.push(Crumb {
            label: "Admin",
            route: None,
        });
        return trail;
    }
    trail.push(Crumb {
        label: "User",
        route: Some(Route::UserHome),
    });
    if let Some(section) = route.section() {
        trail.push(Crumb {
            label: section.label(),
            route: Some(section.route()),
        });
    }
    if let Some(last) = trail.last_mut() {
        last.route = None;
    }
    trail
}

#[derive(Properties, PartialEq)]
pub struct BreadcrumbsProps {
    pub route: Route,
}

#[function_component(Breadcrumbs)]
pub fn breadcrumbs(props: &BreadcrumbsProps) -> Html {
    let trail = breadcrumb_trail(&props.route);
    let last = trail.len().saturating_sub(1);
    html! {
        <nav class="flex items-center gap-2 text-sm px-6 pt-4 opacity-80">
            { for trail.into_iter().enumerate().map(|(index, crumb)| html! {
                <>
                    {
                        match crumb.route {
                            Some(route) => html! { <Link<Route> to={route} classes={classes!("hover:underline")}>{ crumb.label }</Link<Route>> },
                            None => html! { <span class="font-semibold">{ crumb.label }</span> },
                        }
                    }
                    if index < last { <span>{"/"}</span> }
                </>
            }) }
        </nav>
    }
}

#[derive(Properties, PartialEq)]
pub struct TabsProps {
    pub labels: Vec<&'static str>,
    pub active: usize,
    pub on_select: Callback<usize>,
}

#[function_component(Tabs)]
pub fn tabs(props: &TabsProps) -> Html {
    html! {
        <div class="flex gap-2 border-b border-border">
            { for props.labels.iter().enumerate().map(|(index, label)| {
                let on_select = props.on_select.clone();
                let onclick = Callback::from(move |_| on_select.emit(index));
                let class = if index == props.active {
                    "px-4 py-2 font-semibold border-b-2"
                } else {
                    "px-4 py-2 opacity-70 hover:opacity-100"
                };
                let style = (index == props.active).then_some("border-color: var(--color-primary-light);");
                html! { <button type="button" {class} {style} {onclick}>{ *label }</button> }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user_name: String,
    pub theme: Theme,
    pub active: Option<Section>,
    pub on_toggle_theme: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let toggle = {
        let on_toggle_theme = props.on_toggle_theme.clone();
        Callback::from(move |_| on_toggle_theme.emit(()))
    };
    let logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <header class="border-b border-border h-16 flex items-center justify-between px-6" style="background-color: var(--color-paper);">
            <Link<Route> to={Route::UserHome} classes={classes!("text-lg", "font-bold")}>{"Fondos"}</Link<Route>>
            <nav class="hidden md:flex items-center gap-4">
                { for Section::ALL.iter().map(|section| {
                    let link_class = if props.active == Some(*section) {
                        "font-semibold underline"
                    } else {
                        "opacity-80 hover:opacity-100"
                    };
                    html! { <Link<Route> to={section.route()} classes={classes!(link_class)}>{ section.label() }</Link<Route>> }
                }) }
            </nav>
            <div class="flex items-center gap-3">
                <span class="text-sm opacity-80">{ props.user_name.clone() }</span>
                <button class="p-2 rounded-full hover:opacity-80" aria-label="Toggle theme" onclick={toggle}>
                    { match props.theme {
                        Theme::Dark => icon_sun(),
                        Theme::Light => icon_moon(),
                    } }
                </button>
                <button class="p-2 rounded-full hover:opacity-80" aria-label="Log out" onclick={logout}>
                    { icon_log_out() }
                </button>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub struct DashboardLayoutProps {
    pub route: Route,
    pub user_name: String,
    pub theme: Theme,
    pub on_toggle_theme: Callback<()>,
    pub on_logout: Callback<()>,
    pub children: Children,
}

#[function_component(DashboardLayout)]
pub fn dashboard_layout(props: &DashboardLayoutProps) -> Html {
    html! {
        <div class="min-h-screen flex flex-col">
            <Header
                user_name={props.user_name.clone()}
                theme={props.theme}
                active={props.route.section()}
                on_toggle_theme={props.on_toggle_theme.clone()}
                on_logout={props.on_logout.clone()}
            />
            <Breadcrumbs route={props.route.clone()} />
            <main class="flex-1 overflow-y-auto">
                { for props.children.iter() }
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_ends_with_current_section() {
        let trail = breadcrumb_trail(&Route::Movements);
        let labels: Vec<_> = trail.iter().map(|crumb| crumb.label).collect();
        assert_eq!(labels, vec!["Dashboard", "User", "Movements"]);
        assert_eq!(trail[0].route, Some(Route::UserHome));
        assert_eq!(trail[2].route, None);
    }

    #[test]
    fn trail_without_section_stops_at_user() {
        let trail = breadcrumb_trail(&Route::UserHome);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].label, "User");
        assert_eq!(trail[1].route, None);
    }

    #[test]
    fn admin_trail() {
        let labels: Vec<_> = breadcrumb_trail(&Route::Admin)
            .into_iter()
            .map(|crumb| crumb.label)
            .collect();
        assert_eq!(labels, vec!["Dashboard", "Admin"]);
    }
}
