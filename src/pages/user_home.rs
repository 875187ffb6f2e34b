use yew::prelude::*;
use yew_router::prelude::*;

use super::crud::DataRevision;
use super::maintenances::MaintenancesPage;
use super::movements::MovementsPage;
use super::reports::ReportsPage;
use crate::components::icons::{icon_bar_chart, icon_settings, icon_wallet};
use crate::components::summary::SummaryCards;
use crate::routes::{Route, Section};

fn section_icon(section: Section) -> Html {
    match section {
        Section::Maintenances => icon_settings(),
        Section::Movements => icon_wallet(),
        Section::Reports => icon_bar_chart(),
    }
}

fn section_blurb(section: Section) -> &'static str {
    match section {
        Section::Maintenances => "Expense types and monetary funds",
        Section::Movements => "Budgets, expenses and deposits",
        Section::Reports => "Movements and budget execution",
    }
}

#[derive(Properties, PartialEq)]
pub struct UserHomePageProps {
    pub user_id: String,
    #[prop_or_default]
    pub section: Option<Section>,
}

#[function_component(UserHomePage)]
pub fn user_home_page(props: &UserHomePageProps) -> Html {
    let revision = use_state(|| 0u32);
    let data_revision = DataRevision {
        value: *revision,
        bump: {
            let revision = revision.clone();
            Callback::from(move |_| revision.set(revision.wrapping_add(1)))
        },
    };

    let user_id = props.user_id.clone();
    let content = match props.section {
        Some(Section::Maintenances) => html! { <MaintenancesPage {user_id} /> },
        Some(Section::Movements) => html! { <MovementsPage {user_id} /> },
        Some(Section::Reports) => html! { <ReportsPage {user_id} /> },
        None => html! {},
    };

    html! {
        <ContextProvider<DataRevision> context={data_revision}>
            <div class="space-y-6">
                <div class="p-6 max-w-7xl mx-auto space-y-6">
                    <SummaryCards user_id={props.user_id.clone()} revision={*revision} />
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        { for Section::ALL.iter().map(|section| {
                            let active = props.section == Some(*section);
                            let border = if active { "border-2" } else { "border" };
                            html! {
                                <Link<Route> to={section.route()} classes={classes!("block", "rounded-[10px]", "p-5", "border-border", "hover:opacity-90", border)}>
                                    <div class="flex items-center gap-3">
                                        { section_icon(*section) }
                                        <div>
                                            <p class="font-bold">{ section.label() }</p>
                                            <p class="text-xs opacity-70">{ section_blurb(*section) }</p>
                                        </div>
                                    </div>
                                </Link<Route>>
                            }
                        }) }
                    </div>
                </div>
                { content }
            </div>
        </ContextProvider<DataRevision>>
    }
}
