use yew::prelude::*;

use super::expense_types::ExpenseTypesPage;
use super::monetary_funds::MonetaryFundsPage;
use crate::components::layout::{page_shell, Tabs};

const TABS: [&str; 2] = ["Expense Types", "Monetary Funds"];

#[derive(Properties, PartialEq)]
pub struct MaintenancesPageProps {
    pub user_id: String,
}

#[function_component(MaintenancesPage)]
pub fn maintenances_page(props: &MaintenancesPageProps) -> Html {
    let active = use_state(|| 0usize);
    let on_select = {
        let active = active.clone();
        Callback::from(move |index: usize| active.set(index))
    };

    let content = match *active {
        0 => html! { <ExpenseTypesPage user_id={props.user_id.clone()} /> },
        _ => html! { <MonetaryFundsPage user_id={props.user_id.clone()} /> },
    };

    page_shell(
        "Maintenances",
        html! {},
        html! {
            <>
                <Tabs labels={TABS.to_vec()} active={*active} {on_select} />
                { content }
            </>
        },
    )
}
