use yew::prelude::*;

use super::budgets::BudgetsPage;
use super::deposits::DepositsPage;
use super::expenses::ExpensesPage;
use crate::components::layout::{page_shell, Tabs};

const TABS: [&str; 3] = ["Budgets", "Expenses", "Deposits"];

#[derive(Properties, PartialEq)]
pub struct MovementsPageProps {
    pub user_id: String,
}

#[function_component(MovementsPage)]
pub fn movements_page(props: &MovementsPageProps) -> Html {
    let active = use_state(|| 0usize);
    let on_select = {
        let active = active.clone();
        Callback::from(move |index: usize| active.set(index))
    };

    let user_id = props.user_id.clone();
    let content = match *active {
        0 => html! { <BudgetsPage {user_id} /> },
        1 => html! { <ExpensesPage {user_id} /> },
        _ => html! { <DepositsPage {user_id} /> },
    };

    page_shell(
        "Movements",
        html! {},
        html! {
            <>
                <Tabs labels={TABS.to_vec()} active={*active} {on_select} />
                { content }
            </>
        },
    )
}
