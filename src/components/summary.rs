use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::icons::{icon_credit_card, icon_trending_up, icon_wallet};
use crate::api::reports::{historical_summary, SummaryReport};
use crate::format::format_currency;

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    TrendingUp,
    CreditCard,
    Wallet,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub amount: f64,
    pub icon: StatIcon,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let tone = if props.amount < 0.0 { "text-red-500" } else { "" };
    html! {
        <div class="p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start" style="background-color: var(--color-paper);">
            <div>
                <p class="opacity-70 text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                <h3 class={classes!("text-2xl", "font-bold", "tracking-tight", tone)}>{ format_currency(props.amount) }</h3>
            </div>
            <div class="p-3 rounded-[10px]" style="background-color: var(--color-background);">
                {
                    match props.icon {
                        StatIcon::TrendingUp => icon_trending_up(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SummaryCardsProps {
    pub user_id: String,
    /// Reloads the totals whenever it changes.
    #[prop_or_default]
    pub revision: u32,
}

/// Historical totals for the signed-in user.
#[function_component(SummaryCards)]
pub fn summary_cards(props: &SummaryCardsProps) -> Html {
    let summary = use_state(SummaryReport::default);
    let error = use_state(|| None::<String>);

    {
        let summary = summary.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |(user_id, _): &(String, u32)| {
                let user_id = user_id.clone();
                spawn_local(async move {
                    match historical_summary(&user_id).await {
                        Ok(report) => {
                            summary.set(report);
                            error.set(None);
                        }
                        Err(err) => {
                            log::error!("summary load failed: {}", err);
                            error.set(Some(err.message));
                        }
                    }
                });
                || ()
            },
            (props.user_id.clone(), props.revision),
        );
    }

    html! {
        <>
            if let Some(message) = (*error).clone() {
                <p class="text-sm text-red-500">{ message }</p>
            }
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <StatCard title="Total Income" amount={summary.total_income} icon={StatIcon::TrendingUp} />
                <StatCard title="Total Expenses" amount={summary.total_expenses} icon={StatIcon::CreditCard} />
                <StatCard title="Net Balance" amount={summary.net_balance} icon={StatIcon::Wallet} />
            </div>
        </>
    }
}
