use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;

use dscode_core::model::{Difficulty, DifficultyFilter};

use crate::context::{AppContext, UiState};
use crate::routes::Route;
use crate::vm::{TopicCardVm, map_topic_cards};

/// Keystrokes within this window collapse into one filter application.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

#[component]
pub fn BrowseView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let mut search_input = use_signal(String::new);
    // Monotonic generation counter; only the latest keystroke's delayed
    // task gets to apply its text.
    let mut debounce_gen = use_signal(|| 0_u64);

    let _ = (ui.revision)();
    let catalog = ctx.catalog();
    let progress = ctx.services().progress.current_progress();
    let filter = ctx.services().progress.filter();
    let prefs = ctx.services().prefs.current();
    let cards = map_topic_cards(&catalog, &progress, &filter, &prefs);
    let visible_count = cards.iter().filter(|card| card.visible).count();

    let ctx_search = ctx.clone();
    rsx! {
        div { class: "page browse-page",
            header { class: "view-header",
                h2 { class: "view-title", "Practice Problems" }
                p { class: "view-subtitle", "Tick off problems as you solve them." }
            }
            div { class: "filter-bar",
                div { class: "filter-bar__difficulty",
                    {difficulty_button(ctx.clone(), ui, filter.difficulty, DifficultyFilter::All, "All")}
                    for tier in Difficulty::ALL {
                        {difficulty_button(
                            ctx.clone(),
                            ui,
                            filter.difficulty,
                            DifficultyFilter::Only(tier),
                            tier.label(),
                        )}
                    }
                }
                input {
                    class: "filter-bar__search",
                    r#type: "search",
                    placeholder: "Search problems...",
                    value: "{search_input}",
                    oninput: move |evt| {
                        let text = evt.value();
                        search_input.set(text.clone());
                        debounce_gen += 1;
                        let generation = debounce_gen();
                        let ctx = ctx_search.clone();
                        spawn(async move {
                            tokio::time::sleep(SEARCH_DEBOUNCE).await;
                            if debounce_gen() != generation {
                                return;
                            }
                            let difficulty = ctx.services().progress.filter().difficulty;
                            ctx.services().progress.set_filter(difficulty, text);
                            ui.bump();
                        });
                    },
                }
            }
            if visible_count == 0 {
                p { class: "empty-note", "No problems match the current filter." }
            }
            div { class: "topic-list",
                for card in cards.into_iter().filter(|card| card.visible) {
                    TopicCard { card }
                }
            }
        }
    }
}

fn difficulty_button(
    ctx: AppContext,
    ui: UiState,
    current: DifficultyFilter,
    target: DifficultyFilter,
    label: &'static str,
) -> Element {
    rsx! {
        button {
            class: if current == target { "btn btn-filter btn-filter--active" } else { "btn btn-filter" },
            r#type: "button",
            onclick: move |_| {
                let search = ctx.services().progress.filter().search;
                ctx.services().progress.set_filter(target, search);
                ui.bump();
            },
            "{label}"
        }
    }
}

#[component]
fn TopicCard(card: TopicCardVm) -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let topic = card.topic.clone();
    let collapsed = card.collapsed;
    let ctx_collapse = ctx.clone();
    rsx! {
        section { class: "topic-card",
            header {
                class: "topic-card__header",
                onclick: move |_| {
                    let ctx = ctx_collapse.clone();
                    let topic = topic.clone();
                    spawn(async move {
                        ctx.services().prefs.set_collapsed(topic, !collapsed).await;
                        ui.bump();
                    });
                },
                span { class: "topic-card__chevron", if collapsed { "▸" } else { "▾" } }
                h3 { class: "topic-card__name", "{card.name}" }
                span { class: "topic-card__count", "{card.stats.completed} / {card.stats.total}" }
                div { class: "progress-bar",
                    div { class: "progress-bar__fill", style: "width: {card.bar_width};" }
                }
            }
            if !card.collapsed {
                ul { class: "problem-list",
                    for row in card.rows.into_iter().filter(|row| row.visible) {
                        li { class: "problem-row", key: "{row.id}",
                            input {
                                class: "problem-row__check",
                                r#type: "checkbox",
                                checked: row.completed,
                                onchange: {
                                    let ctx = ctx.clone();
                                    let id = row.id.clone();
                                    move |evt: Event<FormData>| {
                                        let ctx = ctx.clone();
                                        let id = id.clone();
                                        let completed = evt.checked();
                                        spawn(async move {
                                            ctx.services()
                                                .progress
                                                .toggle_completion(id, completed)
                                                .await;
                                            ctx.services().auth.push_if_signed_in().await;
                                            ui.bump();
                                        });
                                    }
                                },
                            }
                            Link {
                                class: if row.completed { "problem-row__title problem-row__title--done" } else { "problem-row__title" },
                                to: Route::Problem { id: row.id.as_str().to_string() },
                                "{row.title}"
                            }
                            span {
                                class: "badge badge--{row.difficulty}",
                                {row.difficulty.label()}
                            }
                        }
                    }
                }
            }
        }
    }
}
