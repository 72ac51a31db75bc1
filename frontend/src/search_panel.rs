//! Search box with its result dropdown, and the category chips.

use crate::dataflow::Relay;
use crate::inventory::Inventory;
use crate::query_state::QueryEngine;
use shared::{CategoryFilter, ItemRecord};
use zoon::*;

pub fn search_panel(query: &QueryEngine) -> impl Element + use<> {
    let search_input_changed_relay = query.search_input_changed_relay.clone();
    let search_result_pressed_relay = query.search_result_pressed_relay.clone();

    Column::new()
        .s(Width::fill())
        .update_raw_el(|raw_el| raw_el.style("position", "relative"))
        .item(
            TextInput::new()
                .s(Width::fill())
                .s(Padding::new().x(12).y(8))
                .s(RoundedCorners::all(6))
                .s(Borders::all(Border::new().width(1).color("oklch(80% 0.02 250)")))
                .label_hidden("Search items")
                .placeholder(Placeholder::new("Search items..."))
                .text_signal(query.search_text_signal())
                .on_change(move |text| search_input_changed_relay.send(text)),
        )
        .item_signal(query.search_results_signal().map(move |results| {
            let search_result_pressed_relay = search_result_pressed_relay.clone();
            results.map(|items| result_dropdown(items, search_result_pressed_relay))
        }))
}

fn result_dropdown(items: Vec<ItemRecord>, search_result_pressed_relay: Relay<String>) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::default().max(320))
        .s(Scrollbars::y_and_clip_x())
        .s(RoundedCorners::all(6))
        .s(Background::new().color("white"))
        .s(Shadows::new([Shadow::new().y(4).blur(12).color("oklch(0% 0 0 / 20%)")]))
        .update_raw_el(|raw_el| {
            raw_el
                .style("position", "absolute")
                .style("top", "100%")
                .style("z-index", "10")
        })
        .items(items.into_iter().map(|item| {
            let search_result_pressed_relay = search_result_pressed_relay.clone();
            Button::new()
                .s(Width::fill())
                .s(Padding::new().x(12).y(8))
                .label(
                    Row::new()
                        .s(Gap::new().x(8))
                        .item(El::new().s(Font::new().weight(FontWeight::Medium)).child(item.name))
                        .item(
                            El::new()
                                .s(Align::new().right())
                                .s(Font::new().size(12).color("oklch(55% 0.02 250)"))
                                .child(item.category),
                        ),
                )
                .on_press(move || search_result_pressed_relay.send(item.id.clone()))
        }))
}

pub fn category_chips(inventory: &Inventory, query: &QueryEngine) -> impl Element + use<> {
    let category_chip_pressed_relay = query.category_chip_pressed_relay.clone();

    let chips_signal = map_ref! {
        let categories = inventory.categories_signal(),
        let active = query.category_filter_signal() =>
        chip_filters(categories)
            .into_iter()
            .map(|filter| {
                let is_active = &filter == active;
                (filter, is_active)
            })
            .collect::<Vec<_>>()
    };

    Row::new()
        .s(Width::fill())
        .multiline()
        .s(Gap::new().x(6).y(6))
        .items_signal_vec(chips_signal.to_signal_vec().map(move |(filter, is_active)| {
            category_chip(filter, is_active, category_chip_pressed_relay.clone())
        }))
}

/// "All" first, then every category in first-seen order.
pub fn chip_filters(categories: &[String]) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(categories.iter().cloned().map(CategoryFilter::Category))
        .collect()
}

fn category_chip(
    filter: CategoryFilter,
    is_active: bool,
    category_chip_pressed_relay: Relay<CategoryFilter>,
) -> impl Element {
    let (background, color) = if is_active {
        ("oklch(55% 0.15 250)", "white")
    } else {
        ("oklch(94% 0.02 250)", "oklch(30% 0.05 250)")
    };
    Button::new()
        .s(Padding::new().x(12).y(4))
        .s(RoundedCorners::all_max())
        .s(Background::new().color(background))
        .s(Font::new().size(13).color(color))
        .label(filter.label().to_string())
        .on_press(move || category_chip_pressed_relay.send(filter.clone()))
}
