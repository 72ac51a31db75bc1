//! Title banner and the flip card for the selected item.

use crate::config::UiConfig;
use crate::dataflow::{relay, Actor, Relay};
use crate::inventory::Inventory;
use crate::query_state::QueryEngine;
use futures::{select, StreamExt};
use shared::tree::trail_to;
use shared::{ItemRecord, ItemStatus, LocationNode};
use zoon::*;

const CARD_WIDTH_PX: u32 = 340;
const CARD_HEIGHT_PX: u32 = 440;

/// Id of the item whose card shows its back side. Selecting another item
/// shows that item's front, since the ids no longer match.
#[derive(Clone, Debug)]
pub struct ItemCard {
    flipped_item: Actor<Option<String>>,
    pub details_pressed_relay: Relay<String>,
    pub close_pressed_relay: Relay<()>,
}

impl ItemCard {
    pub fn new() -> Self {
        let (details_pressed_relay, mut details_pressed) = relay();
        let (close_pressed_relay, mut close_pressed) = relay();

        let flipped_item = Actor::new(None, async move |state| {
            loop {
                select! {
                    item_id = details_pressed.next() => {
                        let Some(item_id) = item_id else { break };
                        state.set(Some(item_id));
                    }
                    closed = close_pressed.next() => {
                        if closed.is_none() {
                            break;
                        }
                        state.set_neq(None);
                    }
                }
            }
        });

        Self {
            flipped_item,
            details_pressed_relay,
            close_pressed_relay,
        }
    }
}

/// Location names from the root down to `location_id`.
pub fn breadcrumb(forest: &[LocationNode], location_id: &str) -> Option<String> {
    let trail = trail_to(forest, location_id)?;
    Some(
        trail
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(" / "),
    )
}

pub fn title_banner() -> impl Element {
    Column::new()
        .s(Align::new().center_x())
        .s(Padding::new().y(48))
        .s(Gap::new().y(8))
        .item(
            El::new()
                .s(Align::new().center_x())
                .s(Font::new().size(36).weight(FontWeight::Bold).color("oklch(30% 0.08 250)"))
                .child("Smart Warehouse"),
        )
        .item(
            El::new()
                .s(Align::new().center_x())
                .s(Font::new().size(18).color("oklch(50% 0.04 250)"))
                .child("Management System"),
        )
}

/// What the detail area shows.
#[derive(Clone, Debug, PartialEq)]
enum DetailContent {
    Title,
    Card(CardView),
    /// The open nav panel covers the card on a phone.
    Hidden,
}

#[derive(Clone, Debug, PartialEq)]
struct CardView {
    item: ItemRecord,
    image_url: String,
    breadcrumb: String,
}

/// The title depends on the selection alone; only the card yields to the
/// nav panel.
fn detail_content(
    hidden: bool,
    selected: Option<&ItemRecord>,
    forest: &[LocationNode],
    fallback_image: &str,
) -> DetailContent {
    match selected {
        None => DetailContent::Title,
        Some(_) if hidden => DetailContent::Hidden,
        Some(item) => DetailContent::Card(CardView {
            image_url: item.image_url_or(fallback_image).to_string(),
            breadcrumb: breadcrumb(forest, &item.location_id)
                .unwrap_or_else(|| "Unassigned".to_string()),
            item: item.clone(),
        }),
    }
}

pub fn detail_area(
    inventory: &Inventory,
    query: &QueryEngine,
    config: &UiConfig,
    card: &ItemCard,
) -> impl Element + use<> {
    let card = card.clone();

    let content_signal = map_ref! {
        let hidden = query.detail_hidden_signal(),
        let selected = query.selected_item_signal(),
        let data = inventory.data_signal(),
        let fallback_image = config.fallback_image_signal() =>
        detail_content(*hidden, selected.as_ref(), &data.forest, fallback_image)
    }
    .dedupe_cloned();

    El::new()
        .s(Width::fill())
        .s(Padding::all(16))
        .child_signal(content_signal.map(move |content| match content {
            DetailContent::Title => Some(title_banner().unify()),
            DetailContent::Card(view) => Some(flip_card(view, &card).unify()),
            DetailContent::Hidden => None,
        }))
}

fn flip_card(view: CardView, card: &ItemCard) -> impl Element {
    let item_id = view.item.id.clone();
    let flipped_signal = card
        .flipped_item
        .signal_ref(move |flipped| flipped.as_deref() == Some(item_id.as_str()))
        .dedupe();

    El::new()
        .s(Align::new().center_x())
        .s(Width::exact(CARD_WIDTH_PX))
        .s(Height::exact(CARD_HEIGHT_PX))
        .update_raw_el(|raw_el| raw_el.style("perspective", "1000px"))
        .child(
            Stack::new()
                .s(Width::fill())
                .s(Height::fill())
                .s(Transitions::new([Transition::property("transform").duration(500)]))
                .update_raw_el(move |raw_el| {
                    raw_el.style("transform-style", "preserve-3d").style_signal(
                        "transform",
                        flipped_signal.map(|flipped| if flipped { "rotateY(180deg)" } else { "none" }),
                    )
                })
                .layer(card_front(&view, card.details_pressed_relay.clone()))
                .layer(card_back(&view.item, card.close_pressed_relay.clone())),
        )
}

fn card_face() -> Column<column::EmptyFlagNotSet, RawHtmlEl> {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(20))
        .s(Gap::new().y(10))
        .s(RoundedCorners::all(12))
        .s(Background::new().color("white"))
        .s(Shadows::new([Shadow::new().y(4).blur(16).color("oklch(0% 0 0 / 18%)")]))
        .update_raw_el(|raw_el| raw_el.style("backface-visibility", "hidden"))
}

fn card_front(view: &CardView, details_pressed_relay: Relay<String>) -> impl Element {
    let item_id = view.item.id.clone();
    card_face()
        .item(
            Image::new()
                .s(Width::fill())
                .s(Height::exact(220))
                .s(RoundedCorners::all(8))
                .url(view.image_url.clone())
                .description(view.item.name.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(20).weight(FontWeight::Bold))
                .child(view.item.name.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(14).color("oklch(50% 0.04 250)"))
                .child(view.item.category.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(12).color("oklch(55% 0.02 250)"))
                .child(view.breadcrumb.clone()),
        )
        .item(card_button("Details", move || {
            details_pressed_relay.send(item_id.clone())
        }))
}

fn card_back(item: &ItemRecord, close_pressed_relay: Relay<()>) -> impl Element {
    card_face()
        .update_raw_el(|raw_el| raw_el.style("transform", "rotateY(180deg)"))
        .item(
            El::new()
                .s(Font::new().size(20).weight(FontWeight::Bold))
                .child(item.name.clone()),
        )
        .item(detail_line("Quantity", item.quantity.to_string()))
        .item(detail_line("Price", item.display_price()))
        .item(detail_line("Brand", item.brand.clone()))
        .item(status_badge(item.status))
        .item(card_button("Close", move || close_pressed_relay.send(())))
}

fn detail_line(label: &str, value: String) -> impl Element {
    Row::new()
        .s(Width::fill())
        .item(
            El::new()
                .s(Font::new().color("oklch(50% 0.04 250)"))
                .child(format!("{label}:")),
        )
        .item(
            El::new()
                .s(Align::new().right())
                .s(Font::new().weight(FontWeight::SemiBold))
                .child(value),
        )
}

fn status_badge(status: ItemStatus) -> impl Element {
    let (background, color) = match status {
        ItemStatus::InStock => ("oklch(92% 0.08 150)", "oklch(40% 0.12 150)"),
        ItemStatus::LowStock => ("oklch(94% 0.08 85)", "oklch(45% 0.12 70)"),
        ItemStatus::OutOfStock => ("oklch(93% 0.06 30)", "oklch(45% 0.18 30)"),
        ItemStatus::Discontinued => ("oklch(93% 0.01 250)", "oklch(45% 0.02 250)"),
    };
    El::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all_max())
        .s(Background::new().color(background))
        .s(Font::new().size(12).weight(FontWeight::SemiBold).color(color))
        .child(status.label())
}

fn card_button(label: &str, on_press: impl FnMut() + 'static) -> impl Element {
    Button::new()
        .s(Align::new().bottom().center_x())
        .s(Padding::new().x(24).y(8))
        .s(RoundedCorners::all(6))
        .s(Background::new().color("oklch(55% 0.15 250)"))
        .s(Font::new().color("white").weight(FontWeight::SemiBold))
        .label(label.to_string())
        .on_press(on_press)
}
