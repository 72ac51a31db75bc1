//! Login gate. There are no credentials; "Enter" opens the app.

use crate::dataflow::{relay, Actor, Relay};
use futures::StreamExt;
use zoon::*;

#[derive(Clone, Debug)]
pub struct Session {
    entered: Actor<bool>,
    pub enter_pressed_relay: Relay<()>,
}

impl Session {
    pub fn new() -> Self {
        let (enter_pressed_relay, mut enter_pressed) = relay();

        let entered = Actor::new(false, async move |state| {
            while enter_pressed.next().await.is_some() {
                state.set_neq(true);
            }
        });

        Self {
            entered,
            enter_pressed_relay,
        }
    }

    pub fn entered_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.entered.signal()
    }
}

pub fn login_screen(session: &Session) -> impl Element + use<> {
    let enter_pressed_relay = session.enter_pressed_relay.clone();

    El::new()
        .s(Width::fill())
        .s(Height::screen())
        .s(Background::new().color("oklch(22% 0.03 250)"))
        .child(
            Column::new()
                .s(Align::center())
                .s(Gap::new().y(16))
                .s(Padding::all(32))
                .s(RoundedCorners::all(12))
                .s(Background::new().color("oklch(98% 0.01 250)"))
                .s(Shadows::new([Shadow::new().y(4).blur(16).color("oklch(0% 0 0 / 30%)")]))
                .item(
                    El::new()
                        .s(Align::new().center_x())
                        .s(Font::new().size(24).weight(FontWeight::Bold))
                        .child("Smart Warehouse"),
                )
                .item(
                    El::new()
                        .s(Align::new().center_x())
                        .s(Font::new().size(14).color("oklch(50% 0.02 250)"))
                        .child("Management System"),
                )
                .item(
                    Button::new()
                        .s(Align::new().center_x())
                        .s(Padding::new().x(32).y(10))
                        .s(RoundedCorners::all(6))
                        .s(Background::new().color("oklch(55% 0.15 250)"))
                        .s(Font::new().color("white").weight(FontWeight::SemiBold))
                        .label("Enter")
                        .on_press(move || enter_pressed_relay.send(())),
                ),
        )
}
